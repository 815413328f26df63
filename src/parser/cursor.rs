//! Token cursor providing common navigation helpers over a token slice.
//!
//! The classifier and splitter both walk a flat token list forward, skipping
//! whitespace and comments and comparing words case-insensitively. This
//! module keeps those helpers in one place.
//!
//! ```ignore
//! let tokens = tokenize(sql)?;
//! let mut cursor = TokenCursor::new(sql, &tokens);
//! cursor.skip_trivia();
//! if cursor.expect_word_ci("WITH").is_some() {
//!     // ...
//! }
//! ```

use super::token::{QuoteStyle, Token, TokenKind};

/// Forward-only cursor over a borrowed token slice.
#[derive(Debug, Clone)]
pub struct TokenCursor<'a> {
    source: &'a str,
    tokens: &'a [Token],
    pos: usize,
}

impl<'a> TokenCursor<'a> {
    /// `tokens` must have been produced from `source`.
    pub fn new(source: &'a str, tokens: &'a [Token]) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
        }
    }

    // ========================================================================
    // Position and state
    // ========================================================================

    /// True once the cursor reaches the end of the slice or the end marker.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        match self.tokens.get(self.pos) {
            None => true,
            Some(token) => token.kind == TokenKind::EndOfInput,
        }
    }

    #[inline]
    pub fn pos(&self) -> usize {
        self.pos
    }

    // ========================================================================
    // Token access
    // ========================================================================

    #[inline]
    pub fn current_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Text of the current token, if any.
    #[inline]
    pub fn current_text(&self) -> Option<&'a str> {
        self.current_token().map(|t| t.text(self.source))
    }

    #[inline]
    pub fn advance(&mut self) {
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
    }

    // ========================================================================
    // Trivia handling
    // ========================================================================

    /// Skip whitespace and comment tokens.
    pub fn skip_trivia(&mut self) {
        while let Some(token) = self.current_token() {
            match token.kind {
                TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment => {
                    self.advance()
                }
                _ => break,
            }
        }
    }

    // ========================================================================
    // Token checks
    // ========================================================================

    /// Current token is a word equal to `word`, ignoring ASCII case.
    #[inline]
    pub fn check_word_ci(&self, word: &str) -> bool {
        match self.current_token() {
            Some(token) if token.is_word() => token.text(self.source).eq_ignore_ascii_case(word),
            _ => false,
        }
    }

    /// Return the first entry of `words` matching the current word token.
    pub fn check_any_word_ci(&self, words: &[&'static str]) -> Option<&'static str> {
        let token = self.current_token().filter(|t| t.is_word())?;
        let text = token.text(self.source);
        words.iter().copied().find(|w| text.eq_ignore_ascii_case(w))
    }

    #[inline]
    pub fn check_punct(&self, ch: char) -> bool {
        self.current_token()
            .is_some_and(|t| t.is_punct(self.source, ch))
    }

    /// A bare word or a double-quoted name.
    #[inline]
    pub fn check_name(&self) -> bool {
        self.current_token().is_some_and(|t| {
            t.is_word() || t.kind == TokenKind::StringLiteral(QuoteStyle::Double)
        })
    }

    // ========================================================================
    // Expect methods (check and advance)
    // ========================================================================

    /// Advance past `word` if it is the current token.
    pub fn expect_word_ci(&mut self, word: &str) -> Option<()> {
        if self.check_word_ci(word) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    pub fn expect_punct(&mut self, ch: char) -> Option<()> {
        if self.check_punct(ch) {
            self.advance();
            Some(())
        } else {
            None
        }
    }

    // ========================================================================
    // Grouping
    // ========================================================================

    /// Skip a parenthesized group starting at the current `(`, without
    /// looking at its contents.
    ///
    /// Returns `false` (position unchanged) if the current token is not `(`.
    /// An unclosed group consumes the rest of the slice.
    pub fn skip_paren_group(&mut self) -> bool {
        if !self.check_punct('(') {
            return false;
        }
        let mut depth = 0usize;
        while let Some(token) = self.current_token() {
            if token.is_punct(self.source, '(') {
                depth += 1;
            } else if token.is_punct(self.source, ')') {
                depth -= 1;
                if depth == 0 {
                    self.advance();
                    return true;
                }
            }
            self.advance();
        }
        true
    }
}
