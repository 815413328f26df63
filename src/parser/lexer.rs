//! Character-level SQL lexer
//!
//! Scans a script once, left to right, and produces a gap-free token stream:
//! concatenating the source text of every token reproduces the input exactly.
//! The scanner is a small state machine:
//!
//! - **Normal**: words, operators, punctuation, placeholders, whitespace
//! - **Quoted** (`'...'` / `"..."`): a doubled quote is an escaped quote and
//!   keeps the literal open; end of input closes an unterminated literal
//! - **Line comment** (`-- ...`): runs up to, not including, the line break
//! - **Block comment** (`/* ... */`): runs through `*/`, or to end of input
//!
//! Malformed input never produces an error. The only failure is refusing an
//! input larger than [`LexerOptions::max_input_len`].

use thiserror::Error;

use super::token::{is_keyword, PlaceholderKind, QuoteStyle, Token, TokenKind};

/// How a quote character is escaped inside a quoted literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteEscape {
    /// Standard SQL: `'it''s'`
    #[default]
    Doubled,
    /// MySQL style: `'it\'s'`. Doubled quotes are still accepted.
    Backslash,
}

/// Lexer configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerOptions {
    pub quote_escape: QuoteEscape,
    /// Largest accepted input in bytes. Cannot exceed `u32::MAX`.
    pub max_input_len: usize,
}

impl Default for LexerOptions {
    fn default() -> Self {
        Self {
            quote_escape: QuoteEscape::Doubled,
            max_input_len: u32::MAX as usize,
        }
    }
}

/// Lexer failure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("input of {len} bytes exceeds the lexer limit of {limit} bytes")]
    InputTooLarge { len: usize, limit: usize },
}

/// Tokenize with default options.
pub fn tokenize(sql: &str) -> Result<Vec<Token>, LexError> {
    tokenize_with(sql, &LexerOptions::default())
}

/// Tokenize a script.
///
/// The returned stream always ends with a zero-width [`TokenKind::EndOfInput`].
pub fn tokenize_with(sql: &str, options: &LexerOptions) -> Result<Vec<Token>, LexError> {
    let limit = options.max_input_len.min(u32::MAX as usize);
    if sql.len() > limit {
        return Err(LexError::InputTooLarge {
            len: sql.len(),
            limit,
        });
    }

    let mut lexer = Lexer {
        bytes: sql.as_bytes(),
        pos: 0,
        options,
        // Rough guess: one token per four bytes
        tokens: Vec::with_capacity(sql.len() / 4 + 1),
    };
    lexer.run();
    Ok(lexer.tokens)
}

/// Identifier characters. Every non-ASCII byte counts, which keeps token
/// boundaries on ASCII bytes and therefore on UTF-8 character boundaries.
#[inline]
fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

#[inline]
fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b >= 0x80
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
    options: &'a LexerOptions,
    tokens: Vec<Token>,
}

impl Lexer<'_> {
    fn run(&mut self) {
        while self.pos < self.bytes.len() {
            let start = self.pos;
            let kind = self.scan_normal();
            debug_assert!(self.pos > start, "lexer made no progress at {}", start);
            self.tokens.push(Token::new(kind, start, self.pos));
        }
        let end = self.bytes.len();
        self.tokens.push(Token::new(TokenKind::EndOfInput, end, end));
    }

    #[inline]
    fn peek(&self, offset: usize) -> Option<u8> {
        self.bytes.get(self.pos + offset).copied()
    }

    /// Consume one token starting at `self.pos` and return its kind.
    fn scan_normal(&mut self) -> TokenKind {
        let b = self.bytes[self.pos];
        match b {
            b'\'' => self.scan_quoted(b'\'', QuoteStyle::Single),
            b'"' => self.scan_quoted(b'"', QuoteStyle::Double),
            b'-' if self.peek(1) == Some(b'-') => self.scan_line_comment(),
            b'/' if self.peek(1) == Some(b'*') => self.scan_block_comment(),
            b'(' | b')' | b';' | b',' | b'.' => {
                self.pos += 1;
                TokenKind::Punctuation
            }
            b'?' => {
                self.pos += 1;
                TokenKind::Placeholder(PlaceholderKind::Positional)
            }
            b':' => self.scan_colon(),
            _ if b.is_ascii_whitespace() => {
                self.pos += 1;
                while self.peek(0).is_some_and(|c| c.is_ascii_whitespace()) {
                    self.pos += 1;
                }
                TokenKind::Whitespace
            }
            _ if is_ident_byte(b) => {
                let start = self.pos;
                self.consume_ident();
                // Only ASCII words can be keywords, so the slice is valid UTF-8
                // whenever it matters.
                match std::str::from_utf8(&self.bytes[start..self.pos]) {
                    Ok(word) if is_keyword(word) => TokenKind::Keyword,
                    _ => TokenKind::Identifier,
                }
            }
            _ => self.scan_operator(),
        }
    }

    fn consume_ident(&mut self) {
        while self.peek(0).is_some_and(is_ident_byte) {
            self.pos += 1;
        }
    }

    /// `:name` placeholder, `::` cast, `:=` assignment, or a lone colon.
    fn scan_colon(&mut self) -> TokenKind {
        match self.peek(1) {
            Some(b':') | Some(b'=') => {
                self.pos += 2;
                TokenKind::Operator
            }
            Some(c) if is_ident_start(c) => {
                self.pos += 1;
                self.consume_ident();
                TokenKind::Placeholder(PlaceholderKind::Named)
            }
            _ => {
                self.pos += 1;
                TokenKind::Operator
            }
        }
    }

    fn scan_operator(&mut self) -> TokenKind {
        let pair = (self.bytes[self.pos], self.peek(1));
        self.pos += match pair {
            (b'<', Some(b'=' | b'>')) | (b'>', Some(b'=')) | (b'!', Some(b'=')) => 2,
            (b'|', Some(b'|')) => 2,
            _ => 1,
        };
        TokenKind::Operator
    }

    fn scan_quoted(&mut self, quote: u8, style: QuoteStyle) -> TokenKind {
        let backslash = self.options.quote_escape == QuoteEscape::Backslash;
        // Opening quote
        self.pos += 1;
        while let Some(c) = self.peek(0) {
            if c == quote {
                if self.peek(1) == Some(quote) {
                    self.pos += 2;
                    continue;
                }
                self.pos += 1;
                return TokenKind::StringLiteral(style);
            }
            if backslash && c == b'\\' && self.peek(1).is_some() {
                self.pos += 2;
                continue;
            }
            self.pos += 1;
        }
        // Unterminated: the literal runs to end of input
        TokenKind::StringLiteral(style)
    }

    fn scan_line_comment(&mut self) -> TokenKind {
        self.pos += 2;
        while self.peek(0).is_some_and(|c| c != b'\n' && c != b'\r') {
            self.pos += 1;
        }
        TokenKind::LineComment
    }

    fn scan_block_comment(&mut self) -> TokenKind {
        self.pos += 2;
        while self.pos < self.bytes.len() {
            if self.bytes[self.pos] == b'*' && self.peek(1) == Some(b'/') {
                self.pos += 2;
                return TokenKind::BlockComment;
            }
            self.pos += 1;
        }
        TokenKind::BlockComment
    }
}
