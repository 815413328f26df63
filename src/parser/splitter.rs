//! Statement splitting
//!
//! Cuts a token stream into statements at top-level semicolons. A semicolon
//! is top-level when it sits outside every parenthesis and, inside a
//! `CREATE ...` statement, outside every `BEGIN ... END` / `CASE ... END`
//! block (trigger and procedure bodies contain their own semicolons). Only a
//! `BEGIN` in body position opens a block; a column named `begin` does not.
//! Quotes and comments need no handling here: the lexer already folded them
//! into single tokens, so a `;` or `(` inside them never reaches the splitter.
//!
//! Spans made only of whitespace, comments, or a bare `;` are dropped.

use super::classifier::{classify_tokens, Classification};
use super::comments::strip_comment_tokens;
use super::cursor::TokenCursor;
use super::lexer::{tokenize_with, LexError, LexerOptions};
use super::params::count_placeholder_tokens;
use super::token::{Token, TokenKind};

/// Options for statement splitting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SplitOptions {
    /// Drop the terminating `;` from each statement
    pub strip_semicolon: bool,
    pub lexer: LexerOptions,
}

impl SplitOptions {
    pub fn strip_semicolon(strip_semicolon: bool) -> Self {
        Self {
            strip_semicolon,
            ..Self::default()
        }
    }
}

/// One statement within a tokenized script
#[derive(Debug, Clone, Copy)]
pub struct StatementSpan<'a> {
    /// 0-based position among the statements that survived filtering
    pub index: usize,
    pub start_offset: usize,
    pub end_offset: usize,
    /// Tokens from the first significant token through the terminating `;`
    /// (or the last significant token when there is none)
    pub tokens: &'a [Token],
    source: &'a str,
}

impl<'a> StatementSpan<'a> {
    /// Raw source slice, comments included.
    pub fn raw_text(&self) -> &'a str {
        &self.source[self.start_offset..self.end_offset]
    }

    /// Whether the statement ends with a top-level `;`.
    pub fn has_terminator(&self) -> bool {
        self.tokens
            .last()
            .is_some_and(|t| t.is_punct(self.source, ';'))
    }

    /// Statement text with comments removed and surrounding whitespace trimmed.
    pub fn text(&self, strip_semicolon: bool) -> String {
        let tokens = if strip_semicolon && self.has_terminator() {
            &self.tokens[..self.tokens.len() - 1]
        } else {
            self.tokens
        };
        strip_comment_tokens(self.source, tokens).trim().to_string()
    }

    pub fn classification(&self) -> Classification {
        classify_tokens(self.source, self.tokens)
    }

    pub fn parameter_count(&self) -> usize {
        count_placeholder_tokens(self.tokens)
    }
}

/// A script tokenized once, shared by every per-statement analysis.
#[derive(Debug, Clone)]
pub struct Script<'a> {
    source: &'a str,
    tokens: Vec<Token>,
}

impl<'a> Script<'a> {
    pub fn parse(source: &'a str) -> Result<Self, LexError> {
        Self::parse_with(source, &LexerOptions::default())
    }

    pub fn parse_with(source: &'a str, options: &LexerOptions) -> Result<Self, LexError> {
        let tokens = tokenize_with(source, options)?;
        Ok(Self { source, tokens })
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn spans(&self) -> Vec<StatementSpan<'_>> {
        split_spans(self.source, &self.tokens)
    }
}

/// Split SQL text into individual statements.
///
/// Each statement is comment-free and trimmed. With `strip_semicolon` the
/// terminating `;` is removed as well.
pub fn split_statements(sql: &str, strip_semicolon: bool) -> Vec<String> {
    split_statements_with(sql, &SplitOptions::strip_semicolon(strip_semicolon))
}

/// [`split_statements`] with explicit options.
pub fn split_statements_with(sql: &str, options: &SplitOptions) -> Vec<String> {
    if sql.trim().is_empty() {
        return Vec::new();
    }
    match Script::parse_with(sql, &options.lexer) {
        Ok(script) => script
            .spans()
            .iter()
            .map(|span| span.text(options.strip_semicolon))
            .collect(),
        Err(e) => {
            tracing::warn!("Statement splitting fell back to a single statement: {}", e);
            split_fallback(sql, options.strip_semicolon)
        }
    }
}

/// Whole input as one statement, used only when the lexer refuses the input.
pub(crate) fn split_fallback(sql: &str, strip_semicolon: bool) -> Vec<String> {
    let mut text = sql.trim();
    if strip_semicolon {
        text = text.trim_end_matches(';').trim_end();
    }
    if text.is_empty() || text.chars().all(|c| c == ';' || c.is_whitespace()) {
        Vec::new()
    } else {
        vec![text.to_string()]
    }
}

/// Words that follow `BEGIN` without opening a procedural block.
const NON_BLOCK_BEGIN: &[&str] = &[
    "TRANSACTION",
    "TRAN",
    "WORK",
    "DEFERRED",
    "IMMEDIATE",
    "EXCLUSIVE",
];

/// Words that follow `END` when it closes a construct the splitter never opened.
const NON_BLOCK_END: &[&str] = &["IF", "LOOP", "WHILE", "REPEAT"];

/// Words after which a `BEGIN` in a statement header is an operand, not a body.
const OPERAND_LEAD: &[&str] = &[
    "ALL", "AND", "BETWEEN", "BY", "CASE", "DEFAULT", "DISTINCT", "ELSE", "FROM", "IN", "INTO",
    "JOIN", "LIKE", "NOT", "ON", "OR", "RETURN", "RETURNING", "SELECT", "SET", "TABLE", "THEN",
    "UPDATE", "USING", "VALUES", "WHEN", "WHERE", "WITH",
];

/// Words after which a `BEGIN` inside an open block starts a nested block.
const NESTED_BODY_LEAD: &[&str] = &["AS", "BEGIN", "DO", "ELSE", "LOOP", "REPEAT", "THEN"];

/// Words that, right after `BEGIN`, show it names a column or alias.
const OPERAND_FOLLOW: &[&str] = &[
    "AND", "AS", "BETWEEN", "EXCEPT", "FROM", "GROUP", "HAVING", "IN", "INTERSECT", "IS", "JOIN",
    "LIKE", "LIMIT", "ON", "OR", "ORDER", "THEN", "UNION", "USING", "WHEN", "WHERE",
];

/// Nesting state for the statement currently being collected
#[derive(Debug, Default)]
struct Nesting {
    paren_depth: usize,
    block_depth: usize,
    /// Set from the first significant token of the statement
    is_create: Option<bool>,
    /// The previous word was an `END` that closed a block
    after_end: bool,
    /// Last significant token of the current statement
    prev: Option<Token>,
}

impl Nesting {
    fn at_top_level(&self) -> bool {
        self.paren_depth == 0 && self.block_depth == 0
    }
}

/// Cut a token stream into statement spans.
///
/// `tokens` must have been produced from `source`.
pub fn split_spans<'a>(source: &'a str, tokens: &'a [Token]) -> Vec<StatementSpan<'a>> {
    let mut spans = Vec::new();
    let mut cursor = TokenCursor::new(source, tokens);
    let mut nesting = Nesting::default();
    let mut start = 0;

    while !cursor.is_at_end() {
        let pos = cursor.pos();
        let token = &tokens[pos];

        if nesting.is_create.is_none() && !token.is_trivia() {
            nesting.is_create =
                Some(token.is_word() && token.text(source).eq_ignore_ascii_case("CREATE"));
        }

        if token.is_punct(source, ';') && nesting.at_top_level() {
            push_span(&mut spans, source, &tokens[start..=pos]);
            start = pos + 1;
            nesting = Nesting::default();
            cursor.advance();
            continue;
        }

        if token.is_punct(source, '(') {
            nesting.paren_depth += 1;
        } else if token.is_punct(source, ')') {
            nesting.paren_depth = nesting.paren_depth.saturating_sub(1);
        } else if token.is_word() && nesting.is_create == Some(true) {
            track_block(&mut nesting, source, &cursor, token.text(source));
        } else if !token.is_trivia() {
            nesting.after_end = false;
        }

        if !token.is_trivia() {
            nesting.prev = Some(*token);
        }
        cursor.advance();
    }

    push_span(&mut spans, source, &tokens[start..cursor.pos()]);
    spans
}

/// Update block depth for `BEGIN`/`CASE`/`END` inside a `CREATE` statement.
fn track_block(nesting: &mut Nesting, source: &str, cursor: &TokenCursor<'_>, word: &str) {
    let after_end = std::mem::take(&mut nesting.after_end);
    if nesting.paren_depth > 0 {
        return;
    }
    if word.eq_ignore_ascii_case("CASE") {
        // `END CASE` closes, it does not open
        if nesting.block_depth > 0 && !after_end {
            nesting.block_depth += 1;
        }
        return;
    }

    let opens = word.eq_ignore_ascii_case("BEGIN");
    let closes = word.eq_ignore_ascii_case("END");
    if !opens && !closes {
        return;
    }

    let mut after = cursor.clone();
    after.advance();
    after.skip_trivia();

    if opens {
        if begin_opens_body(nesting, source, &after) {
            nesting.block_depth += 1;
        }
    } else if nesting.block_depth > 0 && after.check_any_word_ci(NON_BLOCK_END).is_none() {
        nesting.block_depth -= 1;
        nesting.after_end = true;
    }
}

/// Whether a `BEGIN` sits where a routine or trigger body can start.
///
/// In the statement header the previous token must end a header clause (a
/// name, `)`, a literal, `AS`, `ROW` ...). Inside an open block it must start
/// a statement. In both cases the next token must be a word that can begin a
/// body, so `SELECT begin FROM t` and `x AS begin,` never open a block.
fn begin_opens_body(nesting: &Nesting, source: &str, after: &TokenCursor<'_>) -> bool {
    let follows_body = after.current_token().is_some_and(|t| t.is_word())
        && after.check_any_word_ci(NON_BLOCK_BEGIN).is_none()
        && after.check_any_word_ci(OPERAND_FOLLOW).is_none();
    if !follows_body {
        return false;
    }

    let Some(prev) = nesting.prev else {
        return false;
    };
    let prev_text = prev.text(source);
    if nesting.block_depth > 0 {
        prev.is_punct(source, ';')
            || prev_text == ":"
            || (prev.is_word() && is_one_of(prev_text, NESTED_BODY_LEAD))
    } else if prev.is_word() {
        !is_one_of(prev_text, OPERAND_LEAD)
    } else {
        prev.is_punct(source, ')') || matches!(prev.kind, TokenKind::StringLiteral(_))
    }
}

fn is_one_of(word: &str, words: &[&str]) -> bool {
    words.iter().any(|w| word.eq_ignore_ascii_case(w))
}

/// Trim trivia from both ends and keep the span if anything but `;` remains.
fn push_span<'a>(spans: &mut Vec<StatementSpan<'a>>, source: &'a str, tokens: &'a [Token]) {
    let Some(first) = tokens.iter().position(|t| !t.is_trivia()) else {
        return;
    };
    let Some(last) = tokens.iter().rposition(|t| !t.is_trivia()) else {
        return;
    };
    let tokens = &tokens[first..=last];
    if tokens.len() == 1 && tokens[0].is_punct(source, ';') {
        return;
    }

    spans.push(StatementSpan {
        index: spans.len(),
        start_offset: tokens[0].start_offset(),
        end_offset: tokens[tokens.len() - 1].end_offset(),
        tokens,
        source,
    });
}
