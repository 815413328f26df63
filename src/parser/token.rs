//! Token types produced by the lexer
//!
//! Tokens do not own any text. Each one records a byte span into the source
//! buffer it was produced from, so a whole script is represented by a single
//! `Vec<Token>` and slices of it.

use std::ops::Range;

/// Byte range of a token within its source buffer.
///
/// Offsets are stored as `u32` to keep `Token` small; the lexer refuses
/// inputs that do not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    #[inline]
    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    #[inline]
    pub fn len(&self) -> usize {
        (self.end - self.start) as usize
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Quote character that delimited a literal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteStyle {
    /// `'text'`
    Single,
    /// `"text"`
    Double,
}

/// Bound-parameter marker style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    /// `?`
    Positional,
    /// `:name`
    Named,
}

/// Lexical category of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Identifier,
    StringLiteral(QuoteStyle),
    Placeholder(PlaceholderKind),
    Punctuation,
    LineComment,
    BlockComment,
    Whitespace,
    Operator,
    /// Zero-width marker closing every token stream
    EndOfInput,
}

/// A single lexical token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub fn new(kind: TokenKind, start: usize, end: usize) -> Self {
        Self {
            kind,
            span: Span::new(start, end),
        }
    }

    /// Source text covered by this token.
    ///
    /// `source` must be the buffer the token was produced from.
    #[inline]
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.range()]
    }

    #[inline]
    pub fn start_offset(&self) -> usize {
        self.span.start as usize
    }

    #[inline]
    pub fn end_offset(&self) -> usize {
        self.span.end as usize
    }

    #[inline]
    pub fn is_comment(&self) -> bool {
        matches!(self.kind, TokenKind::LineComment | TokenKind::BlockComment)
    }

    /// Whitespace, comments and the end marker carry no statement content.
    #[inline]
    pub fn is_trivia(&self) -> bool {
        matches!(
            self.kind,
            TokenKind::Whitespace
                | TokenKind::LineComment
                | TokenKind::BlockComment
                | TokenKind::EndOfInput
        )
    }

    /// Keywords and identifiers; callers compare their text, not their kind.
    #[inline]
    pub fn is_word(&self) -> bool {
        matches!(self.kind, TokenKind::Keyword | TokenKind::Identifier)
    }

    #[inline]
    pub fn is_placeholder(&self) -> bool {
        matches!(self.kind, TokenKind::Placeholder(_))
    }

    /// Check for a specific punctuation character.
    #[inline]
    pub fn is_punct(&self, source: &str, ch: char) -> bool {
        self.kind == TokenKind::Punctuation
            && self.span.len() == 1
            && source[self.span.range()].starts_with(ch)
    }
}

/// Reserved words recognised as [`TokenKind::Keyword`].
///
/// Sorted, upper case. The classifier and splitter never rely on this table;
/// it only makes token dumps easier to read.
const KEYWORDS: &[&str] = &[
    "ALL", "ALTER", "ANALYZE", "AND", "AS", "ASC", "BEGIN", "BETWEEN", "BY", "CASE", "CHECK",
    "COLUMN", "COMMIT", "CONSTRAINT", "CREATE", "CROSS", "DEFAULT", "DELETE", "DESC", "DESCRIBE",
    "DISTINCT", "DROP", "ELSE", "END", "EXCEPT", "EXISTS", "EXPLAIN", "FOREIGN", "FROM", "FULL",
    "GRANT", "GROUP", "HAVING", "IF", "IN", "INDEX", "INNER", "INSERT", "INTERSECT", "INTO", "IS",
    "JOIN", "KEY", "LEFT", "LIKE", "LIMIT", "MATERIALIZED", "MERGE", "NOT", "NULL", "OFFSET", "ON",
    "OR", "ORDER", "OUTER", "PRAGMA", "PRIMARY", "PROCEDURE", "RECURSIVE", "REFERENCES", "RETURNING",
    "REVOKE", "RIGHT", "ROLLBACK", "SELECT", "SET", "SHOW", "TABLE", "THEN", "TO", "TRANSACTION",
    "TRIGGER", "TRUNCATE", "UNION", "UNIQUE", "UPDATE", "USING", "VALUES", "VIEW", "WHEN", "WHERE",
    "WITH",
];

/// Case-insensitive keyword lookup without allocating.
pub fn is_keyword(word: &str) -> bool {
    if word.len() > 12 || !word.is_ascii() {
        return false;
    }
    let mut buf = [0u8; 12];
    buf[..word.len()].copy_from_slice(word.as_bytes());
    buf.make_ascii_uppercase();
    let upper = &buf[..word.len()];
    KEYWORDS
        .binary_search_by(|kw| kw.as_bytes().cmp(upper))
        .is_ok()
}
