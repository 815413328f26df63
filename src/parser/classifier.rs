//! Statement classification
//!
//! Decides, without executing anything, whether a statement is expected to
//! return a row set. Only the first significant word matters, except for
//! `WITH`, where the CTE definitions are skipped to find the statement they
//! prefix:
//!
//! ```sql
//! WITH a AS (...), b AS (...) SELECT ...        -- fetch
//! WITH a AS (...) INSERT INTO t SELECT * FROM a -- execute
//! ```

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use super::cursor::TokenCursor;
use super::lexer::{tokenize_with, LexerOptions};
use super::token::Token;

/// Expected result shape of a statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Execution yields a row set
    Fetch,
    /// Execution yields only a status or affected-row count
    Execute,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Fetch => "fetch",
            Classification::Execute => "execute",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Leading words of row-returning statements
const FETCH_WORDS: &[&str] = &[
    "SELECT", "VALUES", "SHOW", "EXPLAIN", "PRAGMA", "DESC", "DESCRIBE",
];

/// Words that may follow a CTE list and never return rows
const MODIFY_WORDS: &[&str] = &["INSERT", "UPDATE", "DELETE", "MERGE"];

/// Classify a statement with default lexer options.
pub fn classify(sql: &str) -> Classification {
    classify_with(sql, &LexerOptions::default())
}

/// Classify a statement.
///
/// Falls back to a first-word regex match if the lexer refuses the input.
pub fn classify_with(sql: &str, options: &LexerOptions) -> Classification {
    match tokenize_with(sql, options) {
        Ok(tokens) => classify_tokens(sql, &tokens),
        Err(e) => {
            tracing::warn!("Classification fell back to first-word matching: {}", e);
            classify_fallback(sql)
        }
    }
}

/// Classify an already tokenized statement.
///
/// `tokens` must have been produced from `source`.
pub fn classify_tokens(source: &str, tokens: &[Token]) -> Classification {
    let mut cursor = TokenCursor::new(source, tokens);
    cursor.skip_trivia();

    if cursor.expect_word_ci("WITH").is_some() {
        return classify_cte(&mut cursor);
    }
    if cursor.check_any_word_ci(FETCH_WORDS).is_some() {
        Classification::Fetch
    } else {
        Classification::Execute
    }
}

/// Skip `name [(columns)] AS [[NOT] MATERIALIZED] (body)` definitions
/// separated by commas, then classify what follows.
fn classify_cte(cursor: &mut TokenCursor<'_>) -> Classification {
    cursor.skip_trivia();
    if cursor.expect_word_ci("RECURSIVE").is_some() {
        cursor.skip_trivia();
    }

    loop {
        if !cursor.check_name() {
            break;
        }
        cursor.advance();
        cursor.skip_trivia();

        // Optional column list
        if cursor.skip_paren_group() {
            cursor.skip_trivia();
        }

        if cursor.expect_word_ci("AS").is_none() {
            break;
        }
        cursor.skip_trivia();

        if cursor.expect_word_ci("NOT").is_some() {
            cursor.skip_trivia();
        }
        if cursor.expect_word_ci("MATERIALIZED").is_some() {
            cursor.skip_trivia();
        }

        if !cursor.skip_paren_group() {
            break;
        }
        cursor.skip_trivia();

        if cursor.expect_punct(',').is_none() {
            break;
        }
        cursor.skip_trivia();
    }

    main_statement_kind(cursor)
}

/// First decisive top-level word after the CTE list.
///
/// Parenthesized groups are skipped whole. Running out of tokens means the
/// statement is incomplete and is treated as [`Classification::Execute`].
fn main_statement_kind(cursor: &mut TokenCursor<'_>) -> Classification {
    while !cursor.is_at_end() {
        if cursor.skip_paren_group() {
            continue;
        }
        if cursor.check_any_word_ci(FETCH_WORDS).is_some() {
            return Classification::Fetch;
        }
        if cursor.check_any_word_ci(MODIFY_WORDS).is_some() {
            return Classification::Execute;
        }
        cursor.advance();
    }
    Classification::Execute
}

static LINE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"--[^\r\n]*").expect("Invalid line comment regex"));

static BLOCK_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?(\*/|$)").expect("Invalid block comment regex"));

static FIRST_WORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([A-Za-z_]+)").expect("Invalid first word regex"));

static CTE_MAIN_WORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\)\s*(SELECT|VALUES|SHOW|EXPLAIN|PRAGMA|DESCRIBE|DESC|INSERT|UPDATE|DELETE|MERGE)\b")
        .expect("Invalid CTE regex")
});

/// First-word classification over raw text.
///
/// Only used when tokenization is impossible. Comment markers inside string
/// literals can confuse it; the token-based path has no such weakness.
pub(crate) fn classify_fallback(sql: &str) -> Classification {
    let without_blocks = BLOCK_COMMENT_RE.replace_all(sql, " ");
    let cleaned = LINE_COMMENT_RE.replace_all(&without_blocks, " ");

    let Some(first) = FIRST_WORD_RE.captures(&cleaned).and_then(|c| c.get(1)) else {
        return Classification::Execute;
    };
    let first = first.as_str();

    if first.eq_ignore_ascii_case("WITH") {
        return match CTE_MAIN_WORD_RE.captures(&cleaned).and_then(|c| c.get(1)) {
            Some(word) if is_fetch_word(word.as_str()) => Classification::Fetch,
            _ => Classification::Execute,
        };
    }

    if is_fetch_word(first) {
        Classification::Fetch
    } else {
        Classification::Execute
    }
}

fn is_fetch_word(word: &str) -> bool {
    FETCH_WORDS.iter().any(|w| w.eq_ignore_ascii_case(word))
}
