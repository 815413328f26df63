//! Bound-parameter counting
//!
//! Counts `?` and `:name` placeholders. The lexer only emits placeholder
//! tokens outside string literals and comments, so counting is one pass over
//! the token stream.

use once_cell::sync::Lazy;
use regex::Regex;

use super::lexer::{tokenize_with, LexerOptions};
use super::token::Token;

/// Count placeholders in a statement with default lexer options.
pub fn count_parameters(sql: &str) -> usize {
    count_parameters_with(sql, &LexerOptions::default())
}

/// Count placeholders in a statement.
///
/// Falls back to plain character and pattern counting if the lexer refuses
/// the input.
pub fn count_parameters_with(sql: &str, options: &LexerOptions) -> usize {
    match tokenize_with(sql, options) {
        Ok(tokens) => count_placeholder_tokens(&tokens),
        Err(e) => {
            tracing::warn!("Parameter counting fell back to pattern matching: {}", e);
            count_parameters_fallback(sql)
        }
    }
}

/// Count placeholder tokens in an already tokenized statement.
#[inline]
pub fn count_placeholder_tokens(tokens: &[Token]) -> usize {
    tokens.iter().filter(|t| t.is_placeholder()).count()
}

/// Colon sequences in the order the lexer reads them: `::` and `:=` are
/// operators, `:` before an identifier start opens a named placeholder.
static COLON_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"::|:=|:[A-Za-z_[^\x00-\x7F]]").expect("Invalid named parameter regex")
});

/// Character-level count that ignores quoting and comments.
pub(crate) fn count_parameters_fallback(sql: &str) -> usize {
    let named = COLON_RE
        .find_iter(sql)
        .filter(|m| !matches!(m.as_str(), "::" | ":="))
        .count();
    sql.matches('?').count() + named
}
