//! Comment removal
//!
//! Rebuilds the source from every token except line and block comments.
//! Everything else, including the line break that ended a `--` comment,
//! is kept byte for byte. The one addition is a single space where a removed
//! comment sat between two characters that would otherwise lex as one token
//! (`-/**/-` becomes `- -`, not a new `--` comment).

use std::borrow::Cow;

use super::lexer::{tokenize, tokenize_with, LexerOptions};
use super::token::Token;

/// Remove `--` and `/* */` comments from SQL text.
///
/// Comment markers inside string literals are not comments and are kept.
/// Returns the input unchanged (borrowed) when there is nothing to remove.
pub fn strip_comments(sql: &str) -> Cow<'_, str> {
    strip_comments_with(sql, &LexerOptions::default())
}

/// [`strip_comments`] with explicit lexer options.
pub fn strip_comments_with<'a>(sql: &'a str, options: &LexerOptions) -> Cow<'a, str> {
    if sql.is_empty() {
        return Cow::Borrowed(sql);
    }
    match tokenize_with(sql, options) {
        Ok(tokens) => strip_comment_tokens(sql, &tokens),
        Err(e) => {
            tracing::warn!("Comment stripping skipped: {}", e);
            Cow::Borrowed(sql)
        }
    }
}

/// Concatenate the source text of every non-comment token.
///
/// A space replaces a removed comment whose neighbours would fuse.
pub fn strip_comment_tokens<'a>(source: &'a str, tokens: &[Token]) -> Cow<'a, str> {
    if !tokens.iter().any(Token::is_comment) {
        return match (tokens.first(), tokens.last()) {
            (Some(first), Some(last)) => {
                Cow::Borrowed(&source[first.start_offset()..last.end_offset()])
            }
            _ => Cow::Borrowed(""),
        };
    }

    let mut out = String::with_capacity(source.len());
    let mut dropped = false;
    for token in tokens {
        if token.is_comment() {
            dropped = true;
            continue;
        }
        let text = token.text(source);
        if std::mem::take(&mut dropped) {
            if let (Some(prev), Some(next)) = (out.chars().next_back(), text.chars().next()) {
                if fuses(prev, next) {
                    out.push(' ');
                }
            }
        }
        out.push_str(text);
    }
    Cow::Owned(out)
}

/// Whether two adjacent characters lex as a single token.
fn fuses(prev: char, next: char) -> bool {
    if prev.is_ascii_whitespace() || next.is_ascii_whitespace() {
        return false;
    }
    let mut pair = String::with_capacity(prev.len_utf8() + next.len_utf8());
    pair.push(prev);
    pair.push(next);
    tokenize(&pair).is_ok_and(|tokens| {
        tokens
            .first()
            .is_some_and(|first| first.end_offset() == pair.len())
    })
}
