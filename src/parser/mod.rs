//! SQL script parsing
//!
//! A single lexer pass feeds everything else: comment stripping, statement
//! splitting, classification and parameter counting all work on its tokens.

mod classifier;
mod comments;
mod cursor;
mod lexer;
mod params;
mod script;
mod splitter;
mod token;

pub use classifier::{classify, classify_tokens, classify_with, Classification};
pub use comments::{strip_comment_tokens, strip_comments, strip_comments_with};
pub use cursor::TokenCursor;
pub use lexer::{tokenize, tokenize_with, LexError, LexerOptions, QuoteEscape};
pub use params::{count_parameters, count_parameters_with, count_placeholder_tokens};
pub use script::{
    analyze_script, collect_sql_files, fingerprint, parse_sql_file, parse_sql_files,
    read_sql_file, split_sql_file, ParsedStatement,
};
pub use splitter::{
    split_spans, split_statements, split_statements_with, Script, SplitOptions, StatementSpan,
};
pub use token::{is_keyword, PlaceholderKind, QuoteStyle, Span, Token, TokenKind};
