//! Unit tests for parameter counting

use rust_sqlrunner::parser::{count_parameters, count_parameters_with, LexerOptions};

#[test]
fn test_mixed_placeholder_styles() {
    assert_eq!(count_parameters("SELECT * FROM t WHERE id=? AND name=:n"), 2);
}

#[test]
fn test_repeated_named_placeholder_counts_each_occurrence() {
    assert_eq!(count_parameters("SELECT :a + :a FROM t WHERE b = :a"), 3);
}

#[test]
fn test_placeholders_in_literals_and_comments() {
    let sql = "SELECT '?', ':x' /* ? :y */ FROM t -- :z ?\nWHERE a = ?";
    assert_eq!(count_parameters(sql), 1);
}

#[test]
fn test_unterminated_literal_hides_the_rest() {
    assert_eq!(count_parameters("SELECT ? , 'open ? :x"), 1);
}

#[test]
fn test_fallback_still_counts() {
    let options = LexerOptions {
        max_input_len: 1,
        ..LexerOptions::default()
    };
    assert_eq!(count_parameters_with("INSERT INTO t VALUES (?, :b)", &options), 2);
}
