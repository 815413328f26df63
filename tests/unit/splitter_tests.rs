//! Unit tests for statement splitting

use pretty_assertions::assert_eq;
use rust_sqlrunner::parser::{split_statements, split_statements_with, Script, SplitOptions};

// ============================================================================
// Basic splitting
// ============================================================================

#[test]
fn test_three_statement_script() {
    let sql = "CREATE TABLE t (id INT);\nINSERT INTO t VALUES (1);\nSELECT * FROM t;";

    assert_eq!(
        split_statements(sql, false),
        vec![
            "CREATE TABLE t (id INT);",
            "INSERT INTO t VALUES (1);",
            "SELECT * FROM t;",
        ]
    );
    assert_eq!(
        split_statements(sql, true),
        vec!["CREATE TABLE t (id INT)", "INSERT INTO t VALUES (1)", "SELECT * FROM t"]
    );
}

#[test]
fn test_literal_semicolon_does_not_split() {
    assert_eq!(
        split_statements("INSERT INTO t (v) VALUES (';');", false),
        vec!["INSERT INTO t (v) VALUES (';');"]
    );
}

#[test]
fn test_separator_noise_produces_nothing() {
    assert!(split_statements(";;;   ;  ;", false).is_empty());
    assert!(split_statements("", true).is_empty());
    assert!(split_statements("/* header */\n-- and more\n", false).is_empty());
}

#[test]
fn test_trailing_separator_and_comment() {
    assert_eq!(
        split_statements("CREATE TABLE t(id INT);\n;\n-- noop\n", false),
        vec!["CREATE TABLE t(id INT);"]
    );
}

#[test]
fn test_comments_are_removed_from_statements() {
    assert_eq!(
        split_statements("-- setup\nSELECT 1 /* one */;\nSELECT 2; -- two", true),
        vec!["SELECT 1", "SELECT 2"]
    );
}

#[test]
fn test_statements_keep_their_order() {
    let sql = (1..=20)
        .map(|i| format!("SELECT {i};"))
        .collect::<Vec<_>>()
        .join("\n");
    let statements = split_statements(&sql, true);
    assert_eq!(statements.len(), 20);
    for (i, statement) in statements.iter().enumerate() {
        assert_eq!(statement, &format!("SELECT {}", i + 1));
    }
}

// ============================================================================
// Nesting
// ============================================================================

#[test]
fn test_create_trigger_body() {
    let sql = "CREATE TRIGGER trg AFTER INSERT ON t\nBEGIN\n  INSERT INTO log VALUES ('a;b');\n  UPDATE c SET n = n + 1;\nEND;\nSELECT * FROM log;";
    let statements = split_statements(sql, true);
    assert_eq!(statements.len(), 2);
    assert!(statements[0].starts_with("CREATE TRIGGER trg"));
    assert!(statements[0].ends_with("END"));
    assert_eq!(statements[1], "SELECT * FROM log");
}

#[test]
fn test_begin_transaction_script() {
    assert_eq!(
        split_statements("BEGIN TRANSACTION;\nUPDATE t SET a = 1;\nCOMMIT;", false),
        vec!["BEGIN TRANSACTION;", "UPDATE t SET a = 1;", "COMMIT;"]
    );
}

#[test]
fn test_nested_parentheses() {
    assert_eq!(
        split_statements("SELECT (SELECT max(a) FROM (SELECT 1; 2) x); SELECT 2", false),
        vec!["SELECT (SELECT max(a) FROM (SELECT 1; 2) x);", "SELECT 2"]
    );
}

#[test]
fn test_unterminated_literal_swallows_rest() {
    assert_eq!(
        split_statements("SELECT 1; SELECT 'open; SELECT 3;", false),
        vec!["SELECT 1;", "SELECT 'open; SELECT 3;"]
    );
}

// ============================================================================
// Spans and fallback
// ============================================================================

#[test]
fn test_span_offsets_point_into_source() {
    let sql = "SELECT 1;\n-- c\nDELETE FROM t;";
    let script = Script::parse(sql).unwrap();
    let spans = script.spans();
    assert_eq!(spans.len(), 2);
    assert_eq!(&sql[spans[1].start_offset..spans[1].end_offset], "DELETE FROM t;");
    assert_eq!(spans[1].index, 1);
}

#[test]
fn test_oversized_input_becomes_one_statement() {
    let mut options = SplitOptions::strip_semicolon(true);
    options.lexer.max_input_len = 10;
    assert_eq!(
        split_statements_with("SELECT 1; SELECT 2;", &options),
        vec!["SELECT 1; SELECT 2"]
    );
}
