//! Unit tests for statement classification

use rust_sqlrunner::parser::{classify, classify_with, Classification, LexerOptions};

use Classification::{Execute, Fetch};

#[test]
fn test_row_returning_statements() {
    for sql in [
        "SELECT 1",
        "select * from t",
        "VALUES (1), (2)",
        "SHOW TABLES",
        "EXPLAIN SELECT 1",
        "PRAGMA table_info(t)",
        "DESCRIBE t",
        "DESC t",
    ] {
        assert_eq!(classify(sql), Fetch, "{sql}");
    }
}

#[test]
fn test_modifying_statements() {
    for sql in [
        "INSERT INTO t VALUES (1)",
        "UPDATE t SET a = 1",
        "DELETE FROM t",
        "CREATE TABLE t (id INT)",
        "DROP TABLE t",
        "GRANT SELECT ON t TO u",
        "TRUNCATE TABLE t",
        "VACUUM",
        "ANALYZE t",
        "COMMIT",
    ] {
        assert_eq!(classify(sql), Execute, "{sql}");
    }
}

#[test]
fn test_leading_comments_and_whitespace() {
    assert_eq!(classify("  -- header\n/* note */  SELECT 1"), Fetch);
    assert_eq!(classify("/* SELECT */ DELETE FROM t"), Execute);
}

#[test]
fn test_blank_input() {
    assert_eq!(classify(""), Execute);
    assert_eq!(classify("   -- only a comment"), Execute);
}

#[test]
fn test_cte_followed_by_select() {
    assert_eq!(classify("WITH x AS (SELECT 1) SELECT * FROM x"), Fetch);
    assert_eq!(
        classify("WITH a AS (SELECT 1), b AS (SELECT 2) SELECT * FROM a, b"),
        Fetch
    );
    assert_eq!(
        classify("with recursive n(i) as (select 1 union all select i + 1 from n) select i from n"),
        Fetch
    );
    assert_eq!(
        classify("WITH x AS MATERIALIZED (SELECT 1) SELECT * FROM x"),
        Fetch
    );
    assert_eq!(
        classify("WITH \"quoted name\" AS (SELECT 1) VALUES (1)"),
        Fetch
    );
}

#[test]
fn test_cte_followed_by_dml() {
    assert_eq!(
        classify("WITH x AS (SELECT id FROM t) DELETE FROM t WHERE id IN (SELECT id FROM x)"),
        Execute
    );
    assert_eq!(
        classify("WITH x AS (SELECT 1) INSERT INTO t SELECT * FROM x"),
        Execute
    );
    assert_eq!(
        classify("WITH x AS (SELECT 1) UPDATE t SET a = (SELECT 1 FROM x)"),
        Execute
    );
}

#[test]
fn test_cte_without_parenthesized_body() {
    assert_eq!(classify("WITH c AS SELECT 1 SELECT 2"), Fetch);
}

#[test]
fn test_incomplete_cte() {
    assert_eq!(classify("WITH x AS (SELECT 1)"), Execute);
    assert_eq!(classify("WITH"), Execute);
    assert_eq!(classify("WITH x AS (SELECT 1"), Execute);
}

#[test]
fn test_fallback_classification() {
    let options = LexerOptions {
        max_input_len: 2,
        ..LexerOptions::default()
    };
    assert_eq!(classify_with("-- c\nselect 1", &options), Fetch);
    assert_eq!(classify_with("WITH x AS (SELECT 1) SELECT * FROM x", &options), Fetch);
    assert_eq!(classify_with("WITH x AS (SELECT 1) DELETE FROM t", &options), Execute);
    assert_eq!(classify_with("UPDATE t SET a = 1", &options), Execute);
}

#[test]
fn test_display() {
    assert_eq!(Fetch.to_string(), "fetch");
    assert_eq!(Execute.as_str(), "execute");
}
