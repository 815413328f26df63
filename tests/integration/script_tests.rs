//! Integration tests for reading and analyzing script files

use pretty_assertions::assert_eq;
use rust_sqlrunner::parser::{
    collect_sql_files, parse_sql_file, parse_sql_files, read_sql_file, split_sql_file,
    Classification, SplitOptions,
};
use rust_sqlrunner::SqlRunnerError;

use crate::common::{fixture_path, TestContext};

// ============================================================================
// Fixture scripts
// ============================================================================

#[test]
fn test_schema_script() {
    let path = fixture_path("scripts/01_schema.sql");
    let statements = parse_sql_file(&path, &SplitOptions::strip_semicolon(true)).unwrap();

    assert_eq!(statements.len(), 3, "Expected two tables and one trigger");
    assert!(statements[0].sql.starts_with("CREATE TABLE items ("));
    assert!(!statements[0].sql.contains("display name"));
    assert!(statements[1].sql.starts_with("CREATE TABLE audit ("));
    assert!(statements[2].sql.starts_with("CREATE TRIGGER items_audit"));
    assert!(statements[2].sql.contains("'updated; price changed'"));
    assert!(statements[2].sql.ends_with("END"));
    assert!(statements
        .iter()
        .all(|s| s.classification == Classification::Execute && s.parameter_count == 0));
}

#[test]
fn test_seed_script() {
    let path = fixture_path("scripts/02_seed.sql");
    let statements = parse_sql_file(&path, &SplitOptions::default()).unwrap();

    assert_eq!(statements.len(), 3);
    assert_eq!(
        statements[1].sql,
        "INSERT INTO items (id, name, price) VALUES (2, 'It''s a gadget; really', 10);"
    );
    let counts: Vec<usize> = statements.iter().map(|s| s.parameter_count).collect();
    assert_eq!(counts, vec![0, 0, 3]);
}

#[test]
fn test_reports_script() {
    let path = fixture_path("scripts/nested/03_reports.sql");
    let statements = parse_sql_file(&path, &SplitOptions::default()).unwrap();

    let kinds: Vec<Classification> = statements.iter().map(|s| s.classification).collect();
    assert_eq!(
        kinds,
        vec![
            Classification::Fetch,
            Classification::Execute,
            Classification::Fetch,
        ]
    );
    assert_eq!(statements[0].parameter_count, 1);
    assert_eq!(statements[2].sql, "SELECT COUNT(*) FROM audit");
}

#[test]
fn test_split_sql_file_matches_analysis() {
    let path = fixture_path("scripts/02_seed.sql");
    let options = SplitOptions::strip_semicolon(true);
    let texts = split_sql_file(&path, &options).unwrap();
    let statements = parse_sql_file(&path, &options).unwrap();
    let analyzed: Vec<String> = statements.into_iter().map(|s| s.sql).collect();
    assert_eq!(texts, analyzed);
}

// ============================================================================
// File discovery
// ============================================================================

#[test]
fn test_collect_from_directory() {
    let ctx = TestContext::with_fixture("scripts");
    let files = collect_sql_files(&[ctx.input()]).unwrap();

    let names: Vec<String> = files
        .iter()
        .map(|f| f.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["01_schema.sql", "02_seed.sql", "03_reports.sql"]);
}

#[test]
fn test_collect_deduplicates_inputs() {
    let ctx = TestContext::with_fixture("scripts");
    let file = ctx.dir.join("01_schema.sql").display().to_string();
    let pattern = ctx.dir.join("0*.sql").display().to_string();

    let files = collect_sql_files(&[file.clone(), pattern, file]).unwrap();
    assert_eq!(files.len(), 2);
}

#[test]
fn test_collect_reports_missing_inputs() {
    let ctx = TestContext::new();
    let err = collect_sql_files(&[ctx.dir.join("*.sql").display().to_string()]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SqlRunnerError>(),
        Some(SqlRunnerError::NoSqlFiles { .. })
    ));
}

#[test]
fn test_parse_many_files_in_order() {
    let ctx = TestContext::new();
    for i in 0..12 {
        ctx.write(
            &format!("batch_{:02}.sql", i),
            format!("INSERT INTO t VALUES ({i}, ?);\nSELECT {i};"),
        );
    }

    let files = collect_sql_files(&[ctx.input()]).unwrap();
    let statements = parse_sql_files(&files, &SplitOptions::default()).unwrap();

    assert_eq!(statements.len(), 24);
    for (i, pair) in statements.chunks(2).enumerate() {
        assert_eq!(pair[0].sql, format!("INSERT INTO t VALUES ({i}, ?);"));
        assert_eq!(pair[0].index, 0);
        assert_eq!(pair[1].sql, format!("SELECT {i};"));
        assert_eq!(pair[1].index, 1);
        assert_eq!(pair[0].source_file, pair[1].source_file);
    }
}

#[test]
fn test_parse_many_files_propagates_errors() {
    let ctx = TestContext::new();
    let mut files: Vec<_> = (0..9)
        .map(|i| ctx.write(&format!("f{i}.sql"), "SELECT 1;"))
        .collect();
    files.push(ctx.dir.join("missing.sql"));

    let err = parse_sql_files(&files, &SplitOptions::default()).unwrap_err();
    assert!(err.to_string().contains("missing.sql"));
}

// ============================================================================
// Encodings
// ============================================================================

#[test]
fn test_windows_1252_script() {
    let ctx = TestContext::new();
    let path = ctx.write("latin1.sql", b"INSERT INTO t VALUES ('na\xEFve');\n".as_slice());
    assert_eq!(read_sql_file(&path).unwrap(), "INSERT INTO t VALUES ('naïve');\n");
}

#[test]
fn test_bom_is_not_part_of_first_statement() {
    let ctx = TestContext::new();
    let path = ctx.write("bom.sql", "\u{FEFF}SELECT 1;");
    let statements = parse_sql_file(&path, &SplitOptions::default()).unwrap();
    assert_eq!(statements[0].sql, "SELECT 1;");
    assert_eq!(statements[0].classification, Classification::Fetch);
}
