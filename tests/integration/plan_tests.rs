//! Integration tests for planning whole script sets

use pretty_assertions::assert_eq;
use rust_sqlrunner::parser::{LexerOptions, QuoteEscape};
use rust_sqlrunner::{
    plan_scripts, report, Classification, PlanOptions, SecurityConfig, SplitOptions,
    SqlRunnerError,
};

use crate::common::TestContext;

fn options(ctx: &TestContext, security: Option<SecurityConfig>) -> PlanOptions {
    PlanOptions {
        inputs: vec![ctx.input()],
        split: SplitOptions::strip_semicolon(true),
        security,
    }
}

fn temp_dir_config() -> SecurityConfig {
    SecurityConfig {
        dangerous_path_patterns: Vec::new(),
        ..SecurityConfig::default()
    }
}

#[test]
fn test_plan_fixture_directory() {
    let ctx = TestContext::with_fixture("scripts");
    let plans = plan_scripts(&options(&ctx, Some(temp_dir_config()))).unwrap();

    assert_eq!(plans.len(), 3);
    let counts: Vec<usize> = plans.iter().map(|p| p.statements.len()).collect();
    assert_eq!(counts, vec![3, 3, 3]);

    for plan in &plans {
        for statement in &plan.statements {
            assert_eq!(statement.source_file.as_deref(), Some(plan.path.as_path()));
            assert!(!statement.sql.ends_with(';'));
        }
    }
}

#[test]
fn test_plan_with_and_without_security_agree() {
    let ctx = TestContext::with_fixture("scripts");
    let checked = plan_scripts(&options(&ctx, Some(temp_dir_config()))).unwrap();
    let unchecked = plan_scripts(&options(&ctx, None)).unwrap();

    let flatten = |plans: &[rust_sqlrunner::ScriptPlan]| {
        plans
            .iter()
            .flat_map(|p| p.statements.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(flatten(&checked), flatten(&unchecked));
}

#[test]
fn test_plan_stops_on_dangerous_script() {
    let ctx = TestContext::new();
    ctx.write("a.sql", "SELECT 1;");
    ctx.write("b.sql", "EXEC xp_cmdshell 'whoami';");

    let err = plan_scripts(&options(&ctx, Some(temp_dir_config()))).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<SqlRunnerError>(),
        Some(SqlRunnerError::DangerousSqlPattern { .. })
    ));

    // The same script plans fine with validation disabled
    let plans = plan_scripts(&options(&ctx, None)).unwrap();
    assert_eq!(plans[1].statements[0].classification, Classification::Execute);
}

#[test]
fn test_plan_with_backslash_escapes() {
    let ctx = TestContext::new();
    ctx.write("mysql.sql", r"INSERT INTO t VALUES ('it\'s; fine'); SELECT 1;");

    let mut opts = options(&ctx, None);
    opts.split.lexer = LexerOptions {
        quote_escape: QuoteEscape::Backslash,
        ..LexerOptions::default()
    };
    let plans = plan_scripts(&opts).unwrap();
    let texts: Vec<&str> = plans[0].statements.iter().map(|s| s.sql.as_str()).collect();
    assert_eq!(texts, vec![r"INSERT INTO t VALUES ('it\'s; fine')", "SELECT 1"]);
}

#[test]
fn test_plan_report() {
    let ctx = TestContext::new();
    let path = ctx.write("report.sql", "-- nothing but a comment\n;\n");
    let plans = plan_scripts(&options(&ctx, None)).unwrap();
    assert!(plans[0].statements.is_empty());

    let text = report::format_plan(&plans[0].statements, Some(&path));
    assert!(text.contains(&format!("Plan for: {}", path.display())));
    assert!(text.ends_with("No valid SQL statements found\n"));
}
