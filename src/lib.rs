//! rust-sqlrunner: SQL script splitting and classification
//!
//! This library turns SQL script text into an ordered list of statements,
//! each classified as returning rows (fetch) or not (execute), with its
//! bound-parameter count. Statement execution is left to a database driver
//! implementing [`executor::StatementExecutor`].

pub mod error;
pub mod executor;
pub mod parser;
pub mod report;
pub mod security;
pub mod util;

use std::path::{Path, PathBuf};

use anyhow::Result;

pub use error::SqlRunnerError;
pub use executor::{run_statements, ErrorMode, RowSet, StatementExecutor, StatementOutcome};
pub use parser::{
    analyze_script, classify, count_parameters, parse_sql_file, parse_sql_files, read_sql_file,
    split_sql_file, split_statements, strip_comments, tokenize, Classification, ParsedStatement,
    SplitOptions,
};
pub use security::SecurityConfig;

/// Options for planning a set of scripts
#[derive(Debug, Clone, Default)]
pub struct PlanOptions {
    /// Files, directories or glob patterns
    pub inputs: Vec<String>,
    pub split: SplitOptions,
    /// Denylist to enforce, or `None` to skip validation
    pub security: Option<SecurityConfig>,
}

/// Statements parsed from one script file
#[derive(Debug, Clone)]
pub struct ScriptPlan {
    pub path: PathBuf,
    pub statements: Vec<ParsedStatement>,
}

/// Read, validate and analyze a single script file
pub fn plan_file(path: &Path, options: &PlanOptions) -> Result<ScriptPlan> {
    let Some(config) = &options.security else {
        tracing::warn!("Security validation disabled for file: {}", path.display());
        let statements = parse_sql_file(path, &options.split)?;
        return Ok(ScriptPlan {
            path: path.to_path_buf(),
            statements,
        });
    };

    security::validate_file_path(path, config)?;
    let content = read_sql_file(path)?;
    security::validate_sql_content(&content, config)?;

    let statements = analyze_script(&content, &options.split)
        .into_iter()
        .map(|mut statement| {
            statement.source_file = Some(path.to_path_buf());
            statement
        })
        .collect();

    Ok(ScriptPlan {
        path: path.to_path_buf(),
        statements,
    })
}

/// Plan every script the inputs resolve to
pub fn plan_scripts(options: &PlanOptions) -> Result<Vec<ScriptPlan>> {
    // Step 1: Resolve inputs to script files
    let files = parser::collect_sql_files(&options.inputs)?;
    tracing::info!("Found {} SQL files", files.len());

    // Step 2: Validate and analyze each file in order
    let mut plans = Vec::with_capacity(files.len());
    for file in &files {
        let plan = plan_file(file, options)?;
        tracing::info!(
            "Parsed {} SQL statements from {}",
            plan.statements.len(),
            file.display()
        );
        plans.push(plan);
    }

    Ok(plans)
}

/// A failed security check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// File path or redacted connection URL
    pub target: String,
    pub message: String,
}

/// Run the security checks over every script (and optionally a connection
/// URL), collecting violations instead of stopping at the first one.
pub fn check_scripts(
    inputs: &[String],
    connection: Option<&str>,
    config: &SecurityConfig,
) -> Result<Vec<Violation>> {
    let mut violations = Vec::new();

    if let Some(url) = connection {
        let target = security::redact_url(url).into_owned();
        tracing::debug!("Checking database URL: {}", target);
        if let Err(e) = security::validate_database_url(url, config) {
            violations.push(Violation {
                target,
                message: e.to_string(),
            });
        }
    }

    for file in parser::collect_sql_files(inputs)? {
        let target = file.display().to_string();
        let checked = security::validate_file_path(&file, config)
            .and_then(|()| read_sql_file(&file))
            .and_then(|content| security::validate_sql_content(&content, config));
        if let Err(e) = checked {
            violations.push(Violation {
                target,
                message: e.to_string(),
            });
        }
    }

    Ok(violations)
}
