//! Human-readable rendering of plans and execution results

use std::path::Path;

use crate::executor::{StatementOutcome, StatementResult};
use crate::parser::ParsedStatement;

const SEPARATOR_LENGTH: usize = 60;
const DASH_SEPARATOR_LENGTH: usize = 40;
/// Width used for values in columns the header row does not have
const DEFAULT_COLUMN_WIDTH: usize = 10;
const FINGERPRINT_PREFIX_LEN: usize = 12;

const ERROR_MARK: &str = "❌";
const SUCCESS_MARK: &str = "✅";
const NO_ROWS_MESSAGE: &str = "(No rows returned)";
const SUCCESS_MESSAGE: &str = "Statement executed successfully";

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

fn push_banner(out: &mut String, title: &str) {
    let rule = "=".repeat(SEPARATOR_LENGTH);
    out.push('\n');
    push_line(out, &rule);
    push_line(out, title);
    push_line(out, &rule);
}

fn pad(value: &str, width: usize) -> String {
    format!(" {:<w$}|", value, w = width.saturating_sub(1))
}

/// Render rows as a pipe-separated grid. Returns `(No data)` when there
/// are no columns or no rows.
pub fn format_table(columns: &[String], rows: &[Vec<String>]) -> String {
    if columns.is_empty() || rows.is_empty() {
        return "(No data)".to_string();
    }

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let widest = rows
                .iter()
                .filter_map(|row| row.get(i))
                .map(|value| value.chars().count())
                .fold(column.chars().count(), usize::max);
            widest + 2
        })
        .collect();

    let mut header = String::from("|");
    let mut separator = String::from("|");
    for (column, &width) in columns.iter().zip(&widths) {
        header.push_str(&pad(column, width));
        separator.push_str(&"-".repeat(width));
        separator.push('|');
    }

    let mut lines = vec![header, separator];
    for row in rows {
        let mut line = String::from("|");
        for (i, value) in row.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(DEFAULT_COLUMN_WIDTH);
            line.push_str(&pad(value, width));
        }
        lines.push(line);
    }

    lines.join("\n")
}

/// Render execution results, one block per statement.
pub fn format_results(results: &[StatementResult], file: Option<&Path>) -> String {
    let mut out = String::new();
    if let Some(file) = file {
        push_banner(&mut out, &format!("Results for: {}", file.display()));
    }

    for result in results {
        let kind = if result.outcome.is_failure() {
            "error"
        } else {
            result.classification.as_str()
        };

        out.push('\n');
        push_line(&mut out, &format!("Statement {}:", result.index + 1));
        push_line(&mut out, &format!("Type: {}", kind));
        push_line(&mut out, &format!("SQL: {}", result.sql));

        match &result.outcome {
            StatementOutcome::Failed(message) => {
                push_line(&mut out, &format!("{} Error: {}", ERROR_MARK, message));
            }
            StatementOutcome::Rows(rows) => {
                push_line(
                    &mut out,
                    &format!("{} Rows returned: {}", SUCCESS_MARK, rows.row_count()),
                );
                if rows.is_empty() {
                    push_line(&mut out, NO_ROWS_MESSAGE);
                } else {
                    push_line(&mut out, &format_table(&rows.columns, &rows.rows));
                }
            }
            StatementOutcome::Affected(count) => {
                push_line(
                    &mut out,
                    &format!("{} {} ({} rows affected)", SUCCESS_MARK, SUCCESS_MESSAGE, count),
                );
            }
        }

        push_line(&mut out, &"-".repeat(DASH_SEPARATOR_LENGTH));
    }

    out
}

/// Render a dry-run listing of parsed statements.
pub fn format_plan(statements: &[ParsedStatement], file: Option<&Path>) -> String {
    let mut out = String::new();
    if let Some(file) = file {
        push_banner(&mut out, &format!("Plan for: {}", file.display()));
    }

    if statements.is_empty() {
        push_line(&mut out, "No valid SQL statements found");
        return out;
    }

    for statement in statements {
        let prefix_len = FINGERPRINT_PREFIX_LEN.min(statement.fingerprint.len());
        let fingerprint = &statement.fingerprint[..prefix_len];
        out.push('\n');
        push_line(&mut out, &format!("Statement {}:", statement.index + 1));
        push_line(
            &mut out,
            &format!(
                "Type: {}  Parameters: {}  Fingerprint: {}",
                statement.classification, statement.parameter_count, fingerprint
            ),
        );
        push_line(&mut out, &format!("SQL: {}", statement.sql));
        push_line(&mut out, &"-".repeat(DASH_SEPARATOR_LENGTH));
    }

    out
}
