//! Statement execution against a database driver
//!
//! The crate does not talk to databases itself. A driver implements
//! [`StatementExecutor`] and [`run_statements`] feeds it parsed statements in
//! source order, choosing `fetch` or `execute` from each statement's
//! classification.

use std::fmt;
use std::time::{Duration, Instant};

use crate::parser::{Classification, ParsedStatement};

/// Columns and stringified rows returned by a fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RowSet {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { columns, rows }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A database connection able to run single statements
pub trait StatementExecutor {
    type Error: fmt::Display;

    /// Run a statement that returns rows.
    fn fetch(&mut self, sql: &str) -> Result<RowSet, Self::Error>;

    /// Run a statement for its effect, returning the affected row count.
    fn execute(&mut self, sql: &str) -> Result<u64, Self::Error>;

    /// Called once when the run completes without halting.
    fn commit(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called after a failed statement when execution halts.
    fn rollback(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// What to do after a statement fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Roll back and skip the remaining statements
    #[default]
    Halt,
    /// Record the failure and keep going; the successful statements are
    /// committed at the end
    Continue,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementOutcome {
    Rows(RowSet),
    Affected(u64),
    Failed(String),
}

impl StatementOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, StatementOutcome::Failed(_))
    }
}

/// Result of running one statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatementResult {
    pub index: usize,
    pub sql: String,
    pub classification: Classification,
    pub outcome: StatementOutcome,
    pub elapsed: Duration,
}

impl StatementResult {
    pub fn succeeded(&self) -> bool {
        !self.outcome.is_failure()
    }
}

/// Run statements in order and collect one result per statement attempted.
///
/// With [`ErrorMode::Halt`] the executor is rolled back after the first
/// failure and the remaining statements are not attempted. Otherwise the
/// executor is committed once every statement has been attempted, which
/// under [`ErrorMode::Continue`] keeps the work of the statements that
/// succeeded while their failed neighbours are reported in the results.
pub fn run_statements<E: StatementExecutor>(
    executor: &mut E,
    statements: &[ParsedStatement],
    mode: ErrorMode,
) -> Vec<StatementResult> {
    let mut results = Vec::with_capacity(statements.len());

    for statement in statements {
        let start = Instant::now();
        let outcome = match statement.classification {
            Classification::Fetch => match executor.fetch(&statement.sql) {
                Ok(rows) => StatementOutcome::Rows(rows),
                Err(e) => StatementOutcome::Failed(e.to_string()),
            },
            Classification::Execute => match executor.execute(&statement.sql) {
                Ok(affected) => StatementOutcome::Affected(affected),
                Err(e) => StatementOutcome::Failed(e.to_string()),
            },
        };
        let elapsed = start.elapsed();

        let failed = outcome.is_failure();
        if let StatementOutcome::Failed(message) = &outcome {
            tracing::error!("Statement {} failed: {}", statement.index + 1, message);
        } else {
            tracing::debug!(
                "Statement {} ({}) finished in {:?}",
                statement.index + 1,
                statement.classification,
                elapsed
            );
        }

        results.push(StatementResult {
            index: statement.index,
            sql: statement.sql.clone(),
            classification: statement.classification,
            outcome,
            elapsed,
        });

        if failed && mode == ErrorMode::Halt {
            if let Err(e) = executor.rollback() {
                tracing::warn!("Rollback failed: {}", e);
            }
            return results;
        }
    }

    let failures = results.iter().filter(|r| !r.succeeded()).count();
    if failures > 0 {
        tracing::warn!(
            "Committing {} of {} statements, {} failed",
            results.len() - failures,
            results.len(),
            failures
        );
    }
    if let Err(e) = executor.commit() {
        tracing::warn!("Commit failed: {}", e);
    }

    results
}
