//! SQL script files
//!
//! Reads script files from disk and turns each into an ordered list of
//! analyzed statements. A script is tokenized once; statement text,
//! classification and parameter count all come from the same token slice.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::Result;
use encoding_rs::WINDOWS_1252;
use rayon::prelude::*;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use super::classifier::{classify_fallback, Classification};
use super::params::count_parameters_fallback;
use super::splitter::{split_fallback, Script, SplitOptions};
use crate::error::SqlRunnerError;

/// A statement ready to hand to an executor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedStatement {
    /// 0-based position within its script
    pub index: usize,
    /// Comment-free, trimmed statement text
    pub sql: String,
    pub classification: Classification,
    pub parameter_count: usize,
    /// Lowercase hex SHA-256 of `sql`
    pub fingerprint: String,
    /// Script the statement came from, if it was read from disk
    pub source_file: Option<PathBuf>,
}

impl ParsedStatement {
    fn new(
        index: usize,
        sql: String,
        classification: Classification,
        parameter_count: usize,
        source_file: Option<&Path>,
    ) -> Self {
        let fingerprint = fingerprint(&sql);
        Self {
            index,
            sql,
            classification,
            parameter_count,
            fingerprint,
            source_file: source_file.map(Path::to_path_buf),
        }
    }
}

/// Lowercase hex SHA-256 of a statement's text.
pub fn fingerprint(sql: &str) -> String {
    hex::encode(Sha256::digest(sql.as_bytes()))
}

/// Split and analyze a script held in memory.
pub fn analyze_script(sql: &str, options: &SplitOptions) -> Vec<ParsedStatement> {
    analyze_script_from(sql, options, None)
}

fn analyze_script_from(
    sql: &str,
    options: &SplitOptions,
    source_file: Option<&Path>,
) -> Vec<ParsedStatement> {
    match Script::parse_with(sql, &options.lexer) {
        Ok(script) => script
            .spans()
            .iter()
            .map(|span| {
                ParsedStatement::new(
                    span.index,
                    span.text(options.strip_semicolon),
                    span.classification(),
                    span.parameter_count(),
                    source_file,
                )
            })
            .collect(),
        Err(e) => {
            tracing::warn!("Script analysis fell back to pattern matching: {}", e);
            split_fallback(sql, options.strip_semicolon)
                .into_iter()
                .enumerate()
                .map(|(index, text)| {
                    let classification = classify_fallback(&text);
                    let parameter_count = count_parameters_fallback(&text);
                    ParsedStatement::new(index, text, classification, parameter_count, source_file)
                })
                .collect()
        }
    }
}

/// Read a file as a string, trying UTF-8 first, then Windows-1252 as fallback
fn read_file_with_encoding_fallback(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| SqlRunnerError::SqlFileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(err) => {
            // Fall back to Windows-1252 (common for SQL files created on Windows)
            let bytes = err.into_bytes();
            let (decoded, _, had_errors) = WINDOWS_1252.decode(&bytes);
            if had_errors {
                Err(SqlRunnerError::SqlFileEncodingError {
                    path: path.to_path_buf(),
                }
                .into())
            } else {
                tracing::debug!("Decoded {} as Windows-1252", path.display());
                Ok(decoded.into_owned())
            }
        }
    }
}

/// Read a SQL script from disk.
///
/// # Errors
/// Returns an error if:
/// - `path` is empty
/// - the file cannot be read
/// - the content is neither UTF-8 nor Windows-1252
pub fn read_sql_file(path: &Path) -> Result<String> {
    if path.as_os_str().is_empty() {
        return Err(SqlRunnerError::InvalidPath {
            message: "file path cannot be empty".to_string(),
        }
        .into());
    }

    let content = read_file_with_encoding_fallback(path)?;

    // Strip UTF-8 BOM if present
    Ok(match content.strip_prefix('\u{FEFF}') {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// Read a SQL file and split it into individual statement texts.
pub fn split_sql_file(path: &Path, options: &SplitOptions) -> Result<Vec<String>> {
    let content = read_sql_file(path)?;
    Ok(super::splitter::split_statements_with(&content, options))
}

/// Read a SQL file and analyze every statement in it.
pub fn parse_sql_file(path: &Path, options: &SplitOptions) -> Result<Vec<ParsedStatement>> {
    let content = read_sql_file(path)?;
    let statements = analyze_script_from(&content, options, Some(path));
    tracing::debug!(
        "Found {} SQL statements in {}",
        statements.len(),
        path.display()
    );
    Ok(statements)
}

/// Minimum number of files to benefit from parallel processing.
/// Below this threshold, sequential processing is faster due to rayon overhead.
const PARALLEL_THRESHOLD: usize = 8;

/// Parse multiple SQL files, using parallel processing for larger file sets.
///
/// Statements are returned grouped by file, in the order the files were given.
pub fn parse_sql_files(files: &[PathBuf], options: &SplitOptions) -> Result<Vec<ParsedStatement>> {
    let mut all_statements = Vec::with_capacity(files.len() * 4);

    if files.len() >= PARALLEL_THRESHOLD {
        let results: Vec<Result<Vec<ParsedStatement>>> = files
            .par_iter()
            .map(|file| parse_sql_file(file, options))
            .collect();

        // Combine results, propagating the first error if any
        for result in results {
            all_statements.extend(result?);
        }
    } else {
        for file in files {
            all_statements.extend(parse_sql_file(file, options)?);
        }
    }

    Ok(all_statements)
}

fn has_sql_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("sql"))
}

fn is_glob_pattern(input: &str) -> bool {
    input.contains(['*', '?', '['])
}

/// Expand inputs into a sorted, de-duplicated list of SQL files.
///
/// Each input may be a file, a directory (searched recursively for `*.sql`),
/// or a glob pattern.
pub fn collect_sql_files(inputs: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for input in inputs {
        let path = Path::new(input);
        if path.is_dir() {
            for entry in WalkDir::new(path).into_iter().filter_map(|e| e.ok()) {
                if entry.file_type().is_file() && has_sql_extension(entry.path()) {
                    files.insert(entry.into_path());
                }
            }
        } else if path.is_file() {
            files.insert(path.to_path_buf());
        } else if is_glob_pattern(input) {
            let paths = glob::glob(input).map_err(|e| SqlRunnerError::InvalidPattern {
                pattern: input.clone(),
                message: e.to_string(),
            })?;
            for path in paths.filter_map(|p| p.ok()) {
                if path.is_file() {
                    files.insert(path);
                }
            }
        } else {
            tracing::warn!("Input not found: {}", input);
        }
    }

    if files.is_empty() {
        return Err(SqlRunnerError::NoSqlFiles {
            inputs: inputs.join(", "),
        }
        .into());
    }

    Ok(files.into_iter().collect())
}
