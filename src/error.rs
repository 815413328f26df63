//! Error types for rust-sqlrunner

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised outside the lexical core: file access, input discovery and
/// security validation. Splitting and classification never fail.
#[derive(Error, Debug)]
pub enum SqlRunnerError {
    #[error("Invalid SQL file path: {message}")]
    InvalidPath { message: String },

    #[error("Failed to read SQL file: {path}")]
    SqlFileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("SQL file is neither valid UTF-8 nor Windows-1252: {path}")]
    SqlFileEncodingError { path: PathBuf },

    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("No SQL files found for: {inputs}")]
    NoSqlFiles { inputs: String },

    #[error("File path contains potentially dangerous pattern '{pattern}': {path}")]
    DangerousPath { path: PathBuf, pattern: String },

    #[error("File extension not allowed (expected one of {allowed}): {path}")]
    DisallowedExtension { path: PathBuf, allowed: String },

    #[error("File size ({size_mb:.1}MB) exceeds maximum allowed size ({max_mb}MB): {path}")]
    FileTooLarge {
        path: PathBuf,
        size_mb: f64,
        max_mb: u64,
    },

    #[error("SQL contains potentially dangerous operation: {pattern}")]
    DangerousSqlPattern { pattern: String },

    #[error("Too many SQL statements ({count}). Maximum allowed: {max}")]
    TooManyStatements { count: usize, max: usize },

    #[error("Statement {index} is too long ({length} chars). Maximum allowed: {max}")]
    StatementTooLong {
        index: usize,
        length: usize,
        max: usize,
    },

    #[error("Invalid database URL: {message}")]
    InvalidDatabaseUrl { message: String },
}
