//! Denylist validation for script files, SQL content and connection URLs
//!
//! These are coarse pattern checks, not a SQL firewall. SQL content is
//! checked after comments are removed and string literal contents are
//! blanked, so a pattern mentioned in a comment or inside a quoted value does
//! not trip the check.

use std::borrow::Cow;
use std::path::Path;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SqlRunnerError;
use crate::parser::{split_statements, tokenize, Token, TokenKind};
use crate::util::{contains_ci, find_word_ci};

/// Limits and denylists applied by the validators
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Path fragments that are refused anywhere in a script path
    pub dangerous_path_patterns: Vec<String>,
    /// Operations refused in SQL content (matched case-insensitively)
    pub dangerous_sql_patterns: Vec<String>,
    /// Fragments refused anywhere in a database URL
    pub dangerous_url_patterns: Vec<String>,
    /// Accepted script extensions, including the leading dot
    pub allowed_extensions: Vec<String>,
    pub max_file_size_mb: u64,
    pub max_statements_per_file: usize,
    /// Longest accepted statement, in characters
    pub max_statement_length: usize,
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            dangerous_path_patterns: to_strings(&[
                "..",
                "~",
                "/etc",
                "/var",
                "/usr",
                "/bin",
                "/sbin",
                "/dev",
                "\\windows\\system32",
                "\\windows\\syswow64",
                "\\program files",
                "\\program files (x86)",
            ]),
            dangerous_sql_patterns: to_strings(&[
                "DROP DATABASE",
                "TRUNCATE DATABASE",
                "DELETE FROM INFORMATION_SCHEMA",
                "DELETE FROM SYS.",
                "EXEC ",
                "EXECUTE ",
                "XP_",
                "SP_",
                "OPENROWSET",
                "OPENDATASOURCE",
                "BACKUP DATABASE",
                "RESTORE DATABASE",
                "SHUTDOWN",
                "KILL",
                "RECONFIGURE",
            ]),
            dangerous_url_patterns: to_strings(&[
                "--",
                "/*",
                "*/",
                "xp_",
                "sp_",
                "exec",
                "execute",
                "script:",
                "javascript:",
                "data:",
            ]),
            allowed_extensions: to_strings(&[".sql"]),
            max_file_size_mb: 10,
            max_statements_per_file: 100,
            max_statement_length: 10_000,
        }
    }
}

/// Validate a script path before it is read.
///
/// A file that does not exist (or cannot be inspected) passes the size
/// check; reading it will report the problem instead.
pub fn validate_file_path(path: &Path, config: &SecurityConfig) -> Result<()> {
    let path_str = path.to_string_lossy();
    if path_str.is_empty() {
        return Err(SqlRunnerError::InvalidPath {
            message: "file path cannot be empty".to_string(),
        }
        .into());
    }

    if let Some(pattern) = config
        .dangerous_path_patterns
        .iter()
        .find(|pattern| contains_ci(&path_str, pattern))
    {
        return Err(SqlRunnerError::DangerousPath {
            path: path.to_path_buf(),
            pattern: pattern.clone(),
        }
        .into());
    }

    let lower = path_str.to_ascii_lowercase();
    if !config
        .allowed_extensions
        .iter()
        .any(|ext| lower.ends_with(&ext.to_ascii_lowercase()))
    {
        return Err(SqlRunnerError::DisallowedExtension {
            path: path.to_path_buf(),
            allowed: config.allowed_extensions.join(", "),
        }
        .into());
    }

    if let Ok(metadata) = std::fs::metadata(path) {
        let size_mb = metadata.len() as f64 / (1024.0 * 1024.0);
        if size_mb > config.max_file_size_mb as f64 {
            return Err(SqlRunnerError::FileTooLarge {
                path: path.to_path_buf(),
                size_mb,
                max_mb: config.max_file_size_mb,
            }
            .into());
        }
    }

    Ok(())
}

/// Comment-free SQL with whitespace runs collapsed to a single space.
pub fn sanitize_sql_content(sql: &str) -> String {
    normalize(sql, false).into_owned()
}

/// Normalized text for pattern matching. With `mask_literals`, the contents
/// of quoted literals are dropped and only the quotes remain.
fn normalize(sql: &str, mask_literals: bool) -> Cow<'_, str> {
    let tokens = match tokenize(sql) {
        Ok(tokens) => tokens,
        Err(e) => {
            tracing::warn!("Validating unnormalized SQL: {}", e);
            return Cow::Borrowed(sql.trim());
        }
    };

    let mut out = String::with_capacity(sql.len());
    let mut pending_space = false;
    for token in &tokens {
        match token.kind {
            TokenKind::Whitespace | TokenKind::LineComment | TokenKind::BlockComment => {
                pending_space = true;
            }
            TokenKind::EndOfInput => break,
            _ => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push_str(&masked_text(sql, token, mask_literals));
            }
        }
    }
    Cow::Owned(out)
}

fn masked_text<'a>(sql: &'a str, token: &Token, mask_literals: bool) -> Cow<'a, str> {
    let text = token.text(sql);
    match token.kind {
        TokenKind::StringLiteral(_) if mask_literals => {
            let quote = &text[..1];
            Cow::Owned(format!("{quote}{quote}"))
        }
        _ => Cow::Borrowed(text),
    }
}

/// Validate SQL content against the operation denylist and size limits.
///
/// Statement count and length are measured on the statements the splitter
/// produces, so semicolons inside literals or comments do not count.
pub fn validate_sql_content(sql: &str, config: &SecurityConfig) -> Result<()> {
    if sql.trim().is_empty() {
        return Ok(());
    }

    let normalized = normalize(sql, true);
    for pattern in &config.dangerous_sql_patterns {
        if find_word_ci(&normalized, pattern).is_some() {
            return Err(SqlRunnerError::DangerousSqlPattern {
                pattern: pattern.clone(),
            }
            .into());
        }
    }

    let statements = split_statements(sql, false);
    if statements.len() > config.max_statements_per_file {
        return Err(SqlRunnerError::TooManyStatements {
            count: statements.len(),
            max: config.max_statements_per_file,
        }
        .into());
    }

    for (i, statement) in statements.iter().enumerate() {
        let length = statement.chars().count();
        if length > config.max_statement_length {
            return Err(SqlRunnerError::StatementTooLong {
                index: i + 1,
                length,
                max: config.max_statement_length,
            }
            .into());
        }
    }

    Ok(())
}

static URL_SCHEME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*:").expect("Invalid URL scheme regex")
});

/// `scheme://user:password@` with the password captured separately
static URL_PASSWORD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([A-Za-z][A-Za-z0-9+.\-]*://[^:/@]*:)[^@/]*@")
        .expect("Invalid URL password regex")
});

/// Validate a database connection URL.
pub fn validate_database_url(url: &str, config: &SecurityConfig) -> Result<()> {
    if url.is_empty() {
        return Err(SqlRunnerError::InvalidDatabaseUrl {
            message: "database URL cannot be empty".to_string(),
        }
        .into());
    }

    if let Some(pattern) = config
        .dangerous_url_patterns
        .iter()
        .find(|pattern| contains_ci(url, pattern))
    {
        return Err(SqlRunnerError::InvalidDatabaseUrl {
            message: format!("contains potentially dangerous pattern: {}", pattern),
        }
        .into());
    }

    if !URL_SCHEME_RE.is_match(url) {
        return Err(SqlRunnerError::InvalidDatabaseUrl {
            message: "database URL must include a scheme".to_string(),
        }
        .into());
    }

    Ok(())
}

/// Mask the password component of a database URL for logging.
pub fn redact_url(url: &str) -> Cow<'_, str> {
    URL_PASSWORD_RE.replace(url, "${1}***@")
}

pub fn is_safe_file_path(path: &Path, config: &SecurityConfig) -> bool {
    validate_file_path(path, config).is_ok()
}

pub fn is_safe_sql_content(sql: &str, config: &SecurityConfig) -> bool {
    validate_sql_content(sql, config).is_ok()
}

pub fn is_safe_database_url(url: &str, config: &SecurityConfig) -> bool {
    validate_database_url(url, config).is_ok()
}
