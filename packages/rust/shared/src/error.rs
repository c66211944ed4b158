//! Error types for Tax Companion.
//!
//! Library crates use [`TaxCompanionError`] via `thiserror`.
//! App crates (cli/tui) wrap this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Tax Companion operations.
#[derive(Debug, thiserror::Error)]
pub enum TaxCompanionError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Answers file or other structured input could not be parsed.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A form submission was blocked by the field-level checks.
    #[error("validation error: {message}")]
    Validation { message: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, TaxCompanionError>;

impl TaxCompanionError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = TaxCompanionError::config("could not determine home directory");
        assert_eq!(
            err.to_string(),
            "config error: could not determine home directory"
        );

        let err = TaxCompanionError::validation("country is required");
        assert!(err.to_string().contains("country is required"));
    }

    #[test]
    fn io_error_mentions_path() {
        let source = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = TaxCompanionError::io("/tmp/answers.toml", source);
        let text = err.to_string();
        assert!(text.contains("answers.toml"));
        assert!(text.contains("gone"));
    }
}
