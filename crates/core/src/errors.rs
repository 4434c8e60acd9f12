//! Error types for secret file resolution.

use std::path::PathBuf;

/// Result type alias for senv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for senv operations.
///
/// All file-level variants are local and recoverable: a resolution pass
/// reports them per key and keeps going. Only `Configuration` signals a
/// construction-time contract violation.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The resolved path does not exist or is not a regular file
    #[error("file '{path}' does not exist or is not a regular file")]
    FileNotFound { path: PathBuf },

    /// The resolved path lies outside the configured base directory
    #[error("path '{path}' escapes the base directory '{base}'")]
    PathEscapesBase { path: PathBuf, base: PathBuf },

    /// The file exceeds the configured size limit and was not read
    #[error("file '{path}' is {size} bytes, exceeding the limit of {limit} bytes")]
    FileTooLarge { path: PathBuf, size: u64, limit: u64 },

    /// File system operations
    #[error("file system {operation} operation failed for '{path}': {source}")]
    Io {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    /// The file contents could not be decoded with the configured encoding
    #[error("failed to decode '{path}' as {encoding}")]
    Encoding { path: PathBuf, encoding: String },

    /// Configuration errors
    #[error("configuration error: {message}")]
    Configuration { message: String },
}

// Helper methods for creating errors with context
impl Error {
    /// Create a file-not-found error
    #[must_use]
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Error::FileNotFound { path: path.into() }
    }

    /// Create a base-directory containment error
    #[must_use]
    pub fn path_escapes_base(path: impl Into<PathBuf>, base: impl Into<PathBuf>) -> Self {
        Error::PathEscapesBase {
            path: path.into(),
            base: base.into(),
        }
    }

    /// Create a size-limit error
    #[must_use]
    pub fn file_too_large(path: impl Into<PathBuf>, size: u64, limit: u64) -> Self {
        Error::FileTooLarge {
            path: path.into(),
            size,
            limit,
        }
    }

    /// Create a file system error with the failed operation
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, operation: impl Into<String>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            operation: operation.into(),
            source,
        }
    }

    /// Create a text decoding error
    #[must_use]
    pub fn encoding(path: impl Into<PathBuf>, encoding: impl Into<String>) -> Self {
        Error::Encoding {
            path: path.into(),
            encoding: encoding.into(),
        }
    }

    /// Create a configuration error
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Error::Configuration {
            message: message.into(),
        }
    }

    /// Whether this error is a local, per-key failure that a resolution pass
    /// recovers from.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Configuration { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_level_errors_are_recoverable() {
        assert!(Error::file_not_found("/etc/secret").is_recoverable());
        assert!(Error::path_escapes_base("/etc/secret", "/app").is_recoverable());
        assert!(Error::file_too_large("/etc/secret", 200, 100).is_recoverable());
        assert!(!Error::configuration("bad options").is_recoverable());
    }

    #[test]
    fn display_includes_path_and_limit() {
        let err = Error::file_too_large("/run/secrets/token", 131073, 131072);
        let message = err.to_string();
        assert!(message.contains("/run/secrets/token"));
        assert!(message.contains("131073"));
        assert!(message.contains("131072"));
    }
}
