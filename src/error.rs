//! Error types for portal-check
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI
//!
//! Check bodies themselves return `anyhow::Result`; these errors cover
//! everything around them (settings, IO, the database probe).

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for portal-check operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Database connection errors (3xx)
    ConnectionFailed = 300,
    ConnectionTimeout = 301,
    DatabaseUrl = 310,
    UnsupportedEngine = 311,

    // Internal errors (9xx)
    InternalError = 900,
}

impl ErrorCode {
    /// Get the string code (e.g., "E100")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI.
    ///
    /// Check failures always exit with 1; these codes are reserved for
    /// failures that prevent the checks from running at all.
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10,
            200..=299 => 20,
            300..=399 => 30,
            900..=999 => 90,
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Settings file not found
    #[error("Settings file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Settings parse error
    #[error("Failed to parse settings file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Settings validation error
    #[error("Settings validation failed: {field}: {message}")]
    ConfigValidation { field: String, message: String },

    // ─────────────────────────────────────────────────────────────
    // IO Errors
    // ─────────────────────────────────────────────────────────────

    /// File read error
    #[error("Failed to read file: {path}")]
    IoRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File write error
    #[error("Failed to write file: {path}")]
    IoWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    // ─────────────────────────────────────────────────────────────
    // Database Errors
    // ─────────────────────────────────────────────────────────────

    /// Connection or query failed
    #[error("{message}")]
    ConnectionFailed { target: String, message: String },

    /// Connect + query did not finish in time
    #[error("connection to {target} timed out after {timeout_secs}s")]
    ConnectionTimeout { target: String, timeout_secs: u64 },

    /// Settings could not be turned into a connection URL
    #[error("invalid database settings: {message}")]
    DatabaseUrl { message: String },

    /// Engine string not recognised
    #[error("unsupported database engine '{engine}'")]
    UnsupportedEngine { engine: String },

    // ─────────────────────────────────────────────────────────────
    // Internal Errors
    // ─────────────────────────────────────────────────────────────

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,

            Error::IoRead { .. } => ErrorCode::IoRead,
            Error::IoWrite { .. } => ErrorCode::IoWrite,
            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,

            Error::ConnectionFailed { .. } => ErrorCode::ConnectionFailed,
            Error::ConnectionTimeout { .. } => ErrorCode::ConnectionTimeout,
            Error::DatabaseUrl { .. } => ErrorCode::DatabaseUrl,
            Error::UnsupportedEngine { .. } => ErrorCode::UnsupportedEngine,

            Error::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::ConfigNotFound { .. } => Some(
                "Run 'portal-check config init' to create a settings file, or point PORTAL_SETTINGS at an existing one.",
            ),
            Error::ConfigParse { .. } => Some(
                "Check your settings file syntax. Run 'portal-check config validate' to see details.",
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the settings file and fix the invalid values.",
            ),
            Error::ConnectionFailed { .. } => Some(
                "Verify the database host, port and credentials, and that the server accepts connections.",
            ),
            Error::ConnectionTimeout { .. } => Some(
                "The database may be down or unreachable. Raise 'checks.connect_timeout_secs' for slow networks.",
            ),
            Error::UnsupportedEngine { .. } => Some(
                "Use an engine containing 'postgresql', 'mysql' or 'sqlite'.",
            ),
            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", self.code().as_str(), self);

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        match self {
            Error::ConnectionFailed { target, message } => {
                format!("[{}] {}: {}", self.code().as_str(), target, message)
            }
            _ => format!("[{}] {}", self.code().as_str(), self),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a settings validation error for a field
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a connection failed error
    pub fn connection_failed(target: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConnectionFailed {
            target: target.into(),
            message: message.into(),
        }
    }

    /// Create a database URL error
    pub fn database_url(message: impl Into<String>) -> Self {
        Error::DatabaseUrl {
            message: message.into(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::ConnectionFailed.as_str(), "E300");
        assert_eq!(ErrorCode::UnsupportedEngine.as_str(), "E311");
        assert_eq!(ErrorCode::InternalError.as_str(), "E900");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(ErrorCode::ConfigNotFound.exit_code(), 10);
        assert_eq!(ErrorCode::ConfigValidation.exit_code(), 10);
        assert_eq!(ErrorCode::IoWrite.exit_code(), 20);
        assert_eq!(ErrorCode::ConnectionTimeout.exit_code(), 30);
        assert_eq!(ErrorCode::InternalError.exit_code(), 90);
    }

    #[test]
    fn test_connection_failed_displays_driver_message_only() {
        let err = Error::connection_failed("postgres://db:5432/portal", "password authentication failed");
        assert_eq!(err.to_string(), "password authentication failed");
        assert_eq!(err.code(), ErrorCode::ConnectionFailed);
    }

    #[test]
    fn test_timeout_display() {
        let err = Error::ConnectionTimeout {
            target: "db.internal:5432".into(),
            timeout_secs: 10,
        };
        assert_eq!(err.to_string(), "connection to db.internal:5432 timed out after 10s");
    }

    #[test]
    fn test_unsupported_engine_display() {
        let err = Error::UnsupportedEngine { engine: "oracle".into() };
        assert_eq!(err.to_string(), "unsupported database engine 'oracle'");
        assert!(err.suggestion().unwrap().contains("postgresql"));
    }

    #[test]
    fn test_error_suggestions() {
        let err = Error::ConfigNotFound { path: PathBuf::from("/test") };
        assert!(err.suggestion().unwrap().contains("config init"));

        let err = Error::Internal("boom".into());
        assert!(err.suggestion().is_none());
    }

    #[test]
    fn test_format_for_terminal() {
        let err = Error::ConfigNotFound { path: PathBuf::from("/test/portal.toml") };
        let formatted = err.format_for_terminal();

        assert!(formatted.contains("E100"));
        assert!(formatted.contains("\x1b[31m"));
        assert!(formatted.contains("Hint"));
        assert!(formatted.contains("/test/portal.toml"));
    }

    #[test]
    fn test_format_for_log() {
        let err = Error::config_field_invalid("logging.level", "unknown level 'loud'");
        let formatted = err.format_for_log();

        assert!(formatted.contains("[E102]"));
        assert!(formatted.contains("logging.level"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_format_for_log_includes_connection_target() {
        let err = Error::connection_failed("db.internal:5432", "connection refused");
        assert_eq!(err.format_for_log(), "[E300] db.internal:5432: connection refused");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: Error = io_err.into();

        assert_eq!(err.code(), ErrorCode::IoPermission);
    }
}
