//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// Every failure the engine can raise is fatal to the run except formatter
/// failures and legacy-file removal, which never reach this type.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A route annotation failed validation.
    #[from(ignore)]
    #[display("Validation Error: route [{path}] handler [{value}] invalid, {reason}")]
    Validation {
        /// Path of the offending route.
        path: String,
        /// The rejected annotation value (empty when the annotation is missing).
        value: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// An existing destination file is not valid Rust source.
    #[from(ignore)]
    #[display("Parse Error: {file}: {message}")]
    Parse {
        /// The file that failed to parse.
        file: String,
        /// First syntax error reported by the parser.
        message: String,
    },

    /// Template loading or rendering failure.
    #[from(ignore)]
    #[display("Template Error: {_0}")]
    Template(String),

    /// Unknown or unusable naming style.
    #[from(ignore)]
    #[display("Style Error: {_0}")]
    Style(String),

    /// The project context could not be resolved from the working directory.
    #[from(ignore)]
    #[display("Project Error: {_0}")]
    Project(String),

    /// The service description could not be decoded.
    #[from(ignore)]
    #[display("Description Error: {_0}")]
    Description(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Builds a validation error for the given route path and annotation value.
    pub fn validation(path: &str, value: &str, reason: impl Into<String>) -> Self {
        AppError::Validation {
            path: path.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
