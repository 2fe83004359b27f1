#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use apimerge_core::AppError;
use derive_more::{Display, From};

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Failure raised by the merge engine.
    #[display("{}", _0)]
    Core(AppError),

    /// The plugin payload on stdin could not be decoded.
    #[from(ignore)]
    #[display("Invalid plugin payload: {}", _0)]
    Payload(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `Payload(String)`
/// variant contains a `String`, which does not implement `std::error::Error`.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
