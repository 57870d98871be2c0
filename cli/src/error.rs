#![deny(missing_docs)]

//! # CLI Errors
//!
//! Error types for the CLI crate.

use derive_more::{Display, From};
use oas_indexer_core::AppError;

/// Main error enum for CLI operations.
#[derive(Debug, Display, From)]
pub enum CliError {
    /// IO Error wrapper.
    #[display("IO Error: {}", _0)]
    Io(std::io::Error),

    /// Error raised by the core library.
    #[display("{}", _0)]
    Core(AppError),

    /// Validation recorded violations; composition was not attempted.
    #[from(ignore)]
    #[display("validation failed: {}", _0)]
    Validation(String),

    /// Building the root document failed.
    #[from(ignore)]
    #[display("building {} root YAML: {}", style, source)]
    Compose {
        /// Root style being built (`joined` or `reference-style`).
        style: &'static str,
        /// Underlying core error.
        source: AppError,
    },

    /// A required external tool is not installed.
    #[from(ignore)]
    #[display("{} not found. Install with one of:\n{}", tool, hint)]
    ToolMissing {
        /// Tool (or tool family) that was looked for.
        tool: String,
        /// Installation guidance, one suggestion per line.
        hint: String,
    },

    /// An external tool ran and exited unsuccessfully.
    #[from(ignore)]
    #[display("{} failed with {}", tool, status)]
    ToolFailed {
        /// Program that was run.
        tool: String,
        /// Exit status description.
        status: String,
    },

    /// General failure message.
    #[display("Operation failed: {}", _0)]
    General(String),
}

/// Manual implementation of the standard Error trait.
///
/// We implement this manually (instead of `derive(Error)`) because the `General(String)`
/// variant contains a `String`, which does not implement `std::error::Error`, causing
/// auto-derived `source()` implementations to fail compilation.
impl std::error::Error for CliError {}

/// Result type alias.
pub type CliResult<T> = Result<T, CliError>;
