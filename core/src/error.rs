//! # Error Handling
//!
//! Provides the unified `AppError` enum used across the workspace.

use derive_more::{Display, From};

/// The Global Error Enum.
///
/// We use `derive_more` for boilerplate.
/// Note: String errors default to `General`.
#[derive(Debug, Display, From)]
pub enum AppError {
    /// Wrapper for standard IO errors.
    #[display("IO Error: {_0}")]
    Io(std::io::Error),

    /// A directory walk failed below an existing fragment root.
    #[display("Walk Error: {_0}")]
    Walk(walkdir::Error),

    /// A fragment could not be parsed into a structure the validator understands.
    #[from(ignore)]
    #[display("failed to parse {path}: {message}")]
    Parse {
        /// Fragment file that failed to parse.
        path: String,
        /// Parser message.
        message: String,
    },

    /// The requested validation preset does not exist.
    #[from(ignore)]
    #[display("unknown validation preset: {_0}")]
    UnknownPreset(String),

    /// Invalid or missing configuration.
    #[from(ignore)]
    #[display("Configuration Error: {_0}")]
    Config(String),

    /// Generic errors.
    #[display("General Error: {_0}")]
    General(String),
}

/// Manual implementation of the standard Error trait.
impl std::error::Error for AppError {}

/// Helper type alias for Result using AppError.
pub type AppResult<T> = Result<T, AppError>;
