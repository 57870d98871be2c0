#![deny(missing_docs)]

//! # Validation
//!
//! Style and convention checks over path fragments, run before composition.
//!
//! - **rules**: one type per built-in check.
//! - **presets**: the named, ordered rule sets (`google`, `restful`).
//! - **engine**: runs a preset over every operation and collects results.

pub mod engine;
pub mod presets;
pub mod rules;

pub use engine::{
    EngineState, Severity, ValidationOutcome, ValidationReport, ValidationResult, Validator,
    ViolationReporter,
};
pub use presets::{find_preset, presets, ValidationPreset};
pub use rules::ValidationRule;
