#![deny(missing_docs)]

//! # OAS Indexer Core
//!
//! Aggregates a directory of OpenAPI fragments into one root document and lints
//! path fragments against named rule presets.

/// Shared error types.
pub mod error;

/// Fragment discovery.
pub mod fragments;

/// Filename case conversion.
pub mod naming;

/// Path key derivation.
pub mod path_key;

/// Component name maps.
pub mod names;

/// `$ref` rewriting for inlined output.
pub mod rewrite;

/// Root document composition.
pub mod compose;

/// Run configuration.
pub mod config;

/// Rule based validation.
pub mod validation;

pub use compose::{compose_root, write_root, ComposeMode, ComposeSummary, ComposedRoot};
pub use config::{IndexerConfig, RawConfig, ValidationSettings};
pub use error::{AppError, AppResult};
pub use fragments::{list_yaml_files, Fragment, FragmentKind, FragmentLayout, FragmentSet};
pub use names::{NameCollision, NameMap};
pub use naming::{component_name, to_camel_case, to_pascal_case};
pub use path_key::build_path_key;
pub use rewrite::{rewrite_refs, ReferenceToken};
pub use validation::{
    find_preset, presets, Severity, ValidationOutcome, ValidationPreset, ValidationReport,
    ValidationResult, ValidationRule, Validator, ViolationReporter,
};
