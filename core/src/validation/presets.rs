#![deny(missing_docs)]

//! # Validation Presets
//!
//! The built-in rule sets. The registry is a compile-time table; adding a preset
//! means adding an entry to [`PRESETS`].

use crate::error::{AppError, AppResult};
use crate::validation::rules::{
    CollectionNamesPlural, HttpMethodsRest, NoTrailingSlash, OperationIdPresent,
    OperationSummaryPresent, PathCaseKebab, ResourceIdParam, Response200Present, ValidationRule,
};
use std::fmt;

/// A named, ordered collection of rules.
pub struct ValidationPreset {
    /// Lookup key used on the command line (e.g. `google`).
    pub key: &'static str,
    /// Display name.
    pub name: &'static str,
    /// One line description.
    pub description: &'static str,
    /// Rules in evaluation order.
    pub rules: &'static [&'static dyn ValidationRule],
}

impl ValidationPreset {
    /// Rule names in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }
}

impl fmt::Debug for ValidationPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationPreset")
            .field("key", &self.key)
            .field("name", &self.name)
            .field("rules", &self.rule_names())
            .finish()
    }
}

static GOOGLE_RULES: [&dyn ValidationRule; 8] = [
    &HttpMethodsRest,
    &CollectionNamesPlural,
    &PathCaseKebab,
    &NoTrailingSlash,
    &OperationIdPresent,
    &OperationSummaryPresent,
    &Response200Present,
    &ResourceIdParam,
];

static RESTFUL_RULES: [&dyn ValidationRule; 4] = [
    &HttpMethodsRest,
    &OperationIdPresent,
    &CollectionNamesPlural,
    &NoTrailingSlash,
];

/// Every built-in preset, in listing order.
pub static PRESETS: [ValidationPreset; 2] = [
    ValidationPreset {
        key: "google",
        name: "Google API Design Guide",
        description: "Validation rules based on Google's API Design Guide best practices",
        rules: &GOOGLE_RULES,
    },
    ValidationPreset {
        key: "restful",
        name: "RESTful API Standards",
        description: "Common RESTful API design standards",
        rules: &RESTFUL_RULES,
    },
];

/// Returns all built-in presets.
pub fn presets() -> &'static [ValidationPreset] {
    &PRESETS
}

/// Looks up a preset by key.
pub fn find_preset(key: &str) -> AppResult<&'static ValidationPreset> {
    PRESETS
        .iter()
        .find(|preset| preset.key == key)
        .ok_or_else(|| AppError::UnknownPreset(key.to_string()))
}
