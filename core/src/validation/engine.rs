#![deny(missing_docs)]

//! # Validation Engine
//!
//! Runs a preset over every operation of every path fragment.
//!
//! State: `Idle -> Running -> Passed | Failed`.
//!
//! 1. The preset is resolved before any file is touched; an unknown key never starts a run.
//! 2. Path fragments are visited in sorted order, operations in fragment key order.
//! 3. Every rule runs against every operation unless stop-on-error is set, in which case
//!    the first violation ends the run with [`ValidationOutcome::StoppedEarly`].
//!
//! A fragment that fails to read or parse aborts the run with an error; it is never
//! reported as a violation.

use crate::error::{AppError, AppResult};
use crate::fragments::{list_yaml_files, sort_paths, Fragment, FragmentKind};
use crate::path_key::build_path_key;
use crate::validation::presets::{find_preset, ValidationPreset};
use crate::validation::rules::key_as_string;
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::Path;

/// How serious a result is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Fails the run.
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

/// One rule failing for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    /// Path key of the fragment.
    pub path: String,
    /// Upper-cased method key.
    pub method: String,
    /// Name of the failing rule.
    pub rule: String,
    /// Violation message from the rule.
    pub message: String,
    /// Severity; built-in rules always report errors.
    pub severity: Severity,
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} - {}: {}",
            self.method, self.path, self.rule, self.message
        )
    }
}

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationOutcome {
    /// No violations.
    Passed,
    /// Every rule ran; at least one violation was recorded.
    Failed,
    /// Stop-on-error was set and the first violation ended the run.
    StoppedEarly,
}

/// Engine lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Not started.
    Idle,
    /// Evaluating rules.
    Running,
    /// Finished without violations.
    Passed,
    /// Finished with violations (or stopped at the first one).
    Failed,
}

/// Results of a completed run.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    /// The preset that was applied.
    pub preset: &'static ValidationPreset,
    /// Violations in the order they were found.
    pub results: Vec<ValidationResult>,
    /// How the run ended.
    pub outcome: ValidationOutcome,
    /// Number of path fragments evaluated.
    pub fragments: usize,
    /// Number of operations evaluated.
    pub operations: usize,
}

impl ValidationReport {
    /// Returns `true` if the run recorded no violations.
    pub fn passed(&self) -> bool {
        self.outcome == ValidationOutcome::Passed
    }

    /// Number of error-severity results.
    pub fn error_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.severity == Severity::Error)
            .count()
    }
}

/// Receives run events as they happen.
pub trait ViolationReporter {
    /// Called once the preset is resolved, before any fragment is read.
    fn on_start(&mut self, preset: &ValidationPreset) {
        let _ = preset;
    }

    /// Called for every violation, immediately.
    fn on_violation(&mut self, result: &ValidationResult);

    /// Called when the run completes (not on errors).
    fn on_finish(&mut self, report: &ValidationReport) {
        let _ = report;
    }
}

/// Collects violations without printing; handy when only the report matters.
impl ViolationReporter for Vec<ValidationResult> {
    fn on_violation(&mut self, result: &ValidationResult) {
        self.push(result.clone());
    }
}

/// Runs one preset over the path fragments below a directory.
#[derive(Debug)]
pub struct Validator {
    preset: &'static ValidationPreset,
    stop_on_error: bool,
    state: EngineState,
}

impl Validator {
    /// Resolves `preset_key`. Fails with [`AppError::UnknownPreset`] before any work is done.
    pub fn new(preset_key: &str, stop_on_error: bool) -> AppResult<Self> {
        Ok(Self {
            preset: find_preset(preset_key)?,
            stop_on_error,
            state: EngineState::Idle,
        })
    }

    /// The resolved preset.
    pub fn preset(&self) -> &'static ValidationPreset {
        self.preset
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Discovers and validates every path fragment below `paths_dir`.
    pub fn validate_dir(
        &mut self,
        paths_dir: &Path,
        reporter: &mut dyn ViolationReporter,
    ) -> AppResult<ValidationReport> {
        let mut files = list_yaml_files(paths_dir)?;
        sort_paths(&mut files);
        let fragments: Vec<Fragment> = files
            .into_iter()
            .map(|path| Fragment {
                path,
                kind: FragmentKind::Path,
            })
            .collect();
        self.validate_fragments(paths_dir, &fragments, reporter)
    }

    /// Validates the given path fragments in order.
    pub fn validate_fragments(
        &mut self,
        paths_dir: &Path,
        fragments: &[Fragment],
        reporter: &mut dyn ViolationReporter,
    ) -> AppResult<ValidationReport> {
        reporter.on_start(self.preset);
        self.state = EngineState::Running;

        let mut report = ValidationReport {
            preset: self.preset,
            results: Vec::new(),
            outcome: ValidationOutcome::Passed,
            fragments: 0,
            operations: 0,
        };

        let result = self.run(paths_dir, fragments, reporter, &mut report);
        if let Err(err) = result {
            self.state = EngineState::Failed;
            return Err(err);
        }

        if report.outcome != ValidationOutcome::StoppedEarly && !report.results.is_empty() {
            report.outcome = ValidationOutcome::Failed;
        }
        self.state = match report.outcome {
            ValidationOutcome::Passed => EngineState::Passed,
            _ => EngineState::Failed,
        };

        tracing::info!(
            preset = self.preset.key,
            fragments = report.fragments,
            operations = report.operations,
            violations = report.results.len(),
            outcome = ?report.outcome,
            "validation finished"
        );
        reporter.on_finish(&report);
        Ok(report)
    }

    fn run(
        &self,
        paths_dir: &Path,
        fragments: &[Fragment],
        reporter: &mut dyn ViolationReporter,
        report: &mut ValidationReport,
    ) -> AppResult<()> {
        for fragment in fragments {
            let api_path = build_path_key(paths_dir, &fragment.path);
            if api_path.is_empty() {
                continue;
            }

            let spec = load_path_item(&fragment.path)?;
            report.fragments += 1;

            for (method_key, operation) in &spec {
                // Non-mapping values are metadata (`summary`, `parameters`, ...), not operations.
                let Some(operation) = operation.as_mapping() else {
                    continue;
                };
                let Some(method) = key_as_string(method_key) else {
                    continue;
                };
                report.operations += 1;

                for rule in self.preset.rules {
                    let Some(message) = rule.evaluate(&api_path, &method, operation) else {
                        continue;
                    };
                    let result = ValidationResult {
                        path: api_path.clone(),
                        method: method.to_uppercase(),
                        rule: rule.name().to_string(),
                        message,
                        severity: Severity::Error,
                    };
                    reporter.on_violation(&result);
                    report.results.push(result);

                    if self.stop_on_error {
                        report.outcome = ValidationOutcome::StoppedEarly;
                        return Ok(());
                    }
                }
            }
        }
        Ok(())
    }
}

/// Reads and parses a path fragment into its top-level mapping.
///
/// An empty document is an empty mapping; any other non-mapping document is a parse error.
pub fn load_path_item(path: &Path) -> AppResult<Mapping> {
    let content = fs::read_to_string(path).map_err(|e| AppError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let value: Value = serde_yaml::from_str(&content).map_err(|e| AppError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    match value {
        Value::Null => Ok(Mapping::new()),
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(AppError::Parse {
            path: path.display().to_string(),
            message: format!("expected a mapping of HTTP methods, found {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
