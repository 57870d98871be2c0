//! # Pipeline
//!
//! Runs one configured indexing pass: validation, root composition, then the
//! external generators, bundler and renderer.

use crate::error::{CliError, CliResult};
use crate::tools::{CommandExecutor, ToolLocator, Toolchain};
use oas_indexer_core::{
    presets, write_root, ComposeMode, IndexerConfig, ValidationOutcome, ValidationPreset,
    ValidationReport, ValidationResult, ValidationSettings, Validator, ViolationReporter,
};
use std::fs;
use std::path::Path;

/// Prints validation progress to stdout as it happens.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ViolationReporter for ConsoleReporter {
    fn on_start(&mut self, preset: &ValidationPreset) {
        print!("{}", preset_banner(preset));
    }

    fn on_violation(&mut self, result: &ValidationResult) {
        println!("{}", violation_line(result));
    }

    fn on_finish(&mut self, report: &ValidationReport) {
        print!("{}", summary(report));
    }
}

fn preset_banner(preset: &ValidationPreset) -> String {
    format!(
        "Running validation with preset: {}\nDescription: {}\nRules: {}\n\n",
        preset.name,
        preset.description,
        preset.rules.len()
    )
}

fn violation_line(result: &ValidationResult) -> String {
    format!("❌ {result}")
}

fn summary(report: &ValidationReport) -> String {
    match report.outcome {
        ValidationOutcome::Passed => "\n✅ All validations passed!\n".to_string(),
        // The run ends at the reported violation; no tally.
        ValidationOutcome::StoppedEarly => String::new(),
        ValidationOutcome::Failed => format!(
            "\n❌ Validation failed with {} error(s)\n",
            report.results.len()
        ),
    }
}

/// Renders the preset catalogue printed by `--list-presets`.
pub fn preset_listing() -> String {
    let mut out = String::from("Available validation presets:\n");
    for preset in presets() {
        out.push_str(&format!("  {}: {}\n", preset.key, preset.description));
        out.push_str(&format!(
            "    Rules: {} ({})\n",
            preset.rules.len(),
            preset.rule_names().join(", ")
        ));
    }
    out
}

/// Resolves the configured preset. Fails before anything touches the filesystem.
pub fn prepare_validator(settings: &ValidationSettings) -> CliResult<Validator> {
    Validator::new(&settings.preset, settings.stop_on_error)
        .map_err(|e| CliError::Validation(e.to_string()))
}

/// Runs validation against the paths directory.
///
/// Any violation (or a stop at the first one) fails the run.
pub fn validate(
    validator: &mut Validator,
    paths_dir: &Path,
    reporter: &mut dyn ViolationReporter,
) -> CliResult<ValidationReport> {
    let report = validator
        .validate_dir(paths_dir, reporter)
        .map_err(|e| CliError::Validation(e.to_string()))?;

    match report.outcome {
        ValidationOutcome::Passed => Ok(report),
        ValidationOutcome::StoppedEarly => Err(CliError::Validation(
            "validation failed on first error".into(),
        )),
        ValidationOutcome::Failed => Err(CliError::Validation(format!(
            "{} violation(s) found",
            report.results.len()
        ))),
    }
}

/// Executes the whole pipeline. The first failing stage aborts the rest.
pub fn run<E: CommandExecutor, L: ToolLocator>(
    config: &IndexerConfig,
    executor: &E,
    locator: &L,
) -> CliResult<()> {
    let mut validator = config
        .validation
        .as_ref()
        .map(prepare_validator)
        .transpose()?;

    fs::create_dir_all(&config.output_dir)?;

    if let Some(validator) = validator.as_mut() {
        tracing::info!(preset = validator.preset().key, "validating path fragments");
        validate(validator, &config.layout.paths_dir, &mut ConsoleReporter)?;
        println!();
    }

    let style = match config.mode {
        ComposeMode::Inline => "joined",
        ComposeMode::Reference => "reference-style",
    };
    write_root(&config.layout, &config.root_path, config.mode)
        .map_err(|source| CliError::Compose { style, source })?;
    println!("Wrote root spec: {}", config.root_path.display());

    let tools = Toolchain::new(config, executor, locator);
    tools.generate_typescript()?;
    tools.generate_go()?;
    tools.bundle()?;
    tools.build_docs()?;
    Ok(())
}
