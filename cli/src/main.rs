#![deny(missing_docs)]

//! # OAS Indexer CLI
//!
//! Aggregates OpenAPI fragments into a root document, optionally validating them first
//! and handing the result to installed generators and documentation tools.

use clap::Parser;
use oas_indexer_core::{IndexerConfig, RawConfig};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::CliResult;
use crate::tools::{PathLocator, ShellExecutor};

mod error;
mod run;
mod tools;

#[derive(Parser, Debug)]
#[clap(
    name = "oas-indexer",
    author,
    version,
    about = "Aggregate OpenAPI fragments into a single root document"
)]
struct Cli {
    /// Source OpenAPI fragments directory.
    #[clap(short, long, required_unless_present = "list_presets")]
    input: Option<String>,

    /// Destination directory for the root file (default: same as --input).
    #[clap(short, long)]
    output: Option<String>,

    /// Name of the aggregated root file (default: root.yaml).
    #[clap(short, long)]
    root: Option<String>,

    /// Generate TypeScript output using an installed OpenAPI tool to this path.
    #[clap(long)]
    output_ts: Option<String>,

    /// Generate Go output using an installed OpenAPI tool to this path.
    #[clap(long)]
    output_go: Option<String>,

    /// Generate HTML docs using the Redocly CLI to this file.
    #[clap(long = "redocly", value_name = "HTML")]
    docs_html: Option<String>,

    /// Bundle the spec using the Redocly CLI to this YAML file.
    #[clap(long)]
    bundle: Option<String>,

    /// Redocly configuration file (default: ./redocly.yaml if present).
    #[clap(long)]
    redocly_config: Option<String>,

    /// Generator for TypeScript when using openapi-generator.
    #[clap(long, env = "TS_GENERATOR")]
    ts_generator: Option<String>,

    /// Generator for Go when using openapi-generator.
    #[clap(long, env = "GO_GENERATOR")]
    go_generator: Option<String>,

    /// Write a joined (inlined) root instead of a reference-style one.
    #[clap(long)]
    join: bool,

    /// Bundle to dist/openapi.yaml and build HTML to dist/index.html.
    #[clap(long)]
    all: bool,

    /// Run validation with the given preset (google, restful).
    #[clap(long, value_name = "PRESET")]
    validate: Option<String>,

    /// Skip validation entirely.
    #[clap(long)]
    skip_validation: bool,

    /// Stop at the first validation error.
    #[clap(long = "validate-stop-on-error")]
    stop_on_error: bool,

    /// List available validation presets and exit.
    #[clap(long)]
    list_presets: bool,

    /// Verbose diagnostics on stderr (overridden by RUST_LOG).
    #[clap(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_raw(self) -> RawConfig {
        RawConfig {
            input: self.input,
            output: self.output,
            root: self.root,
            output_ts: self.output_ts,
            output_go: self.output_go,
            docs_html: self.docs_html,
            bundle: self.bundle,
            redocly_config: self.redocly_config,
            ts_generator: self.ts_generator,
            go_generator: self.go_generator,
            join: self.join,
            all: self.all,
            validate: self.validate,
            skip_validation: self.skip_validation,
            stop_on_error: self.stop_on_error,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn execute(cli: Cli) -> CliResult<()> {
    if cli.list_presets {
        print!("{}", run::preset_listing());
        return Ok(());
    }

    let cwd = std::env::current_dir()?;
    let config = IndexerConfig::resolve(&cli.into_raw(), &cwd)?;
    tracing::debug!(?config, "resolved configuration");

    run::run(&config, &ShellExecutor, &PathLocator::new(&cwd))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
