#![deny(missing_docs)]

//! # External Tools
//!
//! Invokes the third-party programs that consume the root document:
//!
//! - client/server code generators (`openapi`, `openapi-generator`, `openapi-typescript`,
//!   `oapi-codegen`)
//! - the documentation bundler and renderer (`redocly`, `redoc-cli`)
//!
//! Program discovery and execution sit behind traits so the selection logic can be
//! tested without any of these installed.

use crate::error::{CliError, CliResult};
use oas_indexer_core::IndexerConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};

const GENERATOR_HINT_TS: &str = " - brew install openapi-generator\n - npm i -g @openapitools/openapi-generator-cli\n - npm i -g openapi-typescript (for single-file types)";
const GENERATOR_HINT_GO: &str = " - brew install openapi-generator\n - npm i -g @openapitools/openapi-generator-cli\n - go install github.com/deepmap/oapi-codegen/v2/cmd/oapi-codegen@latest";
const REDOCLY_HINT_BUNDLE: &str =
    " - npm i -g @redocly/cli\n - npm i -D @redocly/cli (then ensure node_modules/.bin is present)";
const REDOCLY_HINT_DOCS: &str = " - npm i -g @redocly/cli\n - npm i -g redoc-cli";

/// Interface for executing an external program.
///
/// Abstracted to allow mocking command execution in tests without the tools installed.
pub trait CommandExecutor {
    /// Runs the program with inherited stdio and returns its exit status.
    fn execute(&self, program: &Path, args: &[String]) -> CliResult<ExitStatus>;
}

/// Standard executor using `std::process::Command`.
pub struct ShellExecutor;

impl CommandExecutor for ShellExecutor {
    fn execute(&self, program: &Path, args: &[String]) -> CliResult<ExitStatus> {
        tracing::debug!(program = %program.display(), ?args, "running external tool");
        let status = Command::new(program).args(args).status()?;
        Ok(status)
    }
}

/// Finds installed programs.
pub trait ToolLocator {
    /// Returns the full path of `name`, if installed.
    fn which(&self, name: &str) -> Option<PathBuf>;

    /// Returns the Redocly CLI: from `PATH`, else the project-local `node_modules/.bin`.
    fn redocly(&self) -> Option<PathBuf> {
        self.which("redocly")
    }
}

/// Searches `PATH`, plus `<cwd>/node_modules/.bin` for Redocly.
pub struct PathLocator {
    cwd: PathBuf,
}

impl PathLocator {
    /// Creates a locator resolving project-local tools against `cwd`.
    pub fn new(cwd: &Path) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
        }
    }
}

impl ToolLocator for PathLocator {
    fn which(&self, name: &str) -> Option<PathBuf> {
        let paths = env::var_os("PATH")?;
        env::split_paths(&paths)
            .flat_map(|dir| executable_candidates(&dir, name))
            .find(|candidate| is_executable(candidate))
    }

    fn redocly(&self) -> Option<PathBuf> {
        self.which("redocly").or_else(|| {
            let local = self.cwd.join("node_modules").join(".bin").join("redocly");
            is_executable(&local).then_some(local)
        })
    }
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

fn executable_candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    let mut candidates = vec![dir.join(name)];
    if cfg!(windows) {
        for ext in ["exe", "cmd", "bat"] {
            candidates.push(dir.join(format!("{name}.{ext}")));
        }
    }
    candidates
}

/// Runs external tools for one configured pipeline.
pub struct Toolchain<'a, E: CommandExecutor, L: ToolLocator> {
    config: &'a IndexerConfig,
    executor: &'a E,
    locator: &'a L,
}

impl<'a, E: CommandExecutor, L: ToolLocator> Toolchain<'a, E, L> {
    /// Binds the toolchain to a configuration.
    pub fn new(config: &'a IndexerConfig, executor: &'a E, locator: &'a L) -> Self {
        Self {
            config,
            executor,
            locator,
        }
    }

    /// Generates TypeScript output, if configured.
    ///
    /// Prefers `openapi`, then `openapi-generator`. A `.ts` target is produced by
    /// `openapi-typescript` when installed; otherwise the generator writes into the
    /// file's parent directory.
    pub fn generate_typescript(&self) -> CliResult<()> {
        let Some(out) = &self.config.output_ts else {
            return Ok(());
        };
        let root = path_arg(&self.config.root_path);

        let (tool, generator) = if let Some(tool) = self.locator.which("openapi") {
            (tool, "typescript".to_string())
        } else if let Some(tool) = self.locator.which("openapi-generator") {
            (tool, self.config.ts_generator.clone())
        } else {
            return Err(CliError::ToolMissing {
                tool: "OpenAPI generator".into(),
                hint: GENERATOR_HINT_TS.into(),
            });
        };

        let mut out_dir = out.clone();
        if has_extension(out, "ts") {
            if let Some(single) = self.locator.which("openapi-typescript") {
                return self.run(&single, vec![root, "-o".into(), path_arg(out)]);
            }
            eprintln!(
                "Tip: install openapi-typescript for single-file TS types: npm i -g openapi-typescript"
            );
            out_dir = parent_or_self(out);
        }

        self.run(
            &tool,
            vec![
                "generate".into(),
                "-g".into(),
                generator,
                "-i".into(),
                root,
                "-o".into(),
                path_arg(&out_dir),
            ],
        )
    }

    /// Generates Go output, if configured.
    ///
    /// Prefers `openapi`, then `openapi-generator`, then `oapi-codegen` alone. A `.go`
    /// target is produced by `oapi-codegen` when installed.
    pub fn generate_go(&self) -> CliResult<()> {
        let Some(out) = &self.config.output_go else {
            return Ok(());
        };
        let single_file = has_extension(out, "go");

        let generator_tool = self
            .locator
            .which("openapi")
            .or_else(|| self.locator.which("openapi-generator"));

        if let Some(tool) = generator_tool {
            let generator = self.config.go_generator.clone();
            let mut out_dir = out.clone();
            if single_file {
                if let Some(codegen) = self.locator.which("oapi-codegen") {
                    return self.oapi_codegen(&codegen, out);
                }
                eprintln!(
                    "Tip: install oapi-codegen for single-file Go: go install github.com/deepmap/oapi-codegen/v2/cmd/oapi-codegen@latest"
                );
                out_dir = parent_or_self(out);
            }
            return self.run(
                &tool,
                vec![
                    "generate".into(),
                    "-g".into(),
                    generator,
                    "-i".into(),
                    path_arg(&self.config.root_path),
                    "-o".into(),
                    path_arg(&out_dir),
                ],
            );
        }

        if let Some(codegen) = self.locator.which("oapi-codegen") {
            let target = if single_file {
                if let Some(parent) = out.parent() {
                    fs::create_dir_all(parent)?;
                }
                out.clone()
            } else {
                fs::create_dir_all(out)?;
                out.join("api.gen.go")
            };
            return self.oapi_codegen(&codegen, &target);
        }

        Err(CliError::ToolMissing {
            tool: "OpenAPI generator".into(),
            hint: GENERATOR_HINT_GO.into(),
        })
    }

    /// Bundles the root document into a single file, if configured.
    pub fn bundle(&self) -> CliResult<()> {
        let Some(out) = &self.config.bundle else {
            return Ok(());
        };
        let Some(redocly) = self.locator.redocly() else {
            return Err(CliError::ToolMissing {
                tool: "redocly CLI".into(),
                hint: REDOCLY_HINT_BUNDLE.into(),
            });
        };

        ensure_parent(out)?;
        let mut args = vec![
            "bundle".into(),
            path_arg(&self.config.root_path),
            "-o".into(),
            path_arg(out),
        ];
        self.push_config(&mut args);
        self.run(&redocly, args)
    }

    /// Renders HTML documentation, if configured.
    ///
    /// Uses the bundled spec when a bundle output is configured, else the root document.
    pub fn build_docs(&self) -> CliResult<()> {
        let Some(out) = &self.config.docs_html else {
            return Ok(());
        };
        let input = path_arg(self.config.bundle.as_ref().unwrap_or(&self.config.root_path));

        if let Some(redocly) = self.locator.redocly() {
            ensure_parent(out)?;
            let mut args = vec![
                "build-docs".into(),
                input,
                "--output".into(),
                path_arg(out),
            ];
            self.push_config(&mut args);
            return self.run(&redocly, args);
        }

        if let Some(redoc) = self.locator.which("redoc-cli") {
            ensure_parent(out)?;
            return self.run(&redoc, vec!["build".into(), input, "-o".into(), path_arg(out)]);
        }

        Err(CliError::ToolMissing {
            tool: "redocly CLI".into(),
            hint: REDOCLY_HINT_DOCS.into(),
        })
    }

    fn oapi_codegen(&self, codegen: &Path, out: &Path) -> CliResult<()> {
        let package = guess_package(out.parent().unwrap_or_else(|| Path::new("")));
        self.run(
            codegen,
            vec![
                "-generate".into(),
                "types,client,server".into(),
                "-o".into(),
                path_arg(out),
                "-package".into(),
                package,
                path_arg(&self.config.root_path),
            ],
        )
    }

    fn push_config(&self, args: &mut Vec<String>) {
        if let Some(config) = &self.config.redocly_config {
            args.push("--config".into());
            args.push(path_arg(config));
        }
    }

    fn run(&self, program: &Path, args: Vec<String>) -> CliResult<()> {
        let status = self.executor.execute(program, &args)?;
        if !status.success() {
            return Err(CliError::ToolFailed {
                tool: program.display().to_string(),
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

/// Guesses a Go package name from the output directory name.
///
/// `-` and `.` become `_`; names that are empty or do not start with an ASCII letter
/// fall back to `api`.
pub fn guess_package(dir: &Path) -> String {
    let base = dir
        .file_name()
        .map(|n| n.to_string_lossy().replace(['-', '.'], "_"))
        .unwrap_or_default();
    match base.chars().next() {
        Some(c) if c.is_ascii_alphabetic() => base,
        _ => "api".to_string(),
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .is_some_and(|e| e.to_string_lossy().eq_ignore_ascii_case(ext))
}

fn parent_or_self(path: &Path) -> PathBuf {
    path.parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| path.to_path_buf())
}

fn ensure_parent(path: &Path) -> CliResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
