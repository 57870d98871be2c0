#![deny(missing_docs)]

//! # Run Configuration
//!
//! Turns raw user input (flags, environment) into an absolute, fully defaulted
//! [`IndexerConfig`].

use crate::compose::{normalize, ComposeMode};
use crate::error::{AppError, AppResult};
use crate::fragments::FragmentLayout;
use std::path::{Path, PathBuf};

/// Root document file name used when none is given.
pub const DEFAULT_ROOT_FILE: &str = "root.yaml";

/// Generator used for TypeScript output when none is given.
pub const DEFAULT_TS_GENERATOR: &str = "typescript-fetch";

/// Generator used for Go output when none is given.
pub const DEFAULT_GO_GENERATOR: &str = "go";

/// Unresolved settings as the user typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawConfig {
    /// Fragments root (required).
    pub input: Option<String>,
    /// Directory for the root document; defaults to the input.
    pub output: Option<String>,
    /// Root document file name.
    pub root: Option<String>,
    /// TypeScript output path.
    pub output_ts: Option<String>,
    /// Go output path.
    pub output_go: Option<String>,
    /// HTML documentation output path.
    pub docs_html: Option<String>,
    /// Bundled spec output path.
    pub bundle: Option<String>,
    /// Bundler / renderer configuration file.
    pub redocly_config: Option<String>,
    /// Generator name for TypeScript.
    pub ts_generator: Option<String>,
    /// Generator name for Go.
    pub go_generator: Option<String>,
    /// Write an inlined root instead of a reference root.
    pub join: bool,
    /// Default the bundle and docs outputs under `dist/`.
    pub all: bool,
    /// Validation preset key.
    pub validate: Option<String>,
    /// Skip validation even if a preset is given.
    pub skip_validation: bool,
    /// Stop validation at the first violation.
    pub stop_on_error: bool,
}

/// Validation settings of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationSettings {
    /// Preset key.
    pub preset: String,
    /// Stop at the first violation.
    pub stop_on_error: bool,
}

/// Fully resolved configuration. Every path is absolute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexerConfig {
    /// Working directory the run was resolved against.
    pub cwd: PathBuf,
    /// Fragments root.
    pub input_dir: PathBuf,
    /// Directory holding the root document.
    pub output_dir: PathBuf,
    /// Root document file name.
    pub root_file: String,
    /// Root document path.
    pub root_path: PathBuf,
    /// Fragment directories below the input.
    pub layout: FragmentLayout,
    /// TypeScript output.
    pub output_ts: Option<PathBuf>,
    /// Go output.
    pub output_go: Option<PathBuf>,
    /// HTML documentation output.
    pub docs_html: Option<PathBuf>,
    /// Bundled spec output.
    pub bundle: Option<PathBuf>,
    /// Bundler / renderer configuration file.
    pub redocly_config: Option<PathBuf>,
    /// Generator name for TypeScript.
    pub ts_generator: String,
    /// Generator name for Go.
    pub go_generator: String,
    /// Root composition mode.
    pub mode: ComposeMode,
    /// Validation settings, if validation should run.
    pub validation: Option<ValidationSettings>,
}

impl IndexerConfig {
    /// Resolves `raw` against `cwd`.
    ///
    /// Fails with [`AppError::Config`] when no input directory is given.
    pub fn resolve(raw: &RawConfig, cwd: &Path) -> AppResult<Self> {
        let input = non_empty(raw.input.as_deref())
            .ok_or_else(|| AppError::Config("missing required flag: --input is required".into()))?;
        let input_dir = absolutize(cwd, input);
        let output_dir = non_empty(raw.output.as_deref())
            .map(|o| absolutize(cwd, o))
            .unwrap_or_else(|| input_dir.clone());
        let root_file = non_empty(raw.root.as_deref())
            .unwrap_or(DEFAULT_ROOT_FILE)
            .to_string();
        let root_path = absolutize(&output_dir, &root_file);

        let redocly_config = match non_empty(raw.redocly_config.as_deref()) {
            Some(path) => Some(absolutize(cwd, path)),
            None => {
                let default = cwd.join("redocly.yaml");
                default.is_file().then_some(default)
            }
        };

        let mut bundle = non_empty(raw.bundle.as_deref()).map(|p| absolutize(cwd, p));
        let mut docs_html = non_empty(raw.docs_html.as_deref()).map(|p| absolutize(cwd, p));
        if raw.all {
            bundle.get_or_insert_with(|| absolutize(cwd, "dist/openapi.yaml"));
            docs_html.get_or_insert_with(|| absolutize(cwd, "dist/index.html"));
        }

        let validation = match non_empty(raw.validate.as_deref()) {
            Some(preset) if !raw.skip_validation => Some(ValidationSettings {
                preset: preset.to_string(),
                stop_on_error: raw.stop_on_error,
            }),
            _ => None,
        };

        Ok(Self {
            cwd: cwd.to_path_buf(),
            layout: FragmentLayout::from_input_dir(&input_dir),
            input_dir,
            output_dir,
            root_file,
            root_path,
            output_ts: non_empty(raw.output_ts.as_deref()).map(|p| absolutize(cwd, p)),
            output_go: non_empty(raw.output_go.as_deref()).map(|p| absolutize(cwd, p)),
            docs_html,
            bundle,
            redocly_config,
            ts_generator: non_empty(raw.ts_generator.as_deref())
                .unwrap_or(DEFAULT_TS_GENERATOR)
                .to_string(),
            go_generator: non_empty(raw.go_generator.as_deref())
                .unwrap_or(DEFAULT_GO_GENERATOR)
                .to_string(),
            mode: if raw.join {
                ComposeMode::Inline
            } else {
                ComposeMode::Reference
            },
            validation,
        })
    }
}

/// Joins `path` onto `base` unless it is already absolute, then cleans it lexically.
pub fn absolutize(base: &Path, path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.is_absolute() {
        normalize(path)
    } else {
        normalize(&base.join(path))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
