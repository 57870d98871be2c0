#![deny(missing_docs)]

//! # Component Name Resolution
//!
//! Maps schema / parameter file names to the component names they are registered
//! under, so references written as file paths can be pointed at `#/components/...`.

use crate::error::AppResult;
use crate::fragments::{list_yaml_files, sort_paths, Fragment};
use crate::naming::{strip_yaml_extension, to_pascal_case};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Two files that resolve to the same component name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameCollision {
    /// The shared component name.
    pub name: String,
    /// File that registered the name first.
    pub previous: PathBuf,
    /// File that replaced it.
    pub replacement: PathBuf,
}

/// Lookup table from lower-cased file name (with and without extension) to component name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameMap {
    names: BTreeMap<String, String>,
    owners: BTreeMap<String, PathBuf>,
    collisions: Vec<NameCollision>,
}

impl NameMap {
    /// Scans `dir` for fragments and builds the map in sorted path order.
    ///
    /// A missing directory produces an empty map.
    pub fn scan(dir: &Path) -> AppResult<Self> {
        let mut files = list_yaml_files(dir)?;
        sort_paths(&mut files);
        Ok(Self::from_paths(files.iter().map(PathBuf::as_path)))
    }

    /// Builds the map from already discovered fragments.
    pub fn from_fragments(fragments: &[Fragment]) -> Self {
        Self::from_paths(fragments.iter().map(|f| f.path.as_path()))
    }

    /// Builds the map from file paths. On a component name collision the later path wins.
    pub fn from_paths<'a>(paths: impl IntoIterator<Item = &'a Path>) -> Self {
        let mut map = Self::default();
        for path in paths {
            map.insert(path);
        }
        map
    }

    fn insert(&mut self, path: &Path) {
        let Some(file_name) = path.file_name().map(|n| n.to_string_lossy().into_owned()) else {
            return;
        };
        let base = strip_yaml_extension(&file_name);
        let name = to_pascal_case(base);
        if name.is_empty() {
            return;
        }

        if let Some(previous) = self.owners.insert(name.clone(), path.to_path_buf()) {
            if previous != path {
                tracing::warn!(
                    component = %name,
                    previous = %previous.display(),
                    replacement = %path.display(),
                    "component name collision, later file wins"
                );
                self.collisions.push(NameCollision {
                    name: name.clone(),
                    previous,
                    replacement: path.to_path_buf(),
                });
            }
        }

        self.names.insert(base.to_lowercase(), name.clone());
        self.names.insert(file_name.to_lowercase(), name);
    }

    /// Looks up a file name or stem (case-insensitive).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.names.get(&key.to_lowercase()).map(String::as_str)
    }

    /// Resolves a captured reference name, falling back to PascalCase of the raw text
    /// when the name is unknown.
    pub fn resolve(&self, key: &str) -> String {
        match self.get(key) {
            Some(name) => name.to_string(),
            None => {
                tracing::debug!(reference = key, "unknown component, deriving name directly");
                to_pascal_case(key)
            }
        }
    }

    /// Component names that were registered more than once.
    pub fn collisions(&self) -> &[NameCollision] {
        &self.collisions
    }

    /// Number of distinct lookup keys.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if no names were registered.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
