#![deny(missing_docs)]

//! # Fragment Store
//!
//! Discovers OpenAPI fragment files below the fragments root.
//!
//! Expected layout:
//!
//! ```text
//! <input>/paths/<version>/.../<name>.yaml
//! <input>/components/schemas/<name>.yaml
//! <input>/components/parameters/<name>.yaml
//! ```
//!
//! Missing directories are not an error: a spec without parameters simply has none.

use crate::error::AppResult;
use crate::naming::has_yaml_extension;
use std::fmt;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// The role a fragment plays in the composed document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FragmentKind {
    /// Operations for one path, keyed by HTTP method.
    Path,
    /// A reusable schema under `components.schemas`.
    Schema,
    /// A reusable parameter under `components.parameters`.
    Parameter,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Path => write!(f, "path"),
            FragmentKind::Schema => write!(f, "schema"),
            FragmentKind::Parameter => write!(f, "parameter"),
        }
    }
}

/// A discovered fragment file.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Fragment {
    /// Absolute path of the file. Identity of the fragment.
    pub path: PathBuf,
    /// Category derived from the directory it was found in.
    pub kind: FragmentKind,
}

/// Locations of the three fragment categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FragmentLayout {
    /// Root of path fragments (`<input>/paths`).
    pub paths_dir: PathBuf,
    /// Root of schema fragments (`<input>/components/schemas`).
    pub schemas_dir: PathBuf,
    /// Root of parameter fragments (`<input>/components/parameters`).
    pub parameters_dir: PathBuf,
}

impl FragmentLayout {
    /// Builds the conventional layout below a fragments root.
    pub fn from_input_dir(input_dir: &Path) -> Self {
        let components = input_dir.join("components");
        Self {
            paths_dir: input_dir.join("paths"),
            schemas_dir: components.join("schemas"),
            parameters_dir: components.join("parameters"),
        }
    }

    /// Discovers every fragment of every category, each group sorted by path.
    pub fn discover(&self) -> AppResult<FragmentSet> {
        Ok(FragmentSet {
            paths: discover_kind(&self.paths_dir, FragmentKind::Path)?,
            schemas: discover_kind(&self.schemas_dir, FragmentKind::Schema)?,
            parameters: discover_kind(&self.parameters_dir, FragmentKind::Parameter)?,
        })
    }
}

/// All fragments of one run, grouped by category and sorted lexicographically by path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    /// Path-operation fragments.
    pub paths: Vec<Fragment>,
    /// Schema fragments.
    pub schemas: Vec<Fragment>,
    /// Parameter fragments.
    pub parameters: Vec<Fragment>,
}

impl FragmentSet {
    /// Total number of fragments across all categories.
    pub fn len(&self) -> usize {
        self.paths.len() + self.schemas.len() + self.parameters.len()
    }

    /// Returns `true` if nothing was discovered.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn discover_kind(root: &Path, kind: FragmentKind) -> AppResult<Vec<Fragment>> {
    let mut files = list_yaml_files(root)?;
    sort_paths(&mut files);
    tracing::debug!(dir = %root.display(), %kind, count = files.len(), "discovered fragments");
    Ok(files
        .into_iter()
        .map(|path| Fragment { path, kind })
        .collect())
}

/// Lists every `.yaml` / `.yml` regular file below `root`, depth first.
///
/// Files and directories whose name starts with `.` are excluded; dotted
/// directories are pruned with their whole subtree. A missing root (or a root
/// that is not a directory) yields an empty list.
///
/// The returned order follows the walk and is not guaranteed stable; sort it
/// before relying on it.
pub fn list_yaml_files(root: &Path) -> AppResult<Vec<PathBuf>> {
    if !root.is_dir() {
        return Ok(Vec::new());
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if has_yaml_extension(&entry.file_name().to_string_lossy()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Sorts paths by their raw bytes, so `a-b/x` sorts before `a/x`.
pub fn sort_paths(paths: &mut [PathBuf]) {
    paths.sort_by(|a, b| a.as_os_str().cmp(b.as_os_str()));
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "get: {}\n").unwrap();
    }

    #[test]
    fn test_lists_yaml_and_yml_recursively() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("v1/users.yaml"));
        touch(&root.join("v1/admin/roles.YML"));
        touch(&root.join("v1/notes.txt"));

        let mut files = list_yaml_files(root).unwrap();
        files.sort();

        assert_eq!(
            files,
            vec![root.join("v1/admin/roles.YML"), root.join("v1/users.yaml")]
        );
    }

    #[test]
    fn test_prunes_dotted_entries() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join(".git/config.yaml"));
        touch(&root.join("v1/.draft/users.yaml"));
        touch(&root.join("v1/.hidden.yaml"));
        touch(&root.join("v1/visible.yaml"));

        let files = list_yaml_files(root).unwrap();
        assert_eq!(files, vec![root.join("v1/visible.yaml")]);
    }

    #[test]
    fn test_dotted_root_is_still_walked() {
        let dir = tempdir().unwrap();
        let root = dir.path().join(".spec");
        touch(&root.join("users.yaml"));

        let files = list_yaml_files(&root).unwrap();
        assert_eq!(files, vec![root.join("users.yaml")]);
    }

    #[test]
    fn test_missing_root_is_empty() {
        let dir = tempdir().unwrap();
        let files = list_yaml_files(&dir.path().join("nope")).unwrap();
        assert!(files.is_empty());

        let file = dir.path().join("plain.yaml");
        touch(&file);
        assert!(list_yaml_files(&file).unwrap().is_empty());
    }

    #[test]
    fn test_sort_is_bytewise() {
        let mut paths = vec![PathBuf::from("/p/a/x.yaml"), PathBuf::from("/p/a-b/x.yaml")];
        sort_paths(&mut paths);
        assert_eq!(paths[0], PathBuf::from("/p/a-b/x.yaml"));
    }

    #[test]
    fn test_discover_groups_and_sorts() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("paths/v1/zeta.yaml"));
        touch(&root.join("paths/v1/alpha.yaml"));
        touch(&root.join("components/schemas/user.yaml"));

        let layout = FragmentLayout::from_input_dir(root);
        let set = layout.discover().unwrap();

        assert_eq!(set.len(), 3);
        assert_eq!(set.paths[0].path, root.join("paths/v1/alpha.yaml"));
        assert_eq!(set.paths[1].path, root.join("paths/v1/zeta.yaml"));
        assert_eq!(set.schemas[0].kind, FragmentKind::Schema);
        assert!(set.parameters.is_empty());
    }
}
