#![deny(missing_docs)]

//! # Path Keys
//!
//! Maps a path fragment's location below the paths root to the URL template it
//! is registered under.
//!
//! `paths/v1/foo/list-items.yaml` -> `/v1/foo/listItems`

use crate::naming::{strip_yaml_extension, to_camel_case};
use std::path::{Component, Path};

/// Derives the path key for `fragment`, relative to `paths_dir`.
///
/// The first directory is the version, further directories pass through as literal
/// route segments and the file stem is camel-cased into the trailing segment.
///
/// Returns an empty string when `fragment` does not live below `paths_dir`;
/// callers treat that as "skip this fragment".
pub fn build_path_key(paths_dir: &Path, fragment: &Path) -> String {
    let Ok(relative) = fragment.strip_prefix(paths_dir) else {
        return String::new();
    };

    let mut segments: Vec<String> = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => segments.push(part.to_string_lossy().into_owned()),
            Component::CurDir => {}
            _ => return String::new(),
        }
    }

    let Some(file) = segments.pop() else {
        return String::new();
    };
    let tail = to_camel_case(strip_yaml_extension(&file));
    if tail.is_empty() {
        return String::new();
    }

    segments.push(tail);
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_versioned_nested_key() {
        let root = Path::new("/spec/paths");
        let key = build_path_key(root, &root.join("v1/foo/list-items.yaml"));
        assert_eq!(key, "/v1/foo/listItems");
    }

    #[test]
    fn test_versioned_flat_key() {
        let root = Path::new("/spec/paths");
        let key = build_path_key(root, &root.join("v1/health-check.yaml"));
        assert_eq!(key, "/v1/healthCheck");
    }

    #[test]
    fn test_unversioned_key() {
        let root = Path::new("/spec/paths");
        assert_eq!(build_path_key(root, &root.join("ping.yml")), "/ping");
    }

    #[test]
    fn test_parameter_directories_pass_through() {
        let root = Path::new("/spec/paths");
        let key = build_path_key(root, &root.join("v2/users/{userId}/get_orders.yaml"));
        assert_eq!(key, "/v2/users/{userId}/getOrders");
    }

    #[test]
    fn test_outside_root_is_skipped() {
        let root = Path::new("/spec/paths");
        assert_eq!(build_path_key(root, Path::new("/other/v1/users.yaml")), "");
        assert_eq!(build_path_key(root, root), "");
    }

    #[test]
    fn test_empty_stem_is_skipped() {
        let root = Path::new("/spec/paths");
        assert_eq!(build_path_key(root, &root.join("v1/-.yaml")), "");
    }
}
