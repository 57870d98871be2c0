#![deny(missing_docs)]

//! # Naming Utilities
//!
//! Helpers for turning fragment filenames into path segments and component names.
//!
//! - `user-account` -> `userAccount` (path segment)
//! - `user-account` -> `UserAccount` (component name)

use std::path::Path;

/// Strips a trailing `.yaml` / `.yml` extension (case-insensitive) from a file name.
pub fn strip_yaml_extension(file_name: &str) -> &str {
    let lower = file_name.to_ascii_lowercase();
    for ext in [".yaml", ".yml"] {
        if lower.ends_with(ext) {
            return &file_name[..file_name.len() - ext.len()];
        }
    }
    file_name
}

/// Returns `true` if the file name carries a YAML extension (case-insensitive).
pub fn has_yaml_extension(file_name: &str) -> bool {
    strip_yaml_extension(file_name).len() != file_name.len()
}

/// Converts a kebab/snake/space separated string to camelCase.
///
/// Separators (`-`, `_`, ` `) are dropped and the following character is upper-cased.
/// Every other character passes through untouched, so `listItems` stays `listItems`.
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if matches!(c, '-' | '_' | ' ') {
            upper_next = true;
            continue;
        }
        if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Converts a string to PascalCase: camel-case it, then capitalize the first character.
pub fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => camel,
    }
}

/// Derives the component name registered for a schema or parameter fragment.
///
/// `components/schemas/user-account.yaml` -> `UserAccount`
pub fn component_name(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_default();
    to_pascal_case(strip_yaml_extension(&file_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_conversion() {
        assert_eq!(to_camel_case("list-items"), "listItems");
        assert_eq!(to_camel_case("health_check"), "healthCheck");
        assert_eq!(to_camel_case("get user"), "getUser");
        assert_eq!(to_camel_case("already"), "already");
        assert_eq!(to_camel_case("trailing-"), "trailing");
    }

    #[test]
    fn test_pascal_case_is_idempotent() {
        assert_eq!(to_pascal_case("user-account"), "UserAccount");
        assert_eq!(to_pascal_case("UserAccount"), "UserAccount");
        assert_eq!(to_pascal_case(&to_pascal_case("user_id")), "UserId");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_strip_yaml_extension() {
        assert_eq!(strip_yaml_extension("user.yaml"), "user");
        assert_eq!(strip_yaml_extension("user.YML"), "user");
        assert_eq!(strip_yaml_extension("user.json"), "user.json");
        assert!(has_yaml_extension("Pet.Yaml"));
        assert!(!has_yaml_extension("README.md"));
    }

    #[test]
    fn test_component_name_from_path() {
        let path = Path::new("/spec/components/schemas/user-account.yaml");
        assert_eq!(component_name(path), "UserAccount");
    }
}
