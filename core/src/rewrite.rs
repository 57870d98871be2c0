#![deny(missing_docs)]

//! # Reference Rewriting
//!
//! Rewrites `$ref` values inside fragment text into internal pointers so the
//! fragment can be inlined into the root document.
//!
//! Recognised forms:
//! - `#/components/...` is already internal and left alone.
//! - `schema:<name>` / `param:<name>` pseudo references.
//! - file paths ending in `schemas/<name>.yaml` or `parameters/<name>.yaml`.
//!
//! Anything else is passed through.
//!
//! The scan is line based and does not parse YAML. A `$ref:` inside a string
//! value or a comment is rewritten as well.

use crate::names::NameMap;
use crate::naming::to_pascal_case;
use regex::Regex;
use std::sync::OnceLock;

const REF_MARKER: &str = "$ref:";
const SCHEMAS_POINTER: &str = "#/components/schemas/";
const PARAMETERS_POINTER: &str = "#/components/parameters/";

/// Classification of the value following a `$ref:` marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceToken {
    /// Already an internal `#/components/...` pointer.
    Canonical(String),
    /// `schema:<name>`.
    PseudoSchema(String),
    /// `param:<name>`.
    PseudoParameter(String),
    /// A file path into a schemas directory; holds the captured file stem.
    SchemaFile(String),
    /// A file path into a parameters directory; holds the captured file stem.
    ParameterFile(String),
    /// Anything else.
    Other(String),
}

impl ReferenceToken {
    /// Classifies a raw `$ref` value. Surrounding whitespace and quotes are removed first.
    pub fn parse(raw: &str) -> Self {
        let value = strip_quotes(raw);

        if value.starts_with("#/components/") {
            return ReferenceToken::Canonical(value.to_string());
        }

        if let Some(rest) = strip_prefix_ignore_case(value, "schema:") {
            return ReferenceToken::PseudoSchema(rest.trim().to_string());
        }
        if let Some(rest) = strip_prefix_ignore_case(value, "param:") {
            return ReferenceToken::PseudoParameter(rest.trim().to_string());
        }

        if let Some(caps) = schema_path_re().captures(value) {
            return ReferenceToken::SchemaFile(caps[1].to_string());
        }
        if let Some(caps) = parameter_path_re().captures(value) {
            return ReferenceToken::ParameterFile(caps[1].to_string());
        }

        ReferenceToken::Other(value.to_string())
    }

    /// Returns the internal pointer this token rewrites to, or `None` to leave the line as is.
    pub fn canonical_pointer(&self, schemas: &NameMap, parameters: &NameMap) -> Option<String> {
        match self {
            ReferenceToken::Canonical(_) | ReferenceToken::Other(_) => None,
            ReferenceToken::PseudoSchema(name) => {
                Some(format!("{SCHEMAS_POINTER}{}", to_pascal_case(name)))
            }
            ReferenceToken::PseudoParameter(name) => {
                Some(format!("{PARAMETERS_POINTER}{}", to_pascal_case(name)))
            }
            ReferenceToken::SchemaFile(stem) => {
                Some(format!("{SCHEMAS_POINTER}{}", schemas.resolve(stem)))
            }
            ReferenceToken::ParameterFile(stem) => {
                Some(format!("{PARAMETERS_POINTER}{}", parameters.resolve(stem)))
            }
        }
    }
}

/// Rewrites every `$ref:` line of `raw`, leaving all other lines untouched.
pub fn rewrite_refs(raw: &str, schemas: &NameMap, parameters: &NameMap) -> String {
    raw.split('\n')
        .map(|line| rewrite_line(line, schemas, parameters))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Rewrites a single line. Text before the marker (indentation, list dash) is kept.
pub fn rewrite_line(line: &str, schemas: &NameMap, parameters: &NameMap) -> String {
    let Some(idx) = line.find(REF_MARKER) else {
        return line.to_string();
    };
    let (left, rest) = line.split_at(idx);
    let value = rest[REF_MARKER.len()..].trim();
    if value.is_empty() {
        return line.to_string();
    }

    match ReferenceToken::parse(value).canonical_pointer(schemas, parameters) {
        Some(pointer) => format!("{left}{REF_MARKER} {pointer}"),
        None => line.to_string(),
    }
}

fn strip_quotes(s: &str) -> &str {
    let s = s.trim();
    let bytes = s.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &s[1..s.len() - 1];
        }
    }
    s
}

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    let head = value.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        Some(&value[prefix.len()..])
    } else {
        None
    }
}

fn schema_path_re() -> &'static Regex {
    static SCHEMA_PATH_RE: OnceLock<Regex> = OnceLock::new();
    SCHEMA_PATH_RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|.*/)(?:components/)?schemas/([^/#\s]+)\.ya?ml$")
            .expect("Invalid regex")
    })
}

fn parameter_path_re() -> &'static Regex {
    static PARAMETER_PATH_RE: OnceLock<Regex> = OnceLock::new();
    PARAMETER_PATH_RE.get_or_init(|| {
        Regex::new(r"(?i)(?:^|.*/)(?:components/)?parameters/([^/#\s]+)\.ya?ml$")
            .expect("Invalid regex")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn maps() -> (NameMap, NameMap) {
        let schemas = NameMap::from_paths([Path::new("/s/components/schemas/user-account.yaml")]);
        let params = NameMap::from_paths([Path::new("/s/components/parameters/page_size.yaml")]);
        (schemas, params)
    }

    #[test]
    fn test_pseudo_references() {
        let (schemas, params) = maps();
        assert_eq!(
            rewrite_line("$ref: schema:user-account", &schemas, &params),
            "$ref: #/components/schemas/UserAccount"
        );
        assert_eq!(
            rewrite_line("$ref: param:user-id", &schemas, &params),
            "$ref: #/components/parameters/UserId"
        );
        assert_eq!(
            rewrite_line("$ref: 'Schema: order'", &schemas, &params),
            "$ref: #/components/schemas/Order"
        );
    }

    #[test]
    fn test_canonical_reference_is_untouched() {
        let (schemas, params) = maps();
        let line = "      $ref: '#/components/schemas/Foo'";
        assert_eq!(rewrite_line(line, &schemas, &params), line);

        let once = rewrite_line("$ref: schema:foo", &schemas, &params);
        assert_eq!(rewrite_line(&once, &schemas, &params), once);
    }

    #[test]
    fn test_file_references_use_name_map() {
        let (schemas, params) = maps();
        assert_eq!(
            rewrite_line(
                "  $ref: \"../../components/schemas/USER-ACCOUNT.yaml\"",
                &schemas,
                &params
            ),
            "  $ref: #/components/schemas/UserAccount"
        );
        assert_eq!(
            rewrite_line("- $ref: ../parameters/page_size.yml", &schemas, &params),
            "- $ref: #/components/parameters/PageSize"
        );
    }

    #[test]
    fn test_unknown_file_reference_falls_back() {
        let (schemas, params) = maps();
        assert_eq!(
            rewrite_line("$ref: schemas/line-item.yaml", &schemas, &params),
            "$ref: #/components/schemas/LineItem"
        );
    }

    #[test]
    fn test_other_forms_pass_through() {
        let (schemas, params) = maps();
        for line in [
            "$ref: https://example.com/openapi.yaml#/components/schemas/X",
            "$ref: ./responses/not-found.yaml",
            "$ref:",
            "type: object",
        ] {
            assert_eq!(rewrite_line(line, &schemas, &params), line);
        }
    }

    #[test]
    fn test_marker_inside_string_is_rewritten_too() {
        let (schemas, params) = maps();
        let text = "description: \"use $ref: schema:pet\"";
        assert_eq!(
            rewrite_line(text, &schemas, &params),
            "description: \"use $ref: #/components/schemas/Pet\""
        );
    }

    #[test]
    fn test_rewrite_preserves_other_lines() {
        let (schemas, params) = maps();
        let raw = "get:\n  parameters:\n    - $ref: param:page-size\n  summary: List\n";
        let expected =
            "get:\n  parameters:\n    - $ref: #/components/parameters/PageSize\n  summary: List\n";
        assert_eq!(rewrite_refs(raw, &schemas, &params), expected);
    }

    #[test]
    fn test_token_classification() {
        assert_eq!(
            ReferenceToken::parse("'#/components/schemas/A'"),
            ReferenceToken::Canonical("#/components/schemas/A".into())
        );
        assert_eq!(
            ReferenceToken::parse("components/parameters/limit.yaml"),
            ReferenceToken::ParameterFile("limit".into())
        );
        assert_eq!(
            ReferenceToken::parse("x.yaml"),
            ReferenceToken::Other("x.yaml".into())
        );
    }
}
