#![deny(missing_docs)]

//! # Validation Rules
//!
//! Each built-in check is a unit struct implementing [`ValidationRule`].
//! A rule sees one operation at a time: the path key, the method key as written
//! in the fragment, and the operation mapping.

use regex::Regex;
use serde_yaml::{Mapping, Value};
use std::sync::OnceLock;

/// HTTP methods accepted as operation keys.
pub const ALLOWED_METHODS: [&str; 7] = ["get", "post", "put", "patch", "delete", "head", "options"];

/// Nouns that must appear pluralized when used as collection segments.
pub const SINGULAR_NOUNS: [&str; 24] = [
    "account",
    "user",
    "mission",
    "reward",
    "partner",
    "activity",
    "car",
    "member",
    "order",
    "product",
    "service",
    "item",
    "category",
    "group",
    "role",
    "permission",
    "resource",
    "entity",
    "record",
    "document",
    "file",
    "image",
    "video",
    "comment",
];

/// Path parameter names always accepted by the identifier rule.
pub const KNOWN_ID_PARAMS: [&str; 9] = [
    "id",
    "userId",
    "accountId",
    "missionId",
    "partnerId",
    "carId",
    "activityId",
    "rewardId",
    "memberId",
];

/// A named check applied to every operation.
pub trait ValidationRule: Send + Sync {
    /// Stable identifier reported with every violation (e.g. `operation-id-present`).
    fn name(&self) -> &'static str;

    /// Human readable description used when listing presets.
    fn description(&self) -> &'static str;

    /// Evaluates the rule. `Some(message)` describes a violation.
    fn evaluate(&self, path: &str, method: &str, operation: &Mapping) -> Option<String>;
}

/// Operation keys must be standard HTTP methods.
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpMethodsRest;

impl ValidationRule for HttpMethodsRest {
    fn name(&self) -> &'static str {
        "http-methods-rest"
    }

    fn description(&self) -> &'static str {
        "Use standard HTTP methods (GET, POST, PUT, PATCH, DELETE)"
    }

    fn evaluate(&self, _path: &str, method: &str, _operation: &Mapping) -> Option<String> {
        let lower = method.to_lowercase();
        if ALLOWED_METHODS.contains(&lower.as_str()) {
            return None;
        }
        Some(format!(
            "invalid HTTP method '{}', should be one of: GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS",
            method
        ))
    }
}

/// Collection segments must not be known singular nouns.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectionNamesPlural;

impl ValidationRule for CollectionNamesPlural {
    fn name(&self) -> &'static str {
        "collection-names-plural"
    }

    fn description(&self) -> &'static str {
        "Collection names should be plural nouns"
    }

    fn evaluate(&self, path: &str, _method: &str, _operation: &Mapping) -> Option<String> {
        for segment in path_segments(path) {
            if is_path_param(segment) || is_version_segment(segment) {
                continue;
            }
            let lower = segment.to_lowercase();
            if let Some(singular) = SINGULAR_NOUNS.iter().find(|s| **s == lower) {
                return Some(format!(
                    "collection name '{}' should be plural: '{}'",
                    segment,
                    make_plural(singular)
                ));
            }
        }
        None
    }
}

/// Literal path segments must be kebab-case.
#[derive(Debug, Clone, Copy, Default)]
pub struct PathCaseKebab;

impl ValidationRule for PathCaseKebab {
    fn name(&self) -> &'static str {
        "path-case-kebab"
    }

    fn description(&self) -> &'static str {
        "Path segments should use kebab-case (lowercase with dashes)"
    }

    fn evaluate(&self, path: &str, _method: &str, _operation: &Mapping) -> Option<String> {
        path_segments(path)
            .find(|segment| {
                !(is_path_param(segment) || is_version_segment(segment) || is_kebab(segment))
            })
            .map(|segment| {
                format!(
                    "path segment '{}' should use kebab-case (lowercase with dashes)",
                    segment
                )
            })
    }
}

/// Paths other than `/` must not end in a slash.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTrailingSlash;

impl ValidationRule for NoTrailingSlash {
    fn name(&self) -> &'static str {
        "no-trailing-slash"
    }

    fn description(&self) -> &'static str {
        "Paths should not have trailing slashes"
    }

    fn evaluate(&self, path: &str, _method: &str, _operation: &Mapping) -> Option<String> {
        if path.len() > 1 && path.ends_with('/') {
            return Some("path should not have trailing slash".to_string());
        }
        None
    }
}

/// Operations must carry an `operationId`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationIdPresent;

impl ValidationRule for OperationIdPresent {
    fn name(&self) -> &'static str {
        "operation-id-present"
    }

    fn description(&self) -> &'static str {
        "All operations should have operationId"
    }

    fn evaluate(&self, _path: &str, _method: &str, operation: &Mapping) -> Option<String> {
        if operation.contains_key("operationId") {
            return None;
        }
        Some("operation should have operationId".to_string())
    }
}

/// Operations must carry a `summary`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OperationSummaryPresent;

impl ValidationRule for OperationSummaryPresent {
    fn name(&self) -> &'static str {
        "operation-summary-present"
    }

    fn description(&self) -> &'static str {
        "All operations should have summary"
    }

    fn evaluate(&self, _path: &str, _method: &str, operation: &Mapping) -> Option<String> {
        if operation.contains_key("summary") {
            return None;
        }
        Some("operation should have summary".to_string())
    }
}

/// GET operations must declare a `200` response.
#[derive(Debug, Clone, Copy, Default)]
pub struct Response200Present;

impl ValidationRule for Response200Present {
    fn name(&self) -> &'static str {
        "response-200-present"
    }

    fn description(&self) -> &'static str {
        "GET operations should have 200 response"
    }

    fn evaluate(&self, _path: &str, method: &str, operation: &Mapping) -> Option<String> {
        if !method.eq_ignore_ascii_case("get") {
            return None;
        }
        let Some(responses) = operation.get("responses").and_then(Value::as_mapping) else {
            return Some("GET operation should have responses defined".to_string());
        };
        // `200:` parses as a number key, `'200':` as a string key.
        if responses.keys().any(|key| key_as_string(key).as_deref() == Some("200")) {
            return None;
        }
        Some("GET operation should have 200 response".to_string())
    }
}

/// Path parameters must be `id`, end in `Id`, or be a known identifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResourceIdParam;

impl ValidationRule for ResourceIdParam {
    fn name(&self) -> &'static str {
        "resource-id-param"
    }

    fn description(&self) -> &'static str {
        "Resource paths should use {id} parameter naming"
    }

    fn evaluate(&self, path: &str, _method: &str, _operation: &Mapping) -> Option<String> {
        path_param_re()
            .captures_iter(path)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .find(|name| !is_valid_param_name(name))
            .map(|name| {
                format!(
                    "parameter '{{{}}}' should follow naming convention (consider using {{id}} for resource identifiers)",
                    name
                )
            })
    }
}

/// Suggests the plural form of a noun.
///
/// `y` -> `ies`; `s`, `ch`, `sh` -> `+es`; anything else -> `+s`.
pub fn make_plural(word: &str) -> String {
    if let Some(stem) = word.strip_suffix('y') {
        format!("{stem}ies")
    } else if word.ends_with('s') || word.ends_with("ch") || word.ends_with("sh") {
        format!("{word}es")
    } else {
        format!("{word}s")
    }
}

/// Returns `true` if `name` is an acceptable path parameter name.
pub fn is_valid_param_name(name: &str) -> bool {
    if KNOWN_ID_PARAMS.contains(&name) {
        return true;
    }
    name.len() > 2 && name.ends_with("Id")
}

/// Stringifies scalar mapping keys. Operation and status keys may be numbers or booleans.
pub(crate) fn key_as_string(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn path_segments(path: &str) -> impl Iterator<Item = &str> {
    path.trim_matches('/').split('/').filter(|s| !s.is_empty())
}

fn is_path_param(segment: &str) -> bool {
    segment.starts_with('{') && segment.ends_with('}')
}

fn is_version_segment(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

fn is_kebab(segment: &str) -> bool {
    static KEBAB_RE: OnceLock<Regex> = OnceLock::new();
    KEBAB_RE
        .get_or_init(|| Regex::new(r"^[a-z0-9]+(-[a-z0-9]+)*$").expect("Invalid regex"))
        .is_match(segment)
}

fn path_param_re() -> &'static Regex {
    static PATH_PARAM_RE: OnceLock<Regex> = OnceLock::new();
    PATH_PARAM_RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("Invalid regex"))
}
