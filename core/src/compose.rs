#![deny(missing_docs)]

//! # Root Composition
//!
//! Builds the root OpenAPI document from discovered fragments.
//!
//! - **Reference mode**: every entry is a `$ref` to the fragment file, relative to the root document.
//! - **Inline mode**: every entry embeds the fragment content, re-indented, with references
//!   rewritten to `#/components/...` pointers.
//!
//! Groups are emitted paths, schemas, parameters, each sorted by file path, so the output
//! only depends on the set of fragments and their content.

use crate::error::AppResult;
use crate::fragments::{Fragment, FragmentLayout, FragmentSet};
use crate::names::NameMap;
use crate::naming::component_name;
use crate::path_key::build_path_key;
use crate::rewrite::rewrite_refs;
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Header shared by both modes.
const DOCUMENT_HEADER: &str = "openapi: \"3.0.0\"\ninfo:\n  title: API\n  version: \"1.0.0\"\n";

/// Indentation of inlined path item content (below `paths.<key>`).
const PATH_CONTENT_INDENT: usize = 4;

/// Indentation of inlined component content (below `components.<section>.<name>`).
const COMPONENT_CONTENT_INDENT: usize = 6;

/// How fragments are placed into the root document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ComposeMode {
    /// Entries are `$ref` pointers to fragment files.
    #[default]
    Reference,
    /// Entries embed the fragment content.
    Inline,
}

/// Counts of what went into a composed document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ComposeSummary {
    /// Path entries written.
    pub paths: usize,
    /// Schema entries written.
    pub schemas: usize,
    /// Parameter entries written.
    pub parameters: usize,
    /// Fragments skipped because no path key or component name could be derived.
    pub skipped: usize,
}

/// A rendered root document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedRoot {
    /// Full YAML text.
    pub text: String,
    /// What the text contains.
    pub summary: ComposeSummary,
}

/// Discovers fragments under `layout` and renders the root document for `root_path`.
pub fn compose_root(
    layout: &FragmentLayout,
    root_path: &Path,
    mode: ComposeMode,
) -> AppResult<ComposedRoot> {
    let fragments = layout.discover()?;
    match mode {
        ComposeMode::Reference => render_reference_root(layout, &fragments, root_path),
        ComposeMode::Inline => render_inline_root(layout, &fragments),
    }
}

/// Composes the root document and writes it to `root_path`, creating parent directories.
pub fn write_root(
    layout: &FragmentLayout,
    root_path: &Path,
    mode: ComposeMode,
) -> AppResult<ComposeSummary> {
    if let Some(parent) = root_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let composed = compose_root(layout, root_path, mode)?;
    fs::write(root_path, &composed.text)?;

    tracing::info!(
        root = %root_path.display(),
        ?mode,
        paths = composed.summary.paths,
        schemas = composed.summary.schemas,
        parameters = composed.summary.parameters,
        "wrote root document"
    );
    Ok(composed.summary)
}

/// Renders a reference-style root. Fragment content is never read.
pub fn render_reference_root(
    layout: &FragmentLayout,
    fragments: &FragmentSet,
    root_path: &Path,
) -> AppResult<ComposedRoot> {
    let root_dir = root_path.parent().unwrap_or_else(|| Path::new(""));
    let pointer = |fragment: &Fragment, indent: usize| -> AppResult<String> {
        let target = relative_ref(root_dir, &fragment.path);
        Ok(indent_text(&format!("$ref: {target}"), indent))
    };

    let mut composer = DocumentBuilder::new();
    composer.paths(layout, &fragments.paths, |f| pointer(f, PATH_CONTENT_INDENT))?;
    composer.components("schemas", &fragments.schemas, |f| {
        pointer(f, COMPONENT_CONTENT_INDENT)
    })?;
    composer.components("parameters", &fragments.parameters, |f| {
        pointer(f, COMPONENT_CONTENT_INDENT)
    })?;
    Ok(composer.finish())
}

/// Renders an inlined root, reading and rewriting every fragment.
pub fn render_inline_root(
    layout: &FragmentLayout,
    fragments: &FragmentSet,
) -> AppResult<ComposedRoot> {
    let schema_names = NameMap::from_fragments(&fragments.schemas);
    let parameter_names = NameMap::from_fragments(&fragments.parameters);

    let inline = |fragment: &Fragment, indent: usize| -> AppResult<String> {
        let raw = fs::read_to_string(&fragment.path)?;
        let rewritten = rewrite_refs(&raw, &schema_names, &parameter_names);
        Ok(indent_text(&rewritten, indent))
    };

    let mut composer = DocumentBuilder::new();
    composer.paths(layout, &fragments.paths, |f| inline(f, PATH_CONTENT_INDENT))?;
    composer.components("schemas", &fragments.schemas, |f| {
        inline(f, COMPONENT_CONTENT_INDENT)
    })?;
    composer.components("parameters", &fragments.parameters, |f| {
        inline(f, COMPONENT_CONTENT_INDENT)
    })?;
    Ok(composer.finish())
}

/// Accumulates the document text section by section.
struct DocumentBuilder {
    text: String,
    summary: ComposeSummary,
    components_opened: bool,
}

impl DocumentBuilder {
    fn new() -> Self {
        Self {
            text: DOCUMENT_HEADER.to_string(),
            summary: ComposeSummary::default(),
            components_opened: false,
        }
    }

    fn paths(
        &mut self,
        layout: &FragmentLayout,
        fragments: &[Fragment],
        mut body: impl FnMut(&Fragment) -> AppResult<String>,
    ) -> AppResult<()> {
        let mut section = String::new();
        for fragment in fragments {
            let key = build_path_key(&layout.paths_dir, &fragment.path);
            if key.is_empty() {
                tracing::debug!(fragment = %fragment.path.display(), "no path key, skipping");
                self.summary.skipped += 1;
                continue;
            }
            section.push_str(&format!("  {key}:\n"));
            section.push_str(&body(fragment)?);
            self.summary.paths += 1;
        }
        self.push_section("paths", 0, &section);
        Ok(())
    }

    fn components(
        &mut self,
        name: &str,
        fragments: &[Fragment],
        mut body: impl FnMut(&Fragment) -> AppResult<String>,
    ) -> AppResult<()> {
        if !self.components_opened {
            self.text.push_str("components:\n");
            self.components_opened = true;
        }

        let mut section = String::new();
        let mut written = 0;
        for fragment in fragments {
            let component = component_name(&fragment.path);
            if component.is_empty() {
                tracing::debug!(fragment = %fragment.path.display(), "no component name, skipping");
                self.summary.skipped += 1;
                continue;
            }
            section.push_str(&format!("    {component}:\n"));
            section.push_str(&body(fragment)?);
            written += 1;
        }
        match name {
            "schemas" => self.summary.schemas += written,
            _ => self.summary.parameters += written,
        }
        self.push_section(name, 2, &section);
        Ok(())
    }

    fn push_section(&mut self, name: &str, indent: usize, body: &str) {
        let pad = " ".repeat(indent);
        if body.is_empty() {
            self.text.push_str(&format!("{pad}{name}: {{}}\n"));
        } else {
            self.text.push_str(&format!("{pad}{name}:\n{body}"));
        }
    }

    fn finish(self) -> ComposedRoot {
        ComposedRoot {
            text: self.text,
            summary: self.summary,
        }
    }
}

/// Indents every non-empty line by `spaces` and normalizes the end to exactly one newline.
pub fn indent_text(s: &str, spaces: usize) -> String {
    let pad = " ".repeat(spaces);
    let indented = s
        .split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{pad}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    let mut out = indented.trim_end_matches('\n').to_string();
    out.push('\n');
    out
}

/// Expresses `target` relative to `base_dir` in forward-slash form.
///
/// Same-directory-or-below targets get a `./` prefix; results already starting with
/// `.` or `/` are returned unchanged. If no relative form exists (e.g. one path is
/// absolute and the other is not) the target is returned as given.
pub fn relative_ref(base_dir: &Path, target: &Path) -> String {
    let rel = match relative_path(base_dir, target) {
        Some(rel) => to_slash(&rel),
        None => return to_slash(target),
    };
    if rel.is_empty() || rel == "." {
        return "./".to_string();
    }
    if rel.starts_with('.') || rel.starts_with('/') {
        return rel;
    }
    format!("./{rel}")
}

fn relative_path(base: &Path, target: &Path) -> Option<PathBuf> {
    let base = normalize(base);
    let target = normalize(target);
    if base.is_absolute() != target.is_absolute() {
        return None;
    }

    let base_parts: Vec<Component<'_>> = base.components().collect();
    let target_parts: Vec<Component<'_>> = target.components().collect();
    let common = base_parts
        .iter()
        .zip(&target_parts)
        .take_while(|(a, b)| a == b)
        .count();

    // Cannot climb out of an unknown parent or across prefixes.
    if base_parts[common..]
        .iter()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        return None;
    }

    let mut rel = PathBuf::new();
    for _ in common..base_parts.len() {
        rel.push("..");
    }
    for part in &target_parts[common..] {
        rel.push(part.as_os_str());
    }
    Some(rel)
}

/// Lexically cleans a path: drops `.` and resolves `..` against preceding normal components.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().map(|c| c.as_os_str()).collect()
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| match c {
            Component::RootDir => String::new(),
            other => other.as_os_str().to_string_lossy().into_owned(),
        })
        .collect::<Vec<_>>()
        .join("/")
        .replace("//", "/")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_indent_text_trims_trailing_blank_lines() {
        assert_eq!(indent_text("a: 1\n\nb: 2\n\n\n", 4), "    a: 1\n\n    b: 2\n");
        assert_eq!(indent_text("a: 1", 2), "  a: 1\n");
        assert_eq!(indent_text("", 6), "\n");
    }

    #[test]
    fn test_relative_ref_below_root() {
        let base = Path::new("/spec");
        assert_eq!(
            relative_ref(base, Path::new("/spec/paths/v1/users.yaml")),
            "./paths/v1/users.yaml"
        );
    }

    #[test]
    fn test_relative_ref_sibling_tree() {
        let base = Path::new("/out/docs");
        assert_eq!(
            relative_ref(base, Path::new("/spec/paths/v1/users.yaml")),
            "../../spec/paths/v1/users.yaml"
        );
    }

    #[test]
    fn test_relative_ref_same_dir() {
        assert_eq!(relative_ref(Path::new("/spec"), Path::new("/spec")), "./");
    }

    #[test]
    fn test_relative_ref_mixed_kinds_passthrough() {
        assert_eq!(
            relative_ref(Path::new("/spec"), Path::new("paths/users.yaml")),
            "paths/users.yaml"
        );
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/../a")), PathBuf::from("/a"));
        assert_eq!(normalize(Path::new("../a")), PathBuf::from("../a"));
    }

    #[test]
    fn test_reference_root_without_fragments() {
        let layout = FragmentLayout::from_input_dir(Path::new("/spec"));
        let composed =
            render_reference_root(&layout, &FragmentSet::default(), Path::new("/spec/root.yaml"))
                .unwrap();
        let expected = "openapi: \"3.0.0\"\ninfo:\n  title: API\n  version: \"1.0.0\"\n\
paths: {}\ncomponents:\n  schemas: {}\n  parameters: {}\n";
        assert_eq!(composed.text, expected);
        assert_eq!(composed.summary, ComposeSummary::default());
    }

    #[test]
    fn test_reference_root_entries() {
        use crate::fragments::FragmentKind;

        let layout = FragmentLayout::from_input_dir(Path::new("/spec"));
        let fragments = FragmentSet {
            paths: vec![
                Fragment {
                    path: PathBuf::from("/spec/paths/v1/list-users.yaml"),
                    kind: FragmentKind::Path,
                },
                Fragment {
                    path: PathBuf::from("/elsewhere/stray.yaml"),
                    kind: FragmentKind::Path,
                },
            ],
            schemas: vec![Fragment {
                path: PathBuf::from("/spec/components/schemas/user-account.yaml"),
                kind: FragmentKind::Schema,
            }],
            parameters: vec![],
        };

        let composed =
            render_reference_root(&layout, &fragments, Path::new("/spec/root.yaml")).unwrap();
        let expected = "openapi: \"3.0.0\"\ninfo:\n  title: API\n  version: \"1.0.0\"\n\
paths:\n  /v1/listUsers:\n    $ref: ./paths/v1/list-users.yaml\n\
components:\n  schemas:\n    UserAccount:\n      $ref: ./components/schemas/user-account.yaml\n  parameters: {}\n";
        assert_eq!(composed.text, expected);
        assert_eq!(composed.summary.paths, 1);
        assert_eq!(composed.summary.skipped, 1);
        assert_eq!(composed.summary.schemas, 1);
    }

    #[test]
    fn test_unnamed_components_are_skipped() {
        use crate::fragments::FragmentKind;

        let layout = FragmentLayout::from_input_dir(Path::new("/spec"));
        let fragments = FragmentSet {
            paths: vec![Fragment {
                path: PathBuf::from("/spec/paths/v1/-.yaml"),
                kind: FragmentKind::Path,
            }],
            schemas: vec![Fragment {
                path: PathBuf::from("/spec/components/schemas/-.yaml"),
                kind: FragmentKind::Schema,
            }],
            parameters: vec![Fragment {
                path: PathBuf::from("/spec/components/parameters/_.yml"),
                kind: FragmentKind::Parameter,
            }],
        };

        let composed =
            render_reference_root(&layout, &fragments, Path::new("/spec/root.yaml")).unwrap();
        assert!(composed
            .text
            .ends_with("paths: {}\ncomponents:\n  schemas: {}\n  parameters: {}\n"));
        assert_eq!(composed.summary.skipped, 3);
        assert_eq!(composed.summary.schemas, 0);
        assert_eq!(composed.summary.parameters, 0);
    }
}
