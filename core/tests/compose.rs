use oas_indexer_core::{compose_root, write_root, ComposeMode, FragmentLayout};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn sample_spec(root: &Path) {
    write(
        root,
        "paths/v1/users/list-users.yaml",
        "get:\n  operationId: listUsers\n  parameters:\n    - $ref: param:page-size\n  responses:\n    200:\n      content:\n        application/json:\n          schema:\n            $ref: ../../../components/schemas/user-account.yaml\n\n\n",
    );
    write(root, "paths/v1/health-check.yaml", "get:\n  summary: Health\n");
    write(
        root,
        "components/schemas/user-account.yaml",
        "type: object\nproperties:\n  owner:\n    $ref: schema:user\n",
    );
    write(root, "components/parameters/page-size.yaml", "name: pageSize\nin: query\n");
    write(root, "paths/.drafts/v1/ignored.yaml", "get: {}\n");
    write(root, "paths/v1/README.md", "not a fragment\n");
}

#[test]
fn test_reference_root_document() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_spec(root);

    let layout = FragmentLayout::from_input_dir(root);
    let composed = compose_root(&layout, &root.join("root.yaml"), ComposeMode::Reference).unwrap();

    let expected = r#"openapi: "3.0.0"
info:
  title: API
  version: "1.0.0"
paths:
  /v1/healthCheck:
    $ref: ./paths/v1/health-check.yaml
  /v1/users/listUsers:
    $ref: ./paths/v1/users/list-users.yaml
components:
  schemas:
    UserAccount:
      $ref: ./components/schemas/user-account.yaml
  parameters:
    PageSize:
      $ref: ./components/parameters/page-size.yaml
"#;
    assert_eq!(composed.text, expected);
    assert_eq!(composed.summary.paths, 2);
}

#[test]
fn test_reference_root_in_other_directory() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().join("spec");
    sample_spec(&root);

    let layout = FragmentLayout::from_input_dir(&root);
    let root_path = dir.path().join("dist/root.yaml");
    let composed = compose_root(&layout, &root_path, ComposeMode::Reference).unwrap();

    assert!(composed
        .text
        .contains("    $ref: ../spec/paths/v1/health-check.yaml\n"));
}

#[test]
fn test_inline_root_document() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();
    sample_spec(root);

    let layout = FragmentLayout::from_input_dir(root);
    let composed = compose_root(&layout, &root.join("root.yaml"), ComposeMode::Inline).unwrap();

    let expected = r#"openapi: "3.0.0"
info:
  title: API
  version: "1.0.0"
paths:
  /v1/healthCheck:
    get:
      summary: Health
  /v1/users/listUsers:
    get:
      operationId: listUsers
      parameters:
        - $ref: #/components/parameters/PageSize
      responses:
        200:
          content:
            application/json:
              schema:
                $ref: #/components/schemas/UserAccount
components:
  schemas:
    UserAccount:
      type: object
      properties:
        owner:
          $ref: #/components/schemas/User
  parameters:
    PageSize:
      name: pageSize
      in: query
"#;
    assert_eq!(composed.text, expected);
}

#[test]
fn test_output_independent_of_creation_order() {
    let first = tempfile::tempdir().unwrap();
    let second = tempfile::tempdir().unwrap();

    let files = [
        ("paths/v1/orders.yaml", "get:\n  summary: Orders\n"),
        ("paths/v1/accounts.yaml", "get:\n  summary: Accounts\n"),
        ("paths/v2/accounts/export.yaml", "post:\n  summary: Export\n"),
        ("components/schemas/order.yaml", "type: object\n"),
        ("components/schemas/account.yaml", "type: object\n"),
    ];
    for (rel, content) in files.iter() {
        write(first.path(), rel, content);
    }
    for (rel, content) in files.iter().rev() {
        write(second.path(), rel, content);
    }

    for mode in [ComposeMode::Reference, ComposeMode::Inline] {
        let a = compose_root(
            &FragmentLayout::from_input_dir(first.path()),
            &first.path().join("root.yaml"),
            mode,
        )
        .unwrap();
        let b = compose_root(
            &FragmentLayout::from_input_dir(second.path()),
            &second.path().join("root.yaml"),
            mode,
        )
        .unwrap();
        assert_eq!(a.text, b.text);
    }
}

#[test]
fn test_missing_component_dirs_give_empty_maps() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "paths/v1/users.yaml", "get: {}\n");

    let layout = FragmentLayout::from_input_dir(dir.path());
    let composed =
        compose_root(&layout, &dir.path().join("root.yaml"), ComposeMode::Inline).unwrap();

    assert!(composed
        .text
        .ends_with("components:\n  schemas: {}\n  parameters: {}\n"));
    assert_eq!(composed.summary.parameters, 0);
}

#[test]
fn test_empty_component_dirs_give_empty_maps() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "paths/v1/users.yaml", "get: {}\n");
    fs::create_dir_all(dir.path().join("components/schemas")).unwrap();
    write(dir.path(), "components/parameters/.draft.yaml", "in: query\n");
    write(dir.path(), "components/parameters/.wip/page.yaml", "in: query\n");

    let layout = FragmentLayout::from_input_dir(dir.path());
    for mode in [ComposeMode::Reference, ComposeMode::Inline] {
        let composed = compose_root(&layout, &dir.path().join("root.yaml"), mode).unwrap();
        assert!(composed
            .text
            .ends_with("components:\n  schemas: {}\n  parameters: {}\n"));
        assert_eq!(composed.summary.schemas, 0);
        assert_eq!(composed.summary.parameters, 0);
    }
}

#[test]
fn test_write_root_creates_parent_dirs() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("spec");
    write(&input, "paths/v1/users.yaml", "get: {}\n");

    let root_path = dir.path().join("out/nested/root.yaml");
    let summary = write_root(
        &FragmentLayout::from_input_dir(&input),
        &root_path,
        ComposeMode::Reference,
    )
    .unwrap();

    assert_eq!(summary.paths, 1);
    let text = fs::read_to_string(&root_path).unwrap();
    assert!(text.contains("  /v1/users:\n    $ref: ../../spec/paths/v1/users.yaml\n"));
}
