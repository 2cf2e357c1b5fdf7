//! End-to-end tests for the `theme-graph` binary against themes on disk.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

/// A small theme: one JSON template, one section rendering one snippet.
fn theme() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "layout/theme.liquid", "{{ content_for_layout }}");
    write(
        root,
        "templates/index.json",
        r#"{"sections": {"main": {"type": "main"}}, "order": ["main"]}"#,
    );
    write(root, "sections/main.liquid", "{% render 'card' %}");
    write(root, "snippets/card.liquid", "<p>{{ 'card.css' | asset_url }}</p>");
    write(root, "assets/card.css", ".card {}");
    temp
}

fn theme_graph() -> Command {
    let mut cmd = Command::cargo_bin("theme-graph").unwrap();
    cmd.arg("--no-color").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_build_prints_graph_json() {
    let theme = theme();

    let output = theme_graph()
        .arg("build")
        .arg(theme.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let nodes = graph["nodes"].as_array().unwrap();
    let kinds: Vec<&str> = nodes.iter().map(|node| node["kind"].as_str().unwrap()).collect();
    assert!(kinds.contains(&"template"));
    assert!(kinds.contains(&"snippet"));
    assert!(kinds.contains(&"asset"));
    assert!(kinds.contains(&"layout"));
    assert!(!graph["edges"].as_array().unwrap().is_empty());
}

#[test]
fn test_build_writes_json_file() {
    let theme = theme();
    let out = theme.path().join("graph.json");

    theme_graph()
        .arg("build")
        .arg(theme.path())
        .arg("--json")
        .arg(&out)
        .arg("--pretty")
        .assert()
        .success()
        .stderr(predicate::str::contains("Wrote graph to"));

    let contents = fs::read_to_string(&out).unwrap();
    assert!(contents.contains("\n  \"rootUri\""));
}

#[test]
fn test_build_json_into_missing_directory_fails() {
    let theme = theme();
    let out = theme.path().join("missing-dir").join("graph.json");

    theme_graph()
        .arg("build")
        .arg(theme.path())
        .arg("--json")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to write graph to"))
        .stderr(predicate::str::contains("graph.json"));

    assert!(!out.exists());
}

#[test]
fn test_build_dot_output() {
    let theme = theme();

    theme_graph()
        .arg("build")
        .arg(theme.path())
        .arg("--dot")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph ThemeGraph {"))
        .stdout(predicate::str::contains("snippets/card.liquid"));
}

#[test]
fn test_build_with_explicit_entry_point() {
    let theme = theme();

    let output = theme_graph()
        .arg("build")
        .arg(theme.path())
        .args(["--entry", "snippets/card.liquid"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let graph: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // card.liquid and the stylesheet it references
    assert_eq!(graph["nodes"].as_array().unwrap().len(), 2);
}

#[test]
fn test_dead_links_passes_on_a_clean_theme() {
    let theme = theme();

    theme_graph()
        .arg("dead-links")
        .arg(theme.path())
        .assert()
        .success()
        .stderr(predicate::str::contains("No dead links"));
}

#[test]
fn test_dead_links_fails_and_lists_referrers() {
    let theme = theme();
    write(theme.path(), "sections/main.liquid", "{% render 'card' %}{% render 'missing' %}");

    theme_graph()
        .arg("dead-links")
        .arg(theme.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("snippets/missing.liquid"))
        .stdout(predicate::str::contains("referenced by sections/main.liquid [19..41]"))
        .stderr(predicate::str::contains("1 dead link(s) found"));
}

#[test]
fn test_dead_links_json() {
    let theme = theme();
    fs::remove_file(theme.path().join("snippets/card.liquid")).unwrap();

    let output = theme_graph()
        .arg("dead-links")
        .arg(theme.path())
        .arg("--json")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let dead_links: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let dead_links = dead_links.as_array().unwrap();
    assert_eq!(dead_links.len(), 1);
    assert!(dead_links[0]["uri"].as_str().unwrap().ends_with("snippets/card.liquid"));
    assert_eq!(dead_links[0]["referencedBy"].as_array().unwrap().len(), 1);
}

#[test]
fn test_config_file_supplies_root() {
    let theme = theme();
    let work = TempDir::new().unwrap();
    let config = work.path().join("theme-graph.config.json");
    fs::write(
        &config,
        format!(
            r#"{{ "root": {}, "pretty": true }}"#,
            serde_json::to_string(theme.path()).unwrap()
        ),
    )
    .unwrap();

    theme_graph()
        .current_dir(work.path())
        .arg("build")
        .assert()
        .success()
        .stdout(predicate::str::contains("\n  \"nodes\""));
}

#[test]
fn test_missing_root_fails() {
    let temp = TempDir::new().unwrap();

    theme_graph()
        .arg("build")
        .arg(temp.path().join("nope"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("File not found"));
}

#[test]
fn test_missing_config_file_fails() {
    let theme = theme();

    theme_graph()
        .arg("build")
        .arg(theme.path())
        .args(["--config", "does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Config file not found"));
}
