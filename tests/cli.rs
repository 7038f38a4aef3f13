use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn uidlgen() -> Command {
    Command::cargo_bin("uidlgen").unwrap()
}

#[test]
fn test_init_then_generate_project() {
    let dir = TempDir::new().unwrap();

    uidlgen()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success()
        .stderr(predicate::str::contains("uidlgen.toml"));

    assert!(dir.path().join("uidlgen.toml").exists());
    assert!(dir.path().join("project.json").exists());

    uidlgen()
        .current_dir(dir.path())
        .args(["project", "project.json"])
        .assert()
        .success()
        .stderr(predicate::str::contains("src/index.js"));

    let description = fs::read_to_string(dir.path().join("dist/my-app.json")).unwrap();
    let folder: serde_json::Value = serde_json::from_str(&description).unwrap();
    assert_eq!(folder["name"], "my-app");

    let folders: Vec<&str> = folder["subFolders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(folders, vec!["src", "public"]);
    assert!(description.contains("ReactDOM.render(<App />"));
}

#[test]
fn test_unknown_preset_fails() {
    let dir = TempDir::new().unwrap();
    uidlgen()
        .current_dir(dir.path())
        .arg("init")
        .assert()
        .success();

    uidlgen()
        .current_dir(dir.path())
        .args(["project", "project.json", "--preset", "angular"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown strategy preset 'angular'"));
}

#[test]
fn test_component_is_printed() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("nav.json"),
        r#"{
            "name": "Nav Bar",
            "node": {
                "type": "element",
                "content": {
                    "elementType": "navlink",
                    "attrs": { "transitionTo": { "type": "static", "content": "/about" } },
                    "children": [{ "type": "static", "content": "About" }]
                }
            }
        }"#,
    )
    .unwrap();

    uidlgen()
        .current_dir(dir.path())
        .args(["component", "nav.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("// nav-bar.js"))
        .stdout(predicate::str::contains("<Link to=\"/about\">About</Link>"))
        .stderr(predicate::str::contains("react-router-dom"));
}

#[test]
fn test_missing_uidl_file_fails() {
    let dir = TempDir::new().unwrap();
    uidlgen()
        .current_dir(dir.path())
        .args(["project", "missing.json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read UIDL file"));
}
