//! End-to-end tests for the stackform binary.

use assert_cmd::Command;
use predicates::prelude::*;
use stackform::{Environment, ProjectConfig, ServicePatch, ServiceRecord};
use std::fs;
use tempfile::TempDir;

fn stackform() -> Command {
    Command::cargo_bin("stackform").unwrap()
}

fn sample_project() -> ProjectConfig {
    let mut web = ServiceRecord::new("web", "nginx:alpine");
    web.host_port = "8080".to_string();
    web.container_port = "80".to_string();
    web.depends_on = vec!["db".to_string()];

    let db = ServiceRecord::new("db", "postgres:13");

    ProjectConfig {
        base_services: vec![web, db],
        ..Default::default()
    }
}

fn write_project(dir: &TempDir, project: &ProjectConfig) -> std::path::PathBuf {
    let path = dir.path().join("stackform.json");
    fs::write(&path, serde_json::to_string_pretty(project).unwrap()).unwrap();
    path
}

#[test]
fn generate_writes_document_to_stdout() {
    let dir = TempDir::new().unwrap();
    let project = write_project(&dir, &sample_project());

    stackform()
        .args(["generate", "--project"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("services:"))
        .stdout(predicate::str::contains("web:"))
        .stdout(predicate::str::contains("image: nginx:alpine"));
}

#[test]
fn generate_missing_project_is_an_argument_error() {
    stackform()
        .args(["generate", "--project", "/nonexistent/stackform.json"])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn generate_strict_fails_on_invalid_record() {
    let dir = TempDir::new().unwrap();
    let mut project = sample_project();
    project.base_services.push(ServiceRecord::new("", "orphan"));
    let path = write_project(&dir, &project);

    stackform()
        .args(["generate", "--project"])
        .arg(&path)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn generate_lenient_skips_invalid_record() {
    let dir = TempDir::new().unwrap();
    let mut project = sample_project();
    project.base_services.push(ServiceRecord::new("", "orphan"));
    let path = write_project(&dir, &project);

    stackform()
        .args(["generate", "--lenient", "--project"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("web:"))
        .stderr(predicate::str::contains("skipped service"));
}

#[test]
fn generate_with_environment_applies_overlay() {
    let dir = TempDir::new().unwrap();
    let mut project = sample_project();
    let mut staging = Environment::new("staging");
    staging.profile = Some("staging".to_string());
    staging.update_override(
        "web",
        ServicePatch {
            image: Some("nginx:1.27".to_string()),
            ..Default::default()
        },
    );
    project.environments.push(staging);
    let path = write_project(&dir, &project);

    stackform()
        .args(["generate", "--env", "staging", "--project"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("image: nginx:1.27"))
        .stdout(predicate::str::contains("x-profile: staging"));
}

#[test]
fn import_then_generate_round_trips() {
    let dir = TempDir::new().unwrap();
    let compose = dir.path().join("compose.yaml");
    fs::write(
        &compose,
        "services:\n  web:\n    image: nginx:alpine\n    ports:\n      - \"8080:80\"\n",
    )
    .unwrap();
    let project = dir.path().join("stackform.json");

    stackform()
        .arg("import")
        .arg(&compose)
        .args(["--project"])
        .arg(&project)
        .assert()
        .success()
        .stderr(predicate::str::contains("Imported 1 service(s)"));

    stackform()
        .args(["generate", "--project"])
        .arg(&project)
        .assert()
        .success()
        .stdout(predicate::str::contains("image: nginx:alpine"));

    // The source document is untouched.
    let original = fs::read_to_string(&compose).unwrap();
    assert!(original.contains("8080:80"));
}

#[test]
fn import_reports_advanced_features() {
    let dir = TempDir::new().unwrap();
    let compose = dir.path().join("compose.yaml");
    fs::write(
        &compose,
        "services:\n  app:\n    image: myapp:1.0\n    build: .\n",
    )
    .unwrap();

    stackform()
        .arg("import")
        .arg(&compose)
        .args(["--project"])
        .arg(dir.path().join("stackform.json"))
        .assert()
        .success()
        .stderr(predicate::str::contains("advanced features detected: build"));
}

#[test]
fn import_refuses_to_overwrite_without_force() {
    let dir = TempDir::new().unwrap();
    let compose = dir.path().join("compose.yaml");
    fs::write(&compose, "services:\n  web:\n    image: nginx\n").unwrap();
    let project = write_project(&dir, &sample_project());

    stackform()
        .arg("import")
        .arg(&compose)
        .args(["--project"])
        .arg(&project)
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("--force"));
}

#[test]
fn validate_reports_warnings_but_succeeds() {
    let dir = TempDir::new().unwrap();
    let mut project = sample_project();
    project.base_services[1].depends_on = vec!["cache".to_string()];
    let path = write_project(&dir, &project);

    stackform()
        .args(["validate", "--project"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Collection is valid"))
        .stderr(predicate::str::contains("unknown service 'cache'"));
}

#[test]
fn validate_fails_on_duplicate_names() {
    let dir = TempDir::new().unwrap();
    let mut project = sample_project();
    project
        .base_services
        .push(ServiceRecord::new("web", "nginx:alpine"));
    let path = write_project(&dir, &project);

    stackform()
        .args(["validate", "--project"])
        .arg(&path)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("duplicate service name"));
}

#[test]
fn graph_json_reports_edges_and_order() {
    let dir = TempDir::new().unwrap();
    let path = write_project(&dir, &sample_project());

    let output = stackform()
        .args(["graph", "--json", "--project"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(report["edges"][0]["from"], "web");
    assert_eq!(report["edges"][0]["to"], "db");
    assert_eq!(report["start_order"][0], "db");
    assert_eq!(report["cycles"].as_array().unwrap().len(), 0);
}

#[test]
fn graph_warns_about_cycles() {
    let dir = TempDir::new().unwrap();
    let mut project = sample_project();
    project.base_services[1].depends_on = vec!["web".to_string()];
    let path = write_project(&dir, &project);

    stackform()
        .args(["graph", "--project"])
        .arg(&path)
        .assert()
        .success()
        .stderr(predicate::str::contains("dependency cycle: web -> db"))
        .stdout(predicate::str::contains("Start order: unavailable"));
}

#[test]
fn envs_lists_environments() {
    let dir = TempDir::new().unwrap();
    let mut project = sample_project();
    let mut staging = Environment::new("staging");
    staging.update_override(
        "web",
        ServicePatch {
            image: Some("nginx:1.27".to_string()),
            ..Default::default()
        },
    );
    project.environments.push(staging);
    project.default_environment = Some("staging".to_string());
    let path = write_project(&dir, &project);

    stackform()
        .args(["envs", "--project"])
        .arg(&path)
        .assert()
        .success()
        .stdout(predicate::str::contains("base (2 service(s)"))
        .stdout(predicate::str::contains("* staging (1 override(s))"));
}

#[test]
fn template_save_apply_cycle() {
    let dir = TempDir::new().unwrap();
    let data_dir = dir.path().join("data");
    let path = write_project(&dir, &sample_project());

    let output = stackform()
        .args(["--data-dir"])
        .arg(&data_dir)
        .args(["template", "save", "two-tier", "--project"])
        .arg(&path)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let id = String::from_utf8(output).unwrap().trim().to_string();
    assert!(id.starts_with("local-"));

    stackform()
        .args(["--data-dir"])
        .arg(&data_dir)
        .args(["template", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("two-tier"));

    let applied = dir.path().join("applied.json");
    stackform()
        .args(["--data-dir"])
        .arg(&data_dir)
        .args(["template", "apply", &id, "--project"])
        .arg(&applied)
        .assert()
        .success();

    stackform()
        .args(["generate", "--project"])
        .arg(&applied)
        .assert()
        .success()
        .stdout(predicate::str::contains("web:"));
}
