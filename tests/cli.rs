//! Integration tests for top-level CLI behavior.

use std::io::Write;
use std::process::Command;

use tempfile::NamedTempFile;

fn run_capslot(args: &[&str]) -> std::process::Output {
    let bin = env!("CARGO_BIN_EXE_capslot");
    Command::new(bin).args(args).output().expect("failed to run capslot binary")
}

fn profile_file(yaml: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp profile");
    file.write_all(yaml.as_bytes()).expect("failed to write temp profile");
    file
}

const STEREO_PROFILE: &str = "
data_sources:
  - name: image
  - name: stereocam
devices:
  - name: camera
    provides: image
tasks:
  - name: StereoCamera
    slots:
      - model: stereocam
        as: stereo
      - model: image
        as: left
        slave_of: stereo
      - model: image
        as: right
        slave_of: stereo
";

#[test]
fn show_prints_models_and_slots() {
    let profile = profile_file(STEREO_PROFILE);
    let output = run_capslot(&["show", profile.path().to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("camera (provides image)"));
    assert!(stdout.contains("stereo: stereocam [stereo_name]"));
    assert!(stdout.contains("stereo.right: image"));
}

#[test]
fn resolve_with_hint_prints_the_path() {
    let profile = profile_file(STEREO_PROFILE);
    let output = run_capslot(&[
        "resolve",
        profile.path().to_str().unwrap(),
        "--task",
        "StereoCamera",
        "--capability",
        "image",
        "--hint",
        "left",
    ]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert_eq!(stdout.trim(), "stereo.left");
}

#[test]
fn ambiguous_resolution_fails_and_reports_candidates_as_json() {
    let profile = profile_file(STEREO_PROFILE);
    let output = run_capslot(&[
        "resolve",
        profile.path().to_str().unwrap(),
        "--task",
        "StereoCamera",
        "--capability",
        "image",
        "--json",
    ]);
    assert!(!output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let report: serde_json::Value = serde_json::from_str(&stdout).expect("report is valid JSON");
    assert_eq!(report["error_kind"], "ambiguous");
    assert_eq!(report["candidates"][0], "stereo.left");
    assert_eq!(report["candidates"][1], "stereo.right");
}

#[test]
fn check_accepts_a_valid_profile() {
    let profile = profile_file(STEREO_PROFILE);
    let output = run_capslot(&["check", profile.path().to_str().unwrap()]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success());
    assert!(stdout.contains("OK: 2 data source(s), 1 device(s), 1 task model(s)"));
}

#[test]
fn check_labels_declaration_errors() {
    let profile = profile_file(
        "
data_sources:
  - name: image
tasks:
  - name: Camera
    slots:
      - model: image
      - model: image
",
    );
    let output = run_capslot(&["check", profile.path().to_str().unwrap()]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("[declaration]"));
    assert!(stderr.contains("already declared"));
}

#[test]
fn resolve_unknown_capability_fails() {
    let profile = profile_file(STEREO_PROFILE);
    let output = run_capslot(&[
        "resolve",
        profile.path().to_str().unwrap(),
        "--task",
        "StereoCamera",
        "--capability",
        "sonar",
    ]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no capability model named `sonar`"));
}
