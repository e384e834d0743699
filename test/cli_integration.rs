//! CLI Integration Tests for Bindforge
//!
//! Runs the built binary against the fixture models and checks exit status,
//! output and written files.

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

fn bindforge(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bindforge"))
        .args(args)
        .output()
        .expect("Failed to run bindforge")
}

fn fixture(name: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("test")
        .join("fixtures")
        .join(name)
        .to_string_lossy()
        .into_owned()
}

/// Get a temp directory for test outputs
fn temp_dir(name: &str) -> PathBuf {
    let path = std::env::temp_dir()
        .join("bindforge_tests")
        .join(format!("{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&path);
    fs::create_dir_all(&path).ok();
    path
}

#[test]
fn test_check_valid_model() {
    let output = bindforge(&["check", &fixture("geometry.json")]);
    assert!(
        output.status.success(),
        "check failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Geometry Library (Geo) is valid: 2 classes, 6 class methods, 4 global methods"));
}

#[test]
fn test_check_missing_model() {
    let output = bindforge(&["check", "/nonexistent/model.json"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to load model"));
}

#[test]
fn test_symbols_in_table_order() {
    let output = bindforge(&["symbols", &fixture("geometry.json")]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.first(), Some(&"geo_circle_setradius"));
    assert_eq!(lines.last(), Some(&"geo_render_Ex"));
    assert_eq!(lines.len(), 10);
}

#[test]
fn test_symbols_against_missing_library() {
    let output = bindforge(&[
        "symbols",
        &fixture("geometry.json"),
        "--library",
        "/nonexistent/libgeo.so",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("result code 6"));
}

#[test]
fn test_generate_selected_target() {
    let out = temp_dir("generate-c");
    let output = bindforge(&[
        "generate",
        &fixture("geometry.json"),
        "-o",
        out.to_str().unwrap(),
        "--target",
        "c",
    ]);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(out.join("geo_types.h").exists());
    assert!(out.join("geo.h").exists());
    assert!(!out.join("geo_dynamic.hpp").exists());
}

#[test]
fn test_generate_all_targets() {
    let out = temp_dir("generate-all");
    let output = bindforge(&[
        "generate",
        &fixture("geometry.json"),
        "-o",
        out.to_str().unwrap(),
        "--target",
        "all",
    ]);
    assert!(output.status.success());
    for name in ["geo_types.h", "geo.h", "geo_dynamic.h", "geo_dynamic.cc", "geo_dynamic.hpp"] {
        assert!(out.join(name).exists(), "missing {}", name);
    }
    let wrapper = fs::read_to_string(out.join("geo_dynamic.hpp")).unwrap();
    assert!(wrapper.contains("class CGeoWrapper"));
}

#[test]
fn test_generate_unknown_target() {
    let out = temp_dir("generate-bad");
    let output = bindforge(&[
        "generate",
        &fixture("geometry.json"),
        "-o",
        out.to_str().unwrap(),
        "--target",
        "python",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("python"));
}

fn generate_with_log_env(name: &str, rust_log: Option<&str>) -> Output {
    let out = temp_dir(name);
    let mut command = Command::new(env!("CARGO_BIN_EXE_bindforge"));
    command
        .args(["generate", &fixture("geometry.json"), "-o"])
        .arg(&out)
        .args(["--target", "c"]);
    match rust_log {
        Some(value) => command.env("RUST_LOG", value),
        None => command.env_remove("RUST_LOG"),
    };
    command.output().expect("Failed to run bindforge")
}

#[test]
fn test_info_logging_by_default() {
    let output = generate_with_log_env("log-default", None);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Creating"));
}

#[test]
fn test_rust_log_overrides_default_level() {
    let output = generate_with_log_env("log-warn", Some("warn"));
    assert!(output.status.success());
    assert!(!String::from_utf8_lossy(&output.stderr).contains("Creating"));
}
