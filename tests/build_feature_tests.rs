//! Integration tests for feature combinations that must not compile
//!
//! Each test checks the library with a feature set and inspects the
//! compiler's verdict. They run cargo recursively, so they are ignored by
//! default: `cargo test --test build_feature_tests -- --ignored`.

use std::path::PathBuf;
use std::process::{Command, Output};

/// Runs `cargo check` on this crate with the given features
fn check_with_features(features: &str) -> Output {
    let cargo = std::env::var_os("CARGO").unwrap_or_else(|| "cargo".into());
    // A separate target directory keeps the outer build's lock free
    let target_dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("feature-checks");
    Command::new(cargo)
        .args(["check", "--lib", "--offline", "--quiet"])
        .arg("--manifest-path")
        .arg(concat!(env!("CARGO_MANIFEST_DIR"), "/Cargo.toml"))
        .args(["--no-default-features", "--features", features])
        .env("CARGO_TARGET_DIR", target_dir)
        .output()
        .unwrap()
}

#[test]
#[ignore = "runs cargo check"]
fn test_logging_without_hook_fails_to_build() {
    let output = check_with_features("logging");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("To log you have to set a logging function!"),
        "unexpected compiler output:\n{}",
        stderr
    );
}

#[test]
#[ignore = "runs cargo check"]
fn test_both_hooks_fail_to_build() {
    let output = check_with_features("log-stderr,log-tracing");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Select exactly one diagnostic hook"),
        "unexpected compiler output:\n{}",
        stderr
    );
}

#[test]
#[ignore = "runs cargo check"]
fn test_single_hook_builds() {
    for features in ["log-stderr", "log-tracing"] {
        let output = check_with_features(features);
        assert!(
            output.status.success(),
            "{} failed:\n{}",
            features,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}
