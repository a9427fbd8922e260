//! End-to-end tests: generate a crate and verify it compiles.
//!
//! These tests exercise the full pipeline from schema files to compiled code.
//! They are slower than unit tests since they invoke cargo.

use std::path::Path;
use std::process::Command;

use stencil_gen::{GeneratorConfig, Normalizer, generate};
use tempfile::TempDir;

/// Generates the fixture corpus into a temporary crate wired to the local runtime.
fn generate_fixture_crate() -> TempDir {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    let config = GeneratorConfig {
        schema_root: manifest_dir.join("tests/fixtures/corpus"),
        output_root: temp_dir.path().to_path_buf(),
        runtime_path: manifest_dir.parent().map(Path::to_path_buf),
        ..GeneratorConfig::default()
    };
    let report = generate(&config, &Normalizer::new()).expect("Failed to generate code");
    assert_eq!(report.summary.errored, 0, "{:#?}", report.results);

    temp_dir
}

fn cargo(args: &[&str], crate_dir: &Path) {
    let output = Command::new("cargo")
        .args(args)
        .arg("--manifest-path")
        .arg(crate_dir.join("Cargo.toml"))
        .output()
        .expect("Failed to run cargo");

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        panic!(
            "cargo {} failed on generated code:\n\nSTDOUT:\n{}\n\nSTDERR:\n{}",
            args.join(" "),
            stdout,
            stderr
        );
    }
}

/// Tests that generated code compiles successfully.
#[test]
#[ignore = "slow: compiles generated code"]
fn generated_code_compiles() {
    let temp_dir = generate_fixture_crate();
    cargo(&["check", "--all-targets"], temp_dir.path());
}

/// Tests that the generated smoke tests pass against the mock transport.
#[test]
#[ignore = "slow: compiles and runs generated tests"]
fn generated_smoke_tests_pass() {
    let temp_dir = generate_fixture_crate();
    cargo(&["test"], temp_dir.path());
}
