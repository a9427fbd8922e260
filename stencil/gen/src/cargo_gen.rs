//! Cargo.toml generation for the output package.
//!
//! The generated crate depends on `serde` and the `stencil` runtime only.
//! It declares an empty `[workspace]` so it builds on its own even when the
//! output directory sits inside another workspace.

use std::path::Path;

use crate::errors::GeneratorError;
use crate::output::write_atomic;

/// Version requirement used when the runtime is not taken from a path.
const RUNTIME_VERSION: &str = "0.1";

/// Renders the manifest of the generated crate.
///
/// ## Arguments
///
/// * `crate_name` - Package name of the generated crate
/// * `runtime_path` - Local path of the `stencil` runtime; a registry
///   version requirement is used when `None`
///
/// ## Examples
///
/// ```
/// use stencil_gen::cargo_gen::cargo_toml;
///
/// let manifest = cargo_toml("stencil-api", None);
/// assert!(manifest.contains("name = \"stencil-api\""));
/// assert!(manifest.contains("stencil = \"0.1\""));
/// ```
pub fn cargo_toml(crate_name: &str, runtime_path: Option<&Path>) -> String {
    let runtime = match runtime_path {
        // Debug formatting quotes and escapes the path
        Some(path) => format!("stencil = {{ path = {:?} }}", path.display().to_string()),
        None => format!("stencil = \"{RUNTIME_VERSION}\""),
    };

    format!(
        r#"# This file was automatically generated by stencil-gen. Do not edit manually.

[package]
name = "{crate_name}"
version = "0.1.0"
edition = "2024"
publish = false

[dependencies]
serde = {{ version = "1.0", features = ["derive"] }}
{runtime}

[workspace]
"#
    )
}

/// Writes `Cargo.toml` into `output_root`.
///
/// In dry-run mode the manifest is printed to stdout instead.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] if the file cannot be written.
pub fn write_cargo_toml(
    output_root: &Path,
    crate_name: &str,
    runtime_path: Option<&Path>,
    dry_run: bool,
) -> Result<(), GeneratorError> {
    let manifest = cargo_toml(crate_name, runtime_path);
    if dry_run {
        println!("{manifest}");
        return Ok(());
    }
    write_atomic(&output_root.join("Cargo.toml"), &manifest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn manifest_with_runtime_path_parses() {
        let manifest = cargo_toml("my-api", Some(Path::new("/opt/stencil")));
        let value: toml::Value = toml::from_str(&manifest).unwrap();

        assert_eq!(value["package"]["name"].as_str(), Some("my-api"));
        assert_eq!(value["package"]["edition"].as_str(), Some("2024"));
        assert_eq!(
            value["dependencies"]["stencil"]["path"].as_str(),
            Some("/opt/stencil")
        );
        assert!(value["dependencies"]["serde"]["features"]
            .as_array()
            .unwrap()
            .iter()
            .any(|f| f.as_str() == Some("derive")));
        assert!(value["workspace"].as_table().unwrap().is_empty());
    }

    #[test]
    fn manifest_escapes_quotes_in_path() {
        let manifest = cargo_toml("my-api", Some(Path::new("/tmp/a\"b")));
        let value: toml::Value = toml::from_str(&manifest).unwrap();
        assert_eq!(value["dependencies"]["stencil"]["path"].as_str(), Some("/tmp/a\"b"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        write_cargo_toml(dir.path(), "my-api", None, true).unwrap();
        assert!(!dir.path().join("Cargo.toml").exists());
    }

    #[test]
    fn write_creates_manifest() {
        let dir = TempDir::new().unwrap();
        write_cargo_toml(dir.path(), "my-api", None, false).unwrap();
        let written = std::fs::read_to_string(dir.path().join("Cargo.toml")).unwrap();
        assert_eq!(written, cargo_toml("my-api", None));
    }
}
