//! Output assembly and file writing for generated code.
//!
//! This module handles the final phase of code generation for one resource:
//! running the four generators, validating and formatting each artifact, and
//! writing the files to disk atomically.
//!
//! ## Output Structure
//!
//! Each resource owns one directory inside the generated crate:
//! ```text
//! <output>/src/config/firewall/policy/
//! ├── client.rs      # Client struct(s)
//! ├── model.rs       # Model struct(s)
//! ├── validators.rs  # validate_create / validate_update
//! └── tests.rs       # Smoke tests (#[cfg(test)])
//! ```
//!
//! The `mod.rs` files tying these together are written by [`crate::layout`].
//!
//! ## Safety Guarantees
//!
//! - **Validation**: All generated code is validated with `syn` before writing
//! - **Formatting**: Output is formatted with `prettyplease` for consistent style
//! - **Atomic writes**: Uses temp file + rename pattern to prevent partial writes
//! - **All or nothing**: A resource's files are written only after all four
//!   artifacts rendered

use std::fs;
use std::path::{Path, PathBuf};

use proc_macro2::TokenStream;
use stencil_define::ResourceSchema;

use crate::codegen::{
    TypeNames, generate_client, generate_model, generate_tests, generate_validators,
};
use crate::errors::GeneratorError;

/// The four files generated per resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArtifactKind {
    Model,
    Client,
    Validators,
    Tests,
}

impl ArtifactKind {
    /// Every kind, in the order artifacts are generated.
    pub const ALL: [ArtifactKind; 4] = [
        ArtifactKind::Model,
        ArtifactKind::Client,
        ArtifactKind::Validators,
        ArtifactKind::Tests,
    ];

    /// Module name of the artifact inside its resource directory.
    pub fn module_name(self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::Client => "client",
            Self::Validators => "validators",
            Self::Tests => "tests",
        }
    }

    /// File name of the artifact.
    pub fn file_name(self) -> String {
        format!("{}.rs", self.module_name())
    }
}

/// A rendered file, ready to write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub kind: ArtifactKind,
    /// Path relative to the output root.
    pub relative_path: PathBuf,
    /// Formatted source text.
    pub contents: String,
}

/// Directory of a resource relative to the output root.
///
/// ## Examples
///
/// ```ignore
/// // config.firewall.policy -> src/config/firewall/policy
/// assert_eq!(resource_dir(&schema), PathBuf::from("src/config/firewall/policy"));
/// ```
pub fn resource_dir(schema: &ResourceSchema) -> PathBuf {
    let mut dir = PathBuf::from("src");
    dir.push(schema.category.as_str());
    for segment in &schema.module_path {
        dir.push(segment);
    }
    dir
}

/// Runs every generator for `schema` and renders the results.
///
/// ## Errors
///
/// Returns [`GeneratorError::CodeGenError`] if any generator produced code
/// that does not parse. No artifact is returned in that case.
pub fn assemble_resource(
    schema: &ResourceSchema,
    names: &TypeNames,
) -> Result<Vec<Artifact>, GeneratorError> {
    let dir = resource_dir(schema);

    ArtifactKind::ALL
        .iter()
        .map(|kind| {
            let tokens = match kind {
                ArtifactKind::Model => generate_model(schema, names),
                ArtifactKind::Client => generate_client(schema, names),
                ArtifactKind::Validators => generate_validators(schema, names),
                ArtifactKind::Tests => generate_tests(schema, names),
            };
            let file = validate_code(&tokens).map_err(|e| match e {
                GeneratorError::CodeGenError(message) => GeneratorError::CodeGenError(format!(
                    "{} of {}: {}",
                    kind.file_name(),
                    schema.dotted_path,
                    message
                )),
                other => other,
            })?;
            Ok(Artifact {
                kind: *kind,
                relative_path: dir.join(kind.file_name()),
                contents: format_code(&file),
            })
        })
        .collect()
}

/// Writes `artifacts` below `output_root` and returns the written paths.
///
/// ## Errors
///
/// Returns [`GeneratorError::WriteError`] for the first file that cannot be
/// written.
pub fn write_artifacts(
    output_root: &Path,
    artifacts: &[Artifact],
) -> Result<Vec<PathBuf>, GeneratorError> {
    artifacts
        .iter()
        .map(|artifact| {
            let path = output_root.join(&artifact.relative_path);
            write_atomic(&path, &artifact.contents)?;
            Ok(path)
        })
        .collect()
}

/// Validates that a token stream is syntactically valid Rust code.
///
/// Parses the token stream as a complete Rust file using syn.
///
/// ## Errors
///
/// Returns `GeneratorError::CodeGenError` if the tokens don't form valid Rust.
pub fn validate_code(tokens: &TokenStream) -> Result<syn::File, GeneratorError> {
    syn::parse2(tokens.clone())
        .map_err(|e| GeneratorError::CodeGenError(format!("Generated code is invalid: {}", e)))
}

/// Formats generated code using prettyplease.
///
/// Converts a parsed syn::File back to a nicely formatted string,
/// prepending an auto-generated notice as a regular comment.
pub fn format_code(file: &syn::File) -> String {
    let formatted = prettyplease::unparse(file);
    format!(
        "// This code was automatically generated by stencil-gen. Do not edit manually.\n\n{}",
        formatted
    )
}

/// Writes content to a file atomically using temp file + rename.
///
/// ## Errors
///
/// Returns `GeneratorError::WriteError` if:
/// - Parent directories cannot be created
/// - The temp file cannot be written
/// - The rename operation fails
pub fn write_atomic(path: &Path, content: &str) -> Result<(), GeneratorError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| GeneratorError::WriteError {
            path: parent.display().to_string(),
            source: e,
        })?;
    }

    let temp_path = path.with_extension("tmp");
    fs::write(&temp_path, content).map_err(|e| GeneratorError::WriteError {
        path: temp_path.display().to_string(),
        source: e,
    })?;

    fs::rename(&temp_path, path).map_err(|e| GeneratorError::WriteError {
        path: path.display().to_string(),
        source: e,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::test_support::*;
    use crate::naming::Normalizer;
    use quote::quote;
    use tempfile::TempDir;

    fn assembled(schema: &ResourceSchema) -> Vec<Artifact> {
        let names = TypeNames::resolve(schema, &Normalizer::new()).unwrap();
        assemble_resource(schema, &names).unwrap()
    }

    // === assemble_resource tests ===

    #[test]
    fn assemble_resource_renders_four_artifacts() {
        let artifacts = assembled(&policy());
        let paths: Vec<_> = artifacts
            .iter()
            .map(|a| a.relative_path.display().to_string())
            .collect();
        assert_eq!(
            paths,
            vec![
                "src/config/firewall/policy/model.rs",
                "src/config/firewall/policy/client.rs",
                "src/config/firewall/policy/validators.rs",
                "src/config/firewall/policy/tests.rs",
            ]
        );
        for artifact in &artifacts {
            assert!(artifact.contents.starts_with("// This code was automatically generated"));
        }
    }

    #[test]
    fn assemble_resource_is_deterministic() {
        assert_eq!(assembled(&policy()), assembled(&policy()));
    }

    #[test]
    fn resource_dir_uses_category_and_module_path() {
        assert_eq!(resource_dir(&status()), PathBuf::from("src/monitor/system/status"));
    }

    // === validate_code tests ===

    #[test]
    fn validate_code_rejects_invalid_code() {
        let invalid_tokens = quote! {
            let x =
        };

        match validate_code(&invalid_tokens) {
            Err(GeneratorError::CodeGenError(_)) => {}
            Err(other) => panic!("Unexpected error type: {:?}", other),
            Ok(_) => panic!("Expected error but got success"),
        }
    }

    #[test]
    fn format_code_prepends_notice() {
        let file = validate_code(&quote! { pub struct A; }).unwrap();
        let formatted = format_code(&file);
        assert!(formatted.starts_with("// This code was automatically generated by stencil-gen."));
        assert!(formatted.contains("pub struct A;"));
    }

    // === write_atomic tests ===

    #[test]
    fn write_atomic_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("nested/deep/test.rs");

        write_atomic(&file_path, "// Nested content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// Nested content");
    }

    #[test]
    fn write_atomic_overwrites_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("existing.rs");
        fs::write(&file_path, "// Old content").unwrap();

        write_atomic(&file_path, "// New content").unwrap();

        assert_eq!(fs::read_to_string(&file_path).unwrap(), "// New content");
        assert!(!file_path.with_extension("tmp").exists());
    }

    #[test]
    fn write_artifacts_returns_written_paths() {
        let temp_dir = TempDir::new().unwrap();
        let artifacts = assembled(&global());

        let written = write_artifacts(temp_dir.path(), &artifacts).unwrap();

        assert_eq!(written.len(), 4);
        for path in &written {
            assert!(path.starts_with(temp_dir.path()));
            assert!(path.exists());
        }
    }
}
