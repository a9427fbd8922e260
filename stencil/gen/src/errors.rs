//! Error types for the stencil generator.
//!
//! [`SchemaError`] is fatal to one resource only and is recorded by the
//! orchestrator; [`GeneratorError`] covers everything else, including the
//! run-level failure raised after all resources were processed.

use std::path::PathBuf;

use thiserror::Error;

/// Two distinct wire names normalize to the same code name in one scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Identifier collision in {scope}: '{existing}' and '{incoming}' both normalize to '{code_name}'"
)]
pub struct IdentifierCollision {
    /// Scope the names were registered in.
    pub scope: String,
    /// The shared code name.
    pub code_name: String,
    /// Wire name that was registered first.
    pub existing: String,
    /// Wire name that was rejected.
    pub incoming: String,
}

/// Errors that abort generation of a single resource.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The schema file could not be read.
    #[error("Failed to read schema '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schema file is not a JSON object.
    #[error("Malformed schema '{}': {message}", .path.display())]
    Format { path: PathBuf, message: String },

    /// The document is well-formed but describes an invalid resource.
    #[error("Invalid schema '{}': {message}", .path.display())]
    Semantic { path: PathBuf, message: String },

    /// Child tables nest deeper than the configured maximum.
    #[error(
        "Schema '{}': table '{table}' exceeds the maximum nesting depth of {max_depth}",
        .path.display()
    )]
    Depth {
        path: PathBuf,
        /// Location of the offending table (e.g. `fields[2].children[0]`).
        table: String,
        max_depth: usize,
    },

    /// Wire names collide after normalization.
    #[error(transparent)]
    IdentifierCollision(#[from] IdentifierCollision),
}

impl SchemaError {
    /// Stable error kind used in logs and the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Io { .. } => "SchemaIOError",
            Self::Format { .. } => "SchemaFormatError",
            Self::Semantic { .. } => "SchemaSemanticError",
            Self::Depth { .. } => "SchemaDepthError",
            Self::IdentifierCollision(_) => "IdentifierCollisionError",
        }
    }
}

/// Errors that can occur during code generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// A schema could not be turned into a resource
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Failed to generate code
    #[error("Code generation failed: {0}")]
    CodeGenError(String),

    /// Failed to write output file
    #[error("Failed to write output file '{path}': {source}")]
    WriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// At least one resource errored; every other resource was still written.
    #[error("{errored} resource(s) failed to generate")]
    RunFailed { errored: usize },
}

impl GeneratorError {
    /// Stable error kind used in logs and the run report.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Schema(e) => e.kind(),
            Self::CodeGenError(_) => "CodeGenError",
            Self::WriteError { .. } => "WriteError",
            Self::ConfigError(_) => "ConfigError",
            Self::RunFailed { .. } => "RunFailed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_error_kinds_are_stable() {
        let path = PathBuf::from("schemas/firewall.policy.json");
        let io = SchemaError::Io {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(io.kind(), "SchemaIOError");

        let depth = SchemaError::Depth {
            path,
            table: "fields[0].children[0]".to_string(),
            max_depth: 1,
        };
        assert_eq!(depth.kind(), "SchemaDepthError");
        assert!(depth.to_string().contains("fields[0].children[0]"));
    }

    #[test]
    fn collision_converts_and_keeps_kind() {
        let collision = IdentifierCollision {
            scope: "fields:config.system.dns".to_string(),
            code_name: "a_b".to_string(),
            existing: "a-b".to_string(),
            incoming: "a_b".to_string(),
        };
        let schema: SchemaError = collision.into();
        assert_eq!(schema.kind(), "IdentifierCollisionError");

        let generator: GeneratorError = schema.into();
        assert_eq!(generator.kind(), "IdentifierCollisionError");
        assert!(generator.to_string().contains("'a-b' and 'a_b'"));
    }

    #[test]
    fn path_is_in_message() {
        let err = SchemaError::Semantic {
            path: PathBuf::from("x/y.json"),
            message: "missing category marker".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid schema 'x/y.json': missing category marker"
        );
    }

    #[test]
    fn run_failed_reports_count() {
        let err = GeneratorError::RunFailed { errored: 3 };
        assert_eq!(err.kind(), "RunFailed");
        assert_eq!(err.to_string(), "3 resource(s) failed to generate");
    }
}
