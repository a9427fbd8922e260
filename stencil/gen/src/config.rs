//! Run configuration.

use std::path::PathBuf;

use crate::errors::GeneratorError;

/// Default nesting limit for child tables.
pub const DEFAULT_MAX_DEPTH: usize = 4;

/// Default package name of the generated crate.
pub const DEFAULT_CRATE_NAME: &str = "stencil-api";

/// Everything one generator run needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    /// Directory walked for schema files.
    pub schema_root: PathBuf,
    /// Root of the generated crate (`Cargo.toml` and `src/` land here).
    pub output_root: PathBuf,
    /// Deepest allowed child-table nesting.
    pub max_depth: usize,
    /// Worker threads; `None` lets rayon pick.
    pub jobs: Option<usize>,
    /// Package name of the generated crate.
    pub crate_name: String,
    /// Local path of the `stencil` runtime for the generated manifest.
    pub runtime_path: Option<PathBuf>,
    /// Where to write the JSON run report.
    pub report: Option<PathBuf>,
    /// Remove `<output>/src` before writing.
    pub clean: bool,
    /// Render everything, write nothing.
    pub dry_run: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            schema_root: PathBuf::from("schemas"),
            output_root: PathBuf::from("stencil/api"),
            max_depth: DEFAULT_MAX_DEPTH,
            jobs: None,
            crate_name: DEFAULT_CRATE_NAME.to_string(),
            runtime_path: None,
            report: None,
            clean: false,
            dry_run: false,
        }
    }
}

impl GeneratorConfig {
    /// Checks values clap cannot check on its own.
    ///
    /// ## Errors
    ///
    /// Returns [`GeneratorError::ConfigError`] for zero jobs, a zero depth
    /// limit or an invalid crate name.
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.jobs == Some(0) {
            return Err(GeneratorError::ConfigError(
                "--jobs must be at least 1".to_string(),
            ));
        }
        if self.max_depth == 0 {
            return Err(GeneratorError::ConfigError(
                "--max-depth must be at least 1".to_string(),
            ));
        }
        if !is_valid_crate_name(&self.crate_name) {
            return Err(GeneratorError::ConfigError(format!(
                "Invalid crate name: '{}'",
                self.crate_name
            )));
        }
        Ok(())
    }
}

/// ASCII letter first, then letters, digits, `-` or `_`.
fn is_valid_crate_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}
