//! Schema discovery and loading.
//!
//! [`discover`] walks the schema root and classifies every file;
//! [`load`] reads one resource candidate into a raw JSON document.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::{GeneratorError, SchemaError};

/// File names that describe the corpus rather than a resource.
const NON_RESOURCE_NAMES: &[&str] = &["index.json", "manifest.json"];

/// A raw, unvalidated schema document.
pub type RawDocument = Value;

/// How the orchestrator treats a discovered `.json` file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaFile {
    /// A resource schema to parse.
    Resource(PathBuf),
    /// An index, manifest or hidden file.
    Skipped(PathBuf),
}

impl SchemaFile {
    /// Path of the file on disk.
    pub fn path(&self) -> &Path {
        match self {
            Self::Resource(path) | Self::Skipped(path) => path,
        }
    }
}

/// Returns `true` for `.json` files that never describe a resource.
///
/// ## Examples
///
/// ```
/// use stencil_gen::loader::is_non_resource;
///
/// assert!(is_non_resource("index.json"));
/// assert!(is_non_resource("_shared.json"));
/// assert!(is_non_resource(".hidden.json"));
/// assert!(!is_non_resource("firewall.policy.json"));
/// ```
pub fn is_non_resource(file_name: &str) -> bool {
    file_name.starts_with('_')
        || file_name.starts_with('.')
        || NON_RESOURCE_NAMES.contains(&file_name)
}

/// Walks `root` and classifies every `.json` file, sorted by path.
///
/// Files with other extensions are ignored entirely.
///
/// ## Errors
///
/// Returns [`GeneratorError::ConfigError`] if `root` is not a directory or
/// cannot be walked.
pub fn discover(root: &Path) -> Result<Vec<SchemaFile>, GeneratorError> {
    if !root.is_dir() {
        return Err(GeneratorError::ConfigError(format!(
            "Schema root is not a directory: {}",
            root.display()
        )));
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            GeneratorError::ConfigError(format!("Failed to walk {}: {}", root.display(), e))
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|e| e.to_str()) != Some("json") {
            continue;
        }

        let file_name = entry.file_name().to_string_lossy();
        if is_non_resource(&file_name) {
            files.push(SchemaFile::Skipped(path.to_path_buf()));
        } else {
            files.push(SchemaFile::Resource(path.to_path_buf()));
        }
    }

    debug!(root = %root.display(), files = files.len(), "discovered schema files");
    Ok(files)
}

/// Reads one schema file.
///
/// Only the minimal shape is checked here: the document must be a JSON
/// object. Everything else is the parser's job.
///
/// ## Errors
///
/// - [`SchemaError::Io`] if the file cannot be read
/// - [`SchemaError::Format`] if it is not valid JSON or not an object
pub fn load(path: &Path) -> Result<RawDocument, SchemaError> {
    let text = fs::read_to_string(path).map_err(|source| SchemaError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let document: Value = serde_json::from_str(&text).map_err(|e| SchemaError::Format {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    if !document.is_object() {
        return Err(SchemaError::Format {
            path: path.to_path_buf(),
            message: format!("expected a JSON object, found {}", kind_of(&document)),
        });
    }

    Ok(document)
}

/// Short name of a JSON value's type, for error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
