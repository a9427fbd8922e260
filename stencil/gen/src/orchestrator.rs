//! Run orchestration.
//!
//! One run walks the schema root and drives every resource through
//! `pending → generated | skipped | errored`. A failing resource never stops
//! the run; the run as a whole fails only after everything was processed.
//!
//! ## Phases
//!
//! 1. **Discover** - classify every `.json` file under the schema root
//! 2. **Parse** - load and parse candidates in sorted order with the shared
//!    [`Normalizer`], rejecting duplicate dotted paths
//! 3. **Generate** - render and write each resource on a rayon pool
//! 4. **Layout** - write `lib.rs`, the `mod.rs` tree and `Cargo.toml` for
//!    the resources that were generated
//! 5. **Reduce** - count outcomes once, after all workers are done

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use colored::Colorize;
use rayon::prelude::*;
use serde::Serialize;
use stencil_define::ResourceSchema;
use tracing::{debug, error, info};

use crate::cargo_gen::write_cargo_toml;
use crate::codegen::TypeNames;
use crate::config::GeneratorConfig;
use crate::errors::{GeneratorError, SchemaError};
use crate::layout::{ResourceEntry, assemble_layout};
use crate::loader::{SchemaFile, discover, load};
use crate::naming::Normalizer;
use crate::output::{assemble_resource, write_artifacts, write_atomic};
use crate::parser::{dotted_path, parse};

/// Terminal state of one schema file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Generated,
    Skipped,
    Errored,
}

/// The error that stopped a resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    /// Stable kind, e.g. `SchemaFormatError`.
    pub kind: String,
    pub message: String,
}

impl ErrorRecord {
    fn from_schema(error: &SchemaError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }

    fn from_generator(error: &GeneratorError) -> Self {
        Self {
            kind: error.kind().to_string(),
            message: error.to_string(),
        }
    }
}

/// Per-file result of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationResult {
    /// Schema file the result is about.
    pub source: PathBuf,
    /// Dotted path, once the header was read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dotted_path: Option<String>,
    pub outcome: Outcome,
    /// Files written for the resource (empty in dry-run mode).
    pub artifacts: Vec<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorRecord>,
}

impl GenerationResult {
    fn skipped(source: PathBuf) -> Self {
        Self {
            source,
            dotted_path: None,
            outcome: Outcome::Skipped,
            artifacts: Vec::new(),
            error: None,
        }
    }

    fn errored(source: PathBuf, dotted_path: Option<String>, error: ErrorRecord) -> Self {
        Self {
            source,
            dotted_path,
            outcome: Outcome::Errored,
            artifacts: Vec::new(),
            error: Some(error),
        }
    }
}

/// Outcome counts of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub generated: usize,
    pub skipped: usize,
    pub errored: usize,
}

/// Everything a run produced, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub summary: RunSummary,
    pub results: Vec<GenerationResult>,
}

impl RunReport {
    fn new(results: Vec<GenerationResult>) -> Self {
        let summary = results
            .iter()
            .fold(RunSummary::default(), |mut summary, result| {
                match result.outcome {
                    Outcome::Generated => summary.generated += 1,
                    Outcome::Skipped => summary.skipped += 1,
                    Outcome::Errored => summary.errored += 1,
                }
                summary
            });
        Self { summary, results }
    }
}

/// A file after the parse phase.
enum Prepared {
    Finished(GenerationResult),
    Parsed {
        source: PathBuf,
        schema: Box<ResourceSchema>,
    },
}

/// Runs all phases and returns the report.
///
/// Per-resource failures are recorded in the report, never returned. The
/// caller decides what `errored > 0` means; [`run`] turns it into
/// [`GeneratorError::RunFailed`].
///
/// ## Errors
///
/// Returns an error only for run-level problems: invalid configuration, an
/// unreadable schema root, or a failure writing the crate layout.
pub fn generate(
    config: &GeneratorConfig,
    normalizer: &Normalizer,
) -> Result<RunReport, GeneratorError> {
    config.validate()?;

    let files = discover(&config.schema_root)?;
    info!(
        schemas = %config.schema_root.display(),
        output = %config.output_root.display(),
        files = files.len(),
        "starting generation"
    );

    if config.clean && !config.dry_run {
        clean_sources(&config.output_root)?;
    }

    // Phase 2: sequential, so module scopes fill in file order
    let mut seen = HashMap::new();
    let prepared: Vec<Prepared> = files
        .into_iter()
        .map(|file| match file {
            SchemaFile::Skipped(path) => Prepared::Finished(GenerationResult::skipped(path)),
            SchemaFile::Resource(path) => match prepare(&path, config, normalizer, &mut seen) {
                Ok(schema) => Prepared::Parsed {
                    source: path,
                    schema: Box::new(schema),
                },
                Err((dotted, e)) => Prepared::Finished(GenerationResult::errored(
                    path,
                    dotted,
                    ErrorRecord::from_schema(&e),
                )),
            },
        })
        .collect();

    // Phase 3
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs.unwrap_or(0))
        .build()
        .map_err(|e| GeneratorError::ConfigError(format!("Failed to start worker pool: {}", e)))?;

    let outcomes: Vec<(GenerationResult, Option<ResourceEntry>)> = pool.install(|| {
        prepared
            .into_par_iter()
            .map(|item| match item {
                Prepared::Finished(result) => (result, None),
                Prepared::Parsed { source, schema } => {
                    generate_resource(source, &schema, config, normalizer)
                }
            })
            .collect()
    });

    // Phase 4
    let entries: Vec<ResourceEntry> = outcomes
        .iter()
        .filter_map(|(_, entry)| entry.clone())
        .collect();
    write_layout(config, &entries)?;

    // Phase 5
    let results: Vec<GenerationResult> = outcomes.into_iter().map(|(result, _)| result).collect();
    for result in &results {
        match (&result.outcome, &result.error) {
            (Outcome::Errored, Some(err)) => error!(
                source = %result.source.display(),
                kind = %err.kind,
                "{}",
                err.message
            ),
            (Outcome::Skipped, _) => {
                debug!(source = %result.source.display(), "skipped non-resource file")
            }
            _ => {}
        }
    }

    let report = RunReport::new(results);
    info!(
        generated = report.summary.generated,
        skipped = report.summary.skipped,
        errored = report.summary.errored,
        "generation finished"
    );
    Ok(report)
}

/// Runs the generator, prints progress and writes the optional report.
///
/// ## Errors
///
/// Everything [`generate`] returns, a failure writing the report, and
/// [`GeneratorError::RunFailed`] when any resource errored.
pub fn run(config: &GeneratorConfig) -> Result<RunReport, GeneratorError> {
    let normalizer = Normalizer::new();
    let report = generate(config, &normalizer)?;

    print_report(&report, config);

    if let Some(path) = &config.report {
        let json = serde_json::to_string_pretty(&report).map_err(|e| {
            GeneratorError::CodeGenError(format!("Failed to serialize run report: {}", e))
        })?;
        write_atomic(path, &json)?;
    }

    if report.summary.errored > 0 {
        return Err(GeneratorError::RunFailed {
            errored: report.summary.errored,
        });
    }
    Ok(report)
}

/// Loads one candidate, checks for a duplicate and parses it.
///
/// The first file to claim a dotted path keeps it, even if it fails to parse.
fn prepare(
    path: &Path,
    config: &GeneratorConfig,
    normalizer: &Normalizer,
    seen: &mut HashMap<String, PathBuf>,
) -> Result<ResourceSchema, (Option<String>, SchemaError)> {
    let raw = load(path).map_err(|e| (None, e))?;
    let dotted = dotted_path(&raw, path).map_err(|e| (None, e))?;

    if let Some(first) = seen.get(&dotted) {
        let message = format!(
            "duplicate resource '{}', already defined by {}",
            dotted,
            first.display()
        );
        return Err((
            Some(dotted),
            SchemaError::Semantic {
                path: path.to_path_buf(),
                message,
            },
        ));
    }
    seen.insert(dotted.clone(), path.to_path_buf());

    parse(&raw, path, normalizer, config.max_depth).map_err(|e| (Some(dotted), e))
}

fn generate_resource(
    source: PathBuf,
    schema: &ResourceSchema,
    config: &GeneratorConfig,
    normalizer: &Normalizer,
) -> (GenerationResult, Option<ResourceEntry>) {
    match emit(schema, config, normalizer) {
        Ok((artifacts, entry)) => (
            GenerationResult {
                source,
                dotted_path: Some(schema.dotted_path.clone()),
                outcome: Outcome::Generated,
                artifacts,
                error: None,
            },
            Some(entry),
        ),
        Err(e) => (
            GenerationResult::errored(
                source,
                Some(schema.dotted_path.clone()),
                ErrorRecord::from_generator(&e),
            ),
            None,
        ),
    }
}

/// Renders all four artifacts, then writes them unless in dry-run mode.
fn emit(
    schema: &ResourceSchema,
    config: &GeneratorConfig,
    normalizer: &Normalizer,
) -> Result<(Vec<PathBuf>, ResourceEntry), GeneratorError> {
    let names = TypeNames::resolve(schema, normalizer).map_err(SchemaError::from)?;
    let artifacts = assemble_resource(schema, &names)?;
    for artifact in &artifacts {
        debug!(
            resource = %schema.dotted_path,
            artifact = %artifact.relative_path.display(),
            "rendered artifact"
        );
    }

    let written = if config.dry_run {
        Vec::new()
    } else {
        write_artifacts(&config.output_root, &artifacts)?
    };
    Ok((written, ResourceEntry::new(schema, &names)))
}

fn clean_sources(output_root: &Path) -> Result<(), GeneratorError> {
    let src = output_root.join("src");
    if src.exists() {
        debug!(path = %src.display(), "removing previous output");
        fs::remove_dir_all(&src).map_err(|e| GeneratorError::WriteError {
            path: src.display().to_string(),
            source: e,
        })?;
    }
    Ok(())
}

fn write_layout(config: &GeneratorConfig, entries: &[ResourceEntry]) -> Result<(), GeneratorError> {
    let files = assemble_layout(entries)?;
    if !config.dry_run {
        for file in &files {
            write_atomic(&config.output_root.join(&file.relative_path), &file.contents)?;
        }
    }
    write_cargo_toml(
        &config.output_root,
        &config.crate_name,
        config.runtime_path.as_deref(),
        config.dry_run,
    )
}

fn print_report(report: &RunReport, config: &GeneratorConfig) {
    for result in &report.results {
        let source = result
            .source
            .strip_prefix(&config.schema_root)
            .unwrap_or(&result.source)
            .display();
        match result.outcome {
            Outcome::Generated => println!(
                "  {} {} {}",
                "✓".green(),
                result.dotted_path.as_deref().unwrap_or_default(),
                format!("({source})").dimmed()
            ),
            Outcome::Skipped => println!("  {} {}", "-".dimmed(), format!("{source} (skipped)").dimmed()),
            Outcome::Errored => {
                let (kind, message) = result
                    .error
                    .as_ref()
                    .map(|e| (e.kind.as_str(), e.message.as_str()))
                    .unwrap_or_default();
                println!("  {} {} {}: {}", "✗".red(), source, kind.red(), message);
            }
        }
    }

    println!();
    let summary = report.summary;
    let errored = format!("{} errored", summary.errored);
    println!(
        "{} {}, {}, {}",
        "Summary:".bold(),
        format!("{} generated", summary.generated).green(),
        format!("{} skipped", summary.skipped).dimmed(),
        if summary.errored > 0 { errored.red() } else { errored.normal() }
    );
    if config.dry_run {
        println!("  {} (no files written)", "--dry-run".bright_yellow());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use tracing_test::traced_test;

    fn write(dir: &Path, name: &str, contents: &str) {
        let path = dir.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn config(schemas: &TempDir, output: &TempDir) -> GeneratorConfig {
        GeneratorConfig {
            schema_root: schemas.path().to_path_buf(),
            output_root: output.path().to_path_buf(),
            jobs: Some(2),
            ..GeneratorConfig::default()
        }
    }

    const GLOBAL: &str = r#"{
        "category": "config", "path": "system/global", "methods": ["GET", "PUT"],
        "fields": [{"name": "hostname", "type": "string"}]
    }"#;

    #[test]
    fn report_counts_each_outcome() {
        let schemas = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(schemas.path(), "system/global.json", GLOBAL);
        write(schemas.path(), "system/index.json", "{}");
        write(schemas.path(), "system/broken.json", "{ nope");

        let report = generate(&config(&schemas, &output), &Normalizer::new()).unwrap();

        assert_eq!(
            report.summary,
            RunSummary {
                generated: 1,
                skipped: 1,
                errored: 1
            }
        );
        let outcomes: Vec<_> = report.results.iter().map(|r| r.outcome).collect();
        assert_eq!(
            outcomes,
            vec![Outcome::Errored, Outcome::Generated, Outcome::Skipped]
        );
        assert_eq!(report.results[1].artifacts.len(), 4);
        assert!(output.path().join("src/config/system/global/client.rs").exists());
    }

    #[test]
    fn duplicate_dotted_path_keeps_first_file() {
        let schemas = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(schemas.path(), "a.json", GLOBAL);
        write(schemas.path(), "b.json", GLOBAL);

        let report = generate(&config(&schemas, &output), &Normalizer::new()).unwrap();

        assert_eq!(report.results[0].outcome, Outcome::Generated);
        assert_eq!(report.results[1].outcome, Outcome::Errored);
        let error = report.results[1].error.as_ref().unwrap();
        assert_eq!(error.kind, "SchemaSemanticError");
        assert!(error.message.contains("duplicate resource 'config.system.global'"));
    }

    #[test]
    fn dry_run_writes_nothing() {
        let schemas = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(schemas.path(), "global.json", GLOBAL);

        let config = GeneratorConfig {
            dry_run: true,
            ..config(&schemas, &output)
        };
        let report = generate(&config, &Normalizer::new()).unwrap();

        assert_eq!(report.summary.generated, 1);
        assert!(report.results[0].artifacts.is_empty());
        assert_eq!(fs::read_dir(output.path()).unwrap().count(), 0);
    }

    #[test]
    fn clean_removes_stale_sources() {
        let schemas = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(schemas.path(), "global.json", GLOBAL);
        write(output.path(), "src/config/stale/mod.rs", "// old");

        let config = GeneratorConfig {
            clean: true,
            ..config(&schemas, &output)
        };
        generate(&config, &Normalizer::new()).unwrap();

        assert!(!output.path().join("src/config/stale").exists());
        assert!(output.path().join("src/lib.rs").exists());
        assert!(output.path().join("Cargo.toml").exists());
    }

    #[test]
    fn run_fails_when_any_resource_errored() {
        let schemas = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(schemas.path(), "global.json", GLOBAL);
        write(schemas.path(), "broken.json", "[]");
        let report_path = output.path().join("report.json");

        let config = GeneratorConfig {
            report: Some(report_path.clone()),
            ..config(&schemas, &output)
        };
        match run(&config) {
            Err(GeneratorError::RunFailed { errored }) => assert_eq!(errored, 1),
            other => panic!("Expected RunFailed, got: {:?}", other),
        }

        // The rest of the run still happened
        assert!(output.path().join("src/config/system/global/model.rs").exists());
        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(report_path).unwrap()).unwrap();
        assert_eq!(report["summary"]["errored"], 1);
        assert_eq!(report["results"][0]["outcome"], "errored");
        assert_eq!(report["results"][0]["error"]["kind"], "SchemaFormatError");
    }

    #[test]
    #[traced_test]
    fn errored_resource_is_logged_with_kind() {
        let schemas = TempDir::new().unwrap();
        let output = TempDir::new().unwrap();
        write(
            schemas.path(),
            "deep.json",
            r#"{"category": "config", "path": "x/y", "methods": ["GET"],
                "fields": [{"name": "a", "type": "table", "children": [
                    {"name": "b", "type": "table", "children": [{"name": "c", "type": "string"}]}
                ]}]}"#,
        );

        let config = GeneratorConfig {
            max_depth: 1,
            dry_run: true,
            ..config(&schemas, &output)
        };
        let report = generate(&config, &Normalizer::new()).unwrap();

        assert_eq!(report.summary.errored, 1);
        assert!(logs_contain("SchemaDepthError"));
        assert!(logs_contain("deep.json"));
    }

    #[test]
    fn invalid_config_is_rejected_before_discovery() {
        let config = GeneratorConfig {
            jobs: Some(0),
            schema_root: PathBuf::from("/does/not/exist"),
            ..GeneratorConfig::default()
        };
        assert!(matches!(
            generate(&config, &Normalizer::new()),
            Err(GeneratorError::ConfigError(_))
        ));
    }
}
