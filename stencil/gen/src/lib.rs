//! Stencil code generator library.
//!
//! This crate turns a corpus of REST resource schemas (one JSON document per
//! resource) into a Rust crate with, per resource, a typed model, a client
//! exposing exactly the supported operations, create/update validators and
//! a smoke test module. Generated code depends on the `stencil` runtime.
//!
//! ## Modules
//!
//! - [`loader`] - Schema discovery and loading
//! - [`parser`] - Raw document to [`stencil_define::ResourceSchema`]
//! - [`naming`] - Identifier normalization shared by every generator
//! - [`codegen`] - Model, client, validator and test generation
//! - [`output`] - Per-resource assembly, validation, and file writing
//! - [`layout`] - `lib.rs` / `mod.rs` tree of the generated crate
//! - [`cargo_gen`] - Cargo.toml generation for the output package
//! - [`orchestrator`] - Run phases, outcome tracking and the run report
//! - [`config`] - Run configuration
//! - [`errors`] - Error types for the generator
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::path::PathBuf;
//! use stencil_gen::{GeneratorConfig, Normalizer, generate};
//!
//! let config = GeneratorConfig {
//!     schema_root: PathBuf::from("schemas"),
//!     output_root: PathBuf::from("generated"),
//!     dry_run: true,
//!     ..GeneratorConfig::default()
//! };
//!
//! let report = generate(&config, &Normalizer::new()).unwrap();
//! println!("{} generated, {} errored", report.summary.generated, report.summary.errored);
//! ```
//!
//! ## Generated Code Structure
//!
//! For `config.firewall.policy` with a child table `srcintf`:
//!
//! ```text
//! src/config/firewall/policy/
//!   model.rs       pub struct FirewallPolicy { ... }
//!                  pub struct FirewallPolicySrcintf { ... }
//!   client.rs      pub struct FirewallPolicyClient { endpoint, pub srcintf: FirewallPolicySrcintfClient }
//!   validators.rs  validate_create / validate_update, pub mod srcintf { ... }
//!   tests.rs       retrieve_all, retrieve_with_filter, create_and_verify, ...
//!   mod.rs         pub use client::FirewallPolicyClient; pub use model::FirewallPolicy;
//! ```

pub mod cargo_gen;
pub mod codegen;
pub mod config;
pub mod errors;
pub mod layout;
pub mod loader;
pub mod naming;
pub mod orchestrator;
pub mod output;
pub mod parser;

pub use config::GeneratorConfig;
pub use errors::{GeneratorError, SchemaError};
pub use naming::Normalizer;
pub use orchestrator::{RunReport, generate, run};
