//! Stencil Definition Library
//!
//! This crate provides the intermediate representation (IR) that the
//! `stencil-gen` binary builds from schema documents and then fans out into
//! models, clients, validators and smoke tests.
//!
//! ## Core Types
//!
//! - [`ResourceSchema`] - One REST resource: category, path, key, fields, child tables and methods
//! - [`Field`] - A typed field with required flag and enum values
//! - [`ChildTable`] - A nested, list-valued sub-resource
//! - [`Category`] - Config vs monitor classification
//! - [`HttpMethod`] - Methods a resource supports (GET, POST, PUT, DELETE)
//! - [`SemanticType`] - Field type tags (string, integer, enum, nested-table, ...)
//!
//! ## Examples
//!
//! ```
//! use std::collections::BTreeSet;
//! use stencil_define::{Category, Field, HttpMethod, ResourceSchema, SemanticType};
//!
//! let schema = ResourceSchema {
//!     category: Category::Config,
//!     dotted_path: "config.firewall.address".to_string(),
//!     wire_path: "firewall/address".to_string(),
//!     module_path: vec!["firewall".to_string(), "address".to_string()],
//!     help: Some("Configure IPv4 addresses.".to_string()),
//!     mkey: Some("name".to_string()),
//!     fields: vec![
//!         Field::new("name", "name", SemanticType::String).required(),
//!         Field::new("type", "type_", SemanticType::Enum).with_values(["ipmask", "fqdn"]),
//!     ],
//!     child_tables: vec![],
//!     supported_methods: BTreeSet::from([HttpMethod::Get, HttpMethod::Post]),
//! };
//!
//! assert_eq!(schema.required_fields().count(), 1);
//! assert_eq!(schema.field("type").unwrap().code_name, "type_");
//! ```

pub mod schema;
pub mod types;

pub use schema::{ChildTable, Field, ResourceSchema};
pub use types::{Category, HttpMethod, SemanticType};
