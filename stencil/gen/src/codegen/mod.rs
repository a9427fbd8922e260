//! Code generation modules for stencil.
//!
//! Every generator takes the same read-only [`ResourceSchema`] plus the
//! resource's resolved [`TypeNames`] and returns a `proc_macro2::TokenStream`
//! for one artifact file.
//!
//! ## Submodules
//!
//! - [`model`] - Typed model structs (one per table) implementing `stencil::Model`
//! - [`client`] - Client structs exposing exactly the supported operations
//! - [`validators`] - `validate_create` / `validate_update` and their constant tables
//! - [`smoke_tests`] - The `#[cfg(test)]` smoke test module
//!
//! ## Output Format
//!
//! All generators return `proc_macro2::TokenStream`, which is then:
//! - Validated with `syn::parse2` to ensure correctness
//! - Formatted with `prettyplease` for consistent style
//!
//! See [`crate::output`] for the rendering and file writing logic.

pub mod client;
pub mod model;
pub mod validators;

use std::collections::BTreeMap;

use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use stencil_define::{ChildTable, Field, ResourceSchema, SemanticType};

use crate::errors::IdentifierCollision;
use crate::naming::{Normalizer, Scope, type_name};

pub use client::generate_client;
pub use model::generate_model;
pub use smoke_tests::generate_tests;
pub use validators::generate_validators;

/// A uniform view over the root table of a resource and its child tables.
///
/// Generators emit one item per table, walking the tree with
/// [`Table::children`].
#[derive(Debug, Clone)]
pub struct Table<'a> {
    /// Dotted path used in docs and validation errors.
    pub dotted: String,
    /// Path relative to the category root.
    pub wire_path: String,
    /// Code names of the child tables leading here (empty for the root).
    pub chain: Vec<&'a str>,
    pub help: Option<&'a str>,
    pub mkey: Option<&'a str>,
    pub fields: &'a [Field],
    pub child_tables: &'a [ChildTable],
}

impl<'a> Table<'a> {
    /// The resource's root table.
    pub fn root(schema: &'a ResourceSchema) -> Self {
        Self {
            dotted: schema.dotted_path.clone(),
            wire_path: schema.wire_path.clone(),
            chain: Vec::new(),
            help: schema.help.as_deref(),
            mkey: schema.mkey.as_deref(),
            fields: &schema.fields,
            child_tables: &schema.child_tables,
        }
    }

    /// Direct child tables, in document order.
    pub fn children(&self) -> Vec<Table<'a>> {
        self.child_tables
            .iter()
            .map(|child| {
                let mut chain = self.chain.clone();
                chain.push(child.code_name.as_str());
                Table {
                    dotted: format!("{}.{}", self.dotted, child.wire_name),
                    wire_path: format!("{}/{}", self.wire_path, child.wire_name),
                    chain,
                    help: child.help.as_deref(),
                    mkey: child.mkey.as_deref(),
                    fields: &child.fields,
                    child_tables: &child.child_tables,
                }
            })
            .collect()
    }

    /// This table followed by all descendants, depth first.
    pub fn walk(&self) -> Vec<Table<'a>> {
        let mut tables = vec![self.clone()];
        for child in self.children() {
            tables.extend(child.walk());
        }
        tables
    }

    /// Returns `true` for the resource's root table.
    pub fn is_root(&self) -> bool {
        self.chain.is_empty()
    }

    /// Key of this table in the resource's type scope.
    pub fn key(&self) -> String {
        self.chain.join(">")
    }

    /// The field named by `mkey`.
    pub fn mkey_field(&self) -> Option<&'a Field> {
        let mkey = self.mkey?;
        self.fields.iter().find(|f| f.wire_name == mkey)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'a Field> + use<'a> {
        self.fields.iter().filter(|f| f.required)
    }

    pub fn enum_fields(&self) -> impl Iterator<Item = &'a Field> + use<'a> {
        self.fields.iter().filter(|f| f.is_enum())
    }

    /// Child table declared for a nested-table field.
    pub fn child_for(&self, field: &Field) -> Option<Table<'a>> {
        self.children()
            .into_iter()
            .find(|c| c.chain.last() == Some(&field.code_name.as_str()))
    }
}

/// Generated type names of one resource, registered with the normalizer.
#[derive(Debug, Clone, Default)]
pub struct TypeNames {
    models: BTreeMap<String, String>,
    clients: BTreeMap<String, String>,
}

impl TypeNames {
    /// Derives and registers the model and client name of every table.
    ///
    /// ## Errors
    ///
    /// Returns [`IdentifierCollision`] if two tables of the resource end up
    /// with the same type name (e.g. a child table called `client`).
    pub fn resolve(
        schema: &ResourceSchema,
        normalizer: &Normalizer,
    ) -> Result<Self, IdentifierCollision> {
        let scope = Scope::types(&schema.dotted_path);
        let mut names = Self::default();

        for table in Table::root(schema).walk() {
            let mut parts: Vec<&str> = schema.module_path.iter().map(String::as_str).collect();
            parts.extend(table.chain.iter().copied());

            let model = type_name(&parts);
            let client = format!("{model}Client");
            let key = table.key();

            let model = normalizer.register_type(&format!("model:{key}"), model, &scope)?;
            let client = normalizer.register_type(&format!("client:{key}"), client, &scope)?;
            names.models.insert(key.clone(), model);
            names.clients.insert(key, client);
        }

        Ok(names)
    }

    /// Model type of `table`.
    pub fn model(&self, table: &Table<'_>) -> Ident {
        let key = table.key();
        match self.models.get(&key) {
            Some(name) => format_ident!("{}", name),
            None => format_ident!("{}", type_name(&table.chain)),
        }
    }

    /// Client type of `table`.
    pub fn client(&self, table: &Table<'_>) -> Ident {
        let key = table.key();
        match self.clients.get(&key) {
            Some(name) => format_ident!("{}", name),
            None => format_ident!("{}Client", type_name(&table.chain)),
        }
    }

    /// Root model type name.
    pub fn root_model(&self) -> &str {
        self.models.get("").map(String::as_str).unwrap_or_default()
    }

    /// Root client type name.
    pub fn root_client(&self) -> &str {
        self.clients.get("").map(String::as_str).unwrap_or_default()
    }
}

/// Identifier for a normalized code name.
pub fn ident(code_name: &str) -> Ident {
    format_ident!("{}", code_name)
}

/// `crate::<category>::<module path>` of a resource inside the generated crate.
pub fn resource_module(schema: &ResourceSchema) -> TokenStream {
    let category = ident(schema.category.as_str());
    let segments = schema.module_path.iter().map(|s| ident(s));
    quote! { crate::#category #(::#segments)* }
}

/// One `#[doc = ...]` attribute per line of `text`.
pub fn doc_attrs(text: &str) -> TokenStream {
    // Indented lines would turn into doctests in the generated crate
    let lines = text.lines().map(|line| {
        let line = line.trim();
        let line = if line.is_empty() {
            String::new()
        } else {
            format!(" {line}")
        };
        quote! { #[doc = #line] }
    });
    quote! { #(#lines)* }
}

/// Values with duplicates removed, keeping first occurrences in order.
pub fn unique_values(field: &Field) -> Vec<&str> {
    let mut seen = Vec::new();
    for value in &field.enum_values {
        if !seen.contains(&value.as_str()) {
            seen.push(value.as_str());
        }
    }
    seen
}

/// Rust type of a scalar field, without the surrounding `Option`.
pub fn scalar_type(field: &Field) -> TokenStream {
    match field.semantic_type {
        SemanticType::Integer => quote! { i64 },
        SemanticType::Boolean => quote! { bool },
        SemanticType::String
        | SemanticType::IpAddress
        | SemanticType::Enum
        | SemanticType::Reference
        | SemanticType::NestedTable => quote! { ::std::string::String },
    }
}
