//! Module tree of the generated crate.
//!
//! Resource artifacts land in `src/<category>/<segment>/...`. This module
//! writes the files that make them one crate: `src/lib.rs` declaring the
//! categories, and a `mod.rs` per directory declaring its resource's
//! artifacts, its sub-directories and the re-exported root model and client.
//!
//! A directory can be a resource and a parent at once (`system/interface`
//! next to `system/interface/stats`).

use std::collections::BTreeMap;
use std::path::PathBuf;

use proc_macro2::TokenStream;
use quote::quote;
use stencil_define::{Category, ResourceSchema};

use crate::codegen::{TypeNames, ident};
use crate::errors::GeneratorError;
use crate::output::{ArtifactKind, format_code, validate_code};

/// What the layout needs to know about one generated resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceEntry {
    pub category: Category,
    pub dotted_path: String,
    /// `(module name, wire segment)` per path segment.
    pub segments: Vec<(String, String)>,
    pub model: String,
    pub client: String,
}

impl ResourceEntry {
    pub fn new(schema: &ResourceSchema, names: &TypeNames) -> Self {
        let segments = schema
            .module_path
            .iter()
            .cloned()
            .zip(schema.wire_path.split('/').map(str::to_string))
            .collect();
        Self {
            category: schema.category,
            dotted_path: schema.dotted_path.clone(),
            segments,
            model: names.root_model().to_string(),
            client: names.root_client().to_string(),
        }
    }
}

/// A `lib.rs` or `mod.rs` of the generated crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleFile {
    /// Path relative to the output root.
    pub relative_path: PathBuf,
    pub contents: String,
}

#[derive(Debug, Default)]
struct Node<'a> {
    /// Dotted wire path of this directory.
    dotted: String,
    resource: Option<&'a ResourceEntry>,
    children: BTreeMap<&'a str, Node<'a>>,
}

/// Builds every `lib.rs` / `mod.rs` needed to tie `resources` together.
///
/// Output is sorted by path and independent of the order of `resources`.
///
/// ## Errors
///
/// Returns [`GeneratorError::CodeGenError`] if a module file does not parse.
pub fn assemble_layout(resources: &[ResourceEntry]) -> Result<Vec<ModuleFile>, GeneratorError> {
    let mut categories: BTreeMap<Category, Node<'_>> = BTreeMap::new();

    for entry in resources {
        let mut node = categories.entry(entry.category).or_insert_with(|| Node {
            dotted: entry.category.to_string(),
            ..Node::default()
        });
        for (module, wire) in &entry.segments {
            let dotted = format!("{}.{}", node.dotted, wire);
            node = node.children.entry(module.as_str()).or_insert_with(|| Node {
                dotted,
                ..Node::default()
            });
        }
        node.resource = Some(entry);
    }

    let mut files = vec![ModuleFile {
        relative_path: PathBuf::from("src/lib.rs"),
        contents: render(&lib_rs(categories.keys().copied()))?,
    }];

    for (category, node) in &categories {
        let dir = PathBuf::from("src").join(category.as_str());
        collect(node, dir, &mut files)?;
    }

    files.sort_by(|a, b| a.relative_path.cmp(&b.relative_path));
    Ok(files)
}

fn collect(node: &Node<'_>, dir: PathBuf, files: &mut Vec<ModuleFile>) -> Result<(), GeneratorError> {
    files.push(ModuleFile {
        relative_path: dir.join("mod.rs"),
        contents: render(&mod_rs(node))?,
    });
    for (module, child) in &node.children {
        collect(child, dir.join(module), files)?;
    }
    Ok(())
}

fn render(tokens: &TokenStream) -> Result<String, GeneratorError> {
    Ok(format_code(&validate_code(tokens)?))
}

fn lib_rs(categories: impl Iterator<Item = Category>) -> TokenStream {
    let modules = categories.map(|category| {
        let module = ident(category.as_str());
        let doc = format!(" `{category}` resources.");
        quote! {
            #[doc = #doc]
            pub mod #module;
        }
    });

    quote! {
        //! Generated REST resource clients.
        //!
        //! One module per category, one sub-module per path segment. Every
        //! resource module contains `model`, `client` and `validators`, and
        //! re-exports its root model and client.
        //!
        //! ## Quick Start
        //!
        //! ```ignore
        //! use std::sync::Arc;
        //!
        //! let client = crate::config::firewall::policy::FirewallPolicyClient::new(Arc::new(transport));
        //! let policies = client.get(&stencil::GetParams::new())?;
        //! ```

        #(#modules)*
    }
}

fn mod_rs(node: &Node<'_>) -> TokenStream {
    let doc = format!(" `{}`", node.dotted);

    let artifacts = node.resource.map(|entry| {
        let public = [ArtifactKind::Client, ArtifactKind::Model, ArtifactKind::Validators]
            .into_iter()
            .map(|kind| ident(kind.module_name()));
        let tests = ident(ArtifactKind::Tests.module_name());
        let client = ident(&entry.client);
        let model = ident(&entry.model);
        quote! {
            #(pub mod #public;)*
            #[cfg(test)]
            mod #tests;

            pub use client::#client;
            pub use model::#model;
        }
    });

    let children = node.children.keys().map(|module| {
        let module = ident(module);
        quote! { pub mod #module; }
    });

    quote! {
        #![doc = #doc]

        #artifacts
        #(#children)*
    }
}
