//! Model generation.
//!
//! Emits one struct per table. Every field is optional (responses and
//! partial updates routinely omit fields) and carries its wire name through
//! `#[serde(rename)]`, which is the only place the normalization is reversed.
//! Child tables become `Option<Vec<Child>>` on the parent.
//!
//! Each struct also implements `stencil::Model`, giving the wire-keyed
//! mapping view of the same data.

use proc_macro2::TokenStream;
use quote::quote;
use stencil_define::{Field, ResourceSchema};

use super::{Table, TypeNames, doc_attrs, ident, scalar_type};

/// Generates the model artifact (`model.rs`) of a resource.
///
/// ## Examples
///
/// For a table `config.user.group` with fields `name` and `member`:
/// ```ignore
/// // Generated code:
/// #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
/// pub struct UserGroup {
///     #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
///     pub name: Option<::std::string::String>,
///     #[serde(rename = "member", default, skip_serializing_if = "Option::is_none")]
///     pub member: Option<Vec<UserGroupMember>>,
/// }
///
/// impl ::stencil::Model for UserGroup {
///     const FIELDS: &'static [&'static str] = &["name", "member"];
/// }
/// ```
pub fn generate_model(schema: &ResourceSchema, names: &TypeNames) -> TokenStream {
    let module_doc = format!(" Models for `{}`.", schema.dotted_path);
    let structs = Table::root(schema)
        .walk()
        .into_iter()
        .map(|table| generate_struct(&table, names));

    quote! {
        #![doc = #module_doc]

        #(#structs)*
    }
}

fn generate_struct(table: &Table<'_>, names: &TypeNames) -> TokenStream {
    let model = names.model(table);
    let mut doc = format!("`{}`", table.dotted);
    if let Some(help) = table.help {
        doc = format!("{help}\n\nWire path: {doc}.");
    } else {
        doc = format!("Model for {doc}.");
    }
    let doc = doc_attrs(&doc);

    let fields = table.fields.iter().map(|field| {
        let code = ident(&field.code_name);
        let wire = &field.wire_name;
        let ty = field_type(table, field, names);
        let doc = doc_attrs(&field_doc(field));
        quote! {
            #doc
            #[serde(rename = #wire, default, skip_serializing_if = "Option::is_none")]
            pub #code: Option<#ty>,
        }
    });

    let wire_names = table.fields.iter().map(|f| f.wire_name.as_str());

    quote! {
        #doc
        #[derive(Debug, Clone, Default, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct #model {
            #(#fields)*
        }

        impl ::stencil::Model for #model {
            const FIELDS: &'static [&'static str] = &[#(#wire_names),*];
        }
    }
}

fn field_type(table: &Table<'_>, field: &Field, names: &TypeNames) -> TokenStream {
    match table.child_for(field) {
        Some(child) if field.is_table() => {
            let child_model = names.model(&child);
            quote! { Vec<#child_model> }
        }
        _ => scalar_type(field),
    }
}

fn field_doc(field: &Field) -> String {
    let mut lines = Vec::new();
    match &field.help {
        Some(help) => lines.push(help.clone()),
        None => lines.push(format!("`{}` ({}).", field.wire_name, field.semantic_type)),
    }
    if field.is_enum() {
        let values: Vec<String> = super::unique_values(field)
            .into_iter()
            .map(|v| format!("`{v}`"))
            .collect();
        lines.push(String::new());
        lines.push(format!("Allowed values: {}.", values.join(", ")));
    }
    if let Some(default) = &field.default {
        lines.push(String::new());
        lines.push(format!("Default: `{default}`."));
    }
    if let Some(reference) = &field.reference {
        lines.push(String::new());
        lines.push(format!("References `{reference}`."));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::test_support::*;
    use crate::naming::Normalizer;

    fn model_code(schema: &ResourceSchema) -> String {
        let names = TypeNames::resolve(schema, &Normalizer::new()).unwrap();
        render(&generate_model(schema, &names))
    }

    #[test]
    fn emits_one_struct_per_table() {
        let code = model_code(&policy());
        assert!(code.contains("pub struct FirewallPolicy {"));
        assert!(code.contains("pub struct FirewallPolicySrcintf {"));
        assert_eq!(code.matches("impl ::stencil::Model for").count(), 2);
    }

    #[test]
    fn maps_semantic_types() {
        let code = model_code(&policy());
        assert!(code.contains("pub policyid: Option<i64>"));
        assert!(code.contains("pub name: Option<::std::string::String>"));
        assert!(code.contains("pub action: Option<::std::string::String>"));
        assert!(code.contains("pub nat: Option<bool>"));
        assert!(code.contains("pub srcintf: Option<Vec<FirewallPolicySrcintf>>"));
    }

    #[test]
    fn wire_names_are_kept_in_serde_renames() {
        let code = model_code(&policy());
        // Child field `type` is `type_` in code
        assert!(code.contains("rename = \"type\""));
        assert!(code.contains("pub type_: Option<::std::string::String>"));
        let compact: String = code.split_whitespace().collect();
        assert!(compact.contains("&[\"policyid\",\"name\",\"action\",\"srcintf\",\"nat\""));
    }

    #[test]
    fn docs_carry_help_enum_values_and_defaults() {
        let code = model_code(&policy());
        assert!(code.contains("//! Models for `config.firewall.policy`."));
        assert!(code.contains("/// Configure IPv4 policies."));
        assert!(code.contains("/// Policy ID."));
        assert!(code.contains("/// Allowed values: `accept`, `deny`."));
        assert!(code.contains("/// Default: `deny`."));
    }

    #[test]
    fn singleton_model_is_plain_struct() {
        let code = model_code(&global());
        assert!(code.contains("pub struct SystemGlobal {"));
        assert!(code.contains("pub admin_port: Option<i64>"));
        assert!(code.contains("/// Default: `80`."));
    }
}
