//! Validator generation.
//!
//! Emits the constant tables of a resource (`REQUIRED_FIELDS`, one
//! `<FIELD>_VALUES` per enum field, `ENUM_FIELDS`) and the two checks built
//! on them. Each child table gets a nested module with the same items, and
//! the parent's checks descend into every row of the child table.
//!
//! - `validate_create` checks required fields, then enum values
//! - `validate_update` checks enum values only, so partial updates pass

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use stencil_define::ResourceSchema;

use super::{Table, TypeNames, ident, unique_values};
use crate::naming::enum_const_name;

/// Generates the validators artifact (`validators.rs`) of a resource.
///
/// ## Examples
///
/// ```ignore
/// // Generated code:
/// pub const RESOURCE: &str = "config.firewall.policy";
/// pub const REQUIRED_FIELDS: &[&str] = &["policyid"];
/// pub const ACTION_VALUES: &[&str] = &["accept", "deny"];
/// pub const ENUM_FIELDS: &[(&str, &[&str])] = &[("action", ACTION_VALUES)];
///
/// pub fn validate_create(payload: &::stencil::Record) -> Result<(), ::stencil::ValidationError> {
///     ::stencil::validate::require_fields(RESOURCE, payload, REQUIRED_FIELDS)?;
///     ::stencil::validate::check_enums(RESOURCE, payload, ENUM_FIELDS)?;
///     Ok(())
/// }
/// ```
pub fn generate_validators(schema: &ResourceSchema, _names: &TypeNames) -> TokenStream {
    let module_doc = format!(" Validators for `{}`.", schema.dotted_path);
    let body = generate_table(&Table::root(schema));

    quote! {
        #![doc = #module_doc]

        #body
    }
}

fn generate_table(table: &Table<'_>) -> TokenStream {
    let resource = &table.dotted;
    let required = table.required_fields().map(|f| f.wire_name.as_str());

    let value_consts = table.enum_fields().map(|field| {
        let name = format_ident!("{}", enum_const_name(&field.code_name));
        let values = unique_values(field);
        let doc = format!(" Declared values of `{}`.", field.wire_name);
        quote! {
            #[doc = #doc]
            pub const #name: &[&str] = &[#(#values),*];
        }
    });

    let enum_entries = table.enum_fields().map(|field| {
        let wire = &field.wire_name;
        let name = format_ident!("{}", enum_const_name(&field.code_name));
        quote! { (#wire, #name) }
    });

    let children = table.children();
    let create_rows = children.iter().map(|child| row_check(child, "validate_create"));
    let update_rows = children.iter().map(|child| row_check(child, "validate_update"));

    let child_modules = children.iter().map(|child| {
        let module = ident(child.chain.last().copied().unwrap_or_default());
        let doc = format!(" Validators for rows of `{}`.", child.dotted);
        let body = generate_table(child);
        quote! {
            #[doc = #doc]
            pub mod #module {
                #body
            }
        }
    });

    quote! {
        /// Dotted path reported in validation errors.
        pub const RESOURCE: &str = #resource;

        /// Fields that must be present on create.
        pub const REQUIRED_FIELDS: &[&str] = &[#(#required),*];

        #(#value_consts)*

        /// Enum fields and their declared values.
        pub const ENUM_FIELDS: &[(&str, &[&str])] = &[#(#enum_entries),*];

        /// Checks a create payload: required fields first, then enum values.
        pub fn validate_create(payload: &::stencil::Record) -> Result<(), ::stencil::ValidationError> {
            ::stencil::validate::require_fields(RESOURCE, payload, REQUIRED_FIELDS)?;
            ::stencil::validate::check_enums(RESOURCE, payload, ENUM_FIELDS)?;
            #(#create_rows)*
            Ok(())
        }

        /// Checks an update payload. Absent fields are never an error.
        pub fn validate_update(payload: &::stencil::Record) -> Result<(), ::stencil::ValidationError> {
            ::stencil::validate::check_enums(RESOURCE, payload, ENUM_FIELDS)?;
            #(#update_rows)*
            Ok(())
        }

        #(#child_modules)*
    }
}

/// Runs the child module's `check` on every row of the child table.
fn row_check(child: &Table<'_>, check: &str) -> TokenStream {
    let module = ident(child.chain.last().copied().unwrap_or_default());
    let wire = child.wire_path.rsplit('/').next().unwrap_or_default();
    let check = format_ident!("{}", check);
    quote! {
        for row in ::stencil::validate::table_rows(payload, #wire) {
            #module::#check(row)?;
        }
    }
}
