//! Client generation.
//!
//! Emits one client struct per table. A client only has the operations its
//! resource supports: a read-only resource gets `get()` and nothing else, so
//! calling an unsupported method is a compile error rather than a runtime
//! rejection. Child tables become public fields holding nested clients whose
//! path is the parent's path plus the child's wire segment.
//!
//! ## Operations
//!
//! | Method | Keyed table | Singleton |
//! |--------|-------------|-----------|
//! | GET | `get(params)` → `Vec<M>`, `get_by_key(key, params)` → `M` | `get(params)` → `M` |
//! | POST | `post(&M)` | `post(&M)` |
//! | PUT | `put(key, &M)` | `put(&M)` |
//! | DELETE | `delete(key)` | `delete()` |
//!
//! Child tables inherit the parent's method set. An unkeyed child table is
//! still a collection, so its `get` returns a `Vec`.

use proc_macro2::TokenStream;
use quote::quote;
use stencil_define::{Category, HttpMethod, ResourceSchema, SemanticType};

use super::{Table, TypeNames, doc_attrs, ident};

/// Generates the client artifact (`client.rs`) of a resource.
///
/// ## Examples
///
/// For a singleton `config.system.global` supporting GET and PUT:
/// ```ignore
/// // Generated code:
/// #[derive(Debug, Clone)]
/// pub struct SystemGlobalClient {
///     endpoint: ::stencil::Endpoint,
/// }
///
/// impl SystemGlobalClient {
///     pub const CATEGORY: ::stencil::Category = ::stencil::Category::Config;
///     pub const PATH: &'static str = "system/global";
///     pub const SUPPORTED_METHODS: &'static [::stencil::HttpMethod] =
///         &[::stencil::HttpMethod::Get, ::stencil::HttpMethod::Put];
///
///     pub fn get(&self, params: &::stencil::GetParams)
///         -> Result<super::model::SystemGlobal, ::stencil::ClientError> { ... }
///     pub fn put(&self, payload: &super::model::SystemGlobal)
///         -> Result<::stencil::Response, ::stencil::ClientError> { ... }
/// }
/// ```
pub fn generate_client(schema: &ResourceSchema, names: &TypeNames) -> TokenStream {
    let module_doc = format!(" Client for `{}`.", schema.dotted_path);
    let clients = Table::root(schema)
        .walk()
        .into_iter()
        .map(|table| generate_struct(schema, &table, names));

    quote! {
        #![doc = #module_doc]

        #(#clients)*
    }
}

fn generate_struct(schema: &ResourceSchema, table: &Table<'_>, names: &TypeNames) -> TokenStream {
    let client = names.client(table);
    let children = table.children();

    let doc = match table.help {
        Some(help) => format!("{help}\n\nClient for `{}`.", table.dotted),
        None => format!("Client for `{}`.", table.dotted),
    };
    let doc = doc_attrs(&doc);

    let child_fields = children.iter().map(|child| {
        let field = ident(child.chain.last().copied().unwrap_or_default());
        let child_client = names.client(child);
        let doc = format!(" Nested client for `{}`.", child.wire_path);
        quote! {
            #[doc = #doc]
            pub #field: #child_client,
        }
    });

    let child_inits = children.iter().map(|child| {
        let field = ident(child.chain.last().copied().unwrap_or_default());
        let child_client = names.client(child);
        let segment = child.wire_path.rsplit('/').next().unwrap_or_default();
        quote! {
            #field: #child_client::from_endpoint(endpoint.child(#segment)),
        }
    });

    let category = category_tokens(schema.category);
    let path = &table.wire_path;
    let mkey_const = table.mkey.map(|mkey| {
        quote! {
            /// Wire name of the identifying field.
            pub const MKEY: &'static str = #mkey;
        }
    });
    let methods = schema.supported_methods.iter().map(|m| method_tokens(*m));

    let operations = schema
        .supported_methods
        .iter()
        .map(|method| generate_operation(*method, table, names));

    quote! {
        #doc
        #[derive(Debug, Clone)]
        pub struct #client {
            endpoint: ::stencil::Endpoint,
            #(#child_fields)*
        }

        impl #client {
            /// Category this resource lives under.
            pub const CATEGORY: ::stencil::Category = #category;
            /// Path relative to the category root.
            pub const PATH: &'static str = #path;
            #mkey_const
            /// Methods the API accepts for this resource.
            pub const SUPPORTED_METHODS: &'static [::stencil::HttpMethod] = &[#(#methods),*];

            /// Creates a client that sends requests through `transport`.
            pub fn new(transport: ::std::sync::Arc<dyn ::stencil::Transport>) -> Self {
                Self::from_endpoint(::stencil::Endpoint::new(transport, Self::CATEGORY, Self::PATH))
            }

            fn from_endpoint(endpoint: ::stencil::Endpoint) -> Self {
                Self {
                    #(#child_inits)*
                    endpoint,
                }
            }

            /// The endpoint requests are sent to.
            pub fn endpoint(&self) -> &::stencil::Endpoint {
                &self.endpoint
            }

            #(#operations)*
        }
    }
}

fn generate_operation(method: HttpMethod, table: &Table<'_>, names: &TypeNames) -> TokenStream {
    let model = names.model(table);
    let key = Key::of(table);
    // Only the root of a resource without mkey reads a single object
    let single = table.is_root() && table.mkey.is_none();
    let validators = validators_path(table);

    match method {
        HttpMethod::Get => {
            let get = if single {
                quote! {
                    /// Retrieves the object.
                    pub fn get(
                        &self,
                        params: &::stencil::GetParams,
                    ) -> Result<super::model::#model, ::stencil::ClientError> {
                        let response = self.endpoint.get(None, &params.to_query())?;
                        ::stencil::decode_one(response, self.endpoint.path())
                    }
                }
            } else {
                quote! {
                    /// Retrieves every object in the collection.
                    pub fn get(
                        &self,
                        params: &::stencil::GetParams,
                    ) -> Result<Vec<super::model::#model>, ::stencil::ClientError> {
                        let response = self.endpoint.get(None, &params.to_query())?;
                        ::stencil::decode_many(response)
                    }
                }
            };
            let get_by_key = key.as_ref().map(|key| {
                let (param, to_text) = key.param();
                let doc = format!(" Retrieves one object by its `{}`.", key.wire);
                quote! {
                    #[doc = #doc]
                    pub fn get_by_key(
                        &self,
                        #param,
                        params: &::stencil::GetParams,
                    ) -> Result<super::model::#model, ::stencil::ClientError> {
                        #to_text
                        let response = self.endpoint.get(Some(key), &params.to_query())?;
                        ::stencil::decode_one(response, &self.endpoint.key_path(Some(key)))
                    }
                }
            });
            quote! { #get #get_by_key }
        }
        HttpMethod::Post => quote! {
            /// Creates an object after checking required fields and enum values.
            pub fn post(
                &self,
                payload: &super::model::#model,
            ) -> Result<::stencil::Response, ::stencil::ClientError> {
                let body = ::stencil::Model::to_record(payload)?;
                #validators::validate_create(&body)?;
                self.endpoint.post(&body)
            }
        },
        HttpMethod::Put => match &key {
            Some(key) => {
                let (param, to_text) = key.param();
                let doc = format!(" Updates the object identified by `{}`.", key.wire);
                quote! {
                    #[doc = #doc]
                    pub fn put(
                        &self,
                        #param,
                        payload: &super::model::#model,
                    ) -> Result<::stencil::Response, ::stencil::ClientError> {
                        #to_text
                        let body = ::stencil::Model::to_record(payload)?;
                        #validators::validate_update(&body)?;
                        self.endpoint.put(Some(key), &body)
                    }
                }
            }
            None => quote! {
                /// Updates the object. Unset fields are left unchanged.
                pub fn put(
                    &self,
                    payload: &super::model::#model,
                ) -> Result<::stencil::Response, ::stencil::ClientError> {
                    let body = ::stencil::Model::to_record(payload)?;
                    #validators::validate_update(&body)?;
                    self.endpoint.put(None, &body)
                }
            },
        },
        HttpMethod::Delete => match &key {
            Some(key) => {
                let (param, to_text) = key.param();
                let doc = format!(" Deletes the object identified by `{}`.", key.wire);
                quote! {
                    #[doc = #doc]
                    pub fn delete(
                        &self,
                        #param,
                    ) -> Result<::stencil::Response, ::stencil::ClientError> {
                        #to_text
                        self.endpoint.delete(Some(key))
                    }
                }
            }
            None => quote! {
                /// Deletes the object.
                pub fn delete(&self) -> Result<::stencil::Response, ::stencil::ClientError> {
                    self.endpoint.delete(None)
                }
            },
        },
    }
}

/// The identifying field of a keyed table.
struct Key<'a> {
    wire: &'a str,
    integer: bool,
}

impl<'a> Key<'a> {
    fn of(table: &Table<'a>) -> Option<Self> {
        let field = table.mkey_field()?;
        Some(Self {
            wire: &field.wire_name,
            integer: field.semantic_type == SemanticType::Integer,
        })
    }

    /// The `key` parameter and the statements binding it as `&str`.
    fn param(&self) -> (TokenStream, TokenStream) {
        if self.integer {
            (
                quote! { key: i64 },
                quote! {
                    let key = key.to_string();
                    let key = key.as_str();
                },
            )
        } else {
            (quote! { key: &str }, TokenStream::new())
        }
    }
}

/// `super::validators::<child>::...` for `table`.
fn validators_path(table: &Table<'_>) -> TokenStream {
    let chain = table.chain.iter().map(|c| ident(c));
    quote! { super::validators #(::#chain)* }
}

fn category_tokens(category: Category) -> TokenStream {
    match category {
        Category::Config => quote! { ::stencil::Category::Config },
        Category::Monitor => quote! { ::stencil::Category::Monitor },
    }
}

fn method_tokens(method: HttpMethod) -> TokenStream {
    match method {
        HttpMethod::Get => quote! { ::stencil::HttpMethod::Get },
        HttpMethod::Post => quote! { ::stencil::HttpMethod::Post },
        HttpMethod::Put => quote! { ::stencil::HttpMethod::Put },
        HttpMethod::Delete => quote! { ::stencil::HttpMethod::Delete },
    }
}
