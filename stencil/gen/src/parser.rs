//! Schema parsing into the resource IR.
//!
//! [`parse`] turns one raw schema document into a [`ResourceSchema`]. Field
//! order is preserved, enum values are copied verbatim and every wire name
//! is normalized through the shared [`Normalizer`].
//!
//! A malformed field aborts the whole resource with
//! [`SchemaError::Semantic`]; the message names the field's location
//! (e.g. `fields[3].children[0]`) so the schema can be fixed directly.

use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde_json::{Map, Value};
use stencil_define::{Category, ChildTable, Field, HttpMethod, ResourceSchema, SemanticType};

use crate::errors::SchemaError;
use crate::loader::{RawDocument, kind_of};
use crate::naming::{Normalizer, Scope};

/// Parses a raw schema document into a [`ResourceSchema`].
///
/// ## Arguments
///
/// * `raw` - The document returned by [`crate::loader::load`]
/// * `source` - Path of the schema file, used in error messages
/// * `normalizer` - The run's shared name table
/// * `max_depth` - Deepest allowed child table nesting (root fields are depth 0)
///
/// ## Errors
///
/// - [`SchemaError::Format`] if the document is not an object
/// - [`SchemaError::Semantic`] for a missing category, path or method list,
///   an unknown type or method, or a malformed field
/// - [`SchemaError::Depth`] if child tables nest deeper than `max_depth`
/// - [`SchemaError::IdentifierCollision`] if two wire names normalize identically
pub fn parse(
    raw: &RawDocument,
    source: &Path,
    normalizer: &Normalizer,
    max_depth: usize,
) -> Result<ResourceSchema, SchemaError> {
    let ctx = Context {
        source,
        normalizer,
        max_depth,
    };
    let object = ctx.object(raw)?;
    let header = ctx.header(object)?;

    let module_path = ctx.module_path(&header)?;
    let help = ctx.optional_str(object, "help", "help")?;

    let fields_json = match object.get("fields") {
        None | Some(Value::Null) => &[][..],
        Some(Value::Array(items)) => items.as_slice(),
        Some(other) => {
            return Err(ctx.semantic(format!(
                "'fields' must be an array, found {}",
                kind_of(other)
            )));
        }
    };
    let (fields, child_tables) = ctx.table(fields_json, &header.dotted_path, "fields", 0)?;

    let mkey = ctx.optional_str(object, "mkey", "mkey")?;
    if let Some(key) = &mkey {
        match fields.iter().find(|f| &f.wire_name == key) {
            None => {
                return Err(ctx.semantic(format!("mkey '{key}' does not name a field")));
            }
            Some(field) if field.is_table() => {
                return Err(ctx.semantic(format!("mkey '{key}' names a nested table")));
            }
            Some(_) => {}
        }
    }

    Ok(ResourceSchema {
        category: header.category,
        dotted_path: header.dotted_path,
        wire_path: header.wire_path,
        module_path,
        help,
        mkey,
        fields,
        child_tables,
        supported_methods: header.methods,
    })
}

/// Returns the dotted path a document would be registered under.
///
/// Used to detect duplicate resources before any name is recorded.
///
/// ## Errors
///
/// Same header errors as [`parse`].
pub fn dotted_path(raw: &RawDocument, source: &Path) -> Result<String, SchemaError> {
    let normalizer = Normalizer::new();
    let ctx = Context {
        source,
        normalizer: &normalizer,
        max_depth: 0,
    };
    let object = ctx.object(raw)?;
    Ok(ctx.header(object)?.dotted_path)
}

struct Header {
    category: Category,
    wire_path: String,
    segments: Vec<String>,
    dotted_path: String,
    methods: BTreeSet<HttpMethod>,
}

struct Context<'a> {
    source: &'a Path,
    normalizer: &'a Normalizer,
    max_depth: usize,
}

impl Context<'_> {
    fn path(&self) -> PathBuf {
        self.source.to_path_buf()
    }

    fn semantic(&self, message: impl Into<String>) -> SchemaError {
        SchemaError::Semantic {
            path: self.path(),
            message: message.into(),
        }
    }

    fn object<'v>(&self, raw: &'v Value) -> Result<&'v Map<String, Value>, SchemaError> {
        raw.as_object().ok_or_else(|| SchemaError::Format {
            path: self.path(),
            message: format!("expected a JSON object, found {}", kind_of(raw)),
        })
    }

    fn optional_str(
        &self,
        object: &Map<String, Value>,
        key: &str,
        location: &str,
    ) -> Result<Option<String>, SchemaError> {
        match object.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(other) => Err(self.semantic(format!(
                "{location}: expected a string, found {}",
                kind_of(other)
            ))),
        }
    }

    fn header(&self, object: &Map<String, Value>) -> Result<Header, SchemaError> {
        let category = match object.get("category") {
            None | Some(Value::Null) => return Err(self.semantic("missing category marker")),
            Some(Value::String(marker)) => Category::from_str(marker)
                .map_err(|_| self.semantic(format!("unknown category '{marker}'")))?,
            Some(other) => {
                return Err(self.semantic(format!(
                    "category: expected a string, found {}",
                    kind_of(other)
                )));
            }
        };

        let raw_path = self
            .optional_str(object, "path", "path")?
            .ok_or_else(|| self.semantic("missing resource path"))?;
        let wire_path = raw_path.trim_matches('/').to_string();
        if wire_path.is_empty() {
            return Err(self.semantic("resource path is empty"));
        }
        let segments: Vec<String> = wire_path.split('/').map(str::to_string).collect();
        if segments.iter().any(String::is_empty) {
            return Err(self.semantic(format!("resource path '{raw_path}' has an empty segment")));
        }

        let methods = match object.get("methods") {
            None | Some(Value::Null) => return Err(self.semantic("missing method list")),
            Some(Value::Array(items)) => {
                let mut methods = BTreeSet::new();
                for (i, item) in items.iter().enumerate() {
                    let name = item.as_str().ok_or_else(|| {
                        self.semantic(format!(
                            "methods[{i}]: expected a string, found {}",
                            kind_of(item)
                        ))
                    })?;
                    let method = HttpMethod::from_str(name)
                        .map_err(|_| self.semantic(format!("methods[{i}]: unknown method '{name}'")))?;
                    methods.insert(method);
                }
                methods
            }
            Some(other) => {
                return Err(self.semantic(format!(
                    "methods: expected an array, found {}",
                    kind_of(other)
                )));
            }
        };

        let dotted_path = format!("{}.{}", category, segments.join("."));

        Ok(Header {
            category,
            wire_path,
            segments,
            dotted_path,
            methods,
        })
    }

    fn module_path(&self, header: &Header) -> Result<Vec<String>, SchemaError> {
        let mut parent = header.category.to_string();
        let mut module_path = Vec::with_capacity(header.segments.len());
        for segment in &header.segments {
            let code = self.normalizer.normalize(segment, &Scope::modules(&parent))?;
            module_path.push(code);
            parent.push('.');
            parent.push_str(segment);
        }
        Ok(module_path)
    }

    /// Parses the fields of one table and recurses into its child tables.
    fn table(
        &self,
        items: &[Value],
        table_key: &str,
        location: &str,
        depth: usize,
    ) -> Result<(Vec<Field>, Vec<ChildTable>), SchemaError> {
        let scope = Scope::fields(table_key);
        let mut fields = Vec::with_capacity(items.len());
        let mut child_tables = Vec::new();
        let mut seen = HashSet::new();

        for (i, item) in items.iter().enumerate() {
            let loc = format!("{location}[{i}]");
            let object = item.as_object().ok_or_else(|| {
                self.semantic(format!("{loc}: expected an object, found {}", kind_of(item)))
            })?;

            let wire_name = match object.get("name") {
                Some(Value::String(name)) if !name.is_empty() => name.clone(),
                _ => return Err(self.semantic(format!("{loc}: missing field name"))),
            };
            if !seen.insert(wire_name.clone()) {
                return Err(self.semantic(format!("{loc}: duplicate field '{wire_name}'")));
            }

            let semantic_type = match object.get("type") {
                Some(Value::String(tag)) => SemanticType::from_str(tag).map_err(|_| {
                    self.semantic(format!("{loc}: unknown type '{tag}' for '{wire_name}'"))
                })?,
                _ => {
                    return Err(self.semantic(format!("{loc}: missing type for '{wire_name}'")));
                }
            };

            let required = match object.get("required") {
                None | Some(Value::Null) => false,
                Some(Value::Bool(b)) => *b,
                Some(other) => {
                    return Err(self.semantic(format!(
                        "{loc}: 'required' must be a boolean, found {}",
                        kind_of(other)
                    )));
                }
            };

            let enum_values = self.options(object, &loc)?;
            match (semantic_type, enum_values.is_empty()) {
                (SemanticType::Enum, true) => {
                    return Err(self.semantic(format!(
                        "{loc}: enum '{wire_name}' declares no options"
                    )));
                }
                (ty, false) if ty != SemanticType::Enum => {
                    return Err(self.semantic(format!(
                        "{loc}: options declared on non-enum field '{wire_name}'"
                    )));
                }
                _ => {}
            }

            let default = match object.get("default") {
                None | Some(Value::Null) => None,
                Some(Value::String(s)) => Some(s.clone()),
                Some(other) => Some(other.to_string()),
            };

            let code_name = self.normalizer.normalize(&wire_name, &scope)?;

            let children = object.get("children");
            if semantic_type == SemanticType::NestedTable {
                let Some(Value::Array(child_items)) = children else {
                    return Err(self.semantic(format!(
                        "{loc}: table '{wire_name}' needs a 'children' array"
                    )));
                };
                if depth + 1 > self.max_depth {
                    return Err(SchemaError::Depth {
                        path: self.path(),
                        table: loc,
                        max_depth: self.max_depth,
                    });
                }

                let child_key = format!("{table_key}>{wire_name}");
                let (child_fields, grandchildren) = self.table(
                    child_items,
                    &child_key,
                    &format!("{loc}.children"),
                    depth + 1,
                )?;

                let mkey = self.optional_str(object, "mkey", &format!("{loc}.mkey"))?;
                if let Some(key) = &mkey
                    && !child_fields.iter().any(|f| &f.wire_name == key && !f.is_table())
                {
                    return Err(self.semantic(format!(
                        "{loc}: mkey '{key}' does not name a field of '{wire_name}'"
                    )));
                }

                child_tables.push(ChildTable {
                    wire_name: wire_name.clone(),
                    code_name: code_name.clone(),
                    help: self.optional_str(object, "help", &format!("{loc}.help"))?,
                    fields: child_fields,
                    child_tables: grandchildren,
                    mkey,
                });
            } else if children.is_some_and(|c| !c.is_null()) {
                return Err(self.semantic(format!(
                    "{loc}: children declared on non-table field '{wire_name}'"
                )));
            }

            fields.push(Field {
                wire_name,
                code_name,
                semantic_type,
                required,
                enum_values,
                default,
                help: self.optional_str(object, "help", &format!("{loc}.help"))?,
                reference: self.optional_str(object, "datasource", &format!("{loc}.datasource"))?,
            });
        }

        Ok((fields, child_tables))
    }

    /// Reads `options` verbatim: strings or `{ "name": ... }` objects.
    fn options(&self, object: &Map<String, Value>, loc: &str) -> Result<Vec<String>, SchemaError> {
        let items = match object.get("options") {
            None | Some(Value::Null) => return Ok(Vec::new()),
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(self.semantic(format!(
                    "{loc}: 'options' must be an array, found {}",
                    kind_of(other)
                )));
            }
        };

        items
            .iter()
            .enumerate()
            .map(|(j, option)| match option {
                Value::String(s) => Ok(s.clone()),
                Value::Object(o) => match o.get("name") {
                    Some(Value::String(s)) => Ok(s.clone()),
                    _ => Err(self.semantic(format!("{loc}.options[{j}]: missing option name"))),
                },
                other => Err(self.semantic(format!(
                    "{loc}.options[{j}]: expected a string, found {}",
                    kind_of(other)
                ))),
            })
            .collect()
    }
}
