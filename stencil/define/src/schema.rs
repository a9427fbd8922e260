//! Resource schema IR.
//!
//! A [`ResourceSchema`] is built once per schema document by the generator's
//! parser and is read-only afterwards. Every generator (model, client,
//! validators, tests) walks the same value, which is what keeps the emitted
//! artifacts consistent with each other.

use std::collections::BTreeSet;

use crate::types::{Category, HttpMethod, SemanticType};

/// One field of a resource or child table.
///
/// Fields keep document order. A field whose type is
/// [`SemanticType::NestedTable`] has a matching [`ChildTable`] (same wire
/// name) in the owning table's `child_tables`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Name used in JSON payloads (e.g. `"src-intf"`).
    pub wire_name: String,
    /// Normalized identifier used in generated code (e.g. `src_intf`).
    pub code_name: String,
    /// Semantic type tag.
    pub semantic_type: SemanticType,
    /// Whether a create payload must carry this field.
    pub required: bool,
    /// Declared enum values, verbatim and in document order.
    ///
    /// Non-empty iff `semantic_type` is [`SemanticType::Enum`].
    pub enum_values: Vec<String>,
    /// Schema default, rendered as text. Only used for documentation.
    pub default: Option<String>,
    /// Help text from the schema.
    pub help: Option<String>,
    /// Target of a reference field (e.g. `"system.interface.name"`).
    pub reference: Option<String>,
}

impl Field {
    /// Creates a field with no constraints beyond its type.
    pub fn new(
        wire_name: impl Into<String>,
        code_name: impl Into<String>,
        semantic_type: SemanticType,
    ) -> Self {
        Self {
            wire_name: wire_name.into(),
            code_name: code_name.into(),
            semantic_type,
            required: false,
            enum_values: Vec::new(),
            default: None,
            help: None,
            reference: None,
        }
    }

    /// Marks the field as required.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Sets the declared enum values.
    pub fn with_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Returns `true` if the field is an enumeration.
    pub fn is_enum(&self) -> bool {
        self.semantic_type == SemanticType::Enum
    }

    /// Returns `true` if the field holds a nested table.
    pub fn is_table(&self) -> bool {
        self.semantic_type == SemanticType::NestedTable
    }
}

/// A nested, list-valued sub-resource declared inside a parent table.
///
/// Child tables are owned by their parent and may nest further.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildTable {
    /// Wire segment appended to the parent's path.
    pub wire_name: String,
    /// Normalized identifier (the parent's field name for this table).
    pub code_name: String,
    /// Help text from the schema.
    pub help: Option<String>,
    /// Fields in document order.
    pub fields: Vec<Field>,
    /// Nested tables in document order.
    pub child_tables: Vec<ChildTable>,
    /// Wire name of the identifying field, if any.
    pub mkey: Option<String>,
}

impl ChildTable {
    /// Looks up a field by wire name.
    pub fn field(&self, wire_name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }

    /// Fields that a create payload must carry, in document order.
    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Enumerated fields, in document order.
    pub fn enum_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_enum())
    }
}

/// The parsed, normalized description of one REST resource.
///
/// ## Examples
///
/// ```
/// use std::collections::BTreeSet;
/// use stencil_define::{Category, Field, HttpMethod, ResourceSchema, SemanticType};
///
/// let schema = ResourceSchema {
///     category: Category::Config,
///     dotted_path: "config.system.global".to_string(),
///     wire_path: "system/global".to_string(),
///     module_path: vec!["system".to_string(), "global".to_string()],
///     help: None,
///     mkey: None,
///     fields: vec![Field::new("hostname", "hostname", SemanticType::String)],
///     child_tables: vec![],
///     supported_methods: BTreeSet::from([HttpMethod::Get, HttpMethod::Put]),
/// };
///
/// assert!(schema.is_singleton());
/// assert!(schema.supports(HttpMethod::Put));
/// assert!(!schema.supports(HttpMethod::Delete));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceSchema {
    /// Config or monitor.
    pub category: Category,
    /// Corpus-wide unique address: `<category>.<segment>.<segment>`.
    pub dotted_path: String,
    /// Path under the category as sent to the transport (`firewall/policy`).
    pub wire_path: String,
    /// Normalized module names for each wire path segment.
    pub module_path: Vec<String>,
    /// Help text from the schema.
    pub help: Option<String>,
    /// Wire name of the identifying field. `None` marks a singleton.
    pub mkey: Option<String>,
    /// Fields in document order.
    pub fields: Vec<Field>,
    /// Nested tables in document order.
    pub child_tables: Vec<ChildTable>,
    /// Methods the live API accepts for this resource.
    pub supported_methods: BTreeSet<HttpMethod>,
}

impl ResourceSchema {
    /// A singleton has no identifying key: `get()` yields one object.
    pub fn is_singleton(&self) -> bool {
        self.mkey.is_none()
    }

    /// Returns `true` if the live API accepts `method` for this resource.
    pub fn supports(&self, method: HttpMethod) -> bool {
        self.supported_methods.contains(&method)
    }

    /// Looks up a field by wire name.
    pub fn field(&self, wire_name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.wire_name == wire_name)
    }

    /// The field named by `mkey`, if the resource is keyed.
    pub fn mkey_field(&self) -> Option<&Field> {
        self.mkey.as_deref().and_then(|k| self.field(k))
    }

    /// Fields that a create payload must carry, in document order.
    pub fn required_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.required)
    }

    /// Enumerated fields, in document order.
    pub fn enum_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_enum())
    }

    /// Last wire path segment (`policy` for `firewall/policy`).
    pub fn leaf_name(&self) -> &str {
        self.wire_path.rsplit('/').next().unwrap_or(&self.wire_path)
    }
}
