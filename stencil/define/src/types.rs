//! Enumerations shared by the schema IR.
//!
//! - [`Category`] - Whether a resource lives under the config or monitor tree
//! - [`HttpMethod`] - Methods a live resource accepts
//! - [`SemanticType`] - The semantic tag of a schema field

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Top-level classification of a resource.
///
/// Config resources are mutable objects; monitor resources are observed
/// state. The category is also the first segment of every dotted path and
/// the root module of the generated crate.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use stencil_define::Category;
///
/// assert_eq!(Category::from_str("config").unwrap(), Category::Config);
/// assert_eq!(Category::from_str("cmdb").unwrap(), Category::Config);
/// assert_eq!(Category::Monitor.to_string(), "monitor");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Category {
    /// Configuration objects (create, read, update, delete).
    #[serde(alias = "cmdb")]
    #[strum(to_string = "config", serialize = "cmdb")]
    Config,
    /// Runtime state and statistics.
    Monitor,
}

impl Category {
    /// The lowercase marker used on the wire and as the root module name.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// HTTP methods a resource may support.
///
/// Parsing is case-insensitive so schema documents may spell methods either
/// way; display is always uppercase. The ordering (`GET < POST < PUT <
/// DELETE`) fixes the order operations are emitted in.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use stencil_define::HttpMethod;
///
/// assert_eq!(HttpMethod::from_str("get").unwrap(), HttpMethod::Get);
/// assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    /// Read one object or the whole collection.
    Get,
    /// Create an object.
    Post,
    /// Update an object.
    Put,
    /// Remove an object.
    Delete,
}

impl HttpMethod {
    /// Uppercase method name.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

/// The semantic type of a schema field.
///
/// Schema documents use a handful of spellings for each type; every alias
/// parses to the same variant. `Display` yields the canonical tag.
///
/// ## Examples
///
/// ```
/// use std::str::FromStr;
/// use stencil_define::SemanticType;
///
/// assert_eq!(SemanticType::from_str("var-string").unwrap(), SemanticType::String);
/// assert_eq!(SemanticType::from_str("ipv4-classnet").unwrap(), SemanticType::IpAddress);
/// assert_eq!(SemanticType::NestedTable.to_string(), "nested-table");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum SemanticType {
    /// Free text.
    #[strum(to_string = "string", serialize = "var-string", serialize = "password")]
    String,
    /// Signed or unsigned integer.
    #[strum(to_string = "integer", serialize = "uint")]
    Integer,
    /// `true`/`false` (some APIs spell these as enable/disable enums instead).
    Boolean,
    /// An address, netmask or prefix, carried as text.
    #[strum(
        to_string = "ip-address",
        serialize = "ipv4-address",
        serialize = "ipv6-address",
        serialize = "ipv4-classnet",
        serialize = "ipv4-netmask"
    )]
    IpAddress,
    /// One value out of a closed set.
    #[strum(to_string = "enum", serialize = "option")]
    Enum,
    /// The name of an object in another resource.
    #[strum(to_string = "reference", serialize = "datasource")]
    Reference,
    /// A list of child objects with their own fields.
    #[strum(to_string = "nested-table", serialize = "table")]
    NestedTable,
}

impl SemanticType {
    /// Returns `true` for every type that maps to a single scalar value.
    pub fn is_scalar(self) -> bool {
        !matches!(self, SemanticType::NestedTable)
    }
}
