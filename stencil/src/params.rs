//! Query parameters for read operations.

use std::collections::BTreeMap;

/// Query parameters forwarded verbatim to the transport.
///
/// A `BTreeMap` keeps the parameter order stable in logs and tests.
pub type QueryParams = BTreeMap<String, String>;

/// Parameters accepted by every generated `get` operation.
///
/// The named parameters cover what the API understands for reads; `extra`
/// is a raw overlay for anything else. When a key appears in both, the
/// named parameter wins.
///
/// ## Examples
///
/// ```
/// use stencil::GetParams;
///
/// let params = GetParams::new()
///     .vdom("root")
///     .filter("name==web")
///     .extra("vdom", "ignored")
///     .extra("skip", "1");
///
/// let query = params.to_query();
/// assert_eq!(query["vdom"], "root");
/// assert_eq!(query["filter"], "name==web");
/// assert_eq!(query["skip"], "1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GetParams {
    /// Virtual domain to read from.
    pub vdom: Option<String>,
    /// Filter expression (e.g. `name==web`).
    pub filter: Option<String>,
    /// Restrict the returned fields.
    pub format: Vec<String>,
    /// Index of the first returned entry.
    pub start: Option<u64>,
    /// Maximum number of returned entries.
    pub count: Option<u64>,
    /// Include object metadata.
    pub with_meta: Option<bool>,
    /// Include datasource details for reference fields.
    pub datasource: Option<bool>,
    /// Raw parameters merged underneath the named ones.
    pub extra: QueryParams,
}

impl GetParams {
    /// Creates an empty parameter set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the virtual domain.
    pub fn vdom(mut self, vdom: impl Into<String>) -> Self {
        self.vdom = Some(vdom.into());
        self
    }

    /// Sets the filter expression.
    pub fn filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Adds a field to the returned format.
    pub fn format(mut self, field: impl Into<String>) -> Self {
        self.format.push(field.into());
        self
    }

    /// Sets the index of the first entry.
    pub fn start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    /// Sets the maximum number of entries.
    pub fn count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    /// Requests object metadata.
    pub fn with_meta(mut self, with_meta: bool) -> Self {
        self.with_meta = Some(with_meta);
        self
    }

    /// Requests datasource details.
    pub fn datasource(mut self, datasource: bool) -> Self {
        self.datasource = Some(datasource);
        self
    }

    /// Adds a raw parameter to the overlay.
    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Merges a whole raw overlay.
    pub fn with_extra(mut self, extra: QueryParams) -> Self {
        self.extra.extend(extra);
        self
    }

    /// Renders the query map. Named parameters override `extra`.
    pub fn to_query(&self) -> QueryParams {
        let mut query = self.extra.clone();
        if let Some(vdom) = &self.vdom {
            query.insert("vdom".to_string(), vdom.clone());
        }
        if let Some(filter) = &self.filter {
            query.insert("filter".to_string(), filter.clone());
        }
        if !self.format.is_empty() {
            query.insert("format".to_string(), self.format.join("|"));
        }
        if let Some(start) = self.start {
            query.insert("start".to_string(), start.to_string());
        }
        if let Some(count) = self.count {
            query.insert("count".to_string(), count.to_string());
        }
        if let Some(with_meta) = self.with_meta {
            query.insert("with_meta".to_string(), with_meta.to_string());
        }
        if let Some(datasource) = self.datasource {
            query.insert("datasource".to_string(), datasource.to_string());
        }
        query
    }
}
