//! The mapping view of generated models and response decoding.
//!
//! Every generated model is a plain struct (the attribute view) that also
//! implements [`Model`], which exposes the same data as a wire-keyed
//! [`Record`] (the mapping view). Both views are derived from one serde
//! definition, so they cannot disagree about a field.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::error::ClientError;
use crate::transport::Response;

/// A JSON object keyed by wire names.
pub type Record = serde_json::Map<String, Value>;

/// Implemented by every generated model type.
///
/// ## Examples
///
/// ```
/// use serde::{Deserialize, Serialize};
/// use stencil::{Model, Record, Value};
///
/// #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// struct Address {
///     #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
///     name: Option<String>,
///     #[serde(rename = "start-ip", default, skip_serializing_if = "Option::is_none")]
///     start_ip: Option<String>,
/// }
///
/// impl Model for Address {
///     const FIELDS: &'static [&'static str] = &["name", "start-ip"];
/// }
///
/// let mut record = Record::new();
/// record.insert("start-ip".to_string(), Value::from("10.0.0.1"));
/// let address = Address::from_record(record).unwrap();
///
/// assert_eq!(address.start_ip.as_deref(), Some("10.0.0.1"));
/// assert_eq!(address.field("start-ip"), Some(Value::from("10.0.0.1")));
/// assert_eq!(address.field("name"), None);
/// ```
pub trait Model: Serialize + DeserializeOwned + Default + Clone {
    /// Wire names of every field, in schema order.
    const FIELDS: &'static [&'static str];

    /// Builds the attribute view from a wire-keyed record.
    fn from_record(record: Record) -> Result<Self, ClientError> {
        Ok(serde_json::from_value(Value::Object(record))?)
    }

    /// Renders the mapping view. Unset fields are omitted.
    fn to_record(&self) -> Result<Record, ClientError> {
        match serde_json::to_value(self)? {
            Value::Object(record) => Ok(record),
            other => Err(shape_error("object", &other)),
        }
    }

    /// Reads one field of the mapping view by wire name.
    fn field(&self, wire_name: &str) -> Option<Value> {
        self.to_record().ok()?.remove(wire_name)
    }
}

/// Decodes a collection response.
///
/// Arrays decode element-wise, a lone object becomes a one-element vector
/// and `null` an empty one.
pub fn decode_many<M: Model>(response: Response) -> Result<Vec<M>, ClientError> {
    match response.into_checked()?.results {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).map_err(ClientError::from))
            .collect(),
        Value::Object(record) => Ok(vec![M::from_record(record)?]),
        Value::Null => Ok(Vec::new()),
        other => Err(shape_error("array", &other)),
    }
}

/// Decodes a single-object response.
///
/// Keyed lookups usually answer with a one-element array; singletons answer
/// with the object itself. An empty answer is [`ClientError::NotFound`].
pub fn decode_one<M: Model>(response: Response, path: &str) -> Result<M, ClientError> {
    let not_found = || ClientError::NotFound {
        path: path.to_string(),
    };
    match response.into_checked()?.results {
        Value::Array(items) => {
            let first = items.into_iter().next().ok_or_else(not_found)?;
            Ok(serde_json::from_value(first)?)
        }
        Value::Object(record) => M::from_record(record),
        Value::Null => Err(not_found()),
        other => Err(shape_error("object", &other)),
    }
}

fn shape_error(expected: &str, found: &Value) -> ClientError {
    ClientError::Decode(<serde_json::Error as serde::de::Error>::custom(format!(
        "expected {expected}, found {found}"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Member {
        #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    }

    impl Model for Member {
        const FIELDS: &'static [&'static str] = &["name"];
    }

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    struct Group {
        #[serde(rename = "name", default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        #[serde(rename = "max-size", default, skip_serializing_if = "Option::is_none")]
        max_size: Option<i64>,
        #[serde(rename = "allow-routing", default, skip_serializing_if = "Option::is_none")]
        allow_routing: Option<bool>,
        #[serde(rename = "member", default, skip_serializing_if = "Option::is_none")]
        member: Option<Vec<Member>>,
    }

    impl Model for Group {
        const FIELDS: &'static [&'static str] = &["name", "max-size", "allow-routing", "member"];
    }

    fn sample() -> Value {
        json!({
            "name": "web",
            "max-size": 12,
            "allow-routing": true,
            "member": [{"name": "a"}, {"name": "b"}],
            "q_origin_key": "web"
        })
    }

    #[test]
    fn test_mapping_and_attribute_views_agree() {
        let Value::Object(record) = sample() else {
            panic!("sample is an object");
        };
        let group = Group::from_record(record).unwrap();

        assert_eq!(group.field("name"), group.name.clone().map(Value::from));
        assert_eq!(group.field("max-size"), group.max_size.map(Value::from));
        assert_eq!(group.field("allow-routing"), group.allow_routing.map(Value::from));
        assert_eq!(
            group.field("member"),
            Some(json!([{"name": "a"}, {"name": "b"}]))
        );
    }

    #[test]
    fn test_every_declared_field_is_in_the_mapping() {
        let group: Group = serde_json::from_value(sample()).unwrap();
        let record = group.to_record().unwrap();
        for wire in Group::FIELDS {
            assert!(record.contains_key(*wire), "missing {wire}");
        }
        // Unknown response keys are not part of the model
        assert!(!record.contains_key("q_origin_key"));
    }

    #[test]
    fn test_unset_fields_are_absent_from_mapping() {
        let group = Group::default();
        assert!(group.to_record().unwrap().is_empty());
        assert_eq!(group.field("name"), None);
    }

    #[test]
    fn test_decode_many_from_array() {
        let response = Response::success(json!([{"name": "a"}, {"name": "b"}]));
        let members: Vec<Member> = decode_many(response).unwrap();
        assert_eq!(members.len(), 2);
        assert_eq!(members[1].name.as_deref(), Some("b"));
    }

    #[test]
    fn test_decode_many_from_object_and_null() {
        let one: Vec<Member> = decode_many(Response::success(json!({"name": "a"}))).unwrap();
        assert_eq!(one.len(), 1);
        let none: Vec<Member> = decode_many(Response::success(Value::Null)).unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn test_decode_many_rejects_scalar() {
        let result: Result<Vec<Member>, _> = decode_many(Response::success(json!(5)));
        match result {
            Err(ClientError::Decode(e)) => assert!(e.to_string().contains("expected array")),
            other => panic!("Expected Decode error, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_one_takes_first_element() {
        let response = Response::success(json!([{"name": "first"}, {"name": "second"}]));
        let member: Member = decode_one(response, "user/group/web/member").unwrap();
        assert_eq!(member.name.as_deref(), Some("first"));
    }

    #[test]
    fn test_decode_one_empty_is_not_found() {
        let result: Result<Member, _> = decode_one(Response::success(json!([])), "user/group/x");
        match result {
            Err(ClientError::NotFound { path }) => assert_eq!(path, "user/group/x"),
            other => panic!("Expected NotFound, got: {:?}", other),
        }
    }

    #[test]
    fn test_decode_propagates_api_failure() {
        let result: Result<Member, _> = decode_one(Response::error(404, "missing"), "x");
        assert!(matches!(result, Err(ClientError::Api { http_status: 404, .. })));
    }
}
