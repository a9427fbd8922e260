//! Building blocks for generated validators.
//!
//! Generated `validate_create` / `validate_update` functions are thin
//! wrappers that pass their resource's constant tables to these helpers.
//! Nothing here touches the network.

use serde_json::Value;

use crate::error::ValidationError;
use crate::record::Record;

/// Checks that every field in `required` is present and not `null`.
///
/// The error names all missing fields, not just the first.
pub fn require_fields(
    resource: &str,
    payload: &Record,
    required: &[&str],
) -> Result<(), ValidationError> {
    let missing: Vec<String> = required
        .iter()
        .filter(|wire| payload.get(**wire).is_none_or(Value::is_null))
        .map(|wire| (*wire).to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::MissingRequiredField {
            resource: resource.to_string(),
            fields: missing,
        })
    }
}

/// Checks every present enum field against its declared values.
///
/// Absent and `null` fields are not checked.
pub fn check_enums(
    resource: &str,
    payload: &Record,
    enums: &[(&str, &[&str])],
) -> Result<(), ValidationError> {
    for (wire, allowed) in enums {
        let Some(value) = payload.get(*wire) else {
            continue;
        };
        let text = match value {
            Value::Null => continue,
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if !allowed.contains(&text.as_str()) {
            return Err(ValidationError::InvalidEnumValue {
                resource: resource.to_string(),
                field: (*wire).to_string(),
                value: text,
                allowed: allowed.iter().map(|v| (*v).to_string()).collect(),
            });
        }
    }
    Ok(())
}

/// The object rows of a child table inside `payload`.
///
/// Non-object entries are skipped; an absent or non-array field yields
/// nothing.
pub fn table_rows<'a>(payload: &'a Record, wire: &str) -> impl Iterator<Item = &'a Record> {
    payload
        .get(wire)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            other => panic!("Expected object, got: {:?}", other),
        }
    }

    #[test]
    fn test_all_missing_fields_are_named() {
        let payload = record(json!({"name": "a", "comment": null}));
        let err = require_fields(
            "config.firewall.policy",
            &payload,
            &["name", "srcintf", "dstintf", "comment"],
        )
        .unwrap_err();
        match err {
            ValidationError::MissingRequiredField { resource, fields } => {
                assert_eq!(resource, "config.firewall.policy");
                assert_eq!(fields, vec!["srcintf", "dstintf", "comment"]);
            }
            other => panic!("Expected MissingRequiredField, got: {:?}", other),
        }
    }

    #[test]
    fn test_complete_payload_passes() {
        let payload = record(json!({"name": "a", "id": 0}));
        assert!(require_fields("r", &payload, &["name", "id"]).is_ok());
        assert!(require_fields("r", &Record::new(), &[]).is_ok());
    }

    #[test]
    fn test_declared_enum_value_passes() {
        let payload = record(json!({"action": "deny"}));
        assert!(check_enums("r", &payload, &[("action", &["accept", "deny"])]).is_ok());
    }

    #[test]
    fn test_undeclared_enum_value_rejected() {
        let payload = record(json!({"action": "maybe"}));
        let err = check_enums("r", &payload, &[("action", &["accept", "deny"])]).unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidEnumValue {
                resource: "r".to_string(),
                field: "action".to_string(),
                value: "maybe".to_string(),
                allowed: vec!["accept".to_string(), "deny".to_string()],
            }
        );
    }

    #[test]
    fn test_non_string_enum_value_is_compared_as_text() {
        let payload = record(json!({"mode": 1}));
        assert!(check_enums("r", &payload, &[("mode", &["1", "2"])]).is_ok());
        let payload = record(json!({"mode": true}));
        assert!(check_enums("r", &payload, &[("mode", &["1", "2"])]).is_err());
    }

    #[test]
    fn test_absent_and_null_enum_fields_skipped() {
        let payload = record(json!({"action": null}));
        assert!(check_enums("r", &payload, &[("action", &["accept"]), ("status", &["enable"])]).is_ok());
    }

    #[test]
    fn test_table_rows_yields_objects_only() {
        let payload = record(json!({"member": [{"name": "a"}, "junk", {"name": "b"}], "name": "x"}));
        let names: Vec<_> = table_rows(&payload, "member")
            .filter_map(|row| row.get("name").and_then(Value::as_str))
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(table_rows(&payload, "name").count(), 0);
        assert_eq!(table_rows(&payload, "absent").count(), 0);
    }
}
