//! Payload validation errors raised by generated validators.

use thiserror::Error;

/// A payload failed a generated validator.
///
/// Validators run before anything is handed to the transport, so these
/// errors never involve the network.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// One or more required fields are absent (or `null`).
    ///
    /// `fields` names every missing field, in schema order.
    #[error("{resource}: missing required field(s): {}", .fields.join(", "))]
    MissingRequiredField {
        /// Dotted path of the resource or child table.
        resource: String,
        /// Wire names of all missing fields.
        fields: Vec<String>,
    },

    /// A field holds a value outside its declared set.
    #[error("{resource}: invalid value {value:?} for {field}, expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        /// Dotted path of the resource or child table.
        resource: String,
        /// Wire name of the offending field.
        field: String,
        /// The rejected value.
        value: String,
        /// Every declared value.
        allowed: Vec<String>,
    },
}

impl ValidationError {
    /// Wire names of the fields this error is about.
    pub fn fields(&self) -> Vec<&str> {
        match self {
            Self::MissingRequiredField { fields, .. } => fields.iter().map(String::as_str).collect(),
            Self::InvalidEnumValue { field, .. } => vec![field.as_str()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_display_lists_all() {
        let err = ValidationError::MissingRequiredField {
            resource: "config.firewall.policy".to_string(),
            fields: vec!["name".to_string(), "srcintf".to_string()],
        };
        let display = err.to_string();
        assert!(display.contains("config.firewall.policy"));
        assert!(display.contains("name, srcintf"));
        assert_eq!(err.fields(), vec!["name", "srcintf"]);
    }

    #[test]
    fn test_invalid_enum_display() {
        let err = ValidationError::InvalidEnumValue {
            resource: "config.firewall.policy".to_string(),
            field: "action".to_string(),
            value: "maybe".to_string(),
            allowed: vec!["accept".to_string(), "deny".to_string()],
        };
        let display = err.to_string();
        assert!(display.contains("\"maybe\""));
        assert!(display.contains("action"));
        assert!(display.contains("accept, deny"));
        assert_eq!(err.fields(), vec!["action"]);
    }
}
