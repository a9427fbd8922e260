//! The transport collaborator consumed by generated clients.
//!
//! Generated code never performs I/O directly. Every operation is forwarded
//! to a [`Transport`] supplied by the caller, which owns sessions,
//! authentication, retries and the HTTP stack.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use stencil_define::Category;

use crate::error::{ClientError, TransportError};
use crate::params::QueryParams;
use crate::record::Record;

/// Sends requests on behalf of generated clients.
///
/// `path` is relative to the category root (e.g. `firewall/policy/7`) and
/// is already percent-encoded.
pub trait Transport: Send + Sync {
    /// Reads one object or a collection.
    fn get(
        &self,
        category: Category,
        path: &str,
        params: &QueryParams,
    ) -> Result<Response, TransportError>;

    /// Creates an object from `body`.
    fn post(
        &self,
        category: Category,
        path: &str,
        body: &Record,
    ) -> Result<Response, TransportError>;

    /// Updates the object at `path` with `body`.
    fn put(
        &self,
        category: Category,
        path: &str,
        body: &Record,
    ) -> Result<Response, TransportError>;

    /// Removes the object at `path`.
    fn delete(
        &self,
        category: Category,
        path: &str,
        params: &QueryParams,
    ) -> Result<Response, TransportError>;
}

/// Success marker carried by every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// The API accepted the request.
    Success,
    /// The API rejected the request.
    Error,
}

/// A decoded API response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    /// Success marker.
    pub status: ResponseStatus,
    /// HTTP status code.
    pub http_status: u16,
    /// Payload: an object, an array of objects, or `null`.
    #[serde(default)]
    pub results: Value,
    /// Error text for failed requests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Response {
    /// A `200` success response carrying `results`.
    pub fn success(results: Value) -> Self {
        Self {
            status: ResponseStatus::Success,
            http_status: 200,
            results,
            message: None,
        }
    }

    /// A failure response.
    pub fn error(http_status: u16, message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Error,
            http_status,
            results: Value::Null,
            message: Some(message.into()),
        }
    }

    /// Returns `true` if the API accepted the request.
    pub fn is_success(&self) -> bool {
        self.status == ResponseStatus::Success
    }

    /// Turns a failure response into [`ClientError::Api`].
    pub fn into_checked(self) -> Result<Self, ClientError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ClientError::Api {
                http_status: self.http_status,
                message: self
                    .message
                    .unwrap_or_else(|| format!("request failed with HTTP {}", self.http_status)),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_success_passes_check() {
        let response = Response::success(json!([{"name": "a"}]));
        assert!(response.is_success());
        let checked = response.into_checked().unwrap();
        assert_eq!(checked.http_status, 200);
    }

    #[test]
    fn test_error_becomes_api_error() {
        let response = Response::error(500, "entry not found");
        match response.into_checked() {
            Err(ClientError::Api {
                http_status,
                message,
            }) => {
                assert_eq!(http_status, 500);
                assert_eq!(message, "entry not found");
            }
            other => panic!("Expected Api error, got: {:?}", other),
        }
    }

    #[test]
    fn test_error_without_message() {
        let response = Response {
            status: ResponseStatus::Error,
            http_status: 403,
            results: Value::Null,
            message: None,
        };
        let err = response.into_checked().unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[test]
    fn test_response_deserializes_without_results() {
        let response: Response =
            serde_json::from_value(json!({"status": "success", "http_status": 200})).unwrap();
        assert!(response.is_success());
        assert_eq!(response.results, Value::Null);
    }
}
