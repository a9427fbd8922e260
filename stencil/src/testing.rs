//! In-memory transport for generated smoke tests.
//!
//! [`MockTransport`] records every request and answers from a table of
//! canned responses, so generated tests run without a device.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde_json::Value;
use stencil_define::{Category, HttpMethod};

use crate::error::TransportError;
use crate::params::QueryParams;
use crate::record::Record;
use crate::transport::{Response, Transport};

/// A request captured by [`MockTransport`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Category the request was sent under.
    pub category: Category,
    /// Path relative to the category root.
    pub path: String,
    /// Query parameters (GET and DELETE).
    pub query: QueryParams,
    /// Request body (POST and PUT).
    pub body: Option<Record>,
}

/// A [`Transport`] that never leaves the process.
///
/// Unconfigured requests succeed: GET answers with an empty array, every
/// other method with `null`. Responses registered with
/// [`respond`](Self::respond) are returned for every matching request.
///
/// ## Examples
///
/// ```
/// use std::sync::Arc;
/// use stencil::testing::MockTransport;
/// use stencil::{Category, Endpoint, HttpMethod, QueryParams, Response, Value};
///
/// let transport = Arc::new(MockTransport::new());
/// transport.respond(
///     HttpMethod::Get,
///     "system/global",
///     Response::success(Value::from("ok")),
/// );
///
/// let endpoint = Endpoint::new(transport.clone(), Category::Config, "system/global");
/// let response = endpoint.get(None, &QueryParams::new()).unwrap();
///
/// assert_eq!(response.results, Value::from("ok"));
/// assert_eq!(transport.requests().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    requests: Mutex<Vec<RecordedRequest>>,
    responses: Mutex<HashMap<(HttpMethod, String), Response>>,
}

impl MockTransport {
    /// Creates a transport with no canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answers every `method` request on `path` with `response`.
    pub fn respond(&self, method: HttpMethod, path: impl Into<String>, response: Response) {
        lock(&self.responses).insert((method, path.into()), response);
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    /// The most recent request.
    pub fn last_request(&self) -> Option<RecordedRequest> {
        lock(&self.requests).last().cloned()
    }

    /// Forgets recorded requests. Canned responses are kept.
    pub fn clear(&self) {
        lock(&self.requests).clear();
    }

    fn answer(
        &self,
        method: HttpMethod,
        category: Category,
        path: &str,
        query: &QueryParams,
        body: Option<&Record>,
    ) -> Result<Response, TransportError> {
        lock(&self.requests).push(RecordedRequest {
            method,
            category,
            path: path.to_string(),
            query: query.clone(),
            body: body.cloned(),
        });

        let canned = lock(&self.responses)
            .get(&(method, path.to_string()))
            .cloned();
        Ok(canned.unwrap_or_else(|| match method {
            HttpMethod::Get => Response::success(Value::Array(Vec::new())),
            _ => Response::success(Value::Null),
        }))
    }
}

impl Transport for MockTransport {
    fn get(
        &self,
        category: Category,
        path: &str,
        params: &QueryParams,
    ) -> Result<Response, TransportError> {
        self.answer(HttpMethod::Get, category, path, params, None)
    }

    fn post(
        &self,
        category: Category,
        path: &str,
        body: &Record,
    ) -> Result<Response, TransportError> {
        self.answer(HttpMethod::Post, category, path, &QueryParams::new(), Some(body))
    }

    fn put(
        &self,
        category: Category,
        path: &str,
        body: &Record,
    ) -> Result<Response, TransportError> {
        self.answer(HttpMethod::Put, category, path, &QueryParams::new(), Some(body))
    }

    fn delete(
        &self,
        category: Category,
        path: &str,
        params: &QueryParams,
    ) -> Result<Response, TransportError> {
        self.answer(HttpMethod::Delete, category, path, params, None)
    }
}

// A panicking test thread must not hide the requests recorded before it.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
