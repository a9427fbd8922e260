//! Path-addressed dispatch shared by every generated client.
//!
//! A generated client holds one [`Endpoint`] and only exposes the
//! operations its resource supports; the endpoint itself is method-agnostic
//! and just builds paths and forwards to the transport.

use std::fmt;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use stencil_define::Category;
use tracing::debug;

use crate::error::ClientError;
use crate::params::QueryParams;
use crate::record::Record;
use crate::transport::{Response, Transport};

/// Characters left as-is in a key segment.
const KEY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// A resource path bound to a transport.
///
/// Cloning is cheap: the transport is shared.
#[derive(Clone)]
pub struct Endpoint {
    transport: Arc<dyn Transport>,
    category: Category,
    path: String,
}

impl fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Endpoint")
            .field("category", &self.category)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl Endpoint {
    /// Binds `path` (relative to the category root) to a transport.
    pub fn new(transport: Arc<dyn Transport>, category: Category, path: impl Into<String>) -> Self {
        Self {
            transport,
            category,
            path: path.into(),
        }
    }

    /// The endpoint of a child table: this path plus `segment`.
    pub fn child(&self, segment: &str) -> Self {
        Self {
            transport: Arc::clone(&self.transport),
            category: self.category,
            path: format!("{}/{}", self.path, segment),
        }
    }

    /// Category this endpoint lives under.
    pub fn category(&self) -> Category {
        self.category
    }

    /// Path relative to the category root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Path of one object: the collection path plus the encoded key.
    pub fn key_path(&self, key: Option<&str>) -> String {
        match key {
            Some(key) => format!(
                "{}/{}",
                self.path,
                utf8_percent_encode(key, KEY_SEGMENT)
            ),
            None => self.path.clone(),
        }
    }

    /// Reads the collection, or one object when `key` is given.
    pub fn get(&self, key: Option<&str>, params: &QueryParams) -> Result<Response, ClientError> {
        let path = self.key_path(key);
        debug!(method = "GET", category = %self.category, path = %path, "dispatching request");
        self.transport
            .get(self.category, &path, params)?
            .into_checked()
    }

    /// Creates an object.
    pub fn post(&self, body: &Record) -> Result<Response, ClientError> {
        debug!(method = "POST", category = %self.category, path = %self.path, "dispatching request");
        self.transport
            .post(self.category, &self.path, body)?
            .into_checked()
    }

    /// Updates one object, or the singleton when `key` is `None`.
    pub fn put(&self, key: Option<&str>, body: &Record) -> Result<Response, ClientError> {
        let path = self.key_path(key);
        debug!(method = "PUT", category = %self.category, path = %path, "dispatching request");
        self.transport
            .put(self.category, &path, body)?
            .into_checked()
    }

    /// Removes one object, or resets the singleton when `key` is `None`.
    pub fn delete(&self, key: Option<&str>) -> Result<Response, ClientError> {
        let path = self.key_path(key);
        debug!(method = "DELETE", category = %self.category, path = %path, "dispatching request");
        self.transport
            .delete(self.category, &path, &QueryParams::new())?
            .into_checked()
    }
}
