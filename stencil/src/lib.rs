//! Runtime support for stencil-generated REST resource clients.
//!
//! Code emitted by `stencil-gen` depends on this crate and nothing else
//! besides `serde`. It provides:
//!
//! - [`Transport`] - The injected collaborator that actually talks to the API
//! - [`Endpoint`] - Path building and dispatch shared by all generated clients
//! - [`Model`] - The mapping view implemented by every generated model
//! - [`GetParams`] - Read parameters with a raw overlay
//! - [`validate`] - Helpers behind generated `validate_create` / `validate_update`
//! - [`testing::MockTransport`] - In-memory transport used by generated tests
//!
//! Request execution, retries, authentication and sessions belong to the
//! [`Transport`] implementation, not to this crate.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use stencil::testing::MockTransport;
//! use stencil::{Category, Endpoint, GetParams};
//!
//! let transport = Arc::new(MockTransport::new());
//! let endpoint = Endpoint::new(transport.clone(), Category::Config, "firewall/policy");
//!
//! let response = endpoint.get(None, &GetParams::new().vdom("root").to_query()).unwrap();
//! assert!(response.is_success());
//! assert_eq!(transport.last_request().unwrap().query["vdom"], "root");
//! ```

pub mod endpoint;
pub mod error;
pub mod params;
pub mod record;
pub mod testing;
pub mod transport;
pub mod validate;

// Re-exports for generated code
pub use endpoint::Endpoint;
pub use error::{ClientError, TransportError, ValidationError};
pub use params::{GetParams, QueryParams};
pub use record::{decode_many, decode_one, Model, Record};
pub use serde_json::Value;
pub use stencil_define::{Category, HttpMethod};
pub use transport::{Response, ResponseStatus, Transport};
