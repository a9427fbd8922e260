//! Error types for generated clients.
//!
//! - [`TransportError`] - Failures reported by the injected transport
//! - [`ClientError`] - Everything a generated client operation can return
//! - [`ValidationError`] - Payload rejected by a generated validator

mod client_error;
mod validation_error;

pub use client_error::{ClientError, TransportError};
pub use validation_error::ValidationError;
