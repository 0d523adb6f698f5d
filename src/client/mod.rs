//! Typed HTTP client for the restaurant operations backend.
//!
//! [`ApiClient`] speaks the wire protocol (envelope unwrapping, tenant and
//! bearer headers); [`DataBackend`] is the seam the sync engine consumes,
//! returning normalized domain records so tests can substitute fakes.

mod backend;
mod error;
mod http;

pub use backend::DataBackend;
pub use error::ClientError;
pub use http::ApiClient;
