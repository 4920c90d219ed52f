//! Remote secret store contract
//!
//! The store only ever sees envelope text, an expiration and the one-time
//! flag. It hands back an opaque id on submit and the envelope text on fetch.

pub mod http;
pub mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

use std::future::Future;
use std::sync::Arc;

use burnlink_core::NewSecret;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store answered with a non-success status
    #[error("store returned HTTP {status}: {detail}")]
    Rejected { status: u16, detail: String },

    /// The secret does not exist, expired, or was already consumed
    #[error("secret not found")]
    NotFound,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed response: {0}")]
    Malformed(String),
}

pub trait SecretStore: Send + Sync {
    /// Store a new secret and return its id.
    fn submit(
        &self,
        secret: &NewSecret,
    ) -> impl Future<Output = Result<String, StoreError>> + Send;

    /// Fetch the envelope text for `id`. One-time secrets are gone after
    /// the first successful fetch.
    fn fetch(&self, id: &str) -> impl Future<Output = Result<String, StoreError>> + Send;
}

impl<S: SecretStore> SecretStore for Arc<S> {
    fn submit(
        &self,
        secret: &NewSecret,
    ) -> impl Future<Output = Result<String, StoreError>> + Send {
        (**self).submit(secret)
    }

    fn fetch(&self, id: &str) -> impl Future<Output = Result<String, StoreError>> + Send {
        (**self).fetch(id)
    }
}
