//! Error types for the synchronization core.

use thiserror::Error;

use crate::types::ProviderId;

/// Errors from the remote provider resource.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Network error (connection failed, DNS, interrupted body)
    #[error("network error: {0}")]
    Network(String),

    /// Non-success response from the server
    #[error("server error ({status}): {body}")]
    Api { status: u16, body: String },

    /// Payload was valid JSON but not the expected provider list
    #[error("unexpected response shape: expected a list of providers")]
    UnexpectedShape,

    /// Invalid JSON or a record that does not deserialize
    #[error("parse error: {0}")]
    Parse(String),
}

/// Errors surfaced by [`crate::store::ProviderStore`] operations.
///
/// Every variant is also recorded in the store's current-error slot as a
/// human-readable message; nothing here is fatal to a consuming surface.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Rejected before any remote call was made
    #[error("{0}")]
    Validation(String),

    /// No local record with the given id
    #[error("no provider with id {0}")]
    UnknownId(ProviderId),

    /// Remote call failed; local state left as it was
    #[error(transparent)]
    Api(#[from] ApiError),
}
