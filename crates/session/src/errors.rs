//! Gateway errors.

use thiserror::Error;

/// Errors surfaced by cart persistence backends.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The requested cart does not exist in the backend.
    #[error("cart not found")]
    NotFound,

    /// The backend does not implement this operation.
    #[error("operation not supported by this backend")]
    Unsupported,

    /// Wrapped serialization error.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Wrapped filesystem error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
