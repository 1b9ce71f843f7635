use thiserror::Error;

/// Failures reaching or decoding a document in the backing store.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// Network-level failure (connect, timeout, TLS).
    #[error("transport error on {backend}: {reason}")]
    Transport { backend: String, reason: String },

    /// The store answered with a non-success status.
    #[error("{backend} answered {status} for {key}")]
    Status {
        backend: String,
        key: String,
        status: u16,
    },

    /// The stored document could not be decoded.
    #[error("malformed document at {key}: {reason}")]
    Malformed { key: String, reason: String },

    /// Encoding a document for the wire failed.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Backend has no conditional-write primitive.
    #[error("conditional writes not supported by {0}")]
    Unsupported(String),

    /// Every member of a composite store rejected the operation.
    #[error("no backend accepted the operation on {0}")]
    AllBackendsFailed(String),
}
