//! Error types for the bloom filter crate.

use thiserror::Error;

/// Errors surfaced while constructing a [`Filter`](crate::Filter).
///
/// Validation errors only: a malformed `FilterConfig` never produces a
/// `Filter`, so callers can match on these variants by value.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum FilterError {
    #[error("filter name must not be empty")]
    NameEmpty,

    #[error("filter name '{0}' is already in use")]
    NameRepeated(String),

    #[error("false positive probability must be >= 0, got {0}")]
    FalseProbabilityNegative(f64),

    #[error("false positive probability must be <= 1, got {0}")]
    FalseProbabilityGreaterThanOne(f64),
}

/// Errors surfaced from a [`Backend`](crate::backend::Backend) operation.
///
/// Validation errors never appear here -- by the time a `Filter` is calling
/// into a backend, its configuration has already been accepted.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The remote store returned a reply that wasn't the array shape the
    /// batch-get/batch-set protocol requires.
    #[error("unexpected reply shape from remote store")]
    UnexpectedReplyShape,

    /// The calling context's cancellation token fired before the backend
    /// could complete the operation.
    #[error("operation cancelled")]
    Cancelled,

    /// Any transport or script failure from the remote store, including a
    /// second consecutive "script unknown" after the backend already retried
    /// once.
    #[error("remote store error: {0}")]
    Remote(#[from] RemoteStoreError),
}

/// Errors produced by a [`RemoteStore`](crate::backend::remote_store::RemoteStore)
/// implementation.
///
/// This is the contract the remote backend depends on; a real client wraps
/// its own transport errors in these variants so the remote backend's
/// retry-on-`ScriptNotKnown` logic has something to match on.
#[derive(Debug, Error)]
pub enum RemoteStoreError {
    /// The store does not recognize the script reference (e.g. it restarted
    /// and lost its script cache). The remote backend re-registers and
    /// retries exactly once on this variant.
    #[error("script not known to remote store")]
    ScriptNotKnown,

    /// Any other transport-level failure (connection refused, timeout, I/O).
    #[error("transport error: {0}")]
    Transport(String),

    /// The script itself failed to parse/load on the server.
    #[error("script registration failed: {0}")]
    ScriptLoad(String),
}
