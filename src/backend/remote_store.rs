//! The remote store's contract, as consumed by [`super::remote::RemoteBackend`].
//!
//! This is deliberately narrow: a real client (the remote server itself is
//! an external collaborator, out of scope for this crate) only needs to
//! support loading a literal script and caching a content-address for it,
//! then invoking that script by reference with `KEYS`/`ARGS` arrays and
//! returning a structured reply. Transport and connection management are
//! the client's concern.

use async_trait::async_trait;

use crate::error::RemoteStoreError;

/// A reply from invoking a script on the remote store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScriptReply {
    /// An array reply -- the only shape the batch-get/batch-set protocol
    /// expects back.
    Array(Vec<i64>),
    /// Any other reply shape (error, nil, bulk string, ...). The remote
    /// backend treats this as [`crate::error::BackendError::UnexpectedReplyShape`].
    Other,
}

/// Opaque content-address for a registered script, as returned by
/// [`RemoteStore::load_script`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScriptRef(pub String);

/// The surface the remote backend depends on.
///
/// Implemented by a real remote-store client in production, and by an
/// in-process mock in this crate's tests so the backend's batching and
/// retry logic can be exercised without a network dependency.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Registers a literal script body and returns a content-addressed
    /// reference to it. Called once per script at backend construction.
    async fn load_script(&self, script: &str) -> Result<ScriptRef, RemoteStoreError>;

    /// Invokes a previously-loaded script by reference with one key and a
    /// sequence of integer arguments (bit positions). Returns
    /// `Err(RemoteStoreError::ScriptNotKnown)` if the store no longer
    /// recognizes `script_ref` (e.g. after a restart), which the backend
    /// handles by re-registering and retrying once.
    async fn invoke_script(
        &self,
        script_ref: &ScriptRef,
        keys: &[String],
        args: &[i64],
    ) -> Result<ScriptReply, RemoteStoreError>;
}
