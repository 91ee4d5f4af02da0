//! Storage backend abstraction.
//!
//! A `Backend` is opaque bit-array storage addressed by a `(storage key,
//! bit positions)` pair. The [`Filter`](crate::Filter) facade is backend
//! agnostic -- [`memory::InMemoryBackend`] and [`remote::RemoteBackend`]
//! are interchangeable behind this one trait.

pub mod memory;
pub mod remote;
pub mod remote_store;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::BackendError;

/// Backend contract consumed by the filter facade.
///
/// Implementations must be `Send + Sync` since a single backend is commonly
/// shared across many filters and called from arbitrary threads/tasks
/// concurrently.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns `true` iff every position in `positions` is set (1) at
    /// `storage_key`.
    async fn exist(
        &self,
        ctx: &CancellationToken,
        storage_key: &str,
        positions: &[u64],
    ) -> Result<bool, BackendError>;

    /// Sets every position in `positions` to 1 at `storage_key`. Idempotent:
    /// calling `add` twice with the same arguments leaves storage in the
    /// same state as calling it once.
    async fn add(
        &self,
        ctx: &CancellationToken,
        storage_key: &str,
        positions: &[u64],
    ) -> Result<(), BackendError>;
}
