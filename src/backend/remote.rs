//! Remote bit-array backend.
//!
//! Projects the [`Backend`] contract onto a remote string-valued key via two
//! pre-registered server-side scripts, so a `Put`/`Contain` call costs one
//! round trip regardless of `k`.

use async_trait::async_trait;
use tokio::sync::RwLock as AsyncRwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use crate::error::{BackendError, RemoteStoreError};

use super::remote_store::{RemoteStore, ScriptReply, ScriptRef};
use super::Backend;

/// For each position, performs `setbit(key, pos, 1)`, accumulating the
/// prior-bit values into an array reply of length k.
const BATCH_SET_SCRIPT: &str = r#"
local results = {}
for i, pos in ipairs(ARGV) do
    results[i] = redis.call('SETBIT', KEYS[1], pos, 1)
end
return results
"#;

/// For each position, performs `getbit(key, pos)`, returning an array reply
/// of length k of 0/1.
const BATCH_GET_SCRIPT: &str = r#"
local results = {}
for i, pos in ipairs(ARGV) do
    results[i] = redis.call('GETBIT', KEYS[1], pos)
end
return results
"#;

/// A bit is considered set when the reply element equals this sentinel.
const BIT_SET: i64 = 1;

/// Adapter over a [`RemoteStore`] that implements [`Backend`] using the
/// batch-set/batch-get script pair.
pub struct RemoteBackend<S: RemoteStore> {
    store: S,
    batch_set: AsyncRwLock<ScriptRef>,
    batch_get: AsyncRwLock<ScriptRef>,
}

impl<S: RemoteStore> RemoteBackend<S> {
    /// Loads both scripts and caches their content-addresses. A load
    /// failure (network, script syntax) is fatal and surfaces here rather
    /// than deferring to the first call.
    pub async fn new(store: S) -> Result<Self, RemoteStoreError> {
        let batch_set = store.load_script(BATCH_SET_SCRIPT).await?;
        let batch_get = store.load_script(BATCH_GET_SCRIPT).await?;
        Ok(Self {
            store,
            batch_set: AsyncRwLock::new(batch_set),
            batch_get: AsyncRwLock::new(batch_get),
        })
    }

    /// Invokes `script_ref_lock`'s cached reference with `keys`/`args`,
    /// re-registering `script_source` and retrying exactly once if the
    /// store reports the reference as unknown.
    async fn invoke_with_retry(
        &self,
        script_ref_lock: &AsyncRwLock<ScriptRef>,
        script_source: &str,
        keys: &[String],
        args: &[i64],
    ) -> Result<ScriptReply, BackendError> {
        let script_ref = script_ref_lock.read().await.clone();
        match self.store.invoke_script(&script_ref, keys, args).await {
            Ok(reply) => Ok(reply),
            Err(RemoteStoreError::ScriptNotKnown) => {
                warn!("remote store reports script unknown, re-registering and retrying once");
                let mut guard = script_ref_lock.write().await;
                let fresh = self.store.load_script(script_source).await?;
                *guard = fresh.clone();
                drop(guard);
                self.store
                    .invoke_script(&fresh, keys, args)
                    .await
                    .map_err(|e| {
                        error!("retry after script reload also failed");
                        BackendError::Remote(e)
                    })
            }
            Err(e) => Err(BackendError::Remote(e)),
        }
    }

    async fn invoke_cancellable(
        &self,
        ctx: &CancellationToken,
        script_ref_lock: &AsyncRwLock<ScriptRef>,
        script_source: &str,
        keys: &[String],
        args: &[i64],
    ) -> Result<ScriptReply, BackendError> {
        tokio::select! {
            biased;
            _ = ctx.cancelled() => Err(BackendError::Cancelled),
            result = self.invoke_with_retry(script_ref_lock, script_source, keys, args) => result,
        }
    }
}

#[async_trait]
impl<S: RemoteStore> Backend for RemoteBackend<S> {
    async fn exist(
        &self,
        ctx: &CancellationToken,
        storage_key: &str,
        positions: &[u64],
    ) -> Result<bool, BackendError> {
        let keys = vec![storage_key.to_string()];
        let args: Vec<i64> = positions.iter().map(|&p| p as i64).collect();

        let reply = self
            .invoke_cancellable(ctx, &self.batch_get, BATCH_GET_SCRIPT, &keys, &args)
            .await?;

        match reply {
            ScriptReply::Array(bits) => Ok(bits.iter().all(|&b| b == BIT_SET)),
            ScriptReply::Other => Err(BackendError::UnexpectedReplyShape),
        }
    }

    async fn add(
        &self,
        ctx: &CancellationToken,
        storage_key: &str,
        positions: &[u64],
    ) -> Result<(), BackendError> {
        let keys = vec![storage_key.to_string()];
        let args: Vec<i64> = positions.iter().map(|&p| p as i64).collect();

        self.invoke_cancellable(ctx, &self.batch_set, BATCH_SET_SCRIPT, &keys, &args)
            .await?;
        Ok(())
    }
}
