//! Concurrent in-memory bitmap backend.

use std::sync::RwLock;

use async_trait::async_trait;
use bitvec::prelude::*;
use tokio_util::sync::CancellationToken;
use tracing::trace;

use crate::error::BackendError;
use crate::sizing::DEFAULT_BYTE_SIZE;

use super::Backend;

/// Fixed-size concurrent bit array shared by every filter that uses it.
///
/// The backend ignores the storage key entirely -- groups and
/// distinct named filters are isolated by the *positions* the hash vector
/// generator produces for their salted storage key, not by partitioning the
/// byte array itself. Two filters sharing one `InMemoryBackend` thus share
/// capacity but remain statistically isolated.
pub struct InMemoryBackend {
    bits: RwLock<BitVec<u8, Lsb0>>,
    capacity_bits: u64,
}

impl InMemoryBackend {
    /// Allocates a zeroed bit array of `byte_size` bytes. A non-positive
    /// size (0) falls back to [`DEFAULT_BYTE_SIZE`] (128 MiB).
    pub fn new(byte_size: usize) -> Self {
        let byte_size = if byte_size == 0 {
            DEFAULT_BYTE_SIZE
        } else {
            byte_size
        };
        let capacity_bits = 8 * byte_size as u64;
        Self {
            bits: RwLock::new(bitvec![u8, Lsb0; 0; capacity_bits as usize]),
            capacity_bits,
        }
    }

    /// Capacity in bits (8 * byte size).
    pub fn capacity_bits(&self) -> u64 {
        self.capacity_bits
    }

    fn reduce(&self, position: u64) -> usize {
        (position % self.capacity_bits) as usize
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new(0)
    }
}

#[async_trait]
impl Backend for InMemoryBackend {
    async fn exist(
        &self,
        _ctx: &CancellationToken,
        _storage_key: &str,
        positions: &[u64],
    ) -> Result<bool, BackendError> {
        let bits = self.bits.read().expect("bitmap lock poisoned");
        for &pos in positions {
            let idx = self.reduce(pos);
            if !bits[idx] {
                // Early exit on the first zero bit.
                return Ok(false);
            }
        }
        Ok(true)
    }

    async fn add(
        &self,
        _ctx: &CancellationToken,
        storage_key: &str,
        positions: &[u64],
    ) -> Result<(), BackendError> {
        let mut bits = self.bits.write().expect("bitmap lock poisoned");
        for &pos in positions {
            let idx = self.reduce(pos);
            bits.set(idx, true);
        }
        trace!(storage_key, count = positions.len(), "set bits in memory backend");
        Ok(())
    }
}
