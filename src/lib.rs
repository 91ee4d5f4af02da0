//! # kit-bloom
//!
//! A grouped, probabilistic set-membership filter (Bloom filter) with a
//! pluggable bit-array backend.
//!
//! ## Architecture
//!
//! - [`hash`]: deterministic k-vector hash-index generator (MurmurHash3 128-bit
//!   plus Kirsch-Mitzenmacher double hashing).
//! - [`sizing`]: derives bit count (m) and hash count (k) from expected
//!   cardinality (n) and target false-positive rate (p).
//! - [`config`]: the validated, immutable [`FilterConfig`] record and its
//!   builder.
//! - [`registry`]: the process-wide unique-name registry.
//! - [`backend`]: the storage abstraction -- [`backend::memory::InMemoryBackend`]
//!   and [`backend::remote::RemoteBackend`] both implement [`backend::Backend`].
//! - [`filter`]: the [`Filter`] facade tying the above together.
//!
//! ## Example
//!
//! ```no_run
//! use kit_bloom::{Filter, FilterConfig};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FilterConfig::builder("users").n(10_000).p(0.01).build()?;
//! let (filter, mut cleanup) = Filter::new(config)?;
//!
//! let ctx = CancellationToken::new();
//! filter.put(&ctx, "alice").await?;
//! assert!(filter.contain(&ctx, "alice").await?);
//! assert!(!filter.contain(&ctx, "mallory").await?);
//!
//! cleanup.cleanup();
//! # Ok(())
//! # }
//! ```
//!
//! ## Groups
//!
//! One filter instance can partition its universe into logical subsets
//! ("groups"), each addressed by a `(filter-name, group)` composite key and
//! statistically isolated from the others via key-salted hashing:
//!
//! ```no_run
//! # use kit_bloom::{Filter, FilterConfig};
//! # use tokio_util::sync::CancellationToken;
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = FilterConfig::builder("sessions").build()?;
//! let (filter, mut cleanup) = Filter::new(config)?;
//! let ctx = CancellationToken::new();
//!
//! filter.group_put(&ctx, "region-us", "session-1").await?;
//! assert!(filter.group_contain(&ctx, "region-us", "session-1").await?);
//! assert!(!filter.group_contain(&ctx, "region-eu", "session-1").await?);
//! # cleanup.cleanup();
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod filter;
pub mod hash;
pub mod registry;
pub mod sizing;

pub use backend::Backend;
pub use config::{FilterConfig, FilterConfigBuilder};
pub use error::{BackendError, FilterError, RemoteStoreError};
pub use filter::{Cleanup, Filter};
