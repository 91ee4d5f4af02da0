//! The filter facade: the crate's primary entry point.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::debug_span;
use tracing::Instrument;

use crate::config::FilterConfig;
use crate::error::{BackendError, FilterError};
use crate::hash::hash_vector;
use crate::registry;
use crate::sizing::{self, Params};

/// Prefix shared by every storage key this crate produces, matching the
/// remote backend's `kit:bloom:<name>[:<group>]` key scheme. The
/// in-memory backend ignores the key but the prefix is still applied so a
/// filter's storage key is identical across backends -- switching backends
/// never changes which values a filter considers present.
const KEY_PREFIX: &str = "kit:bloom:";

/// A named, grouped-membership Bloom filter bound to a [`FilterConfig`].
///
/// Constructed via [`Filter::new`], which validates the configuration,
/// reserves the filter's name in the process-wide registry, and derives the
/// sizing parameters (m, k) once. Every subsequent call is read-only with
/// respect to the `Filter` itself; all mutation happens in the backend.
pub struct Filter {
    config: FilterConfig,
    params: Params,
}

/// Releases a filter's reservation in the process-wide name registry.
///
/// Idempotent: invoking `cleanup` more than once is a no-op after the first
/// call. Dropping a `Cleanup` without calling it leaves the name reserved
/// (cleanup is explicit, matching the design's "cleanup handle" contract);
/// this is deliberate rather than RAII so that a `Filter` can be handed off
/// across tasks without surprising deregistration on drop.
pub struct Cleanup {
    name: String,
    released: bool,
}

impl Cleanup {
    /// Removes the filter's name from the registry. Safe to call more than
    /// once.
    pub fn cleanup(&mut self) {
        if !self.released {
            registry::release(&self.name);
            self.released = true;
        }
    }
}

impl Filter {
    /// Validates `config`, reserves its name, derives (m, k), and returns
    /// the filter together with a cleanup handle.
    ///
    /// Per the creation protocol: name/probability validation has already
    /// happened in [`FilterConfig::builder`]; this step additionally
    /// enforces process-wide name uniqueness (only one live `Filter` per
    /// name).
    pub fn new(config: FilterConfig) -> Result<(Self, Cleanup), FilterError> {
        if !registry::try_reserve(config.name()) {
            return Err(FilterError::NameRepeated(config.name().to_string()));
        }

        let params = sizing::derive(config.n(), config.p());

        let cleanup = Cleanup {
            name: config.name().to_string(),
            released: false,
        };

        Ok((Filter { config, params }, cleanup))
    }

    /// The filter's name.
    pub fn name(&self) -> &str {
        self.config.name()
    }

    /// Derived bit count (m).
    pub fn size_bits(&self) -> u64 {
        self.params.m
    }

    /// Derived hash count (k).
    pub fn hash_count(&self) -> usize {
        self.params.k
    }

    fn storage_key(&self, group: Option<&str>) -> String {
        match group {
            Some(g) => format!("{}{}:{}", KEY_PREFIX, self.config.name(), g),
            None => format!("{}{}", KEY_PREFIX, self.config.name()),
        }
    }

    /// Tests whether `value` might have been inserted (ungrouped).
    ///
    /// A `false` result is definitive. A `true` result is probabilistic,
    /// bounded by the filter's configured false-positive rate.
    pub async fn contain(&self, ctx: &CancellationToken, value: &str) -> Result<bool, BackendError> {
        self.contain_in(ctx, None, value).await
    }

    /// Inserts `value` (ungrouped). Idempotent.
    pub async fn put(&self, ctx: &CancellationToken, value: &str) -> Result<(), BackendError> {
        self.put_in(ctx, None, value).await
    }

    /// Tests whether `value` might have been inserted into `group`.
    ///
    /// Groups are statistically isolated: `group_put(g1, v)` followed by
    /// `group_contain(g2, v)` for `g1 != g2` returns `false` with
    /// probability `>= 1 - p`.
    pub async fn group_contain(
        &self,
        ctx: &CancellationToken,
        group: &str,
        value: &str,
    ) -> Result<bool, BackendError> {
        self.contain_in(ctx, Some(group), value).await
    }

    /// Inserts `value` into `group`. Idempotent.
    pub async fn group_put(
        &self,
        ctx: &CancellationToken,
        group: &str,
        value: &str,
    ) -> Result<(), BackendError> {
        self.put_in(ctx, Some(group), value).await
    }

    async fn contain_in(
        &self,
        ctx: &CancellationToken,
        group: Option<&str>,
        value: &str,
    ) -> Result<bool, BackendError> {
        let span = debug_span!("bloom_contain", filter = %self.name(), group = %group.unwrap_or(""));
        async move {
            let storage_key = self.storage_key(group);
            let positions = hash_vector(storage_key.as_bytes(), value.as_bytes(), self.params.k);
            self.config
                .backend()
                .exist(ctx, &storage_key, &positions)
                .await
        }
        .instrument(span)
        .await
    }

    async fn put_in(
        &self,
        ctx: &CancellationToken,
        group: Option<&str>,
        value: &str,
    ) -> Result<(), BackendError> {
        let span = debug_span!("bloom_put", filter = %self.name(), group = %group.unwrap_or(""));
        async move {
            let storage_key = self.storage_key(group);
            let positions = hash_vector(storage_key.as_bytes(), value.as_bytes(), self.params.k);
            self.config
                .backend()
                .add(ctx, &storage_key, &positions)
                .await
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token() -> CancellationToken {
        CancellationToken::new()
    }

    #[tokio::test]
    async fn s2_round_trip_in_memory() {
        let config = FilterConfig::builder("s2_round_trip")
            .n(10_000)
            .p(0.01)
            .build()
            .unwrap();
        let (filter, mut cleanup) = Filter::new(config).unwrap();

        assert_eq!(filter.hash_count(), 7);
        assert!((95_000..=96_500).contains(&filter.size_bits()));

        filter.put(&token(), "foo").await.unwrap();
        assert!(filter.contain(&token(), "foo").await.unwrap());
        assert!(!filter.contain(&token(), "bar").await.unwrap());

        cleanup.cleanup();
    }

    #[tokio::test]
    async fn s3_group_isolation() {
        let config = FilterConfig::builder("s3_group_isolation").build().unwrap();
        let (filter, mut cleanup) = Filter::new(config).unwrap();

        filter.group_put(&token(), "g1", "bar").await.unwrap();
        assert!(filter.group_contain(&token(), "g1", "bar").await.unwrap());
        assert!(!filter.group_contain(&token(), "g2", "bar").await.unwrap());

        cleanup.cleanup();
    }

    #[tokio::test]
    async fn put_then_contain_across_interleaved_puts() {
        let config = FilterConfig::builder("interleaved_puts").build().unwrap();
        let (filter, mut cleanup) = Filter::new(config).unwrap();

        for i in 0..20 {
            filter.put(&token(), &format!("other_{i}")).await.unwrap();
        }
        filter.put(&token(), "target").await.unwrap();
        for i in 20..40 {
            filter.put(&token(), &format!("other_{i}")).await.unwrap();
        }

        assert!(filter.contain(&token(), "target").await.unwrap());

        cleanup.cleanup();
    }

    #[tokio::test]
    async fn put_is_idempotent() {
        let config = FilterConfig::builder("idempotent_put").build().unwrap();
        let (filter, mut cleanup) = Filter::new(config).unwrap();

        filter.put(&token(), "v").await.unwrap();
        filter.put(&token(), "v").await.unwrap();
        assert!(filter.contain(&token(), "v").await.unwrap());

        cleanup.cleanup();
    }

    #[tokio::test]
    async fn s5_name_uniqueness() {
        let config = FilterConfig::builder("s5_dup").build().unwrap();
        let (_first, mut cleanup) = Filter::new(config).unwrap();

        let second_config = FilterConfig::builder("s5_dup").build().unwrap();
        let err = Filter::new(second_config).unwrap_err();
        assert_eq!(err, FilterError::NameRepeated("s5_dup".to_string()));

        cleanup.cleanup();
    }

    #[tokio::test]
    async fn s6_cleanup_allows_name_reuse() {
        let config = FilterConfig::builder("s6_cleanup_reuse").build().unwrap();
        let (_filter, mut cleanup) = Filter::new(config).unwrap();
        cleanup.cleanup();

        let reused = FilterConfig::builder("s6_cleanup_reuse").build().unwrap();
        let (_second_filter, mut second_cleanup) = Filter::new(reused).unwrap();
        second_cleanup.cleanup();
    }

    #[tokio::test]
    async fn cleanup_is_idempotent() {
        let config = FilterConfig::builder("cleanup_idempotent").build().unwrap();
        let (_filter, mut cleanup) = Filter::new(config).unwrap();
        cleanup.cleanup();
        cleanup.cleanup();
    }

    #[tokio::test]
    async fn degenerate_zero_n_filter_is_still_functional() {
        let config = FilterConfig::builder("zero_n").build().unwrap();
        let (filter, mut cleanup) = Filter::new(config).unwrap();

        assert_eq!(filter.hash_count(), 1);
        filter.put(&token(), "x").await.unwrap();
        assert!(filter.contain(&token(), "x").await.unwrap());

        cleanup.cleanup();
    }

    #[tokio::test]
    async fn storage_key_includes_group_suffix() {
        let config = FilterConfig::builder("key_shape").build().unwrap();
        let (filter, mut cleanup) = Filter::new(config).unwrap();

        assert_eq!(filter.storage_key(None), "kit:bloom:key_shape");
        assert_eq!(
            filter.storage_key(Some("g1")),
            "kit:bloom:key_shape:g1"
        );

        cleanup.cleanup();
    }
}
