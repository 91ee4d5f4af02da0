//! Filter configuration: the option-style record validated once at
//! construction and never mutated afterward.

use std::sync::Arc;

use crate::backend::{memory::InMemoryBackend, Backend};
use crate::error::FilterError;

/// Default false-positive rate used when the caller doesn't request one.
pub const DEFAULT_P: f64 = 0.01;

/// Immutable, validated configuration for a [`Filter`](crate::Filter).
///
/// Built via [`FilterConfigBuilder`]; once constructed it is never mutated.
#[derive(Clone)]
pub struct FilterConfig {
    pub(crate) name: String,
    pub(crate) n: u64,
    pub(crate) p: f64,
    pub(crate) backend: Arc<dyn Backend>,
}

impl FilterConfig {
    /// Returns a builder seeded with the crate defaults (`n = 0`,
    /// `p = 0.01`, a freshly allocated default-capacity in-memory backend).
    pub fn builder(name: impl Into<String>) -> FilterConfigBuilder {
        FilterConfigBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn n(&self) -> u64 {
        self.n
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn backend(&self) -> Arc<dyn Backend> {
        Arc::clone(&self.backend)
    }
}

/// Fluent builder for [`FilterConfig`].
///
/// Mirrors the option list in the design: `name`, `backend`, `n`, `p`. The
/// builder only shapes the record; validation happens once, in [`build`](Self::build).
pub struct FilterConfigBuilder {
    name: String,
    n: u64,
    p: f64,
    backend: Option<Arc<dyn Backend>>,
}

impl FilterConfigBuilder {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            n: 0,
            p: DEFAULT_P,
            backend: None,
        }
    }

    /// Sets the expected element count (n). Default: 0 (degenerate sizing).
    pub fn n(mut self, n: u64) -> Self {
        self.n = n;
        self
    }

    /// Sets the target false-positive probability (p). Default: 0.01.
    pub fn p(mut self, p: f64) -> Self {
        self.p = p;
        self
    }

    /// Supplies a storage backend. Defaults to a freshly allocated
    /// [`InMemoryBackend`] of default capacity when left unset.
    pub fn backend(mut self, backend: Arc<dyn Backend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Validates and assembles the [`FilterConfig`].
    ///
    /// Validation order matches the creation protocol: name non-empty after
    /// trim, then the false-positive bounds.
    pub fn build(self) -> Result<FilterConfig, FilterError> {
        let trimmed = self.name.trim();
        if trimmed.is_empty() {
            return Err(FilterError::NameEmpty);
        }

        // NaN fails both bound checks below by definition, so it's rejected
        // explicitly here rather than silently passing validation.
        if self.p.is_nan() || self.p < 0.0 {
            return Err(FilterError::FalseProbabilityNegative(self.p));
        }
        if self.p > 1.0 {
            return Err(FilterError::FalseProbabilityGreaterThanOne(self.p));
        }

        let backend = self
            .backend
            .unwrap_or_else(|| Arc::new(InMemoryBackend::new(0)) as Arc<dyn Backend>);

        Ok(FilterConfig {
            name: trimmed.to_string(),
            n: self.n,
            p: self.p,
            backend,
        })
    }
}
