//! Derivation of bit count (m) and hash count (k) from (n, p).
//!
//! Formulas:
//! - m = ceil( -n * ln(p) / ln(2)^2 )
//! - k = max(1, round( (m/n) * ln(2) ))

use std::f64::consts::LN_2;

/// Default in-memory backend byte size (128 MiB), used both as the backend's
/// own default capacity and as the source of the degenerate n=0 sizing below.
pub const DEFAULT_BYTE_SIZE: usize = 128 * 1024 * 1024;

/// Fallback hash count used when `p == 0` is requested: the target FPR is
/// unachievable (it would require m = infinity), so `k` is pinned at a large
/// but bounded value instead of letting `ln(0)` produce `-inf`.
const ZERO_P_HASH_COUNT: usize = 64;

/// Derived sizing parameters for a filter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Params {
    /// Bit count (m), always >= 1.
    pub m: u64,
    /// Hash count (k), always >= 1.
    pub k: usize,
}

/// Derives (m, k) for expected element count `n` and target false-positive
/// rate `p`.
///
/// `p` is assumed already validated to lie in `[0, 1]` (the creation
/// protocol runs before this is called). `n == 0` is a degenerate but valid
/// configuration: it yields `m = 8 * DEFAULT_BYTE_SIZE`,
/// `k = 1`, matching the default in-memory backend's capacity.
pub fn derive(n: u64, p: f64) -> Params {
    if n == 0 {
        return Params {
            m: 8 * DEFAULT_BYTE_SIZE as u64,
            k: 1,
        };
    }

    if p == 0.0 {
        return Params {
            m: 8 * DEFAULT_BYTE_SIZE as u64,
            k: ZERO_P_HASH_COUNT,
        };
    }

    let n_f = n as f64;
    let ln2_squared = LN_2 * LN_2;

    let m = (-n_f * p.ln() / ln2_squared).ceil();
    let m = if m.is_finite() && m >= 1.0 { m as u64 } else { 1 };

    let k = ((m as f64 / n_f) * LN_2).round();
    let k = if k.is_finite() && k >= 1.0 { k as usize } else { 1 };

    Params { m, k }
}
