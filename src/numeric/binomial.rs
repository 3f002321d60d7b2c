//! Exact two-sided binomial tail test, `P(|X - n/2| >= |k - n/2|)` under
//! `X ~ Binomial(n, 0.5)`, with a triangular cache of already-computed
//! rows and a regularized-incomplete-beta fallback once `n` grows past
//! the point where enumerating every row is worth it.

use crate::numeric::special::reg_incomplete_beta;

/// Above this `n`, the exact row is no longer cached; the tail is
/// evaluated directly via the regularized incomplete beta function
/// instead (see DESIGN.md open question #2).
const EXACT_MAX_N: i64 = 1000;

/// Triangular cache of two-sided binomial tail probabilities, keyed by
/// `n` then `k.min(n - k)`. Grows lazily, one row per distinct `n` seen;
/// never shrinks except via an explicit [`BinomialExactCache::release`].
#[derive(Debug, Default)]
pub struct BinomialExactCache {
    table: Vec<Vec<f64>>,
}

impl BinomialExactCache {
    pub fn new() -> Self {
        Self { table: Vec::new() }
    }

    /// Drops every cached row. Called automatically on the `n < 0`
    /// sentinel input; otherwise available for callers that want to
    /// bound memory between chromosomes.
    pub fn release(&mut self) {
        self.table.clear();
    }

    /// Two-sided exact binomial tail probability for `k` successes out of
    /// `n` trials at p = 0.5. `n < 0` is a release-and-NaN sentinel
    /// matching the aggregator's "zero trials, nothing to test" case.
    pub fn binom_exact(&mut self, k: i64, n: i64) -> f64 {
        if n < 0 {
            self.release();
            return f64::NAN;
        }
        assert!(k >= 0 && k <= n, "binom_exact requires 0 <= k <= n, got k={k}, n={n}");

        if n % 2 == 0 && k == n / 2 {
            return 1.0;
        }
        let kk = k.min(n - k);

        if n > EXACT_MAX_N {
            return (2.0 * reg_incomplete_beta(0.5, (n - kk) as f64, (kk + 1) as f64)).min(1.0);
        }

        self.ensure_row(n);
        self.table[n as usize][kk as usize]
    }

    fn ensure_row(&mut self, n: i64) {
        let idx = n as usize;
        if self.table.len() <= idx {
            self.table.resize_with(idx + 1, Vec::new);
        }
        if self.table[idx].is_empty() {
            self.table[idx] = Self::compute_row(n);
        }
    }

    /// `row[j] = 2 * P(X <= j)` for `X ~ Binomial(n, 0.5)`, `j` in
    /// `0..=n/2`, built by incrementally updating the running term
    /// `C(n, j) / 2^n` rather than computing each binomial coefficient
    /// from scratch (avoids overflow for `n` close to [`EXACT_MAX_N`]).
    fn compute_row(n: i64) -> Vec<f64> {
        let half = (n / 2) as usize;
        let mut row = Vec::with_capacity(half + 1);
        let mut term = 0.5f64.powi(n as i32);
        let mut cum = term;
        row.push((2.0 * cum).min(1.0));
        for j in 1..=half {
            term *= (n - j as i64 + 1) as f64 / j as f64;
            cum += term;
            row.push((2.0 * cum).min(1.0));
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn center_is_always_one() {
        let mut cache = BinomialExactCache::new();
        assert_relative_eq!(cache.binom_exact(5, 10), 1.0, epsilon = 1e-12);
        assert_relative_eq!(cache.binom_exact(0, 0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn symmetric_in_k_and_n_minus_k() {
        let mut cache = BinomialExactCache::new();
        assert_relative_eq!(cache.binom_exact(3, 10), cache.binom_exact(7, 10), epsilon = 1e-12);
    }

    #[test]
    fn extreme_k_gives_small_p() {
        let mut cache = BinomialExactCache::new();
        let p = cache.binom_exact(0, 10);
        assert_relative_eq!(p, 2.0 / 1024.0, epsilon = 1e-9);
    }

    #[test]
    fn large_n_uses_beta_fallback_and_stays_bounded() {
        let mut cache = BinomialExactCache::new();
        let p = cache.binom_exact(480, 1001);
        assert!(p > 0.0 && p <= 1.0);
        assert!(cache.table.len() <= 1); // large-n path never materializes a row
    }

    #[test]
    fn negative_n_releases_cache() {
        let mut cache = BinomialExactCache::new();
        cache.binom_exact(5, 10);
        assert!(!cache.table.is_empty());
        let p = cache.binom_exact(0, -1);
        assert!(p.is_nan());
        assert!(cache.table.is_empty());
    }

    #[test]
    fn cache_is_reused_across_calls_with_same_n() {
        let mut cache = BinomialExactCache::new();
        cache.binom_exact(2, 20);
        let rows_after_first = cache.table.iter().filter(|r| !r.is_empty()).count();
        cache.binom_exact(4, 20);
        let rows_after_second = cache.table.iter().filter(|r| !r.is_empty()).count();
        assert_eq!(rows_after_first, rows_after_second);
    }
}
