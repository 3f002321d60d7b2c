//! Welch's two-sample t-test (unequal variances), two-tailed p-value via
//! the regularized incomplete beta function.

use crate::numeric::mean_var::{count_finite, mean_variance};
use crate::numeric::special::{reg_incomplete_beta, INSUFFICIENT_DATA};

/// Two-tailed Welch p-value for the null hypothesis that `a` and `b` have
/// equal means. Returns [`INSUFFICIENT_DATA`] if either sample has fewer
/// than 2 finite observations.
pub fn welch_t_test(a: &[f64], b: &[f64]) -> f64 {
    let (mean_a, var_a) = match mean_variance(a) {
        Some(mv) => mv,
        None => return INSUFFICIENT_DATA,
    };
    let (mean_b, var_b) = match mean_variance(b) {
        Some(mv) => mv,
        None => return INSUFFICIENT_DATA,
    };

    let na = count_finite(a) as f64;
    let nb = count_finite(b) as f64;
    let se_a = var_a / na;
    let se_b = var_b / nb;
    let se_sum = se_a + se_b;
    if se_sum <= 0.0 {
        // both samples are point masses; no variance to test against.
        return if mean_a == mean_b { 1.0 } else { 0.0 };
    }

    let t = (mean_a - mean_b) / se_sum.sqrt();
    let v = se_sum.powi(2) / (se_a.powi(2) / (na - 1.0) + se_b.powi(2) / (nb - 1.0));

    reg_incomplete_beta(v / (v + t * t), v / 2.0, 0.5)
}
