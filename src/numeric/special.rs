//! Thin, named wrappers around the `statrs` special functions this crate
//! leans on, so call sites read in terms of the statistics they compute
//! rather than the underlying `statrs` module layout.

use statrs::function::beta::beta_reg;
use statrs::function::erf::erfc;
use statrs::function::factorial::ln_binomial;
use statrs::function::gamma::ln_gamma;

/// Sentinel returned by a test kernel when a sample has too few
/// observations to compute a p-value. Carried through `-log10` untouched
/// (spec: "any kernel returning the +inf sentinel is emitted as such
/// verbatim").
pub const INSUFFICIENT_DATA: f64 = f64::INFINITY;

/// Regularized incomplete beta function `I_x(a, b)`.
pub fn reg_incomplete_beta(x: f64, a: f64, b: f64) -> f64 {
    beta_reg(a, b, x)
}

pub fn complementary_error(x: f64) -> f64 {
    erfc(x)
}

pub fn ln_gamma_fn(x: f64) -> f64 {
    ln_gamma(x)
}

pub fn ln_binomial_coeff(n: u64, k: u64) -> f64 {
    ln_binomial(n, k)
}

/// `-log10(p)`, propagating the [`INSUFFICIENT_DATA`] sentinel unchanged.
pub fn neg_log10_p(p: f64) -> f64 {
    if p == INSUFFICIENT_DATA {
        return INSUFFICIENT_DATA;
    }
    if p <= 0.0 {
        return f64::INFINITY;
    }
    -p.log10()
}
