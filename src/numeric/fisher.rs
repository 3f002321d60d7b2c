//! Fisher's exact test for a 2x2 contingency table, two-tailed.

use crate::numeric::special::ln_binomial_coeff;

/// Two-tailed Fisher's exact p-value for the table
/// `[[a, b], [c, d]]`, summing the probability of every table with the
/// same margins that is no more likely than the observed one.
pub fn fisher_exact_two_tailed(a: u64, b: u64, c: u64, d: u64) -> f64 {
    let row1 = a + b;
    let row2 = c + d;
    let col1 = a + c;
    let n = row1 + row2;
    if n == 0 {
        return 1.0;
    }

    let log_denom = ln_binomial_coeff(n, col1);
    let observed_log_p = ln_binomial_coeff(row1, a) + ln_binomial_coeff(row2, c) - log_denom;

    let min_a = col1.saturating_sub(row2);
    let max_a = row1.min(col1);
    let eps = 1e-7;

    let mut p_sum = 0.0;
    for a_candidate in min_a..=max_a {
        let c_candidate = col1 - a_candidate;
        let log_p = ln_binomial_coeff(row1, a_candidate) + ln_binomial_coeff(row2, c_candidate) - log_denom;
        if log_p <= observed_log_p + eps {
            p_sum += log_p.exp();
        }
    }
    p_sum.min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn balanced_table_gives_p_one() {
        let p = fisher_exact_two_tailed(5, 5, 5, 5);
        assert_relative_eq!(p, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn empty_table_gives_p_one() {
        assert_relative_eq!(fisher_exact_two_tailed(0, 0, 0, 0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn extreme_table_gives_small_p() {
        let p = fisher_exact_two_tailed(10, 0, 0, 10);
        assert!(p < 1e-4);
    }

    #[test]
    fn symmetric_under_row_swap() {
        let p1 = fisher_exact_two_tailed(2, 8, 7, 3);
        let p2 = fisher_exact_two_tailed(7, 3, 2, 8);
        assert_relative_eq!(p1, p2, epsilon = 1e-9);
    }
}
