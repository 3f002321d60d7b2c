//! Mann-Whitney U test (Wilcoxon rank-sum), exact for small samples and
//! normal-approximated with tie correction once either group reaches the
//! `n >= 8` crossover.

use std::collections::HashMap;

use ordered_float::OrderedFloat;

use crate::numeric::special::{complementary_error, INSUFFICIENT_DATA};

const EXACT_MAX_N: usize = 8;

#[derive(Clone, Copy)]
enum Side {
    A,
    B,
}

/// Two-tailed Mann-Whitney p-value for the null hypothesis that `a` and
/// `b` are drawn from the same distribution. NaN entries are dropped
/// before ranking.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> f64 {
    let a: Vec<f64> = a.iter().copied().filter(|v| !v.is_nan()).collect();
    let b: Vec<f64> = b.iter().copied().filter(|v| !v.is_nan()).collect();
    let na = a.len();
    let nb = b.len();
    if na == 0 || nb == 0 {
        return INSUFFICIENT_DATA;
    }

    let mut combined: Vec<(f64, Side)> = a
        .iter()
        .map(|&v| (v, Side::A))
        .chain(b.iter().map(|&v| (v, Side::B)))
        .collect();
    combined.sort_by_key(|(v, _)| OrderedFloat(*v));

    let n = combined.len();
    let mut i = 0;
    let mut rank_sum_a = 0.0f64;
    let mut ties_term = 0.0f64;
    while i < n {
        let mut j = i;
        while j + 1 < n && combined[j + 1].0 == combined[i].0 {
            j += 1;
        }
        let group_size = (j - i + 1) as f64;
        let avg_rank = ((i + 1) + (j + 1)) as f64 / 2.0;
        for item in &combined[i..=j] {
            if let Side::A = item.1 {
                rank_sum_a += avg_rank;
            }
        }
        if group_size > 1.0 {
            ties_term += group_size.powi(3) - group_size;
        }
        i = j + 1;
    }

    let na_f = na as f64;
    let nb_f = nb as f64;
    let u_a = rank_sum_a - na_f * (na_f + 1.0) / 2.0;
    let u_min = u_a.min(na_f * nb_f - u_a);

    if na == 1 || nb == 1 {
        let other_n = if na == 1 { nb_f } else { na_f };
        return (2.0 * (u_min.floor() + 1.0) / (other_n + 1.0)).min(1.0);
    }

    if na >= EXACT_MAX_N || nb >= EXACT_MAX_N {
        let nn = na_f + nb_f;
        let variance = na_f * nb_f * ((nn.powi(3) - nn) - ties_term) / (12.0 * nn * (nn - 1.0));
        if variance <= 0.0 {
            return 1.0;
        }
        let z = (u_min - na_f * nb_f / 2.0) / (2.0 * variance).sqrt();
        complementary_error(-z / std::f64::consts::SQRT_2)
    } else {
        exact_cdf(u_min, na, nb)
    }
}

/// Two-tailed exact p-value via the Mann & Whitney (1947) recurrence for
/// the null distribution of `U` (no-ties case; used only for `na, nb <
/// EXACT_MAX_N`, where tie corrections are negligible in practice and the
/// exact table is cheap to build).
fn exact_cdf(u_min: f64, na: usize, nb: usize) -> f64 {
    let u_min = u_min.round().max(0.0) as i64;
    let max_u = (na * nb) as i64;
    let u_min = u_min.min(max_u);

    let mut memo: HashMap<(usize, usize, i64), f64> = HashMap::new();
    let mut cumulative = 0.0;
    for k in 0..=u_min {
        cumulative += count_arrangements(k, na, nb, &mut memo);
    }
    let total = binom_coeff(na + nb, na);
    (2.0 * cumulative / total).min(1.0)
}

fn count_arrangements(u: i64, a: usize, b: usize, memo: &mut HashMap<(usize, usize, i64), f64>) -> f64 {
    if u < 0 || u > (a * b) as i64 {
        return 0.0;
    }
    if a == 0 || b == 0 {
        return if u == 0 { 1.0 } else { 0.0 };
    }
    if let Some(&v) = memo.get(&(a, b, u)) {
        return v;
    }
    let value = count_arrangements(u - b as i64, a - 1, b, memo) + count_arrangements(u, a, b - 1, memo);
    memo.insert((a, b, u), value);
    value
}

fn binom_coeff(n: usize, k: usize) -> f64 {
    let k = k.min(n - k);
    let mut result = 1.0;
    for i in 0..k {
        result *= (n - i) as f64 / (i + 1) as f64;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identical_distributions_give_large_p() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(mann_whitney_u(&a, &b) > 0.5);
    }

    #[test]
    fn completely_separated_small_samples_give_extreme_p() {
        let a = [1.0, 2.0, 3.0];
        let b = [10.0, 11.0, 12.0];
        let p = mann_whitney_u(&a, &b);
        assert_relative_eq!(p, 0.1, epsilon = 1e-9);
    }

    #[test]
    fn normal_approximation_path_is_bounded() {
        let a: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let b: Vec<f64> = (10..30).map(|i| i as f64).collect();
        let p = mann_whitney_u(&a, &b);
        assert!(p > 0.0 && p <= 1.0);
    }

    #[test]
    fn insufficient_data_returns_sentinel() {
        assert_eq!(mann_whitney_u(&[], &[1.0]), INSUFFICIENT_DATA);
    }

    #[test]
    fn single_element_sample_uses_closed_form() {
        let a = [5.0];
        let b = [1.0, 2.0, 3.0, 4.0, 6.0, 7.0, 8.0];
        let p = mann_whitney_u(&a, &b);
        assert!(p > 0.0 && p <= 1.0);
    }
}
