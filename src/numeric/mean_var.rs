//! Sample mean/variance, selection-based median, and covariance
//! accumulation over paired observations. NaN entries are treated as
//! absent throughout, matching the missingness convention used everywhere
//! else in this crate.

use ordered_float::OrderedFloat;

pub fn count_finite(x: &[f64]) -> usize {
    x.iter().filter(|v| !v.is_nan()).count()
}

/// Unbiased sample mean/variance. `None` if fewer than 2 finite
/// observations are present (NumericUnderflow at the kernel boundary).
pub fn mean_variance(x: &[f64]) -> Option<(f64, f64)> {
    let mut sum = 0.0;
    let mut sumsq = 0.0;
    let mut m = 0u64;
    for &v in x {
        if v.is_nan() {
            continue;
        }
        sum += v;
        sumsq += v * v;
        m += 1;
    }
    if m < 2 {
        return None;
    }
    let n = m as f64;
    let mean = sum / n;
    let var = (sumsq - n * mean * mean) / (n - 1.0);
    Some((mean, var))
}

/// Median via `select_nth_unstable`, the classic selection algorithm
/// rather than a full sort. `values` is reordered in place. `None` on an
/// empty slice.
pub fn median(values: &mut [f64]) -> Option<f64> {
    let n = values.len();
    if n == 0 {
        return None;
    }
    let mid = n / 2;
    let key = |v: &f64| OrderedFloat(*v);
    if n % 2 == 1 {
        let (_, &mut m, _) = values.select_nth_unstable_by_key(mid, key);
        Some(m)
    } else {
        let (lower, &mut hi, _) = values.select_nth_unstable_by_key(mid, key);
        let lo = lower
            .iter()
            .cloned()
            .fold(f64::NEG_INFINITY, f64::max);
        Some((lo + hi) / 2.0)
    }
}

/// Covariance accumulator over paired samples, skipping any index where
/// either side is NaN.
#[derive(Debug, Clone, Copy, Default)]
pub struct CovAccumulator {
    pub sum_xx: f64,
    pub sum_yy: f64,
    pub sum_xy: f64,
    pub n: usize,
}

impl CovAccumulator {
    pub fn from_pairs(xs: &[f64], ys: &[f64]) -> Option<Self> {
        let pairs: Vec<(f64, f64)> = xs
            .iter()
            .zip(ys.iter())
            .filter(|(x, y)| !x.is_nan() && !y.is_nan())
            .map(|(&x, &y)| (x, y))
            .collect();
        let n = pairs.len();
        if n < 2 {
            return None;
        }
        let nf = n as f64;
        let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / nf;
        let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / nf;
        let mut acc = CovAccumulator { n, ..Default::default() };
        for &(x, y) in &pairs {
            let dx = x - mean_x;
            let dy = y - mean_y;
            acc.sum_xx += dx * dx;
            acc.sum_yy += dy * dy;
            acc.sum_xy += dx * dy;
        }
        Some(acc)
    }

    pub fn pearson(&self) -> f64 {
        if self.sum_xx <= 0.0 || self.sum_yy <= 0.0 {
            return f64::NAN;
        }
        self.sum_xy / (self.sum_xx * self.sum_yy).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn mean_variance_basic() {
        let (mean, var) = mean_variance(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(mean, 2.5, epsilon = 1e-9);
        assert_relative_eq!(var, 5.0 / 3.0, epsilon = 1e-9);
    }

    #[test]
    fn mean_variance_ignores_nan() {
        let (mean, _) = mean_variance(&[1.0, f64::NAN, 3.0]).unwrap();
        assert_relative_eq!(mean, 2.0, epsilon = 1e-9);
    }

    #[test]
    fn mean_variance_insufficient_data() {
        assert!(mean_variance(&[1.0]).is_none());
        assert!(mean_variance(&[]).is_none());
    }

    #[test]
    fn median_odd_and_even() {
        let mut odd = [5.0, 1.0, 3.0];
        assert_relative_eq!(median(&mut odd).unwrap(), 3.0, epsilon = 1e-9);
        let mut even = [4.0, 1.0, 3.0, 2.0];
        assert_relative_eq!(median(&mut even).unwrap(), 2.5, epsilon = 1e-9);
    }

    #[test]
    fn covariance_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [2.0, 4.0, 6.0, 8.0];
        let acc = CovAccumulator::from_pairs(&xs, &ys).unwrap();
        assert_relative_eq!(acc.pearson(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn covariance_skips_nan_pairs() {
        let xs = [1.0, 2.0, f64::NAN, 4.0];
        let ys = [1.0, 2.0, 9.0, 4.0];
        let acc = CovAccumulator::from_pairs(&xs, &ys).unwrap();
        assert_eq!(acc.n, 3);
    }
}
