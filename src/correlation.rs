//! BAF/LRR Pearson correlation, computed separately within each of the
//! three genotype classes implied by the inferred A/B alleles (AA, AB,
//! BB).

use crate::numeric::mean_var::CovAccumulator;
use crate::record::Genotype;

/// `[r(AA), r(AB), r(BB)]`, `NaN` in any slot with fewer than 2 paired
/// observations. `None` entirely if `allele_a`/`allele_b` are undetermined.
pub fn baf_lrr_correlation(
    genotypes: &[Genotype],
    baf: &[Option<f64>],
    lrr: &[Option<f64>],
    allele_a: i32,
    allele_b: i32,
) -> Option<[f64; 3]> {
    if allele_a < 0 || allele_b < 0 {
        return None;
    }
    let allele_a = allele_a as u8;
    let allele_b = allele_b as u8;

    let classify = |gt: &Genotype| -> Option<usize> {
        match (gt.allele0, gt.allele1) {
            (Some(x), Some(y)) if x == allele_a && y == allele_a => Some(0),
            (Some(x), Some(y)) if (x == allele_a && y == allele_b) || (x == allele_b && y == allele_a) => Some(1),
            (Some(x), Some(y)) if x == allele_b && y == allele_b => Some(2),
            _ => None,
        }
    };

    let mut result = [f64::NAN; 3];
    for (class, slot) in result.iter_mut().enumerate() {
        let (xs, ys): (Vec<f64>, Vec<f64>) = genotypes
            .iter()
            .enumerate()
            .filter(|(_, gt)| classify(gt) == Some(class))
            .filter_map(|(i, _)| {
                let b = baf.get(i).copied().flatten()?;
                let l = lrr.get(i).copied().flatten()?;
                if b.is_nan() || l.is_nan() {
                    None
                } else {
                    Some((b, l))
                }
            })
            .unzip();
        if let Some(acc) = CovAccumulator::from_pairs(&xs, &ys) {
            *slot = acc.pearson();
        }
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gt(a0: u8, a1: u8) -> Genotype {
        Genotype { allele0: Some(a0), allele1: Some(a1), phased: false }
    }

    #[test]
    fn undetermined_alleles_skip_correlation() {
        let genotypes = vec![gt(0, 0)];
        let baf = vec![Some(0.1)];
        let lrr = vec![Some(0.2)];
        assert_eq!(baf_lrr_correlation(&genotypes, &baf, &lrr, -1, -1), None);
    }

    #[test]
    fn per_class_correlation_is_computed_independently() {
        let genotypes = vec![gt(0, 0), gt(0, 0), gt(0, 0), gt(0, 1), gt(0, 1), gt(0, 1)];
        let baf = vec![Some(0.01), Some(0.02), Some(0.03), Some(0.5), Some(0.52), Some(0.48)];
        let lrr = vec![Some(0.1), Some(0.2), Some(0.3), Some(1.0), Some(0.9), Some(1.1)];
        let result = baf_lrr_correlation(&genotypes, &baf, &lrr, 0, 1).unwrap();
        assert!(result[0] > 0.9);
        assert!(result[2].is_nan()); // no BB samples present
    }
}
