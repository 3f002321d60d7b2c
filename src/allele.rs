//! A/B allele inference: decides, per record, which of the two candidate
//! alleles behaves like "A" and which like "B" in BAF space, by looking
//! at the median BAF of samples homozygous for each candidate.

use crate::numeric::mean_var::median;
use crate::record::Genotype;

/// `(ALLELE_A, ALLELE_B)` as 0-based allele indices, or `(-1, -1)` when
/// undetermined (too few homozygous samples, or both classes point at
/// the same side of 0.5 — logged via `log::debug!`, never returned as an
/// error per spec.md §7's `InferenceUndetermined`).
pub fn infer_alleles(n_allele: u8, genotypes: &[Genotype], baf: &[Option<f64>]) -> (i32, i32) {
    if n_allele < 2 {
        return (-1, -1);
    }
    // Biallelic sites compare REF (0) against ALT (1); sites with exactly
    // one REF and two ALTs compare the two ALTs against each other.
    let (a0, a1) = if n_allele == 3 { (1u8, 2u8) } else { (0u8, 1u8) };

    let homozygous_class_baf = |allele: u8| -> Vec<f64> {
        genotypes
            .iter()
            .zip(baf.iter())
            .filter_map(|(gt, b)| {
                if gt.allele0 == Some(allele) && gt.allele1 == Some(allele) {
                    b.filter(|v| !v.is_nan())
                } else {
                    None
                }
            })
            .collect()
    };

    // `Some(true)` => this class sits on the "A" (BAF < 0.5) side.
    let classify = |allele: u8| -> Option<bool> {
        let mut vals = homozygous_class_baf(allele);
        let med = median(&mut vals)?;
        if med < 0.5 {
            Some(true)
        } else if med > 0.5 {
            Some(false)
        } else {
            None
        }
    };

    let class0 = classify(a0);
    let class1 = classify(a1);

    match (class0, class1) {
        (Some(true), Some(false)) => (a0 as i32, a1 as i32),
        (Some(false), Some(true)) => (a1 as i32, a0 as i32),
        (Some(c0), Some(c1)) if c0 == c1 => {
            log::debug!("allele inference undetermined: both homozygous classes land on the same BAF side");
            (-1, -1)
        }
        (Some(true), None) => (a0 as i32, a1 as i32),
        (Some(false), None) => (a1 as i32, a0 as i32),
        (None, Some(true)) => (a1 as i32, a0 as i32),
        (None, Some(false)) => (a0 as i32, a1 as i32),
        (None, None) => (-1, -1),
        (Some(_), Some(_)) => unreachable!("c0 == c1 arm above is exhaustive for matching bools"),
    }
}
