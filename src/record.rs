//! Per-record input view and the small per-sample value types it is built
//! from. `RecordInput` is a plain, VCF/BCF-library-agnostic struct; the
//! `htslib_adapter` module is responsible for populating one per record.

/// Donor sex, as loaded from a sex file. `Unknown` covers both "absent
/// from the sex file" and "present but unrecognised code".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sex {
    #[default]
    Unknown,
    Male,
    Female,
}

/// A single sample's genotype at a record, as two (possibly missing)
/// allele indices plus a phased flag. `allele0`/`allele1` follow VCF GT
/// order, i.e. `allele0` is the allele before the `/`/`|` separator.
#[derive(Debug, Clone, Copy, Default)]
pub struct Genotype {
    pub allele0: Option<u8>,
    pub allele1: Option<u8>,
    pub phased: bool,
}

impl Genotype {
    pub fn is_missing(&self) -> bool {
        self.allele0.is_none() || self.allele1.is_none()
    }

    /// Heterozygous in the spec's sense: exactly one reference (allele 0)
    /// and one non-reference allele. A genotype carrying two distinct
    /// non-reference alleles (e.g. `1/2`) is neither heterozygous nor
    /// homozygous here.
    pub fn is_het(&self) -> bool {
        match (self.allele0, self.allele1) {
            (Some(a), Some(b)) => a != b && (a == 0 || b == 0),
            _ => false,
        }
    }

    pub fn is_hom_ref(&self) -> bool {
        matches!((self.allele0, self.allele1), (Some(0), Some(0)))
    }

    pub fn is_hom_alt(&self) -> bool {
        matches!((self.allele0, self.allele1), (Some(a), Some(b)) if a == b && a != 0)
    }
}

/// Phase sign of a heterozygous genotype: `+1` for `0|<alt>`, `-1` for
/// `<alt>|0`, `0` for an unphased het. `None` for homozygous genotypes,
/// missing genotypes, and heterozygous genotypes between two distinct
/// non-reference alleles (no reference allele to anchor the sign on).
pub fn gt_phase(gt: &Genotype) -> Option<i8> {
    let (a0, a1) = match (gt.allele0, gt.allele1) {
        (Some(a0), Some(a1)) => (a0, a1),
        _ => return None,
    };
    if a0 == a1 || (a0 != 0 && a1 != 0) {
        return None;
    }
    if !gt.phased {
        return Some(0);
    }
    if a0 == 0 {
        Some(1)
    } else {
        Some(-1)
    }
}

/// Maps a format-field value to its sign bucket: `+1`/`-1`/`0`. `None`
/// for missing or NaN input.
pub fn sign(x: Option<f64>) -> Option<i8> {
    match x {
        None => None,
        Some(v) if v.is_nan() => None,
        Some(v) if v > 0.0 => Some(1),
        Some(v) if v < 0.0 => Some(-1),
        Some(_) => Some(0),
    }
}

/// Borrowed, library-agnostic view of one record's per-sample fields.
/// Every `Vec` is indexed by sample position and is expected to have
/// length `genotypes.len()`.
#[derive(Debug, Clone)]
pub struct RecordInput {
    /// Number of alleles at this site, including the reference (`REF` +
    /// `ALT`s).
    pub n_allele: u8,
    pub genotypes: Vec<Genotype>,
    pub ad: Vec<Option<(i32, i32)>>,
    pub baf: Vec<Option<f64>>,
    pub lrr: Vec<Option<f64>>,
    /// Arbitrary signed format field used for the `Bal`/`Bal_Phase`
    /// tests (spec.md's `F`), e.g. a parent-of-origin or strand-bias
    /// score. `None` per sample when the field is absent from this
    /// record.
    pub fmt_sign_field: Vec<Option<f64>>,
    /// Whether `F` is present anywhere in the input header at all (as
    /// opposed to merely absent on this record).
    pub fmt_field_present: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gt(a0: Option<u8>, a1: Option<u8>, phased: bool) -> Genotype {
        Genotype { allele0: a0, allele1: a1, phased }
    }

    #[test]
    fn phase_sign_matches_spec_examples() {
        assert_eq!(gt_phase(&gt(Some(0), Some(1), true)), Some(1));
        assert_eq!(gt_phase(&gt(Some(1), Some(0), true)), Some(-1));
        assert_eq!(gt_phase(&gt(Some(0), Some(1), false)), Some(0));
        assert_eq!(gt_phase(&gt(Some(0), Some(0), true)), None);
        assert_eq!(gt_phase(&gt(None, Some(1), true)), None);
    }

    #[test]
    fn multiallelic_het_without_reference_has_no_phase_sign() {
        assert_eq!(gt_phase(&gt(Some(1), Some(2), true)), None);
    }

    #[test]
    fn het_definition_requires_exactly_one_reference_allele() {
        assert!(gt(Some(0), Some(1), false).is_het());
        assert!(!gt(Some(1), Some(2), false).is_het());
        assert!(!gt(Some(0), Some(0), false).is_het());
    }

    #[test]
    fn missingness_short_circuits_het_and_hom_checks() {
        let g = gt(None, Some(1), false);
        assert!(g.is_missing());
        assert!(!g.is_het());
        assert!(!g.is_hom_ref());
        assert!(!g.is_hom_alt());
    }

    #[test]
    fn sign_buckets() {
        assert_eq!(sign(Some(3.2)), Some(1));
        assert_eq!(sign(Some(-0.5)), Some(-1));
        assert_eq!(sign(Some(0.0)), Some(0));
        assert_eq!(sign(Some(f64::NAN)), None);
        assert_eq!(sign(None), None);
    }
}
