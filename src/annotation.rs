//! Output of the `TestBattery`/`AlleleInference`/correlation stages for a
//! single record. Every field is `None` when its prerequisite data or
//! config knob was absent, so a caller can distinguish "not requested"
//! from "requested but numerically undetermined" (the latter surfaces as
//! a finite sentinel inside `Some`, per spec.md §7).

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    pub ac_het: Option<u32>,
    pub ac_het_sex: Option<[u32; 2]>,
    pub ac_sex_test: Option<f64>,
    pub ac_het_phase: Option<[u32; 2]>,
    pub ac_het_phase_test: Option<f64>,
    pub bal: Option<[u32; 2]>,
    pub bal_test: Option<f64>,
    pub bal_phase: Option<[u32; 2]>,
    pub bal_phase_test: Option<f64>,
    pub ad_het: Option<[u64; 2]>,
    pub ad_het_test: Option<f64>,
    /// `[median BAF paternal, median BAF maternal, -log10(Welch p),
    /// -log10(Mann-Whitney p)]`.
    pub baf_phase_test: Option<[f64; 4]>,
    pub allele_a: Option<i32>,
    pub allele_b: Option<i32>,
    /// Pearson correlation of BAF against LRR within each inferred
    /// genotype class `[AA, AB, BB]`.
    pub cor_baf_lrr: Option<[f64; 3]>,
    /// GC fraction of the reference window around the record, when a
    /// reference FASTA was configured.
    pub gc: Option<f64>,
    /// CpG fraction of the same window.
    pub cpg: Option<f64>,
}
