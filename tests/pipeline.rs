//! End-to-end tests against the public pipeline API, using synthetic
//! in-memory records instead of real VCF/BCF fixtures (the `htslib_adapter`
//! boundary is the only file-format-aware layer; everything exercised here
//! is pure Rust).

use siteannot::config::RunConfigBuilder;
use siteannot::record::{Genotype, RecordInput, Sex};
use siteannot::{Annotator, HeaderSchema};

fn gt(a0: u8, a1: u8, phased: bool) -> Genotype {
    Genotype { allele0: Some(a0), allele1: Some(a1), phased }
}

fn missing() -> Genotype {
    Genotype::default()
}

#[test]
fn sex_stratified_homozygosity_test_runs_with_a_sex_vector() {
    let config = RunConfigBuilder::default().build().unwrap();
    let schema = HeaderSchema { has_gt: true, ..Default::default() };
    let mut annotator = Annotator::new(config, schema, 6).unwrap();

    let genotypes = vec![
        gt(0, 0, false),
        gt(0, 0, false),
        gt(1, 1, false),
        gt(0, 1, false),
        gt(0, 1, false),
        gt(0, 1, false),
    ];
    let n = genotypes.len();
    let record = RecordInput {
        n_allele: 2,
        genotypes,
        ad: vec![None; n],
        baf: vec![None; n],
        lrr: vec![None; n],
        fmt_sign_field: vec![None; n],
        fmt_field_present: false,
    };
    let sex = vec![Sex::Male, Sex::Female, Sex::Male, Sex::Female, Sex::Male, Sex::Female];

    let ann = annotator.annotate(&record, Some(&sex));
    assert_eq!(ann.ac_het, Some(3));
    assert_eq!(ann.ac_het_sex, Some([2, 1]));
    let fisher_p = ann.ac_sex_test.expect("sex test requested via sex vector");
    assert!(fisher_p.is_finite() && fisher_p >= 0.0);
}

#[test]
fn missing_genotypes_are_excluded_from_every_count() {
    let config = RunConfigBuilder::default().ad_het(true).build().unwrap();
    let schema = HeaderSchema { has_gt: true, has_ad: true, ..Default::default() };
    let mut annotator = Annotator::new(config, schema, 3).unwrap();

    let genotypes = vec![missing(), gt(0, 1, false), gt(0, 0, false)];
    let record = RecordInput {
        n_allele: 2,
        genotypes,
        ad: vec![None, Some((10, 10)), None],
        baf: vec![None; 3],
        lrr: vec![None; 3],
        fmt_sign_field: vec![None; 3],
        fmt_field_present: false,
    };

    let ann = annotator.annotate(&record, None);
    assert_eq!(ann.ac_het, Some(1));
    assert_eq!(ann.ad_het, Some([10, 10]));
}

#[test]
fn phased_heterozygotes_drive_parental_phase_and_baf_phase_tests() {
    let config = RunConfigBuilder::default().phase(true).build().unwrap();
    let schema = HeaderSchema { has_gt: true, ..Default::default() };
    let mut annotator = Annotator::new(config, schema, 6).unwrap();

    // Three paternal (0|1), three maternal (1|0) hets, with BAF split so a
    // Mann-Whitney/Welch difference is unambiguous.
    let genotypes = vec![
        gt(0, 1, true),
        gt(0, 1, true),
        gt(0, 1, true),
        gt(1, 0, true),
        gt(1, 0, true),
        gt(1, 0, true),
    ];
    let baf = vec![
        Some(0.30),
        Some(0.32),
        Some(0.28),
        Some(0.70),
        Some(0.72),
        Some(0.68),
    ];
    let n = genotypes.len();
    let record = RecordInput {
        n_allele: 2,
        genotypes,
        ad: vec![None; n],
        baf,
        lrr: vec![None; n],
        fmt_sign_field: vec![None; n],
        fmt_field_present: false,
    };

    let ann = annotator.annotate(&record, None);
    assert_eq!(ann.ac_het_phase, Some([3, 3]));
    let phase_test = ann.ac_het_phase_test.expect("phase test requested");
    assert!(phase_test.is_finite());

    let baf_phase = ann.baf_phase_test.expect("phase + populated baf_by_phase groups");
    assert!((baf_phase[0] - 0.30).abs() < 0.05); // median paternal BAF
    assert!((baf_phase[1] - 0.70).abs() < 0.05); // median maternal BAF
    assert!(baf_phase[2] > 0.0); // -log10(Welch p): separated groups, strong signal
    assert!(baf_phase[3] > 0.0); // -log10(Mann-Whitney p)
}

#[test]
fn allele_inference_and_correlation_compose_through_the_annotator() {
    let config = RunConfigBuilder::default().infer_alleles(true).cor_baf_lrr(true).build().unwrap();
    let schema = HeaderSchema { has_gt: true, has_baf: true, has_lrr: true, ..Default::default() };
    let mut annotator = Annotator::new(config, schema, 5).unwrap();

    let genotypes = vec![gt(0, 0, false), gt(0, 0, false), gt(0, 1, false), gt(0, 1, false), gt(1, 1, false)];
    let baf = vec![Some(0.01), Some(0.02), Some(0.5), Some(0.48), Some(0.96)];
    let lrr = vec![Some(0.05), Some(0.04), Some(0.0), Some(0.01), Some(-0.05)];
    let n = genotypes.len();
    let record = RecordInput {
        n_allele: 2,
        genotypes,
        ad: vec![None; n],
        baf,
        lrr,
        fmt_sign_field: vec![None; n],
        fmt_field_present: false,
    };

    let ann = annotator.annotate(&record, None);
    assert_eq!(ann.allele_a, Some(0));
    assert_eq!(ann.allele_b, Some(1));
    let cor = ann.cor_baf_lrr.expect("both baf and lrr present, alleles determined");
    assert!(cor.iter().all(|c| c.is_nan() || (-1.0..=1.0).contains(c)));
}

#[test]
fn schema_validation_rejects_ad_het_without_an_ad_field() {
    let config = RunConfigBuilder::default().ad_het(true).build().unwrap();
    let schema = HeaderSchema { has_gt: true, has_ad: false, ..Default::default() };
    assert!(Annotator::new(config, schema, 2).is_err());
}
