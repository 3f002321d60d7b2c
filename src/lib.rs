//! Per-site statistical annotator for genotype/BAF/LRR VCF records: reads
//! one record at a time, aggregates its per-sample fields into site-level
//! counts, runs a battery of exact and approximate hypothesis tests
//! against those counts, optionally infers which of two candidate
//! alleles is "A" versus "B" from BAF, and optionally reports the GC/CpG
//! content of the reference sequence around the site.
//!
//! The core pipeline (this crate) never touches BCF/VCF or FASTA types
//! directly; [`htslib_adapter`] is the thin, file-format-aware layer that
//! builds a [`record::RecordInput`] from a `rust_htslib::bcf::Record` and
//! writes an [`annotation::Annotation`] back out as INFO fields.

pub mod aggregator;
pub mod allele;
pub mod annotation;
pub mod battery;
pub mod betabinom;
pub mod cli;
pub mod config;
pub mod context;
pub mod correlation;
pub mod errors;
pub mod htslib_adapter;
pub mod numeric;
pub mod record;
pub mod samples;
pub mod sex;

use aggregator::RecordAggregator;
use annotation::Annotation;
use battery::TestBattery;
use config::RunConfig;
use errors::Error;
use record::{RecordInput, Sex};

/// Header-derived prerequisites an [`Annotator`] needs to know about
/// before it can validate a [`RunConfig`] against a specific input file.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderSchema {
    pub has_gt: bool,
    pub has_ad: bool,
    pub has_baf: bool,
    pub has_lrr: bool,
    pub has_balance_field: bool,
}

/// Owns every piece of per-run mutable state (the reused scratch buffers
/// and the binomial exact-test cache) and exposes the single per-record
/// entry point, [`Annotator::annotate`].
pub struct Annotator {
    config: RunConfig,
    aggregator: RecordAggregator,
    battery: TestBattery,
}

impl Annotator {
    /// Validates `config` against `schema` (spec.md §7's `ConfigError`/
    /// `SchemaError`, both fatal at construction) and builds the pipeline.
    pub fn new(config: RunConfig, schema: HeaderSchema, n_samples: usize) -> Result<Self, Error> {
        if config.window_half_width == 0 {
            return Err(Error::NonPositiveWindow { window: 0 });
        }
        if !schema.has_gt {
            return Err(Error::MissingSchemaField { annotation: "core aggregation", field: "GT" });
        }
        if config.ad_het && !schema.has_ad {
            return Err(Error::MissingSchemaField { annotation: "AD_Het", field: "AD" });
        }
        if config.balance_format.is_some() && !schema.has_balance_field {
            return Err(Error::MissingSchemaField { annotation: "Bal", field: "F" });
        }
        if config.cor_baf_lrr && !config.infer_alleles {
            return Err(Error::ConfigError(
                "cor_baf_lrr requires infer_alleles to be enabled, since correlation classes are \
                 defined by the inferred ALLELE_A/ALLELE_B"
                    .to_string(),
            ));
        }
        if config.cor_baf_lrr && !(schema.has_baf && schema.has_lrr) {
            return Err(Error::CorrelationRequiresBafAndLrr);
        }

        Ok(Annotator {
            config,
            aggregator: RecordAggregator::new(n_samples),
            battery: TestBattery::new(),
        })
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Aggregates and tests one record, returning its [`Annotation`].
    /// `sex` is `None` when no sex file was configured; when present it
    /// must have the same length as `record.genotypes`.
    pub fn annotate(&mut self, record: &RecordInput, sex: Option<&[Sex]>) -> Annotation {
        self.aggregator.ingest(record, sex);
        let mut ann = self.battery.evaluate(
            &self.config,
            &self.aggregator.counts,
            &self.aggregator.baf_by_phase,
            sex.is_some(),
        );

        if self.config.infer_alleles {
            let (a, b) = allele::infer_alleles(record.n_allele, &record.genotypes, &record.baf);
            ann.allele_a = Some(a);
            ann.allele_b = Some(b);
            if self.config.cor_baf_lrr {
                ann.cor_baf_lrr = correlation::baf_lrr_correlation(&record.genotypes, &record.baf, &record.lrr, a, b);
            }
        }

        ann
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RunConfigBuilder;
    use crate::record::Genotype;

    fn gt(a0: u8, a1: u8, phased: bool) -> Genotype {
        Genotype { allele0: Some(a0), allele1: Some(a1), phased }
    }

    fn record(genotypes: Vec<Genotype>, baf: Vec<Option<f64>>, lrr: Vec<Option<f64>>) -> RecordInput {
        let n = genotypes.len();
        RecordInput {
            n_allele: 2,
            genotypes,
            ad: vec![None; n],
            baf,
            lrr,
            fmt_sign_field: vec![None; n],
            fmt_field_present: false,
        }
    }

    #[test]
    fn rejects_zero_window() {
        let config = RunConfigBuilder::default().window_half_width(0).build().unwrap();
        let schema = HeaderSchema { has_gt: true, ..Default::default() };
        assert!(matches!(Annotator::new(config, schema, 2), Err(Error::NonPositiveWindow { .. })));
    }

    #[test]
    fn rejects_missing_gt_schema() {
        let config = RunConfig::default();
        let schema = HeaderSchema::default();
        assert!(matches!(Annotator::new(config, schema, 2), Err(Error::MissingSchemaField { .. })));
    }

    #[test]
    fn rejects_cor_baf_lrr_without_infer_alleles() {
        let config = RunConfigBuilder::default().cor_baf_lrr(true).build().unwrap();
        let schema = HeaderSchema { has_gt: true, has_baf: true, has_lrr: true, ..Default::default() };
        assert!(matches!(Annotator::new(config, schema, 2), Err(Error::ConfigError(_))));
    }

    #[test]
    fn rejects_cor_baf_lrr_without_both_fields() {
        let config = RunConfigBuilder::default().cor_baf_lrr(true).infer_alleles(true).build().unwrap();
        let schema = HeaderSchema { has_gt: true, has_baf: true, has_lrr: false, ..Default::default() };
        assert!(matches!(Annotator::new(config, schema, 2), Err(Error::CorrelationRequiresBafAndLrr)));
    }

    #[test]
    fn end_to_end_allele_and_correlation_pipeline() {
        let config = RunConfigBuilder::default().infer_alleles(true).cor_baf_lrr(true).build().unwrap();
        let schema = HeaderSchema { has_gt: true, has_baf: true, has_lrr: true, ..Default::default() };
        let mut annotator = Annotator::new(config, schema, 4).unwrap();

        let genotypes = vec![gt(0, 0, false), gt(0, 0, false), gt(0, 1, false), gt(1, 1, false)];
        let baf = vec![Some(0.02), Some(0.03), Some(0.5), Some(0.97)];
        let lrr = vec![Some(0.1), Some(0.2), Some(0.0), Some(-0.1)];
        let rec = record(genotypes, baf, lrr);

        let ann = annotator.annotate(&rec, None);
        assert_eq!(ann.allele_a, Some(0));
        assert_eq!(ann.allele_b, Some(1));
        assert!(ann.cor_baf_lrr.is_some());
    }
}
