//! Run configuration: every knob in spec.md §6's option table, built via
//! a `derive_builder` builder the way `call_cnvs.rs::CallerBuilder` and
//! `testcase.rs::TestcaseBuilder` build their callers.

use std::path::PathBuf;

use derive_builder::Builder;

#[derive(Debug, Clone, Builder)]
#[builder(pattern = "owned")]
pub struct RunConfig {
    /// Half-width (in bases) of the GC/CpG context window around each
    /// record; must be positive.
    #[builder(default = "200")]
    pub window_half_width: u32,
    /// Enable the phase-dependent annotations (`Ac_Het_Phase`,
    /// `Ac_Het_Phase_Test`, `Bal_Phase`, `Bal_Phase_Test`, `Baf_Phase_Test`).
    #[builder(default)]
    pub phase: bool,
    /// Enable `AD_Het`/`AD_Het_Test`.
    #[builder(default)]
    pub ad_het: bool,
    /// Enable A/B allele inference (`Allele_A`/`Allele_B`), prerequisite
    /// for `cor_baf_lrr`.
    #[builder(default)]
    pub infer_alleles: bool,
    /// Enable the BAF/LRR correlation annotation; requires both BAF and
    /// LRR to be present and `infer_alleles` to be set.
    #[builder(default)]
    pub cor_baf_lrr: bool,
    #[builder(default)]
    pub drop_genotypes: bool,
    /// Name of the signed FORMAT field backing the `Bal`/`Bal_Phase`
    /// tests (spec.md's `F`). `None` disables those annotations.
    #[builder(default, setter(strip_option))]
    pub balance_format: Option<String>,
    #[builder(default, setter(strip_option))]
    pub reference: Option<PathBuf>,
    #[builder(default, setter(strip_option))]
    pub sex_file: Option<PathBuf>,
    #[builder(default)]
    pub force_samples: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfigBuilder::default().build().expect("all RunConfig fields have defaults")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_disables_optional_annotations() {
        let config = RunConfig::default();
        assert_eq!(config.window_half_width, 200);
        assert!(!config.phase);
        assert!(config.balance_format.is_none());
    }

    #[test]
    fn builder_overrides_propagate() {
        let config = RunConfigBuilder::default()
            .window_half_width(50)
            .phase(true)
            .balance_format("FOO".to_string())
            .build()
            .unwrap();
        assert_eq!(config.window_half_width, 50);
        assert!(config.phase);
        assert_eq!(config.balance_format.as_deref(), Some("FOO"));
    }
}
