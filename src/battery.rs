//! Wires `Counts` + `RunConfig` through the numeric kernels into an
//! `Annotation`. Holds the one piece of cross-record mutable state this
//! crate has: the binomial exact-test cache, grown lazily and reused for
//! every `Ac_Het_Phase_Test`/`Bal_Test`/`Bal_Phase_Test`/`AD_Het_Test`
//! call.

use crate::aggregator::Counts;
use crate::annotation::Annotation;
use crate::config::RunConfig;
use crate::numeric::binomial::BinomialExactCache;
use crate::numeric::fisher::fisher_exact_two_tailed;
use crate::numeric::mannwhitney::mann_whitney_u;
use crate::numeric::mean_var::median;
use crate::numeric::special::neg_log10_p;
use crate::numeric::welch::welch_t_test;

pub struct TestBattery {
    binom_cache: BinomialExactCache,
}

impl TestBattery {
    pub fn new() -> Self {
        TestBattery { binom_cache: BinomialExactCache::new() }
    }

    /// Evaluates every test this record's config/data supports, returning
    /// the subset of `Annotation` fields that apply. `sex_available`
    /// gates `Ac_Het_Sex`/`Ac_Sex_Test` independently of `config` since
    /// the sex vector is a property of the input, not a request flag.
    pub fn evaluate(
        &mut self,
        config: &RunConfig,
        counts: &Counts,
        baf_by_phase: &[Vec<f64>; 2],
        sex_available: bool,
    ) -> Annotation {
        let mut out = Annotation { ac_het: Some(counts.ac_het), ..Default::default() };

        if sex_available {
            out.ac_het_sex = Some(counts.ac_het_sex);
            let p = fisher_exact_two_tailed(
                counts.ac_hom_sex[0] as u64,
                counts.ac_hom_sex[1] as u64,
                counts.ac_het_sex[0] as u64,
                counts.ac_het_sex[1] as u64,
            );
            out.ac_sex_test = Some(neg_log10_p(p));
        }

        if config.phase {
            out.ac_het_phase = Some(counts.ac_het_phase);
            let n = (counts.ac_het_phase[0] + counts.ac_het_phase[1]) as i64;
            let p = self.binom_cache.binom_exact(counts.ac_het_phase[0] as i64, n);
            out.ac_het_phase_test = Some(neg_log10_p(p));
        }

        if config.balance_format.is_some() {
            out.bal = Some(counts.fmt_bal);
            let n = (counts.fmt_bal[0] + counts.fmt_bal[1]) as i64;
            let p = self.binom_cache.binom_exact(counts.fmt_bal[0] as i64, n);
            out.bal_test = Some(neg_log10_p(p));

            if config.phase {
                out.bal_phase = Some(counts.fmt_bal_phase);
                let n2 = (counts.fmt_bal_phase[0] + counts.fmt_bal_phase[1]) as i64;
                let p2 = self.binom_cache.binom_exact(counts.fmt_bal_phase[0] as i64, n2);
                out.bal_phase_test = Some(neg_log10_p(p2));
            }
        }

        if config.ad_het {
            out.ad_het = Some(counts.ad_het);
            let n = counts.ad_het[0] + counts.ad_het[1];
            let p = if n > i64::MAX as u64 {
                1.0
            } else {
                self.binom_cache.binom_exact(counts.ad_het[0] as i64, n as i64)
            };
            out.ad_het_test = Some(neg_log10_p(p));
        }

        if config.phase && !baf_by_phase[0].is_empty() && !baf_by_phase[1].is_empty() {
            let mut paternal = baf_by_phase[0].clone();
            let mut maternal = baf_by_phase[1].clone();
            let median_paternal = median(&mut paternal).unwrap_or(f64::NAN);
            let median_maternal = median(&mut maternal).unwrap_or(f64::NAN);
            let welch_p = welch_t_test(&baf_by_phase[0], &baf_by_phase[1]);
            let mwu_p = mann_whitney_u(&baf_by_phase[0], &baf_by_phase[1]);
            out.baf_phase_test = Some([
                median_paternal,
                median_maternal,
                neg_log10_p(welch_p),
                neg_log10_p(mwu_p),
            ]);
        }

        out
    }
}

impl Default for TestBattery {
    fn default() -> Self {
        Self::new()
    }
}
