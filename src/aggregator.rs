//! Per-record aggregation: walks every sample once, deriving phase signs
//! and format-field signs into reusable scratch buffers and folding them
//! into the site-level `Counts` the `TestBattery` consumes.

use crate::record::{gt_phase, sign, RecordInput, Sex};

/// Site-level counts accumulated by one call to
/// [`RecordAggregator::ingest`]. Reset to all-zero at the start of every
/// record.
#[derive(Debug, Clone, Default)]
pub struct Counts {
    pub ac_het: u32,
    /// Homozygous (ref or alt) sample counts by sex: `[male, female]`.
    /// Combined with `ac_het_sex` at test-assembly time to form the
    /// `[AA_M, AA_F, non-AA_M, non-AA_F]` Fisher table (DESIGN.md open
    /// question on `ac_sex`).
    pub ac_hom_sex: [u32; 2],
    pub ac_het_sex: [u32; 2],
    /// `[paternal (+1), maternal (-1)]`.
    pub ac_het_phase: [u32; 2],
    /// `[positive F, negative F]`, over all non-missing samples.
    pub fmt_bal: [u32; 2],
    /// `[concordant with gt_phase, discordant]`, heterozygous samples
    /// only.
    pub fmt_bal_phase: [u32; 2],
    /// `[sum(ref depth), sum(alt depth)]` over heterozygous samples.
    pub ad_het: [u64; 2],
}

/// Per-record scratch buffers, owned by the aggregator and resized only
/// when the sample count changes; cleared (not reallocated) every
/// record.
#[derive(Debug, Default)]
struct Scratch {
    gt_phase: Vec<Option<i8>>,
    fmt_sign: Vec<Option<i8>>,
}

impl Scratch {
    fn resize(&mut self, n: usize) {
        self.gt_phase.resize(n, None);
        self.fmt_sign.resize(n, None);
    }

    fn clear(&mut self) {
        self.gt_phase.iter_mut().for_each(|v| *v = None);
        self.fmt_sign.iter_mut().for_each(|v| *v = None);
    }
}

pub struct RecordAggregator {
    n_samples: usize,
    scratch: Scratch,
    pub counts: Counts,
    /// BAF values of phased heterozygous samples, partitioned by phase
    /// sign: `[paternal (+1), maternal (-1)]`.
    pub baf_by_phase: [Vec<f64>; 2],
}

impl RecordAggregator {
    pub fn new(n_samples: usize) -> Self {
        let mut scratch = Scratch::default();
        scratch.resize(n_samples);
        RecordAggregator {
            n_samples,
            scratch,
            counts: Counts::default(),
            baf_by_phase: [Vec::with_capacity(n_samples), Vec::with_capacity(n_samples)],
        }
    }

    /// Resizes the internal scratch buffers when the number of samples
    /// in the input changes (normally once, at startup).
    pub fn resize(&mut self, n_samples: usize) {
        if n_samples != self.n_samples {
            self.n_samples = n_samples;
            self.scratch.resize(n_samples);
        }
    }

    /// Aggregates one record's per-sample fields into `self.counts` /
    /// `self.baf_by_phase`, overwriting whatever the previous record left
    /// behind.
    ///
    /// A direct BAF field, when present and non-NaN, silently overrides
    /// the AD-derived `(alt + 0.5) / (ref + alt + 1)` estimate (DESIGN.md
    /// open question #3).
    pub fn ingest(&mut self, record: &RecordInput, sex: Option<&[Sex]>) {
        log::debug!("aggregating record: {} samples, n_allele={}", self.n_samples, record.n_allele);
        self.counts = Counts::default();
        self.scratch.clear();
        self.baf_by_phase[0].clear();
        self.baf_by_phase[1].clear();

        for i in 0..self.n_samples {
            let gt = match record.genotypes.get(i) {
                Some(gt) => *gt,
                None => continue,
            };
            if gt.is_missing() {
                continue;
            }

            let phase = gt_phase(&gt);
            self.scratch.gt_phase[i] = phase;

            // `fmt_field_present` distinguishes "F" absent from the header
            // entirely from merely absent on this sample; in the former
            // case there is nothing to bucket even if `fmt_sign_field`
            // happened to carry a stray value.
            let raw_fmt = if record.fmt_field_present {
                record.fmt_sign_field.get(i).copied().flatten()
            } else {
                None
            };
            let fsign = sign(raw_fmt);
            self.scratch.fmt_sign[i] = fsign;

            if let Some(fs) = fsign {
                self.counts.fmt_bal[((1 - fs as i32) / 2) as usize] += 1;
            }

            if let Some(sex_vec) = sex {
                if gt.is_hom_ref() || gt.is_hom_alt() {
                    match sex_vec.get(i).copied().unwrap_or_default() {
                        Sex::Male => self.counts.ac_hom_sex[0] += 1,
                        Sex::Female => self.counts.ac_hom_sex[1] += 1,
                        Sex::Unknown => {}
                    }
                }
            }

            if !gt.is_het() {
                continue;
            }

            self.counts.ac_het += 1;
            if let Some(sex_vec) = sex {
                match sex_vec.get(i).copied().unwrap_or_default() {
                    Sex::Male => self.counts.ac_het_sex[0] += 1,
                    Sex::Female => self.counts.ac_het_sex[1] += 1,
                    Sex::Unknown => {}
                }
            }

            if let Some(ph) = phase {
                if ph == 1 || ph == -1 {
                    self.counts.ac_het_phase[((1 - ph as i32) / 2) as usize] += 1;
                }
            }

            if let (Some(ph), Some(fs)) = (phase, fsign) {
                if (ph == 1 || ph == -1) && (fs == 1 || fs == -1) {
                    let product = ph as i32 * fs as i32;
                    self.counts.fmt_bal_phase[((1 - product) / 2) as usize] += 1;
                }
            }

            let mut baf_estimate = None;
            if let Some((ref_depth, alt_depth)) = record.ad.get(i).copied().flatten() {
                self.counts.ad_het[0] += ref_depth.max(0) as u64;
                self.counts.ad_het[1] += alt_depth.max(0) as u64;
                baf_estimate = Some((alt_depth as f64 + 0.5) / (ref_depth as f64 + alt_depth as f64 + 1.0));
            }
            if let Some(direct_baf) = record.baf.get(i).copied().flatten() {
                if !direct_baf.is_nan() {
                    baf_estimate = Some(direct_baf);
                }
            }

            if let (Some(ph), Some(baf)) = (phase, baf_estimate) {
                if (ph == 1 || ph == -1) && !baf.is_nan() {
                    self.baf_by_phase[((1 - ph as i32) / 2) as usize].push(baf);
                }
            }
        }

        log::debug!(
            "ac_het={}, ac_het_phase={:?}, fmt_bal={:?}",
            self.counts.ac_het,
            self.counts.ac_het_phase,
            self.counts.fmt_bal
        );
    }
}
