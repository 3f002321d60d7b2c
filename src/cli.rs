//! Command-line surface: one `structopt` derive enum exposing spec.md
//! §6's option table, the same shape as `varlociraptor`'s top-level
//! `Varlociraptor` enum.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use structopt::StructOpt;

#[derive(Debug, StructOpt, Serialize, Deserialize, Clone)]
#[structopt(
    name = "siteannot",
    about = "Per-site statistical annotator for genotype/BAF/LRR VCF records."
)]
pub enum Siteannot {
    #[structopt(name = "annotate", about = "Annotate a VCF/BCF with per-site statistical tests.")]
    Annotate {
        #[structopt(long = "in", help = "Input VCF/BCF, or '-' for stdin.")]
        input: PathBuf,

        #[structopt(long = "out", help = "Output VCF/BCF, or '-' for stdout.")]
        output: PathBuf,

        #[structopt(long = "reference", help = "Indexed reference FASTA for GC/CpG context.")]
        reference: Option<PathBuf>,

        #[structopt(long = "gc-window", default_value = "200", help = "Half-width of the GC/CpG context window.")]
        gc_window: u32,

        #[structopt(long = "phase", help = "Enable phase-dependent annotations.")]
        phase: bool,

        #[structopt(long = "ad-het", help = "Enable AD_Het/AD_Het_Test.")]
        ad_het: bool,

        #[structopt(long = "infer-alleles", help = "Enable A/B allele inference.")]
        infer_alleles: bool,

        #[structopt(long = "cor-baf-lrr", help = "Enable BAF/LRR correlation (requires --infer-alleles).")]
        cor_baf_lrr: bool,

        #[structopt(long = "drop-genotypes", help = "Drop per-sample genotype data from the output.")]
        drop_genotypes: bool,

        #[structopt(long = "balance-format", help = "FORMAT field backing Bal/Bal_Phase.")]
        balance_format: Option<String>,

        #[structopt(long = "sex-file", help = "Sex file (sample name, M/F), one per line.")]
        sex_file: Option<PathBuf>,

        #[structopt(long = "samples", help = "Sample subset: comma list, ^-prefixed exclusion, or @file.")]
        samples: Option<String>,

        #[structopt(long = "force-samples", help = "Do not fail on unknown sample names.")]
        force_samples: bool,
    },
}
