//! CLI entrypoint: parses [`siteannot::cli::Siteannot`], wires up logging
//! the way the teacher's old `varlociraptor` binary did (`fern` to
//! stderr, level from `-v`/`RUST_LOG`), and drives the annotate subcommand
//! to completion.

use std::process::exit;

use anyhow::{Context, Result};
use log::{debug, info};
use rust_htslib::bcf::Read as BcfRead;
use structopt::StructOpt;

use siteannot::cli::Siteannot;
use siteannot::config::RunConfigBuilder;
use siteannot::context::ContextScanner;
use siteannot::samples::{parse_sample_spec, resolve_indices};
use siteannot::{htslib_adapter, Annotator};

fn setup_logger() -> Result<()> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!("[{}][{}] {}", record.target(), record.level(), message))
        })
        .level(log::LevelFilter::Info)
        .chain(std::io::stderr())
        .apply()
        .context("initializing logger")
}

fn run() -> Result<()> {
    setup_logger()?;

    let Siteannot::Annotate {
        input,
        output,
        reference,
        gc_window,
        phase,
        ad_het,
        infer_alleles,
        cor_baf_lrr,
        drop_genotypes,
        balance_format,
        sex_file,
        samples,
        force_samples,
    } = Siteannot::from_args();

    let (mut reader, schema, header_samples) =
        htslib_adapter::open_reader(&input, balance_format.as_deref()).context("opening input")?;

    let selection = parse_sample_spec(samples.as_deref().unwrap_or(""))?;
    let kept_indices = resolve_indices(&selection, &header_samples, force_samples)?;
    let n_samples = kept_indices.len();

    let mut config_builder = RunConfigBuilder::default()
        .window_half_width(gc_window)
        .phase(phase)
        .ad_het(ad_het)
        .infer_alleles(infer_alleles)
        .cor_baf_lrr(cor_baf_lrr)
        .drop_genotypes(drop_genotypes)
        .force_samples(force_samples);
    if let Some(tag) = balance_format.clone() {
        config_builder = config_builder.balance_format(tag);
    }
    if let Some(path) = reference.clone() {
        config_builder = config_builder.reference(path);
    }
    if let Some(path) = sex_file.clone() {
        config_builder = config_builder.sex_file(path);
    }
    let config = config_builder.build().map_err(|e| anyhow::anyhow!("building config: {e}"))?;

    let mut annotator = Annotator::new(config.clone(), schema, n_samples)
        .map_err(|e| anyhow::anyhow!("{e}"))?;

    let sex = htslib_adapter::load_sex_vector(sex_file.as_deref(), &header_samples, &kept_indices)?;

    let mut scanner = match &reference {
        Some(path) => Some(ContextScanner::from_path(path, gc_window).map_err(|e| anyhow::anyhow!("{e}"))?),
        None => None,
    };

    let in_header = reader.header().clone();
    let mut writer = htslib_adapter::open_writer(&output, &in_header).context("opening output")?;

    info!("annotating {:?} -> {:?} ({} samples kept of {})", input, output, n_samples, header_samples.len());

    let mut record = reader.empty_record();
    let mut n_records = 0u64;
    while reader.read(&mut record).context("reading record")? {
        let chrom = String::from_utf8_lossy(in_header.rid2name(record.rid().unwrap_or(0))).into_owned();
        debug!("record: {}:{}", chrom, record.pos() + 1);

        let mut out_record = writer.empty_record();
        out_record.set_rid(&record.rid());
        out_record.set_pos(record.pos());
        out_record
            .set_alleles(&record.alleles())
            .context("copying alleles")?;
        out_record.set_id(&record.id()).context("copying id")?;
        out_record.set_qual(record.qual());

        let full_input =
            htslib_adapter::build_record_input(&record, header_samples.len(), ad_het, true, true, balance_format.as_deref())
                .context("decoding record")?;
        let subset = subset_record_input(&full_input, &kept_indices);

        let mut ann = annotator.annotate(&subset, sex.as_deref());

        if let Some(scanner) = scanner.as_mut() {
            let ref_len = record.alleles().first().map(|a| a.len() as u64).unwrap_or(1);
            match scanner.scan(&chrom, record.pos() as u64, ref_len) {
                Ok((gc, cpg)) => {
                    ann.gc = Some(gc);
                    ann.cpg = Some(cpg);
                }
                Err(e) => return Err(anyhow::anyhow!("{e}")),
            }
        }

        htslib_adapter::write_annotation(&mut out_record, &ann)?;

        if !drop_genotypes {
            htslib_adapter::copy_per_sample_fields(&record, &mut out_record, &kept_indices, balance_format.as_deref())?;
        }

        writer.write(&out_record).context("writing record")?;
        n_records += 1;
    }

    info!("{} records processed.", n_records);
    Ok(())
}

/// Restricts every per-sample vector of a full-header [`siteannot::record::RecordInput`]
/// down to the retained sample indices.
fn subset_record_input(
    full: &siteannot::record::RecordInput,
    kept_indices: &[usize],
) -> siteannot::record::RecordInput {
    siteannot::record::RecordInput {
        n_allele: full.n_allele,
        genotypes: kept_indices.iter().map(|&i| full.genotypes[i]).collect(),
        ad: kept_indices.iter().map(|&i| full.ad[i]).collect(),
        baf: kept_indices.iter().map(|&i| full.baf[i]).collect(),
        lrr: kept_indices.iter().map(|&i| full.lrr[i]).collect(),
        fmt_sign_field: kept_indices.iter().map(|&i| full.fmt_sign_field[i]).collect(),
        fmt_field_present: full.fmt_field_present,
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        exit(1);
    }
}
