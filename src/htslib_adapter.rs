//! Thin `rust_htslib::bcf` <-> core-pipeline adapter: builds a
//! [`crate::record::RecordInput`] from a `bcf::Record`, and writes an
//! [`crate::annotation::Annotation`] back out as INFO fields. Grounded on
//! `call_cnvs.rs::Caller::call`'s "read tags, compute, push_info_*" shape
//! and `calling/variants/preprocessing/mod.rs`'s reader/writer wiring.

use std::path::Path;

use anyhow::{Context, Result};
use rust_htslib::bcf::header::Header;
use rust_htslib::bcf::record::{Genotype as BcfGenotype, GenotypeAllele, Numeric};
use rust_htslib::bcf::{Reader, Writer};

use crate::annotation::Annotation;
use crate::record::{Genotype, RecordInput, Sex};
use crate::HeaderSchema;

/// Opens the input BCF/VCF (`-` for stdin) and inspects its header for
/// the fields this crate's annotations can key off. `balance_format` is
/// the user-configured name of spec.md's `F` field (e.g. `--balance-format
/// poo`), not a literal tag called `"F"`; `None` means the balance tests
/// were not requested at all.
pub fn open_reader(path: &Path, balance_format: Option<&str>) -> Result<(Reader, HeaderSchema, Vec<String>)> {
    let reader = if path == Path::new("-") {
        Reader::from_stdin().context("opening stdin as BCF/VCF")?
    } else {
        Reader::from_path(path).with_context(|| format!("opening {path:?}"))?
    };
    let header = reader.header();

    let schema = HeaderSchema {
        has_gt: header.format_type(b"GT").is_ok(),
        has_ad: header.format_type(b"AD").is_ok(),
        has_baf: header.format_type(b"BAF").is_ok(),
        has_lrr: header.format_type(b"LRR").is_ok(),
        has_balance_field: balance_format
            .map(|tag| header.format_type(tag.as_bytes()).is_ok())
            .unwrap_or(false),
    };
    let samples: Vec<String> = header
        .samples()
        .iter()
        .map(|s| String::from_utf8_lossy(s).into_owned())
        .collect();

    Ok((reader, schema, samples))
}

/// Opens the output BCF/VCF, declaring this crate's INFO fields on top of
/// the input header.
pub fn open_writer(path: &Path, in_header: &rust_htslib::bcf::header::HeaderView) -> Result<Writer> {
    let mut header = Header::from_template(in_header);
    header.push_record(br#"##INFO=<ID=Ac_Het,Number=1,Type=Integer,Description="Heterozygous allele count">"#);
    header.push_record(br#"##INFO=<ID=Ac_Het_Sex,Number=2,Type=Integer,Description="Heterozygous allele count by sex [M,F]">"#);
    header.push_record(br#"##INFO=<ID=Ac_Sex_Test,Number=1,Type=Float,Description="-log10 Fisher p-value for sex-stratified homozygosity">"#);
    header.push_record(br#"##INFO=<ID=Ac_Het_Phase,Number=2,Type=Integer,Description="Phased heterozygous counts [paternal,maternal]">"#);
    header.push_record(br#"##INFO=<ID=Ac_Het_Phase_Test,Number=1,Type=Float,Description="-log10 binomial p-value for phase imbalance">"#);
    header.push_record(br#"##INFO=<ID=Bal,Number=2,Type=Integer,Description="Signed format field sign counts [positive,negative]">"#);
    header.push_record(br#"##INFO=<ID=Bal_Test,Number=1,Type=Float,Description="-log10 binomial p-value for format field sign imbalance">"#);
    header.push_record(br#"##INFO=<ID=Bal_Phase,Number=2,Type=Integer,Description="Format field sign vs phase concordance counts">"#);
    header.push_record(br#"##INFO=<ID=Bal_Phase_Test,Number=1,Type=Float,Description="-log10 binomial p-value for phase/format concordance">"#);
    header.push_record(br#"##INFO=<ID=AD_Het,Number=2,Type=Integer,Description="Summed ref/alt depth over heterozygous samples">"#);
    header.push_record(br#"##INFO=<ID=AD_Het_Test,Number=1,Type=Float,Description="-log10 binomial p-value for allelic depth imbalance">"#);
    header.push_record(br#"##INFO=<ID=Baf_Phase_Test,Number=4,Type=Float,Description="Median paternal BAF, median maternal BAF, -log10 Welch p, -log10 Mann-Whitney p">"#);
    header.push_record(br#"##INFO=<ID=Allele_A,Number=1,Type=Integer,Description="Allele index inferred as A (-1 if undetermined)">"#);
    header.push_record(br#"##INFO=<ID=Allele_B,Number=1,Type=Integer,Description="Allele index inferred as B (-1 if undetermined)">"#);
    header.push_record(br#"##INFO=<ID=Cor_Baf_Lrr,Number=3,Type=Float,Description="Pearson r(BAF,LRR) within [AA,AB,BB]">"#);
    header.push_record(br#"##INFO=<ID=GC,Number=1,Type=Float,Description="GC fraction of the reference window around the site">"#);
    header.push_record(br#"##INFO=<ID=CpG,Number=1,Type=Float,Description="CpG fraction of the reference window around the site">"#);

    let writer = if path == Path::new("-") {
        Writer::from_stdout(&header, false, rust_htslib::bcf::Format::BCF).context("opening stdout for BCF/VCF output")?
    } else {
        Writer::from_path(path, &header, false, rust_htslib::bcf::Format::BCF)
            .with_context(|| format!("opening {path:?} for output"))?
    };
    Ok(writer)
}

fn allele_and_phase(allele: Option<&GenotypeAllele>) -> (Option<u8>, bool) {
    match allele {
        Some(GenotypeAllele::Unphased(i)) => (Some(*i as u8), false),
        Some(GenotypeAllele::Phased(i)) => (Some(*i as u8), true),
        Some(GenotypeAllele::UnphasedMissing) => (None, false),
        Some(GenotypeAllele::PhasedMissing) => (None, true),
        None => (None, false),
    }
}

fn convert_genotype(raw: &BcfGenotype) -> Genotype {
    let alleles: Vec<&GenotypeAllele> = raw.iter().collect();
    let (allele0, _) = allele_and_phase(alleles.first().copied());
    let (allele1, phased) = allele_and_phase(alleles.get(1).copied());
    Genotype { allele0, allele1, phased }
}

/// Builds a [`RecordInput`] from one `bcf::Record`, pulling GT always and
/// AD/BAF/LRR/`balance_format` only when the caller says they are
/// present (a cheap way to skip decoding tags this run does not need).
pub fn build_record_input(
    record: &rust_htslib::bcf::Record,
    n_samples: usize,
    read_ad: bool,
    read_baf: bool,
    read_lrr: bool,
    balance_format: Option<&str>,
) -> Result<RecordInput> {
    let n_allele = record.allele_count().min(u8::MAX as u32) as u8;

    let genotypes: Vec<Genotype> = {
        let raw_genotypes = record.genotypes().context("decoding GT")?;
        (0..n_samples).map(|i| convert_genotype(&raw_genotypes.get(i))).collect()
    };

    let ad = if read_ad {
        match record.format(b"AD").integer() {
            Ok(values) => (0..n_samples)
                .map(|i| values.get(i).and_then(|v| match v {
                    [r, a, ..] if *r >= 0 && *a >= 0 => Some((*r, *a)),
                    _ => None,
                }))
                .collect(),
            Err(_) => vec![None; n_samples],
        }
    } else {
        vec![None; n_samples]
    };

    let baf = if read_baf {
        read_float_format(record, b"BAF", n_samples)
    } else {
        vec![None; n_samples]
    };

    let lrr = if read_lrr {
        read_float_format(record, b"LRR", n_samples)
    } else {
        vec![None; n_samples]
    };

    let (fmt_sign_field, fmt_field_present) = match balance_format {
        Some(tag) => (read_float_format(record, tag.as_bytes(), n_samples), true),
        None => (vec![None; n_samples], false),
    };

    Ok(RecordInput { n_allele, genotypes, ad, baf, lrr, fmt_sign_field, fmt_field_present })
}

fn read_float_format(record: &rust_htslib::bcf::Record, tag: &[u8], n_samples: usize) -> Vec<Option<f64>> {
    match record.format(tag).float() {
        Ok(values) => (0..n_samples)
            .map(|i| values.get(i).and_then(|v| v.first().map(|x| *x as f64).filter(|x| !x.is_nan())))
            .collect(),
        Err(_) => vec![None; n_samples],
    }
}

/// Writes every populated field of `ann` back onto `record` as INFO tags.
pub fn write_annotation(record: &mut rust_htslib::bcf::Record, ann: &Annotation) -> Result<()> {
    if let Some(v) = ann.ac_het {
        record.push_info_integer(b"Ac_Het", &[v as i32])?;
    }
    if let Some(v) = ann.ac_het_sex {
        record.push_info_integer(b"Ac_Het_Sex", &[v[0] as i32, v[1] as i32])?;
    }
    if let Some(v) = ann.ac_sex_test {
        record.push_info_float(b"Ac_Sex_Test", &[v as f32])?;
    }
    if let Some(v) = ann.ac_het_phase {
        record.push_info_integer(b"Ac_Het_Phase", &[v[0] as i32, v[1] as i32])?;
    }
    if let Some(v) = ann.ac_het_phase_test {
        record.push_info_float(b"Ac_Het_Phase_Test", &[v as f32])?;
    }
    if let Some(v) = ann.bal {
        record.push_info_integer(b"Bal", &[v[0] as i32, v[1] as i32])?;
    }
    if let Some(v) = ann.bal_test {
        record.push_info_float(b"Bal_Test", &[v as f32])?;
    }
    if let Some(v) = ann.bal_phase {
        record.push_info_integer(b"Bal_Phase", &[v[0] as i32, v[1] as i32])?;
    }
    if let Some(v) = ann.bal_phase_test {
        record.push_info_float(b"Bal_Phase_Test", &[v as f32])?;
    }
    if let Some(v) = ann.ad_het {
        record.push_info_integer(b"AD_Het", &[v[0] as i32, v[1] as i32])?;
    }
    if let Some(v) = ann.ad_het_test {
        record.push_info_float(b"AD_Het_Test", &[v as f32])?;
    }
    if let Some(v) = ann.baf_phase_test {
        record.push_info_float(b"Baf_Phase_Test", &v.map(|x| x as f32))?;
    }
    if let Some(v) = ann.allele_a {
        record.push_info_integer(b"Allele_A", &[v])?;
    }
    if let Some(v) = ann.allele_b {
        record.push_info_integer(b"Allele_B", &[v])?;
    }
    if let Some(v) = ann.cor_baf_lrr {
        record.push_info_float(b"Cor_Baf_Lrr", &v.map(|x| x as f32))?;
    }
    if let Some(v) = ann.gc {
        record.push_info_float(b"GC", &[v as f32])?;
    }
    if let Some(v) = ann.cpg {
        record.push_info_float(b"CpG", &[v as f32])?;
    }
    Ok(())
}

/// Copies `GT` plus whichever of `AD`/`BAF`/`LRR`/the balance-format
/// field are actually present on `src`, restricted to `kept_indices`,
/// onto `dst`. Called once per record when `drop_genotypes` is not set
/// (spec.md's "strip per-sample fields from output" names the flag as
/// the thing that removes them, which means the default keeps them).
pub fn copy_per_sample_fields(
    src: &rust_htslib::bcf::Record,
    dst: &mut rust_htslib::bcf::Record,
    kept_indices: &[usize],
    balance_format: Option<&str>,
) -> Result<()> {
    copy_genotypes(src, dst, kept_indices)?;
    copy_integer_format(src, dst, b"AD", 2, kept_indices)?;
    copy_float_format(src, dst, b"BAF", 1, kept_indices)?;
    copy_float_format(src, dst, b"LRR", 1, kept_indices)?;
    if let Some(tag) = balance_format {
        copy_float_format(src, dst, tag.as_bytes(), 1, kept_indices)?;
    }
    Ok(())
}

fn copy_genotypes(src: &rust_htslib::bcf::Record, dst: &mut rust_htslib::bcf::Record, kept_indices: &[usize]) -> Result<()> {
    let genotypes = src.genotypes().context("decoding GT for passthrough")?;
    let gts: Vec<GenotypeAllele> = kept_indices
        .iter()
        .flat_map(|&i| genotypes.get(i).iter().copied().collect::<Vec<_>>())
        .collect();
    dst.push_genotypes(&gts).context("writing GT passthrough")?;
    Ok(())
}

/// Passes an integer FORMAT field through unchanged, restricted to
/// `kept_indices`; a no-op when `tag` is absent from `src` (not every
/// record carries AD). Samples missing the tag (but present elsewhere in
/// the record) are padded to `width` with htslib's missing-integer
/// sentinel so every kept sample contributes the same number of values.
fn copy_integer_format(
    src: &rust_htslib::bcf::Record,
    dst: &mut rust_htslib::bcf::Record,
    tag: &[u8],
    width: usize,
    kept_indices: &[usize],
) -> Result<()> {
    let values = match src.format(tag).integer() {
        Ok(values) => values,
        Err(_) => return Ok(()),
    };
    let flattened: Vec<i32> = kept_indices
        .iter()
        .flat_map(|&i| match values.get(i) {
            Some(v) => v.iter().copied().chain(std::iter::repeat(i32::missing())).take(width).collect::<Vec<_>>(),
            None => vec![i32::missing(); width],
        })
        .collect();
    dst.push_format_integer(tag, &flattened)
        .with_context(|| format!("writing {} passthrough", String::from_utf8_lossy(tag)))?;
    Ok(())
}

/// As [`copy_integer_format`], for a float FORMAT field.
fn copy_float_format(
    src: &rust_htslib::bcf::Record,
    dst: &mut rust_htslib::bcf::Record,
    tag: &[u8],
    width: usize,
    kept_indices: &[usize],
) -> Result<()> {
    let values = match src.format(tag).float() {
        Ok(values) => values,
        Err(_) => return Ok(()),
    };
    let flattened: Vec<f32> = kept_indices
        .iter()
        .flat_map(|&i| match values.get(i) {
            Some(v) => v.iter().copied().chain(std::iter::repeat(f32::missing())).take(width).collect::<Vec<_>>(),
            None => vec![f32::missing(); width],
        })
        .collect();
    dst.push_format_float(tag, &flattened)
        .with_context(|| format!("writing {} passthrough", String::from_utf8_lossy(tag)))?;
    Ok(())
}

/// Loads a sex vector already restricted to the retained sample indices,
/// or `None` if no sex file was configured.
pub fn load_sex_vector(
    sex_file: Option<&Path>,
    header_samples: &[String],
    kept_indices: &[usize],
) -> Result<Option<Vec<Sex>>> {
    match sex_file {
        None => Ok(None),
        Some(path) => {
            let full = crate::sex::load_sex_file(path, header_samples)?;
            Ok(Some(kept_indices.iter().map(|&i| full[i]).collect()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allele_and_phase_maps_every_variant() {
        assert_eq!(allele_and_phase(Some(&GenotypeAllele::Unphased(1))), (Some(1), false));
        assert_eq!(allele_and_phase(Some(&GenotypeAllele::Phased(0))), (Some(0), true));
        assert_eq!(allele_and_phase(Some(&GenotypeAllele::UnphasedMissing)), (None, false));
        assert_eq!(allele_and_phase(Some(&GenotypeAllele::PhasedMissing)), (None, true));
        assert_eq!(allele_and_phase(None), (None, false));
    }
}
