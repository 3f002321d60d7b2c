//! Sequence-context (GC/CpG fraction) lookup over an indexed reference
//! FASTA, grounded on `testcase.rs`'s
//! `bio::io::fasta::IndexedReader::from_file` + `fetch`/`read` usage.
//! Never builds a `.fai` — this module only reads through one the caller
//! has already produced (or `bio` produces it lazily on first open).

use std::fs::File;
use std::path::Path;

use bio::io::fasta;
use itertools::Itertools;

use crate::errors::Error;

/// Scans a window of reference sequence around each record and reports
/// GC fraction and CpG dinucleotide fraction over that window. Reuses one
/// internal buffer across calls.
pub struct ContextScanner<R> {
    reader: fasta::IndexedReader<R>,
    window_half_width: u32,
    buf: Vec<u8>,
}

impl ContextScanner<File> {
    pub fn from_path(path: impl AsRef<Path>, window_half_width: u32) -> Result<Self, Error> {
        let reader = fasta::IndexedReader::from_file(&path).map_err(|e| Error::ReferenceFetch {
            chrom: String::new(),
            start: 0,
            end: 0,
            msg: format!("opening reference index: {e}"),
        })?;
        Ok(ContextScanner { reader, window_half_width, buf: Vec::new() })
    }
}

impl<R: std::io::Read + std::io::Seek> ContextScanner<R> {
    /// `pos0` is the record's 0-based start; `ref_len` is the length of
    /// its reference allele. The scanned window is
    /// `[pos0 - W, pos0 + ref_len - 1 + W]` inclusive, per spec.md §4.7.
    pub fn scan(&mut self, chrom: &str, pos0: u64, ref_len: u64) -> Result<(f64, f64), Error> {
        let w = self.window_half_width as u64;
        let start = pos0.saturating_sub(w);
        let end = pos0 + ref_len + w;

        self.reader.fetch(chrom, start, end).map_err(|e| Error::ReferenceFetch {
            chrom: chrom.to_string(),
            start,
            end,
            msg: e.to_string(),
        })?;
        self.buf.clear();
        self.reader.read(&mut self.buf).map_err(|e| Error::ReferenceFetch {
            chrom: chrom.to_string(),
            start,
            end,
            msg: e.to_string(),
        })?;
        self.buf.make_ascii_uppercase();

        Ok(gc_and_cpg_fraction(&self.buf))
    }
}

/// `(GC fraction, CpG dinucleotide fraction)` over an uppercased, ACGTN
/// window. `NaN` in either slot when the relevant denominator is zero
/// (an all-N window).
fn gc_and_cpg_fraction(seq: &[u8]) -> (f64, f64) {
    let at = seq.iter().filter(|&&b| b == b'A' || b == b'T').count() as u64;
    let cg = seq.iter().filter(|&&b| b == b'C' || b == b'G').count() as u64;
    let cpg_dinucleotides = seq
        .iter()
        .tuple_windows()
        .filter(|(a, b)| **a == b'C' && **b == b'G')
        .count() as u64;

    let gc = if at + cg == 0 { f64::NAN } else { cg as f64 / (at + cg) as f64 };
    let cpg_frac = if seq.is_empty() { f64::NAN } else { (cpg_dinucleotides * 2) as f64 / seq.len() as f64 };
    (gc, cpg_frac)
}
