//! Error taxonomy: `ConfigError`/`SchemaError` are fatal at construction
//! time; `ReferenceError` is fatal per-record and stops the driver loop.
//! `NumericUnderflow`/`InferenceUndetermined` are deliberately absent —
//! spec.md §7 has both recovered locally and reflected as sentinel output
//! values, never surfaced as a `Result::Err`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("gc_window must be a positive integer, got {window}")]
    NonPositiveWindow { window: i64 },

    #[error("cor_baf_lrr requires both BAF and LRR fields to be available")]
    CorrelationRequiresBafAndLrr,

    #[error("sample {name} is not present in the input and --force-samples was not given")]
    UnknownSample { name: String },

    #[error("sample selection cannot mix plain and `^`-prefixed (exclusion) names")]
    ContradictorySampleSelection,

    #[error("annotation {annotation} requires field {field}, which is absent from the input header")]
    MissingSchemaField {
        annotation: &'static str,
        field: &'static str,
    },

    #[error("failed to fetch reference sequence for {chrom}:{start}-{end}: {msg}")]
    ReferenceFetch {
        chrom: String,
        start: u64,
        end: u64,
        msg: String,
    },

    #[error("sex file {path:?} could not be read: {msg}")]
    SexFileRead { path: PathBuf, msg: String },

    #[error("sample subset file {path:?} could not be read: {msg}")]
    SampleFileRead { path: PathBuf, msg: String },
}

pub type Result<T> = std::result::Result<T, Error>;
