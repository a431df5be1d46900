//! Ingest error types.
//!
//! Dictionary and metadata errors are fatal to the whole run. Record read
//! errors are fatal to one subject only.

use std::path::PathBuf;

use nidm_core::CoreError;
use thiserror::Error;

/// The field dictionary cannot be used.
#[derive(Debug, Error)]
pub enum MalformedDictionaryError {
    #[error("Cannot open dictionary {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Dictionary is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Dictionary is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Dictionary line {line}: empty '{column}'")]
    EmptyCell { line: u64, column: &'static str },

    #[error(
        "Dictionary line {line}: unrecognized datatype '{value}' (expected numeric, integer, string, or boolean)"
    )]
    UnknownDatatype { line: u64, value: String },

    #[error("Dictionary line {line}: duplicate source_key '{key}' (already defined by '{existing}')")]
    DuplicateKey {
        line: u64,
        key: String,
        existing: String,
    },

    #[error("Dictionary entry '{key}': {source}")]
    InvalidTerm { key: String, source: CoreError },
}

/// The software metadata table cannot be used.
#[derive(Debug, Error)]
pub enum MalformedMetadataError {
    #[error("Cannot open software metadata {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Software metadata is not valid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Software metadata is missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Software metadata field '{field}' is empty")]
    EmptyField { field: &'static str },

    #[error("Software metadata table has no rows")]
    NoRows,
}

/// One subject's QC record cannot be read.
#[derive(Debug, Error)]
pub enum RecordReadError {
    #[error("Cannot open record {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Record {} is not valid JSON: {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Record {} is not valid CSV: {source}", path.display())]
    Csv { path: PathBuf, source: csv::Error },

    #[error("Record {} must be a JSON object, found {found}", path.display())]
    NotAnObject { path: PathBuf, found: &'static str },

    #[error("Record {} has {rows} data rows; expected at most one", path.display())]
    MultipleRows { path: PathBuf, rows: usize },

    #[error("Record {} has an unsupported extension (expected .json, .csv, or .tsv)", path.display())]
    UnsupportedFormat { path: PathBuf },

    #[error("Reading record {} exceeded {secs}s", path.display())]
    Timeout { path: PathBuf, secs: u64 },

    #[error("Reading record {} was aborted: {reason}", path.display())]
    Aborted { path: PathBuf, reason: String },
}

/// The MRIQC output directory cannot be scanned.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("MRIQC directory {} does not exist or is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("No subjects found to process in {}", path.display())]
    NoSubjects { path: PathBuf },

    #[error("Cannot list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Directory walk failed: {0}")]
    Walk(#[from] ignore::Error),

    #[error("Invalid discovery pattern: {0}")]
    Glob(#[from] globset::Error),
}
