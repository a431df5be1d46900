//! Record Reader: one QC file → identity + flat [`RawRecord`].
//!
//! The format is chosen by extension: `.json` is MRIQC's native output,
//! `.csv`/`.tsv` hold a header and at most one data row.

mod flatten;
mod identity;
mod json;
mod tabular;

use std::path::{Path, PathBuf};

use nidm_core::{RawRecord, SubjectIdentity, normalize_key};

use crate::error::RecordReadError;

pub(crate) use identity::strip_subject_prefix;

/// A discovered QC file and the participant directory it came from.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct RecordSource {
    /// Participant label without the `sub-` prefix.
    pub subject: String,
    pub path: PathBuf,
}

impl RecordSource {
    #[must_use]
    pub fn new(subject: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            subject: subject.into(),
            path: path.into(),
        }
    }

    /// Stable display form used as the report key.
    #[must_use]
    pub fn display(&self) -> String {
        self.path.display().to_string()
    }
}

/// Per-run reading options.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    exclude_keys: Vec<String>,
}

impl ReadOptions {
    /// Top-level keys (or CSV columns) dropped before flattening.
    pub fn new<I, S>(exclude_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            exclude_keys: exclude_keys
                .into_iter()
                .map(|key| normalize_key(key.as_ref()))
                .collect(),
        }
    }

    #[must_use]
    pub fn is_excluded(&self, key: &str) -> bool {
        let key = normalize_key(key);
        self.exclude_keys.iter().any(|excluded| *excluded == key)
    }
}

/// What the reader hands to the resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QcRecord {
    pub identity: SubjectIdentity,
    pub record: RawRecord,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Tabular,
}

impl Format {
    fn of(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "csv" | "tsv" => Some(Self::Tabular),
            _ => None,
        }
    }
}

/// Read one QC record.
///
/// # Errors
///
/// Returns [`RecordReadError`] if the file is missing, unparsable, not an
/// object (JSON), has more than one data row (CSV), or has an unknown
/// extension.
pub fn read_record(
    source: &RecordSource,
    options: &ReadOptions,
) -> Result<QcRecord, RecordReadError> {
    let qc = match Format::of(&source.path) {
        Some(Format::Json) => json::read(source, options)?,
        Some(Format::Tabular) => tabular::read(source, options)?,
        None => {
            return Err(RecordReadError::UnsupportedFormat {
                path: source.path.clone(),
            });
        }
    };
    tracing::debug!(
        path = %source.path.display(),
        subject = %qc.identity.label(),
        fields = qc.record.len(),
        excluded = qc.record.excluded().len(),
        "read QC record"
    );
    Ok(qc)
}
