//! QC file discovery under an MRIQC output directory.
//!
//! Layout walked, per participant:
//!
//! ```text
//! <mriqc_dir>/sub-<label>/<datatype>/*.{json,csv,tsv}
//! <mriqc_dir>/sub-<label>/ses-*/<datatype>/*.{json,csv,tsv}
//! ```
//!
//! Hidden files are skipped; `.gitignore` files are not honoured since MRIQC
//! output directories are not source trees. Results are sorted so runs are
//! reproducible.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;

use crate::error::DiscoveryError;
use crate::record::{RecordSource, strip_subject_prefix};

const SUBJECT_DIR_PREFIX: &str = "sub-";
const RECORD_EXTENSIONS: &str = "{json,csv,tsv}";
/// `ses-*/<datatype>/<file>` is the deepest layout we read.
const MAX_DEPTH: usize = 3;

/// Everything found for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Discovery {
    /// QC files to convert, sorted by path.
    pub sources: Vec<RecordSource>,
    /// Requested participants without a `sub-<label>` directory.
    pub missing_participants: Vec<String>,
    /// Participants whose directory holds no QC files.
    pub empty_participants: Vec<String>,
}

/// Split `--participant-label` values into bare labels.
///
/// Each value may hold several whitespace-separated labels, with or without
/// the `sub-` prefix. Duplicates collapse.
#[must_use]
pub fn parse_participant_labels<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|value| value.as_ref().split_whitespace())
        .map(|label| strip_subject_prefix(label).to_string())
        .filter(|label| !label.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Find QC files for `participants` (all `sub-*` directories when empty).
///
/// # Errors
///
/// Returns [`DiscoveryError`] if `mriqc_dir` is not a directory, cannot be
/// listed, a pattern is invalid, or no participants exist at all.
pub fn discover(
    mriqc_dir: &Path,
    datatypes: &[String],
    participants: &[String],
) -> Result<Discovery, DiscoveryError> {
    if !mriqc_dir.is_dir() {
        return Err(DiscoveryError::NotADirectory {
            path: mriqc_dir.to_path_buf(),
        });
    }

    let labels = if participants.is_empty() {
        subject_labels(mriqc_dir)?
    } else {
        participants.to_vec()
    };
    if labels.is_empty() {
        return Err(DiscoveryError::NoSubjects {
            path: mriqc_dir.to_path_buf(),
        });
    }

    let matcher = record_matcher(datatypes)?;
    let mut discovery = Discovery::default();

    for label in labels {
        let subject_dir = mriqc_dir.join(format!("{SUBJECT_DIR_PREFIX}{label}"));
        if !subject_dir.is_dir() {
            tracing::warn!(subject = %label, path = %subject_dir.display(), "subject directory not found");
            discovery.missing_participants.push(label);
            continue;
        }

        let files = walk_subject(&subject_dir, &matcher)?;
        tracing::debug!(subject = %label, files = files.len(), "discovered QC files");
        if files.is_empty() {
            discovery.empty_participants.push(label);
            continue;
        }
        discovery
            .sources
            .extend(files.into_iter().map(|path| RecordSource::new(label.clone(), path)));
    }

    discovery.sources.sort();
    Ok(discovery)
}

/// Labels of every `sub-*` directory directly under `mriqc_dir`, sorted.
fn subject_labels(mriqc_dir: &Path) -> Result<Vec<String>, DiscoveryError> {
    let io_error = |source| DiscoveryError::Io {
        path: mriqc_dir.to_path_buf(),
        source,
    };

    let mut labels = BTreeSet::new();
    for entry in std::fs::read_dir(mriqc_dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        if !entry.file_type().map_err(io_error)?.is_dir() {
            continue;
        }
        let name = entry.file_name();
        let Some(label) = name.to_str().and_then(|name| name.strip_prefix(SUBJECT_DIR_PREFIX)) else {
            continue;
        };
        if !label.is_empty() {
            labels.insert(label.to_string());
        }
    }
    Ok(labels.into_iter().collect())
}

fn record_matcher(datatypes: &[String]) -> Result<GlobSet, DiscoveryError> {
    let mut builder = GlobSetBuilder::new();
    for datatype in datatypes {
        for pattern in [
            format!("{datatype}/*.{RECORD_EXTENSIONS}"),
            format!("ses-*/{datatype}/*.{RECORD_EXTENSIONS}"),
        ] {
            builder.add(GlobBuilder::new(&pattern).literal_separator(true).build()?);
        }
    }
    Ok(builder.build()?)
}

fn walk_subject(subject_dir: &Path, matcher: &GlobSet) -> Result<Vec<PathBuf>, DiscoveryError> {
    let walker = WalkBuilder::new(subject_dir)
        .standard_filters(false)
        .hidden(true)
        .max_depth(Some(MAX_DEPTH))
        .build();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_some_and(|kind| kind.is_file()) {
            continue;
        }
        let Ok(relative) = entry.path().strip_prefix(subject_dir) else {
            continue;
        };
        if matcher.is_match(relative) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}
