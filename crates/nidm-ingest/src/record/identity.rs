//! Subject identity extraction: `bids_meta` first, then the BIDS filename,
//! then the label of the subject directory the record was discovered in.

use std::path::{Path, PathBuf};

use nidm_core::SubjectIdentity;
use serde_json::{Map, Value};

/// BIDS entities found in one place, every one optional.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub(super) struct Entities {
    pub subject: Option<String>,
    pub session: Option<String>,
    pub task: Option<String>,
    pub acquisition: Option<String>,
    pub run: Option<String>,
    pub suffix: Option<String>,
}

impl Entities {
    /// Parse `sub-01_ses-pre_acq-mprage_run-1_T1w` style file stems.
    pub(super) fn from_path(path: &Path) -> Self {
        let mut entities = Self::default();
        let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) else {
            return entities;
        };

        for part in stem.split('_') {
            match part.split_once('-') {
                Some(("sub", value)) => entities.subject = non_empty(value),
                Some(("ses", value)) => entities.session = non_empty(value),
                Some(("task", value)) => entities.task = non_empty(value),
                Some(("acq", value)) => entities.acquisition = non_empty(value),
                Some(("run", value)) => entities.run = non_empty(value),
                Some(_) => {}
                None => entities.suffix = non_empty(part),
            }
        }
        entities
    }

    /// Read entities from an MRIQC `bids_meta` object.
    pub(super) fn from_bids_meta(meta: &Map<String, Value>) -> Self {
        let field = |names: &[&str]| names.iter().find_map(|name| meta.get(*name).and_then(text_of));
        Self {
            subject: field(&["subject", "subject_id"]),
            session: field(&["session", "ses"]),
            task: field(&["task"]),
            acquisition: field(&["acq_id", "acquisition", "acq"]),
            run: field(&["run", "run_id"]),
            suffix: field(&["suffix", "modality"]),
        }
    }

    /// Fill every absent entity from `fallback`.
    pub(super) fn or(self, fallback: Self) -> Self {
        Self {
            subject: self.subject.or(fallback.subject),
            session: self.session.or(fallback.session),
            task: self.task.or(fallback.task),
            acquisition: self.acquisition.or(fallback.acquisition),
            run: self.run.or(fallback.run),
            suffix: self.suffix.or(fallback.suffix),
        }
    }

    pub(super) fn into_identity(self, subject_label: &str, source_url: Option<String>) -> SubjectIdentity {
        SubjectIdentity {
            subject: self
                .subject
                .map(|subject| strip_subject_prefix(&subject).to_string())
                .unwrap_or_else(|| strip_subject_prefix(subject_label).to_string()),
            session: self.session,
            task: self.task,
            acquisition: self.acquisition,
            run: self.run,
            suffix: self.suffix,
            source_url,
        }
    }
}

/// MRIQC's HTML report for the record: `<mriqc_dir>/<stem>.html`, where
/// `<mriqc_dir>` is the parent of the record's `sub-*` directory.
pub(super) fn source_url(path: &Path) -> Option<String> {
    let stem = path.file_stem()?.to_str()?;
    let report_dir = path
        .ancestors()
        .skip(1)
        .find(|dir| {
            dir.file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with("sub-"))
        })
        .and_then(Path::parent)
        .or_else(|| path.parent())
        .map_or_else(PathBuf::new, Path::to_path_buf);
    Some(report_dir.join(format!("{stem}.html")).display().to_string())
}

/// `sub-01` → `01`; labels without the prefix pass through.
pub(crate) fn strip_subject_prefix(label: &str) -> &str {
    label.strip_prefix("sub-").unwrap_or(label)
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => non_empty(text),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn parses_full_bids_stem() {
        let entities = Entities::from_path(Path::new(
            "/mriqc/sub-01/ses-pre/anat/sub-01_ses-pre_acq-mprage_rec-norm_run-2_T1w.json",
        ));
        assert_eq!(
            entities,
            Entities {
                subject: Some("01".into()),
                session: Some("pre".into()),
                task: None,
                acquisition: Some("mprage".into()),
                run: Some("2".into()),
                suffix: Some("T1w".into()),
            }
        );
    }

    #[test]
    fn bids_meta_wins_over_filename() {
        let meta = json!({"subject": "0051456", "modality": "T2w", "run": 3});
        let Value::Object(meta) = meta else { unreachable!() };

        let identity = Entities::from_bids_meta(&meta)
            .or(Entities::from_path(Path::new("sub-9_run-1_T1w.json")))
            .into_identity("sub-9", None);

        assert_eq!(identity.subject, "0051456");
        assert_eq!(identity.suffix.as_deref(), Some("T2w"));
        assert_eq!(identity.run.as_deref(), Some("3"));
    }

    #[test]
    fn discovery_label_is_last_resort() {
        let identity = Entities::from_path(Path::new("metrics.json")).into_identity("sub-07", None);
        assert_eq!(identity.subject, "07");
        assert_eq!(identity.suffix.as_deref(), Some("metrics"));
    }

    #[test]
    fn source_url_points_at_mriqc_report() {
        assert_eq!(
            source_url(Path::new("/data/mriqc/sub-0051456/anat/sub-0051456_T1w.json")).as_deref(),
            Some("/data/mriqc/sub-0051456_T1w.html")
        );
        assert_eq!(
            source_url(Path::new("/data/mriqc/sub-01/ses-1/anat/sub-01_ses-1_T1w.json")).as_deref(),
            Some("/data/mriqc/sub-01_ses-1_T1w.html")
        );
    }

    #[test]
    fn source_url_without_subject_dir_uses_parent() {
        assert_eq!(
            source_url(Path::new("/tmp/qc/metrics.csv")).as_deref(),
            Some("/tmp/qc/metrics.html")
        );
    }
}
