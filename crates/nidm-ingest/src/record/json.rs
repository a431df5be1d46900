//! MRIQC's native per-image JSON.

use std::path::Path;

use nidm_core::RawRecord;
use serde_json::Value;

use super::identity::{self, Entities};
use super::{QcRecord, ReadOptions, RecordSource};
use crate::error::RecordReadError;

const BIDS_META: &str = "bids_meta";

pub(super) fn read(source: &RecordSource, options: &ReadOptions) -> Result<QcRecord, RecordReadError> {
    let bytes = std::fs::read(&source.path).map_err(|err| RecordReadError::Io {
        path: source.path.clone(),
        source: err,
    })?;
    parse(&bytes, &source.path, &source.subject, options)
}

pub(super) fn parse(
    bytes: &[u8],
    path: &Path,
    subject_label: &str,
    options: &ReadOptions,
) -> Result<QcRecord, RecordReadError> {
    let value: Value = serde_json::from_slice(bytes).map_err(|source| RecordReadError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    let mut object = match value {
        Value::Object(object) => object,
        other => {
            return Err(RecordReadError::NotAnObject {
                path: path.to_path_buf(),
                found: kind_of(&other),
            });
        }
    };

    let from_meta = match object.get(BIDS_META) {
        Some(Value::Object(meta)) => Entities::from_bids_meta(meta),
        _ => Entities::default(),
    };
    let identity = from_meta
        .or(Entities::from_path(path))
        .into_identity(subject_label, identity::source_url(path));

    let mut record = RawRecord::new();
    let excluded: Vec<String> = object
        .keys()
        .filter(|key| options.is_excluded(key))
        .cloned()
        .collect();
    for key in excluded {
        object.shift_remove(&key);
        tracing::debug!(path = %path.display(), key = %key, "excluded key");
        record.exclude(key);
    }

    super::flatten::flatten_object(object, &mut record);
    Ok(QcRecord { identity, record })
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nidm_core::ScalarValue;
    use pretty_assertions::assert_eq;

    const PATH: &str = "/data/mriqc/sub-0051456/anat/sub-0051456_T1w.json";

    fn parse_str(json: &str) -> Result<QcRecord, RecordReadError> {
        let options = ReadOptions::new(["bids_meta", "provenance", "size_x"]);
        parse(json.as_bytes(), Path::new(PATH), "0051456", &options)
    }

    #[test]
    fn reads_metrics_and_identity() {
        let qc = parse_str(
            r#"{
                "bids_meta": {"subject": "0051456", "modality": "T1w"},
                "cjv": 0.4512,
                "snr_total": 12.5,
                "provenance": {"version": "24.0.2"},
                "size_x": 176
            }"#,
        )
        .unwrap();

        assert_eq!(qc.identity.subject, "0051456");
        assert_eq!(qc.identity.suffix.as_deref(), Some("T1w"));
        assert_eq!(
            qc.identity.source_url.as_deref(),
            Some("/data/mriqc/sub-0051456_T1w.html")
        );

        let keys: Vec<_> = qc.record.fields().iter().map(|(key, _)| key.as_str()).collect();
        assert_eq!(keys, ["cjv", "snr_total"]);
        assert_eq!(
            qc.record.get("cjv"),
            Some(&ScalarValue::Number("0.4512".into()))
        );
        assert_eq!(qc.record.excluded(), ["bids_meta", "provenance", "size_x"]);
    }

    #[test]
    fn top_level_array_is_rejected() {
        let err = parse_str("[1, 2]").unwrap_err();
        assert!(matches!(err, RecordReadError::NotAnObject { found: "an array", .. }));
    }

    #[test]
    fn invalid_json_is_rejected() {
        assert!(matches!(
            parse_str("{\"snr\": ").unwrap_err(),
            RecordReadError::Json { .. }
        ));
    }

    #[test]
    fn identity_falls_back_to_filename_without_bids_meta() {
        let qc = parse_str(r#"{"snr": 10}"#).unwrap();
        assert_eq!(qc.identity.subject, "0051456");
        assert_eq!(qc.identity.suffix.as_deref(), Some("T1w"));
        assert!(qc.record.excluded().is_empty());
    }

    #[test]
    fn empty_object_is_an_empty_record() {
        let qc = parse_str("{}").unwrap();
        assert!(qc.record.is_empty());
    }
}
