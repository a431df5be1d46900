//! Serde roundtrip and JsonSchema validation for the persisted report types.

use nidm_core::enums::{Datatype, FailureKind};
use nidm_core::report::*;
use nidm_core::resolution::ResolutionError;
use schemars::schema_for;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn sample_subject() -> SubjectReport {
    SubjectReport {
        source: "/data/mriqc/sub-01/anat/sub-01_T1w.json".into(),
        subject: "sub-01_T1w".into(),
        resolved: 1,
        unresolved: 2,
        excluded: vec!["bids_meta".into(), "provenance".into()],
        errors: vec![
            ResolutionError::unmapped("unmapped_metric", "unmapped_metric"),
            ResolutionError::type_mismatch("snr", "snr", Datatype::Numeric, "not-a-number"),
        ],
        output: Some("/out/sub-01/nidm/sub-01_T1w.ttl".into()),
    }
}

roundtrip_and_validate!(resolution_error_roundtrip, ResolutionError, {
    ResolutionError::type_mismatch("cjv", "cjv", Datatype::Numeric, "true")
});

roundtrip_and_validate!(subject_report_roundtrip, SubjectReport, sample_subject());

roundtrip_and_validate!(subject_failure_roundtrip, SubjectFailure, {
    SubjectFailure {
        source: "/data/mriqc/sub-02/anat/sub-02_T1w.json".into(),
        subject: "sub-02".into(),
        kind: FailureKind::RecordRead,
        message: "top-level JSON value is not an object".into(),
    }
});

roundtrip_and_validate!(conversion_report_roundtrip, ConversionReport, {
    let mut report = ConversionReport::new();
    report.warn(ReportWarning::new(
        "software_metadata",
        "metadata table has 2 rows; using the first",
    ));
    report.absorb(ReportFragment {
        subject: Some(sample_subject()),
        failure: None,
        warnings: Vec::new(),
    });
    report.mark_cancelled("/data/mriqc/sub-03/anat/sub-03_T1w.json");
    report.finalize();
    report
});

roundtrip_and_validate!(summary_roundtrip, ReportSummary, {
    let mut report = ConversionReport::new();
    report.absorb(ReportFragment {
        subject: Some(sample_subject()),
        failure: None,
        warnings: Vec::new(),
    });
    report.summary()
});
