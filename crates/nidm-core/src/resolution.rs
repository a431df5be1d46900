//! Per-field resolution outcomes.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enums::{Datatype, ResolutionReason};
use crate::value::TypedValue;

/// A raw field that matched a dictionary entry and coerced cleanly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    /// Raw key as it appeared in the record.
    pub source_key: String,
    pub target_term: String,
    pub value: TypedValue,
    pub unit: Option<String>,
}

/// A raw field that produced no statement, with the original key preserved.
///
/// Always recoverable: recorded in the report, never fatal to the subject.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, JsonSchema)]
#[error("field '{key}': {reason}")]
pub struct ResolutionError {
    /// Raw key as it appeared in the record.
    pub key: String,
    pub normalized_key: String,
    pub reason: ResolutionReason,
    /// Datatype the dictionary declared, for type mismatches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Datatype>,
    /// Offending value in its source lexical form, for type mismatches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
}

impl ResolutionError {
    #[must_use]
    pub fn unmapped(key: impl Into<String>, normalized_key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            normalized_key: normalized_key.into(),
            reason: ResolutionReason::Unmapped,
            expected: None,
            raw_value: None,
        }
    }

    #[must_use]
    pub fn type_mismatch(
        key: impl Into<String>,
        normalized_key: impl Into<String>,
        expected: Datatype,
        raw_value: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            normalized_key: normalized_key.into(),
            reason: ResolutionReason::TypeMismatch,
            expected: Some(expected),
            raw_value: Some(raw_value.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmapped_serializes_without_optional_fields() {
        let err = ResolutionError::unmapped("unmapped_metric", "unmapped_metric");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["reason"], "unmapped");
        assert!(json.get("expected").is_none());
        assert!(json.get("raw_value").is_none());
    }

    #[test]
    fn type_mismatch_keeps_raw_value() {
        let err = ResolutionError::type_mismatch("SNR", "snr", Datatype::Numeric, "not-a-number");
        assert_eq!(err.to_string(), "field 'SNR': type mismatch");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["expected"], "numeric");
        assert_eq!(json["raw_value"], "not-a-number");
    }
}
