use nidm_core::{Dictionary, RawRecord, ResolutionError, ResolvedField, normalize_key};

use crate::coerce::coerce;

/// Outcome of resolving one record.
///
/// Every input field lands in exactly one of `fields` or `errors`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    /// Sorted by `(target_term, value, unit, source_key)`.
    pub fields: Vec<ResolvedField>,
    /// In record order.
    pub errors: Vec<ResolutionError>,
}

impl Resolution {
    /// Number of input fields this resolution accounts for.
    #[must_use]
    pub fn total(&self) -> usize {
        self.fields.len() + self.errors.len()
    }
}

/// Maps raw QC fields onto dictionary terms.
///
/// Holds only a shared borrow of the dictionary, so one resolver (or many)
/// can serve every subject concurrently.
#[derive(Debug, Clone, Copy)]
pub struct FieldResolver<'a> {
    dictionary: &'a Dictionary,
}

impl<'a> FieldResolver<'a> {
    #[must_use]
    pub const fn new(dictionary: &'a Dictionary) -> Self {
        Self { dictionary }
    }

    /// Resolve every field of `record`. Never fails as a whole; unmapped keys
    /// and values that do not coerce become [`ResolutionError`]s.
    #[must_use]
    pub fn resolve(&self, record: &RawRecord) -> Resolution {
        let mut resolution = Resolution::default();

        for (key, value) in record.fields() {
            let normalized = normalize_key(key);
            let Some(entry) = self.dictionary.get_normalized(&normalized) else {
                tracing::debug!(key = %key, "unmapped field");
                resolution
                    .errors
                    .push(ResolutionError::unmapped(key.as_str(), normalized));
                continue;
            };

            match coerce(value, entry.datatype) {
                Some(typed) => resolution.fields.push(ResolvedField {
                    source_key: key.clone(),
                    target_term: entry.target_term.clone(),
                    value: typed,
                    unit: entry.unit.clone(),
                }),
                None => {
                    tracing::debug!(
                        key = %key,
                        expected = %entry.datatype,
                        raw = %value,
                        "type mismatch"
                    );
                    resolution.errors.push(ResolutionError::type_mismatch(
                        key.as_str(),
                        normalized,
                        entry.datatype,
                        value.to_string(),
                    ));
                }
            }
        }

        resolution.fields.sort_by(|a, b| {
            (&a.target_term, &a.value, &a.unit, &a.source_key)
                .cmp(&(&b.target_term, &b.value, &b.unit, &b.source_key))
        });
        resolution
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nidm_core::{Datatype, DictionaryEntry, ResolutionReason, ScalarValue, TypedValue};
    use pretty_assertions::assert_eq;

    fn dictionary() -> Dictionary {
        Dictionary::from_entries([
            DictionaryEntry {
                source_key: "snr".into(),
                target_term: "qc:SignalToNoiseRatio".into(),
                datatype: Datatype::Numeric,
                unit: Some("dimensionless".into()),
                description: None,
            },
            DictionaryEntry {
                source_key: "cjv".into(),
                target_term: "qc:CoefficientOfJointVariation".into(),
                datatype: Datatype::Numeric,
                unit: None,
                description: None,
            },
        ])
        .unwrap()
    }

    #[test]
    fn resolves_snr_with_unit() {
        let dictionary = dictionary();
        let record: RawRecord = [(" SNR ", ScalarValue::Number("12.5".into()))]
            .into_iter()
            .collect();

        let resolution = FieldResolver::new(&dictionary).resolve(&record);

        assert_eq!(
            resolution.fields,
            [ResolvedField {
                source_key: " SNR ".into(),
                target_term: "qc:SignalToNoiseRatio".into(),
                value: TypedValue::Numeric("12.5".into()),
                unit: Some("dimensionless".into()),
            }]
        );
        assert!(resolution.errors.is_empty());
    }

    #[test]
    fn non_numeric_text_is_a_type_mismatch() {
        let dictionary = dictionary();
        let record: RawRecord = [("snr", ScalarValue::Text("not-a-number".into()))]
            .into_iter()
            .collect();

        let resolution = FieldResolver::new(&dictionary).resolve(&record);

        assert!(resolution.fields.is_empty());
        assert_eq!(
            resolution.errors,
            [ResolutionError::type_mismatch(
                "snr",
                "snr",
                Datatype::Numeric,
                "not-a-number"
            )]
        );
    }

    #[test]
    fn unknown_key_is_unmapped() {
        let dictionary = dictionary();
        let record: RawRecord = [("tpm_overlap_csf", ScalarValue::Number("0.2".into()))]
            .into_iter()
            .collect();

        let resolution = FieldResolver::new(&dictionary).resolve(&record);
        assert_eq!(resolution.errors.len(), 1);
        assert_eq!(resolution.errors[0].reason, ResolutionReason::Unmapped);
    }

    #[test]
    fn null_is_a_type_mismatch() {
        let dictionary = dictionary();
        let record: RawRecord = [("cjv", ScalarValue::Null)].into_iter().collect();

        let resolution = FieldResolver::new(&dictionary).resolve(&record);
        assert_eq!(resolution.errors[0].reason, ResolutionReason::TypeMismatch);
        assert_eq!(resolution.errors[0].raw_value.as_deref(), Some("null"));
    }

    #[test]
    fn fields_are_sorted_by_term_regardless_of_input_order() {
        let dictionary = dictionary();
        let forward: RawRecord = [
            ("snr", ScalarValue::Number("12.5".into())),
            ("cjv", ScalarValue::Number("0.45".into())),
        ]
        .into_iter()
        .collect();
        let backward: RawRecord = [
            ("cjv", ScalarValue::Number("0.45".into())),
            ("snr", ScalarValue::Number("12.5".into())),
        ]
        .into_iter()
        .collect();

        let resolver = FieldResolver::new(&dictionary);
        let a = resolver.resolve(&forward);
        let b = resolver.resolve(&backward);

        assert_eq!(a.fields, b.fields);
        assert_eq!(a.fields[0].target_term, "qc:CoefficientOfJointVariation");
    }
}
