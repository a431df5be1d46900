//! Dictionary Loader: field-mapping table → [`Dictionary`].
//!
//! Required columns are `source_key`, `target_term`, and `datatype`; `unit`
//! and `description` are optional and an empty cell means "none". Header
//! names are matched after normalization, so `Source_Key` works too.
//!
//! A `source_key` that collides with an earlier one after normalization is
//! rejected. Later rows never overwrite earlier ones.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use nidm_core::{CoreError, Datatype, Dictionary, DictionaryEntry, Namespaces};

use crate::error::MalformedDictionaryError;
use crate::tabular::{self, Columns};

/// Load the dictionary from a CSV (or `.tsv`) file.
///
/// # Errors
///
/// Returns [`MalformedDictionaryError`] if the file cannot be opened or any
/// row is invalid.
pub fn load_dictionary(path: &Path) -> Result<Dictionary, MalformedDictionaryError> {
    let file = File::open(path).map_err(|source| MalformedDictionaryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dictionary = read_dictionary(file, tabular::delimiter_for(path))?;
    tracing::info!(
        path = %path.display(),
        entries = dictionary.len(),
        "loaded field dictionary"
    );
    Ok(dictionary)
}

/// Parse a dictionary from any reader.
///
/// # Errors
///
/// Returns [`MalformedDictionaryError`] on missing columns, empty required
/// cells, unknown datatypes, or duplicate keys.
pub fn read_dictionary<R: Read>(
    input: R,
    delimiter: u8,
) -> Result<Dictionary, MalformedDictionaryError> {
    let mut reader = tabular::reader(input, delimiter);
    let columns = Columns::new(reader.headers()?);

    let source_key = require(&columns, "source_key")?;
    let target_term = require(&columns, "target_term")?;
    let datatype = require(&columns, "datatype")?;
    let unit = columns.position("unit");
    let description = columns.position("description");

    let mut dictionary = Dictionary::new();
    for row in reader.records() {
        let row = row?;
        let line = tabular::line_of(&row);

        let key = tabular::cell(&row, Some(source_key)).ok_or(
            MalformedDictionaryError::EmptyCell {
                line,
                column: "source_key",
            },
        )?;
        let term = tabular::cell(&row, Some(target_term)).ok_or(
            MalformedDictionaryError::EmptyCell {
                line,
                column: "target_term",
            },
        )?;
        let raw_datatype = tabular::cell(&row, Some(datatype)).unwrap_or_default();
        let parsed = Datatype::parse(&raw_datatype).ok_or_else(|| {
            MalformedDictionaryError::UnknownDatatype {
                line,
                value: raw_datatype.clone(),
            }
        })?;

        let entry = DictionaryEntry {
            source_key: key.clone(),
            target_term: term,
            datatype: parsed,
            unit: tabular::cell(&row, unit),
            description: tabular::cell(&row, description),
        };

        dictionary
            .try_insert(entry)
            .map_err(|error| match error {
                CoreError::DuplicateKey { key, existing } => {
                    MalformedDictionaryError::DuplicateKey {
                        line,
                        key,
                        existing,
                    }
                }
                other => MalformedDictionaryError::InvalidTerm { key, source: other },
            })?;
    }

    Ok(dictionary)
}

/// Check every entry's `target_term` against the declared namespaces.
///
/// # Errors
///
/// Returns [`MalformedDictionaryError::InvalidTerm`] for the first term that
/// is malformed or uses an undeclared prefix.
pub fn validate_terms(
    dictionary: &Dictionary,
    namespaces: &Namespaces,
) -> Result<(), MalformedDictionaryError> {
    for entry in dictionary.entries() {
        namespaces
            .check_term(&entry.target_term)
            .map_err(|source| MalformedDictionaryError::InvalidTerm {
                key: entry.source_key.clone(),
                source,
            })?;
    }
    Ok(())
}

fn require(columns: &Columns, column: &'static str) -> Result<usize, MalformedDictionaryError> {
    columns
        .position(column)
        .ok_or(MalformedDictionaryError::MissingColumn { column })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(csv: &str) -> Result<Dictionary, MalformedDictionaryError> {
        read_dictionary(csv.as_bytes(), b',')
    }

    #[test]
    fn loads_rows_with_optional_columns() {
        let dictionary = parse(
            "source_key,target_term,datatype,unit,description\n\
             snr,qc:SignalToNoiseRatio,numeric,dimensionless,Signal to noise\n\
             size_x,qc:SizeX,integer,,Voxels along x\n",
        )
        .unwrap();

        assert_eq!(dictionary.len(), 2);
        let snr = dictionary.lookup(" SNR ").unwrap();
        assert_eq!(snr.target_term, "qc:SignalToNoiseRatio");
        assert_eq!(snr.datatype, Datatype::Numeric);
        assert_eq!(snr.unit.as_deref(), Some("dimensionless"));
        assert_eq!(dictionary.lookup("size_x").unwrap().unit, None);
    }

    #[test]
    fn unit_and_description_columns_are_optional() {
        let dictionary = parse("source_key,target_term,datatype\ncjv,qc:Cjv,float\n").unwrap();
        let cjv = dictionary.lookup("cjv").unwrap();
        assert_eq!(cjv.unit, None);
        assert_eq!(cjv.description, None);
    }

    #[test]
    fn missing_required_column_is_rejected() {
        let err = parse("source_key,datatype\nsnr,numeric\n").unwrap_err();
        assert!(matches!(
            err,
            MalformedDictionaryError::MissingColumn {
                column: "target_term"
            }
        ));
    }

    #[test]
    fn unknown_datatype_is_rejected_with_line() {
        let err = parse(
            "source_key,target_term,datatype\n\
             snr,qc:Snr,numeric\n\
             cjv,qc:Cjv,complex\n",
        )
        .unwrap_err();
        match err {
            MalformedDictionaryError::UnknownDatatype { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "complex");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_normalized_key_is_rejected() {
        let err = parse(
            "source_key,target_term,datatype\n\
             snr,qc:Snr,numeric\n\
             \" SNR\",qc:Other,numeric\n",
        )
        .unwrap_err();
        match err {
            MalformedDictionaryError::DuplicateKey { key, existing, .. } => {
                assert_eq!(key, "SNR");
                assert_eq!(existing, "snr");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_source_key_is_rejected() {
        let err = parse("source_key,target_term,datatype\n,qc:Snr,numeric\n").unwrap_err();
        assert!(matches!(
            err,
            MalformedDictionaryError::EmptyCell {
                column: "source_key",
                ..
            }
        ));
    }

    #[test]
    fn validate_terms_flags_undeclared_prefix() {
        let dictionary = parse("source_key,target_term,datatype\nsnr,mriqc:Snr,numeric\n").unwrap();
        let err = validate_terms(&dictionary, &Namespaces::default()).unwrap_err();
        assert!(err.to_string().contains("mriqc"));
    }

    #[test]
    fn validate_terms_accepts_iris_and_known_prefixes() {
        let dictionary = parse(
            "source_key,target_term,datatype\n\
             snr,qc:Snr,numeric\n\
             cjv,http://example.org/cjv,numeric\n",
        )
        .unwrap();
        validate_terms(&dictionary, &Namespaces::default()).unwrap();
    }
}
