//! Software Metadata Loader.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use nidm_core::{ReportWarning, SoftwareMetadata};

use crate::error::MalformedMetadataError;
use crate::tabular::{self, Columns};

/// Report scope used for warnings raised while loading the metadata table.
pub const METADATA_SCOPE: &str = "software_metadata";

/// Software metadata plus anything worth surfacing in the conversion report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedMetadata {
    pub metadata: SoftwareMetadata,
    pub warnings: Vec<ReportWarning>,
}

/// Load the software metadata table from a CSV (or `.tsv`) file.
///
/// # Errors
///
/// Returns [`MalformedMetadataError`] if the file cannot be opened, has no
/// rows, or lacks a non-empty `name` or `version`.
pub fn load_metadata(path: &Path) -> Result<LoadedMetadata, MalformedMetadataError> {
    let file = File::open(path).map_err(|source| MalformedMetadataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = read_metadata(file, tabular::delimiter_for(path))?;
    tracing::info!(
        path = %path.display(),
        name = %loaded.metadata.name,
        version = %loaded.metadata.version,
        "loaded software metadata"
    );
    Ok(loaded)
}

/// Parse the metadata table from any reader. The first data row wins.
///
/// # Errors
///
/// See [`load_metadata`].
pub fn read_metadata<R: Read>(
    input: R,
    delimiter: u8,
) -> Result<LoadedMetadata, MalformedMetadataError> {
    let mut reader = tabular::reader(input, delimiter);
    let columns = Columns::new(reader.headers()?);

    let name = columns
        .position("name")
        .ok_or(MalformedMetadataError::MissingColumn { column: "name" })?;
    let version = columns
        .position("version")
        .ok_or(MalformedMetadataError::MissingColumn { column: "version" })?;
    let vendor_uri = columns.position("vendor_uri");
    let description = columns.position("description");

    let mut rows = reader.records();
    let first = rows.next().ok_or(MalformedMetadataError::NoRows)??;

    let metadata = SoftwareMetadata {
        name: tabular::cell(&first, Some(name))
            .ok_or(MalformedMetadataError::EmptyField { field: "name" })?,
        version: tabular::cell(&first, Some(version))
            .ok_or(MalformedMetadataError::EmptyField { field: "version" })?,
        vendor_uri: tabular::cell(&first, vendor_uri),
        description: tabular::cell(&first, description),
    };

    let mut extra = 0_usize;
    let mut malformed = None;
    for row in rows {
        match row {
            Ok(_) => extra += 1,
            Err(error) => {
                let stop = error.is_io_error();
                malformed.get_or_insert(error);
                if stop {
                    break;
                }
            }
        }
    }

    let mut warnings = Vec::new();
    if extra > 0 {
        tracing::warn!(extra, "software metadata has more than one row, using the first");
        warnings.push(ReportWarning::new(
            METADATA_SCOPE,
            format!(
                "table has {} rows; using the first ({} {})",
                extra + 1,
                metadata.name,
                metadata.version
            ),
        ));
    }
    if let Some(error) = malformed {
        tracing::warn!(%error, "ignored malformed software metadata row");
        warnings.push(ReportWarning::new(
            METADATA_SCOPE,
            format!("ignored malformed row after the first: {error}"),
        ));
    }

    Ok(LoadedMetadata { metadata, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(csv: &str) -> Result<LoadedMetadata, MalformedMetadataError> {
        read_metadata(csv.as_bytes(), b',')
    }

    #[test]
    fn reads_single_row() {
        let loaded = parse(
            "name,version,vendor_uri,description\n\
             MRIQC,24.0.2,https://mriqc.readthedocs.io,Automated QC\n",
        )
        .unwrap();

        assert_eq!(
            loaded.metadata,
            SoftwareMetadata {
                name: "MRIQC".into(),
                version: "24.0.2".into(),
                vendor_uri: Some("https://mriqc.readthedocs.io".into()),
                description: Some("Automated QC".into()),
            }
        );
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn optional_columns_may_be_absent_or_empty() {
        let loaded = parse("name,version,vendor_uri\nMRIQC,24.0.2,\n").unwrap();
        assert_eq!(loaded.metadata.vendor_uri, None);
        assert_eq!(loaded.metadata.description, None);
    }

    #[test]
    fn extra_rows_warn_and_first_wins() {
        let loaded = parse("name,version\nMRIQC,24.0.2\nMRIQC,23.1.0\n").unwrap();
        assert_eq!(loaded.metadata.version, "24.0.2");
        assert_eq!(loaded.warnings.len(), 1);
        assert_eq!(loaded.warnings[0].scope, METADATA_SCOPE);
        assert!(loaded.warnings[0].message.contains("2 rows"));
    }

    #[test]
    fn malformed_extra_row_is_not_counted_and_warns() {
        let loaded = parse("name,version\nMRIQC,24.0.2\nMRIQC\nMRIQC,23.1.0\n").unwrap();
        assert_eq!(loaded.metadata.version, "24.0.2");
        assert_eq!(loaded.warnings.len(), 2);
        assert!(loaded.warnings[0].message.contains("2 rows"));
        assert!(loaded.warnings[1].message.starts_with("ignored malformed row"));
    }

    #[test]
    fn empty_version_is_rejected() {
        let err = parse("name,version\nMRIQC,\n").unwrap_err();
        assert!(matches!(
            err,
            MalformedMetadataError::EmptyField { field: "version" }
        ));
    }

    #[test]
    fn missing_name_column_is_rejected() {
        let err = parse("version\n24.0.2\n").unwrap_err();
        assert!(matches!(
            err,
            MalformedMetadataError::MissingColumn { column: "name" }
        ));
    }

    #[test]
    fn header_only_is_rejected() {
        assert!(matches!(
            parse("name,version\n").unwrap_err(),
            MalformedMetadataError::NoRows
        ));
    }
}
