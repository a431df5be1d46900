//! Single-row CSV/TSV QC records.
//!
//! Identity columns (`subject_id`, `ses`, `task`, `acq`, `run`, `source_url`)
//! feed the subject identity and never become fields.

use std::io::Read;
use std::path::Path;

use nidm_core::{RawRecord, ScalarValue, normalize_key};

use super::identity::{self, Entities};
use super::{QcRecord, ReadOptions, RecordSource};
use crate::error::RecordReadError;
use crate::tabular;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Subject,
    Session,
    Task,
    Acquisition,
    Run,
    SourceUrl,
    Excluded,
    Field,
}

pub(super) fn read(
    source: &RecordSource,
    options: &ReadOptions,
) -> Result<QcRecord, RecordReadError> {
    let file = std::fs::File::open(&source.path).map_err(|err| RecordReadError::Io {
        path: source.path.clone(),
        source: err,
    })?;
    parse(
        file,
        tabular::delimiter_for(&source.path),
        &source.path,
        &source.subject,
        options,
    )
}

pub(super) fn parse<R: Read>(
    input: R,
    delimiter: u8,
    path: &Path,
    subject_label: &str,
    options: &ReadOptions,
) -> Result<QcRecord, RecordReadError> {
    let csv_error = |source| RecordReadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = tabular::reader(input, delimiter);
    let headers = reader.headers().map_err(csv_error)?.clone();
    let rows = reader
        .records()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_error)?;
    if rows.len() > 1 {
        return Err(RecordReadError::MultipleRows {
            path: path.to_path_buf(),
            rows: rows.len(),
        });
    }

    let mut record = RawRecord::new();
    let mut entities = Entities::default();
    let mut source_url = None;
    let row = rows.first();

    for (index, header) in headers.iter().enumerate() {
        let cell = row.and_then(|row| tabular::cell(row, Some(index)));
        match classify(header, options) {
            Column::Subject => entities.subject = cell,
            Column::Session => entities.session = cell,
            Column::Task => entities.task = cell,
            Column::Acquisition => entities.acquisition = cell,
            Column::Run => entities.run = cell,
            Column::SourceUrl => source_url = cell,
            Column::Excluded => {
                tracing::debug!(path = %path.display(), key = %header, "excluded column");
                record.exclude(header);
            }
            Column::Field if row.is_some() => {
                record.push(header, cell.map_or(ScalarValue::Null, ScalarValue::Text));
            }
            Column::Field => {}
        }
    }

    let identity = entities
        .or(Entities::from_path(path))
        .into_identity(subject_label, source_url.or_else(|| identity::source_url(path)));
    Ok(QcRecord { identity, record })
}

fn classify(header: &str, options: &ReadOptions) -> Column {
    match normalize_key(header).as_str() {
        "subject_id" | "subject" => Column::Subject,
        "ses" | "session" => Column::Session,
        "task" => Column::Task,
        "acq" | "acquisition" => Column::Acquisition,
        "run" => Column::Run,
        "source_url" => Column::SourceUrl,
        _ if options.is_excluded(header) => Column::Excluded,
        _ => Column::Field,
    }
}
