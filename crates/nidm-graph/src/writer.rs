//! All-or-nothing output files.
//!
//! Every write goes to a temporary file in the destination directory, is
//! flushed and synced, then renamed over the destination. If anything fails
//! the temporary file is removed on drop and the destination is untouched,
//! so a partial output is never observable.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use nidm_core::{GraphFormat, Namespaces};
use serde::Serialize;
use tempfile::NamedTempFile;

use crate::dataset::DatasetGraph;
use crate::document::GraphDocument;
use crate::encode;
use crate::error::WriteError;
use crate::model::SubjectGraph;

/// Encodes graphs in one format and writes them atomically.
#[derive(Debug, Clone)]
pub struct GraphWriter {
    format: GraphFormat,
    namespaces: Namespaces,
}

impl GraphWriter {
    #[must_use]
    pub const fn new(format: GraphFormat, namespaces: Namespaces) -> Self {
        Self { format, namespaces }
    }

    #[must_use]
    pub const fn format(&self) -> GraphFormat {
        self.format
    }

    /// `<output_dir>/sub-<label>/nidm/<stem>.<ext>`
    #[must_use]
    pub fn subject_path(&self, output_dir: &Path, subject: &str, stem: &str) -> PathBuf {
        output_dir
            .join(format!("sub-{subject}"))
            .join("nidm")
            .join(format!("{stem}.{}", self.format.extension()))
    }

    /// `<output_dir>/<name>.<ext>`
    #[must_use]
    pub fn dataset_path(&self, output_dir: &Path, name: &str) -> PathBuf {
        output_dir.join(format!("{name}.{}", self.format.extension()))
    }

    /// Encode without writing.
    ///
    /// # Errors
    ///
    /// Returns [`WriteError::Encode`] if serialization fails.
    pub fn render(&self, document: &GraphDocument) -> Result<Vec<u8>, WriteError> {
        encode::encode(document, self.format, &self.namespaces)
    }

    /// # Errors
    ///
    /// Returns [`WriteError`] if encoding or the atomic write fails.
    pub fn write_subject(&self, graph: &SubjectGraph, path: &Path) -> Result<(), WriteError> {
        let bytes = self.render(&GraphDocument::from(graph))?;
        write_atomic(path, &bytes)?;
        tracing::debug!(path = %path.display(), statements = graph.statements.len(), "wrote subject graph");
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`WriteError`] if encoding or the atomic write fails.
    pub fn write_dataset(&self, dataset: &DatasetGraph, path: &Path) -> Result<(), WriteError> {
        let bytes = self.render(&GraphDocument::from(dataset))?;
        write_atomic(path, &bytes)?;
        tracing::info!(
            path = %path.display(),
            entities = dataset.entity_count(),
            statements = dataset.statement_count(),
            "wrote dataset graph"
        );
        Ok(())
    }
}

/// Write `value` as pretty JSON with a trailing newline, atomically.
///
/// # Errors
///
/// Returns [`WriteError`] if serialization or the write fails.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), WriteError> {
    let mut bytes = serde_json::to_vec_pretty(value)?;
    bytes.push(b'\n');
    write_atomic(path, &bytes)
}

/// Replace `path` with `bytes` or leave it as it was.
///
/// # Errors
///
/// Returns [`WriteError`] if the directory cannot be created or any step of
/// the write, sync, or rename fails.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), WriteError> {
    let dir = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .ok_or_else(|| WriteError::NoParent {
            path: path.to_path_buf(),
        })?;
    fs::create_dir_all(dir).map_err(|source| WriteError::CreateDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let io_error = |source| WriteError::Io {
        path: path.to_path_buf(),
        source,
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(io_error)?;
    temp.write_all(bytes).map_err(io_error)?;
    temp.flush().map_err(io_error)?;
    temp.as_file().sync_all().map_err(io_error)?;
    temp.persist(path).map_err(|err| WriteError::Persist {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}
