//! Cross-cutting error types for mriqc-nidm.
//!
//! Loader, reader, and writer errors live in their respective crates
//! (`MalformedDictionaryError`, `RecordReadError`, `WriteError`, ...). The CLI
//! converges them through `anyhow`.

use thiserror::Error;

/// Errors that can be raised by core types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Two dictionary entries normalize to the same lookup key.
    #[error("Duplicate dictionary key '{key}' (already defined by '{existing}')")]
    DuplicateKey { key: String, existing: String },

    /// A vocabulary term is neither an absolute IRI nor a CURIE.
    #[error("Invalid vocabulary term '{term}'")]
    InvalidTerm { term: String },

    /// A CURIE uses a prefix that no namespace declares.
    #[error("Vocabulary term '{term}' uses undeclared prefix '{prefix}'")]
    UnknownPrefix { term: String, prefix: String },
}
