//! # nidm-core
//!
//! Core types, stable identifiers, and error types for mriqc-nidm.
//!
//! This crate provides the foundational types shared across all mriqc-nidm crates:
//! - Field dictionary and software metadata tables (immutable after load)
//! - Scalar values as read from QC records, and the typed values they coerce into
//! - Subject identity and deterministic entity identifiers
//! - Per-field resolution outcomes
//! - The conversion report accumulated over a run
//! - Vocabulary constants and namespace handling for the emitted graphs

pub mod dictionary;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod normalize;
pub mod record;
pub mod report;
pub mod resolution;
pub mod software;
pub mod value;
pub mod vocab;

pub use dictionary::{Dictionary, DictionaryEntry};
pub use enums::{Datatype, FailureKind, GraphFormat, ResolutionReason, RunOutcome};
pub use errors::CoreError;
pub use identity::SubjectIdentity;
pub use ids::EntityId;
pub use normalize::normalize_key;
pub use record::RawRecord;
pub use report::{
    ConversionReport, ReportFragment, ReportSummary, ReportWarning, SubjectFailure, SubjectReport,
};
pub use resolution::{ResolutionError, ResolvedField};
pub use software::SoftwareMetadata;
pub use value::{ScalarValue, TypedValue};
pub use vocab::Namespaces;
