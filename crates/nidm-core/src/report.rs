//! Conversion report: per-run diagnostics.
//!
//! Each subject task produces a [`ReportFragment`]; fragments are absorbed
//! into one [`ConversionReport`] after the subject loop, so no task ever
//! shares mutable report state with another. The report grows monotonically
//! and is never part of the emitted graphs.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{FailureKind, ResolutionReason, RunOutcome};
use crate::resolution::ResolutionError;

/// A non-fatal condition worth surfacing (multi-row metadata, empty graph, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportWarning {
    /// What the warning is about: `software_metadata`, a record path, ...
    pub scope: String,
    pub message: String,
}

impl ReportWarning {
    #[must_use]
    pub fn new(scope: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            message: message.into(),
        }
    }
}

/// Resolution counts and diagnostics for one converted record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubjectReport {
    /// Path of the QC record.
    pub source: String,
    /// BIDS label of the record (`sub-01_T1w`).
    pub subject: String,
    pub resolved: usize,
    pub unresolved: usize,
    /// Keys removed by configuration before resolution.
    #[serde(default)]
    pub excluded: Vec<String>,
    #[serde(default)]
    pub errors: Vec<ResolutionError>,
    /// Written document, absent if writing failed.
    pub output: Option<String>,
}

/// A subject that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SubjectFailure {
    pub source: String,
    pub subject: String,
    pub kind: FailureKind,
    pub message: String,
}

/// Everything one subject task contributes to the run report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFragment {
    pub subject: Option<SubjectReport>,
    pub failure: Option<SubjectFailure>,
    pub warnings: Vec<ReportWarning>,
}

/// Accumulated diagnostics for a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ConversionReport {
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub warnings: Vec<ReportWarning>,
    #[serde(default)]
    pub subjects: Vec<SubjectReport>,
    #[serde(default)]
    pub failures: Vec<SubjectFailure>,
    /// Sources never scheduled because the run was interrupted.
    #[serde(default)]
    pub cancelled: Vec<String>,
}

/// Totals surfaced to the user at the end of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReportSummary {
    pub outcome: RunOutcome,
    pub subjects_converted: usize,
    pub subjects_failed: usize,
    pub subjects_cancelled: usize,
    pub fields_resolved: usize,
    pub fields_unmapped: usize,
    pub fields_type_mismatch: usize,
    pub fields_excluded: usize,
    pub warnings: usize,
}

impl Default for ConversionReport {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversionReport {
    #[must_use]
    pub fn new() -> Self {
        Self {
            generated_at: Utc::now(),
            warnings: Vec::new(),
            subjects: Vec::new(),
            failures: Vec::new(),
            cancelled: Vec::new(),
        }
    }

    pub fn warn(&mut self, warning: ReportWarning) {
        self.warnings.push(warning);
    }

    /// Append one subject's fragment. Nothing already recorded is replaced.
    pub fn absorb(&mut self, fragment: ReportFragment) {
        if let Some(subject) = fragment.subject {
            self.subjects.push(subject);
        }
        if let Some(failure) = fragment.failure {
            self.failures.push(failure);
        }
        self.warnings.extend(fragment.warnings);
    }

    pub fn mark_cancelled(&mut self, source: impl Into<String>) {
        self.cancelled.push(source.into());
    }

    /// Order entries by source path so the report does not depend on task
    /// completion order.
    pub fn finalize(&mut self) {
        self.subjects.sort_by(|a, b| a.source.cmp(&b.source));
        self.failures.sort_by(|a, b| a.source.cmp(&b.source));
        self.cancelled.sort();
        self.warnings.sort_by(|a, b| a.scope.cmp(&b.scope));
    }

    #[must_use]
    pub fn summary(&self) -> ReportSummary {
        let subjects_converted = self
            .subjects
            .iter()
            .filter(|subject| subject.output.is_some())
            .count();
        let subjects_failed = self.failures.len();
        let subjects_cancelled = self.cancelled.len();

        let errors = self.subjects.iter().flat_map(|subject| &subject.errors);
        let (mut unmapped, mut mismatched) = (0, 0);
        for error in errors {
            match error.reason {
                ResolutionReason::Unmapped => unmapped += 1,
                ResolutionReason::TypeMismatch => mismatched += 1,
            }
        }

        let outcome = if subjects_converted == 0 {
            RunOutcome::Failed
        } else if subjects_failed > 0 || subjects_cancelled > 0 {
            RunOutcome::PartiallySucceeded
        } else {
            RunOutcome::Succeeded
        };

        ReportSummary {
            outcome,
            subjects_converted,
            subjects_failed,
            subjects_cancelled,
            fields_resolved: self.subjects.iter().map(|subject| subject.resolved).sum(),
            fields_unmapped: unmapped,
            fields_type_mismatch: mismatched,
            fields_excluded: self
                .subjects
                .iter()
                .map(|subject| subject.excluded.len())
                .sum(),
            warnings: self.warnings.len(),
        }
    }
}
