use std::path::Path;

use nidm_core::{ConversionReport, ReportSummary};
use serde::Serialize;

/// What the run prints to stdout once it is over.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub totals: ReportSummary,
    pub report: Option<String>,
    pub aggregate: Option<String>,
    pub subjects: Vec<SubjectRow>,
}

/// One line per record in the table view.
#[derive(Debug, Serialize)]
pub struct SubjectRow {
    pub subject: String,
    pub status: &'static str,
    pub resolved: Option<usize>,
    pub unresolved: Option<usize>,
    pub output: Option<String>,
}

impl RunSummary {
    #[must_use]
    pub fn new(report: &ConversionReport, report_path: Option<&Path>, aggregate_path: Option<&Path>) -> Self {
        let mut subjects: Vec<SubjectRow> = report
            .subjects
            .iter()
            .map(|subject| SubjectRow {
                subject: subject.subject.clone(),
                status: if subject.output.is_some() { "converted" } else { "failed" },
                resolved: Some(subject.resolved),
                unresolved: Some(subject.unresolved),
                output: subject.output.clone(),
            })
            .collect();

        // Write failures already have a subject row above.
        subjects.extend(
            report
                .failures
                .iter()
                .filter(|failure| !report.subjects.iter().any(|subject| subject.source == failure.source))
                .map(|failure| SubjectRow {
                    subject: failure.subject.clone(),
                    status: "failed",
                    resolved: None,
                    unresolved: None,
                    output: None,
                }),
        );
        subjects.extend(report.cancelled.iter().map(|source| SubjectRow {
            subject: source.clone(),
            status: "cancelled",
            resolved: None,
            unresolved: None,
            output: None,
        }));
        subjects.sort_by(|a, b| a.subject.cmp(&b.subject));

        Self {
            totals: report.summary(),
            report: report_path.map(|path| path.display().to_string()),
            aggregate: aggregate_path.map(|path| path.display().to_string()),
            subjects,
        }
    }
}
