//! One subject, start to finish: resolve, build, write.
//!
//! Runs on a blocking thread and touches nothing but its own record and the
//! shared read-only [`RunContext`]. Everything it has to say goes into the
//! returned [`ReportFragment`].

use std::path::PathBuf;

use nidm_core::{FailureKind, ReportFragment, SubjectFailure, SubjectReport};
use nidm_graph::SubjectGraph;
use nidm_ingest::{QcRecord, RecordReadError, RecordSource};
use nidm_resolve::FieldResolver;

use crate::context::RunContext;

/// What one subject task hands back to the runner.
#[derive(Debug)]
pub struct SubjectOutcome {
    /// Present only if the subject graph was written.
    pub graph: Option<SubjectGraph>,
    pub fragment: ReportFragment,
}

pub fn convert(
    ctx: &RunContext,
    source: &RecordSource,
    read: Result<QcRecord, RecordReadError>,
) -> SubjectOutcome {
    let scope = source.display();

    let qc = match read {
        Ok(qc) => qc,
        Err(error) => {
            tracing::warn!(source = %scope, %error, "skipping subject");
            return failed(source, &scope, FailureKind::RecordRead, error.to_string());
        }
    };

    let label = qc.identity.label();
    let resolution = FieldResolver::new(&ctx.dictionary).resolve(&qc.record);
    for error in &resolution.errors {
        tracing::warn!(
            subject = %label,
            key = %error.key,
            reason = %error.reason,
            "field not resolved"
        );
    }
    for key in qc.record.excluded() {
        tracing::debug!(subject = %label, %key, "excluded by configuration");
    }

    let built = ctx.builder.build(&scope, &qc.identity, &resolution.fields);
    let path = output_path(ctx, source, &label);

    let mut subject = SubjectReport {
        source: scope.clone(),
        subject: label.clone(),
        resolved: resolution.fields.len(),
        unresolved: resolution.errors.len(),
        excluded: qc.record.excluded().to_vec(),
        errors: resolution.errors,
        output: None,
    };
    let mut fragment = ReportFragment {
        warnings: built.warnings,
        ..ReportFragment::default()
    };

    match ctx.writer.write_subject(&built.graph, &path) {
        Ok(()) => {
            tracing::info!(subject = %label, path = %path.display(), resolved = subject.resolved, "wrote subject graph");
            subject.output = Some(path.display().to_string());
            fragment.subject = Some(subject);
            SubjectOutcome {
                graph: Some(built.graph),
                fragment,
            }
        }
        Err(error) => {
            tracing::warn!(subject = %label, path = %path.display(), %error, "failed to write subject graph");
            fragment.failure = Some(SubjectFailure {
                source: scope,
                subject: label,
                kind: FailureKind::Write,
                message: error.to_string(),
            });
            fragment.subject = Some(subject);
            SubjectOutcome {
                graph: None,
                fragment,
            }
        }
    }
}

/// Where the graph for `source` is written: the record's file stem under the
/// subject's directory, or `fallback` for a path with no stem.
pub fn output_path(ctx: &RunContext, source: &RecordSource, fallback: &str) -> PathBuf {
    let stem = source
        .path
        .file_stem()
        .map_or_else(|| fallback.to_string(), |stem| stem.to_string_lossy().into_owned());
    ctx.writer.subject_path(&ctx.output_dir, &source.subject, &stem)
}

/// A subject that never produced a record.
pub fn failed(source: &RecordSource, scope: &str, kind: FailureKind, message: String) -> SubjectOutcome {
    SubjectOutcome {
        graph: None,
        fragment: ReportFragment {
            failure: Some(SubjectFailure {
                source: scope.to_string(),
                subject: format!("sub-{}", source.subject),
                kind,
                message,
            }),
            ..ReportFragment::default()
        },
    }
}
