//! Bounded concurrent subject loop.
//!
//! At most `jobs` subjects are in flight. Each task owns one semaphore
//! permit and returns its graph and report fragment; the loop merges them as
//! tasks finish, so no task ever sees another's state. When `shutdown`
//! resolves, scheduling stops, in-flight subjects finish, and whatever was
//! never scheduled is recorded as cancelled.
//!
//! Two records of one subject that share a file stem (`sub-01_T1w.json` and
//! `sub-01_T1w.csv`) would write the same graph file. The first in discovery
//! order keeps it; the rest fail before they are scheduled.

use std::collections::{BTreeMap, VecDeque};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use nidm_core::{ConversionReport, FailureKind, ReportWarning};
use nidm_graph::DatasetGraph;
use nidm_ingest::{QcRecord, RecordReadError, RecordSource, read_record};
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tokio::task::JoinSet;

use crate::context::RunContext;
use crate::pipeline::{self, SubjectOutcome};
use crate::progress::Progress;

#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub jobs: usize,
    pub aggregate: bool,
}

/// What the loop produced besides the report entries.
#[derive(Debug, Default)]
pub struct RunOutput {
    /// Union of every written subject graph, when aggregation is on.
    pub dataset: Option<DatasetGraph>,
    pub interrupted: bool,
}

pub async fn run_subjects<F>(
    ctx: Arc<RunContext>,
    sources: Vec<RecordSource>,
    options: RunOptions,
    report: &mut ConversionReport,
    progress: &Progress,
    shutdown: F,
) -> RunOutput
where
    F: Future<Output = ()>,
{
    let semaphore = Arc::new(Semaphore::new(options.jobs.max(1)));
    let mut queue: VecDeque<RecordSource> = claim_output_paths(&ctx, sources, report, progress).into();
    let mut tasks: JoinSet<SubjectOutcome> = JoinSet::new();
    let mut output = RunOutput {
        dataset: options.aggregate.then(DatasetGraph::new),
        interrupted: false,
    };
    tokio::pin!(shutdown);

    loop {
        let work_remains = !queue.is_empty() || !tasks.is_empty();
        tokio::select! {
            biased;

            () = &mut shutdown, if !output.interrupted && work_remains => {
                output.interrupted = true;
                tracing::warn!(
                    in_flight = tasks.len(),
                    unscheduled = queue.len(),
                    "interrupted; finishing in-flight subjects"
                );
                progress.set_message("interrupted, finishing in-flight subjects");
            }

            Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                match joined {
                    Ok(outcome) => {
                        if let (Some(dataset), Some(graph)) = (output.dataset.as_mut(), outcome.graph.as_ref()) {
                            dataset.merge(graph);
                        }
                        report.absorb(outcome.fragment);
                    }
                    Err(error) => {
                        tracing::error!(%error, "subject task aborted");
                        report.warn(ReportWarning::new("run", format!("subject task aborted: {error}")));
                    }
                }
                progress.inc(1);
            }

            permit = Arc::clone(&semaphore).acquire_owned(), if !output.interrupted && !queue.is_empty() => {
                let Ok(permit) = permit else {
                    break;
                };
                if let Some(source) = queue.pop_front() {
                    tasks.spawn(convert_subject(Arc::clone(&ctx), source, permit));
                }
            }

            else => break,
        }
    }

    for source in queue {
        report.mark_cancelled(source.display());
    }
    output
}

/// Keep the first source for each output path; fail the others.
fn claim_output_paths(
    ctx: &RunContext,
    sources: Vec<RecordSource>,
    report: &mut ConversionReport,
    progress: &Progress,
) -> Vec<RecordSource> {
    let mut claimed: BTreeMap<PathBuf, String> = BTreeMap::new();
    let mut kept = Vec::with_capacity(sources.len());
    for source in sources {
        let scope = source.display();
        let path = pipeline::output_path(ctx, &source, &format!("sub-{}", source.subject));
        if let Some(owner) = claimed.get(&path) {
            tracing::warn!(source = %scope, path = %path.display(), %owner, "output path already claimed");
            let message = format!("output {} is already written from {owner}", path.display());
            report.absorb(pipeline::failed(&source, &scope, FailureKind::Write, message).fragment);
            progress.inc(1);
            continue;
        }
        claimed.insert(path, scope);
        kept.push(source);
    }
    kept
}

async fn convert_subject(
    ctx: Arc<RunContext>,
    source: RecordSource,
    _permit: OwnedSemaphorePermit,
) -> SubjectOutcome {
    let read = read_with_timeout(&ctx, &source).await;

    let task_source = source.clone();
    let converted =
        tokio::task::spawn_blocking(move || pipeline::convert(&ctx, &task_source, read)).await;
    match converted {
        Ok(outcome) => outcome,
        Err(error) => {
            tracing::error!(source = %source.display(), %error, "conversion aborted");
            pipeline::failed(
                &source,
                &source.display(),
                FailureKind::Write,
                format!("conversion aborted: {error}"),
            )
        }
    }
}

/// Read on a blocking thread, giving up after the configured timeout.
async fn read_with_timeout(
    ctx: &Arc<RunContext>,
    source: &RecordSource,
) -> Result<QcRecord, RecordReadError> {
    let task_ctx = Arc::clone(ctx);
    let task_source = source.clone();
    let read = tokio::task::spawn_blocking(move || read_record(&task_source, &task_ctx.read_options));

    match tokio::time::timeout(ctx.read_timeout, read).await {
        Ok(Ok(result)) => result,
        Ok(Err(error)) => Err(RecordReadError::Aborted {
            path: source.path.clone(),
            reason: error.to_string(),
        }),
        Err(_) => Err(RecordReadError::Timeout {
            path: source.path.clone(),
            secs: ctx.read_timeout.as_secs(),
        }),
    }
}
