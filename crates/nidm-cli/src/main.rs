use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nidm_config::NidmConfig;
use nidm_core::{ConversionReport, FailureKind, ReportFragment, ReportWarning, SubjectFailure};
use nidm_graph::DatasetGraph;
use nidm_ingest::Discovery;

mod bootstrap;
mod cli;
mod context;
mod logging;
mod output;
mod pipeline;
mod progress;
mod runner;
mod summary;
mod ui;

const LOG_DIR: &str = "logs";
const REPORT_FILE: &str = "conversion-report.json";

#[tokio::main]
async fn main() {
    match run().await {
        Ok(code) => std::process::exit(code),
        Err(error) => {
            eprintln!("mriqc-nidm error: {error:#}");
            std::process::exit(1);
        }
    }
}

async fn run() -> anyhow::Result<i32> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    let (_log_guard, log_path) = logging::init(&flags, &cli.output_dir.join(LOG_DIR))?;
    ui::init(&flags);
    tracing::info!(level = ?cli.analysis_level, log = %log_path.display(), "starting");

    let config = bootstrap::load_config(&cli)?;

    let mut report = ConversionReport::new();
    let loaded = context::RunContext::load(&config, cli.output_dir.clone())?;
    for warning in loaded.warnings {
        report.warn(warning);
    }

    let participants = nidm_ingest::parse_participant_labels(&cli.participant_label);
    let discovery = nidm_ingest::discover(&cli.mriqc_dir, &config.ingest.datatypes, &participants)
        .context("failed to scan MRIQC directory")?;
    record_discovery_gaps(&mut report, &discovery, &cli.mriqc_dir, &config);
    tracing::info!(records = discovery.sources.len(), jobs = config.run.jobs, "discovered QC records");

    let total = u64::try_from(discovery.sources.len()).unwrap_or(u64::MAX);
    let progress = progress::Progress::bar(total, "converting subjects");
    let run_output = runner::run_subjects(
        Arc::clone(&loaded.context),
        discovery.sources,
        runner::RunOptions {
            jobs: config.run.jobs,
            aggregate: config.output.aggregate,
        },
        &mut report,
        &progress,
        shutdown_signal(),
    )
    .await;

    let aggregate_path = match &run_output.dataset {
        Some(dataset) => write_aggregate(&loaded.context, &config, dataset, &mut report),
        None => None,
    };

    report.finalize();
    let report_path = if config.output.report {
        let path = cli.output_dir.join(LOG_DIR).join(REPORT_FILE);
        nidm_graph::write_json_atomic(&path, &report)
            .with_context(|| format!("failed to write conversion report {}", path.display()))?;
        Some(path)
    } else {
        None
    };

    let summary = summary::RunSummary::new(&report, report_path.as_deref(), aggregate_path.as_deref());
    let outcome = summary.totals.outcome;
    if run_output.interrupted {
        progress.finish_err("interrupted");
    } else {
        progress.finish_ok(outcome.as_str());
    }
    tracing::info!(
        %outcome,
        converted = summary.totals.subjects_converted,
        failed = summary.totals.subjects_failed,
        cancelled = summary.totals.subjects_cancelled,
        "run finished"
    );

    output::output(&summary, flags.format)?;
    Ok(outcome.exit_code())
}

/// Requested participants with no directory fail; directories with no
/// records only warn.
fn record_discovery_gaps(
    report: &mut ConversionReport,
    discovery: &Discovery,
    mriqc_dir: &Path,
    config: &NidmConfig,
) {
    for label in &discovery.missing_participants {
        tracing::warn!(participant = %label, "participant directory not found");
        report.absorb(ReportFragment {
            failure: Some(SubjectFailure {
                source: mriqc_dir.join(format!("sub-{label}")).display().to_string(),
                subject: format!("sub-{label}"),
                kind: FailureKind::RecordRead,
                message: "participant directory not found".to_string(),
            }),
            ..ReportFragment::default()
        });
    }
    for label in &discovery.empty_participants {
        tracing::warn!(participant = %label, "no QC records found");
        report.warn(ReportWarning::new(
            format!("sub-{label}"),
            format!("no QC records under {}", config.ingest.datatypes.join(", ")),
        ));
    }
}

/// A failed aggregate write is reported but leaves the subject graphs valid.
fn write_aggregate(
    ctx: &context::RunContext,
    config: &NidmConfig,
    dataset: &DatasetGraph,
    report: &mut ConversionReport,
) -> Option<PathBuf> {
    if dataset.is_empty() {
        report.warn(ReportWarning::new(
            "aggregate",
            "no subject graphs were written; dataset graph skipped",
        ));
        return None;
    }

    let path = ctx.writer.dataset_path(&ctx.output_dir, config.output.aggregate_name.trim());
    match ctx.writer.write_dataset(dataset, &path) {
        Ok(()) => Some(path),
        Err(error) => {
            tracing::error!(path = %path.display(), %error, "failed to write dataset graph");
            report.warn(ReportWarning::new("aggregate", error.to_string()));
            None
        }
    }
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::warn!(%error, "cannot listen for Ctrl-C; interruption disabled");
        std::future::pending::<()>().await;
    }
}
