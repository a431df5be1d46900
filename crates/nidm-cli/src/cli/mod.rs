use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use nidm_core::GraphFormat;

pub mod global;

pub use global::{GlobalFlags, OutputFormat};

/// BIDS-App analysis level. Only participant-level conversion exists.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum AnalysisLevel {
    Participant,
}

/// Output graph syntax.
#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum GraphFormatArg {
    Turtle,
    Jsonld,
}

impl From<GraphFormatArg> for GraphFormat {
    fn from(arg: GraphFormatArg) -> Self {
        match arg {
            GraphFormatArg::Turtle => Self::Turtle,
            GraphFormatArg::Jsonld => Self::JsonLd,
        }
    }
}

/// Top-level CLI parser for the `mriqc-nidm` binary.
#[derive(Debug, Parser)]
#[command(
    name = "mriqc-nidm",
    version,
    about = "Convert MRIQC quality-control metrics into NIDM provenance graphs"
)]
pub struct Cli {
    /// Directory containing MRIQC output
    pub mriqc_dir: PathBuf,

    /// Directory where NIDM files are written
    pub output_dir: PathBuf,

    /// Processing level
    #[arg(value_enum)]
    pub analysis_level: AnalysisLevel,

    /// Participant label(s) to convert, with or without "sub-" (default: all)
    #[arg(long = "participant-label", visible_alias = "participant_label", num_args = 1..)]
    pub participant_label: Vec<String>,

    /// Field dictionary CSV (overrides config)
    #[arg(long)]
    pub dictionary: Option<PathBuf>,

    /// Software metadata CSV (overrides config)
    #[arg(long)]
    pub software_metadata: Option<PathBuf>,

    /// Output graph format (overrides config)
    #[arg(long, value_enum)]
    pub graph_format: Option<GraphFormatArg>,

    /// Also write one merged dataset-level graph
    #[arg(long)]
    pub aggregate: bool,

    /// Subjects converted concurrently (overrides config)
    #[arg(short, long)]
    pub jobs: Option<usize>,

    /// Extra TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Summary format: json, table, raw
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,

    /// Quiet mode (errors only, no progress)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            quiet: self.quiet,
            verbose: self.verbose,
        }
    }
}
