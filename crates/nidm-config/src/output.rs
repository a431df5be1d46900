//! Output configuration.

use nidm_core::GraphFormat;
use serde::{Deserialize, Serialize};

fn default_aggregate_name() -> String {
    "dataset_qc".to_string()
}

const fn default_report() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Syntax of written graph documents.
    #[serde(default)]
    pub graph_format: GraphFormat,

    /// Also write one merged dataset-level graph.
    #[serde(default)]
    pub aggregate: bool,

    /// File stem of the dataset-level graph.
    #[serde(default = "default_aggregate_name")]
    pub aggregate_name: String,

    /// Persist the conversion report under `<output_dir>/logs/`.
    #[serde(default = "default_report")]
    pub report: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            graph_format: GraphFormat::default(),
            aggregate: false,
            aggregate_name: default_aggregate_name(),
            report: default_report(),
        }
    }
}
