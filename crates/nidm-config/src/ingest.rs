//! Record discovery and reading options.

use serde::{Deserialize, Serialize};

/// Top-level MRIQC keys that carry no image-quality metric.
pub const DEFAULT_EXCLUDE_KEYS: [&str; 10] = [
    "bids_meta",
    "provenance",
    "qi_1",
    "qi_2",
    "size_x",
    "size_y",
    "size_z",
    "spacing_x",
    "spacing_y",
    "spacing_z",
];

fn default_datatypes() -> Vec<String> {
    vec!["anat".to_string()]
}

fn default_exclude_keys() -> Vec<String> {
    DEFAULT_EXCLUDE_KEYS.iter().map(ToString::to_string).collect()
}

const fn default_read_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct IngestConfig {
    /// BIDS datatype directories scanned under each subject (`anat`, `func`, ...).
    #[serde(default = "default_datatypes")]
    pub datatypes: Vec<String>,

    /// Top-level record keys dropped before flattening.
    #[serde(default = "default_exclude_keys")]
    pub exclude_keys: Vec<String>,

    /// Upper bound on reading a single record.
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            datatypes: default_datatypes(),
            exclude_keys: default_exclude_keys(),
            read_timeout_secs: default_read_timeout_secs(),
        }
    }
}
