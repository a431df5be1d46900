use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The tool that produced the QC metrics: the provenance agent of every graph.
///
/// Loaded once and shared behind an `Arc`; each subject document serializes it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
pub struct SoftwareMetadata {
    pub name: String,
    pub version: String,
    pub vendor_uri: Option<String>,
    pub description: Option<String>,
}
