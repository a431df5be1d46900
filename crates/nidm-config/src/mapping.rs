//! Locations of the two startup tables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_dictionary() -> PathBuf {
    PathBuf::from("/opt/mriqc-nidm/mriqc_dictionary_v1.csv")
}

fn default_software_metadata() -> PathBuf {
    PathBuf::from("/opt/mriqc-nidm/mriqc_software_metadata.csv")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MappingConfig {
    /// Field dictionary CSV (`source_key, target_term, datatype, unit, description`).
    #[serde(default = "default_dictionary")]
    pub dictionary: PathBuf,

    /// Software metadata CSV (`name, version, vendor_uri, description`).
    #[serde(default = "default_software_metadata")]
    pub software_metadata: PathBuf,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            dictionary: default_dictionary(),
            software_metadata: default_software_metadata(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_bundled_tables() {
        let config = MappingConfig::default();
        assert!(config.dictionary.ends_with("mriqc_dictionary_v1.csv"));
        assert!(config.software_metadata.ends_with("mriqc_software_metadata.csv"));
    }
}
