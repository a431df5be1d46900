//! # nidm-config
//!
//! Layered configuration loading for mriqc-nidm using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`MRIQC_NIDM_*` prefix, `__` as separator)
//! 2. An explicit `--config <file>` TOML
//! 3. User-level `~/.config/mriqc-nidm/config.toml`
//! 4. Built-in defaults
//!
//! Command-line flags are applied on top by the CLI after loading.
//!
//! # Environment Variable Mapping
//!
//! Figment maps `MRIQC_NIDM_RUN__JOBS` -> `run.jobs`,
//! `MRIQC_NIDM_OUTPUT__GRAPH_FORMAT` -> `output.graph_format`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use nidm_config::NidmConfig;
//!
//! let config = NidmConfig::load_with_dotenv(None).expect("config");
//! println!("dictionary: {}", config.mapping.dictionary.display());
//! ```

mod error;
mod ingest;
mod mapping;
mod output;
mod run;

pub use error::ConfigError;
pub use ingest::{DEFAULT_EXCLUDE_KEYS, IngestConfig};
pub use mapping::MappingConfig;
pub use output::OutputConfig;
pub use run::RunConfig;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use nidm_core::Namespaces;
use serde::{Deserialize, Serialize};

const ENV_PREFIX: &str = "MRIQC_NIDM_";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct NidmConfig {
    #[serde(default)]
    pub mapping: MappingConfig,
    #[serde(default)]
    pub ingest: IngestConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub run: RunConfig,
    /// Extra or overriding namespace prefixes for vocabulary terms.
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
}

impl NidmConfig {
    /// Load configuration from defaults, TOML files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if `explicit` does not exist, extraction
    /// fails, or a value is out of range.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(explicit)?.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support from the current directory.
    ///
    /// # Errors
    ///
    /// Same as [`NidmConfig::load`].
    pub fn load_with_dotenv(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load(explicit)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can extract from it directly or add providers on top.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingFile`] if `explicit` does not exist.
    pub fn figment(explicit: Option<&Path>) -> Result<Figment, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Explicit config file
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(ConfigError::MissingFile {
                    path: path.to_path_buf(),
                });
            }
            figment = figment.merge(Toml::file(path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Ok(figment)
    }

    /// Reject values no run can work with.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.jobs == 0 {
            return Err(invalid("run.jobs", "must be at least 1"));
        }
        if self.ingest.read_timeout_secs == 0 {
            return Err(invalid("ingest.read_timeout_secs", "must be at least 1"));
        }
        if self.ingest.datatypes.is_empty() {
            return Err(invalid("ingest.datatypes", "must name at least one directory"));
        }
        let stem = self.output.aggregate_name.trim();
        if stem.is_empty() || stem.contains(['/', '\\']) {
            return Err(invalid(
                "output.aggregate_name",
                "must be a non-empty file stem",
            ));
        }
        for (prefix, iri) in &self.namespaces {
            if iri.trim().is_empty() {
                return Err(invalid(
                    &format!("namespaces.{prefix}"),
                    "namespace IRI is empty",
                ));
            }
        }
        Ok(())
    }

    /// Built-in namespaces with the configured ones layered on top.
    #[must_use]
    pub fn namespaces(&self) -> Namespaces {
        Namespaces::with_overrides(&self.namespaces)
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("mriqc-nidm").join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
