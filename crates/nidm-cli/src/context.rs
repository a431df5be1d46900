use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use nidm_config::NidmConfig;
use nidm_core::{Dictionary, ReportWarning};
use nidm_graph::{GraphBuilder, GraphWriter};
use nidm_ingest::ReadOptions;

/// Everything a subject task needs, loaded once and shared read-only.
#[derive(Debug)]
pub struct RunContext {
    pub dictionary: Dictionary,
    pub builder: GraphBuilder,
    pub writer: GraphWriter,
    pub read_options: ReadOptions,
    pub output_dir: PathBuf,
    pub read_timeout: Duration,
}

/// A loaded context plus the warnings loading produced.
#[derive(Debug)]
pub struct Loaded {
    pub context: Arc<RunContext>,
    pub warnings: Vec<ReportWarning>,
}

impl RunContext {
    /// Load the dictionary and software metadata named by `config`.
    ///
    /// Either table being unusable aborts the run before any subject is
    /// touched.
    pub fn load(config: &NidmConfig, output_dir: PathBuf) -> anyhow::Result<Loaded> {
        let namespaces = config.namespaces();

        let dictionary_path = &config.mapping.dictionary;
        let dictionary = nidm_ingest::load_dictionary(dictionary_path)
            .with_context(|| format!("failed to load field dictionary {}", dictionary_path.display()))?;
        nidm_ingest::validate_terms(&dictionary, &namespaces)
            .with_context(|| format!("field dictionary {} is unusable", dictionary_path.display()))?;

        let metadata_path = &config.mapping.software_metadata;
        let loaded = nidm_ingest::load_metadata(metadata_path).with_context(|| {
            format!("failed to load software metadata {}", metadata_path.display())
        })?;

        tracing::info!(
            entries = dictionary.len(),
            software = %loaded.metadata.name,
            version = %loaded.metadata.version,
            "loaded mapping tables"
        );

        let context = Self {
            dictionary,
            builder: GraphBuilder::new(Arc::new(loaded.metadata)),
            writer: GraphWriter::new(config.output.graph_format, namespaces),
            read_options: ReadOptions::new(&config.ingest.exclude_keys),
            output_dir,
            read_timeout: Duration::from_secs(config.ingest.read_timeout_secs),
        };

        Ok(Loaded {
            context: Arc::new(context),
            warnings: loaded.warnings,
        })
    }
}
