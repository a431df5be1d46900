use anyhow::Context;
use nidm_config::NidmConfig;

use crate::cli::Cli;

/// Load layered configuration, then apply command-line flags on top.
pub fn load_config(cli: &Cli) -> anyhow::Result<NidmConfig> {
    let mut config =
        NidmConfig::load_with_dotenv(cli.config.as_deref()).context("failed to load configuration")?;
    apply_overrides(&mut config, cli);
    config
        .validate()
        .context("invalid configuration after applying command-line flags")?;
    Ok(config)
}

fn apply_overrides(config: &mut NidmConfig, cli: &Cli) {
    if let Some(dictionary) = &cli.dictionary {
        config.mapping.dictionary.clone_from(dictionary);
    }
    if let Some(metadata) = &cli.software_metadata {
        config.mapping.software_metadata.clone_from(metadata);
    }
    if let Some(format) = cli.graph_format {
        config.output.graph_format = format.into();
    }
    if cli.aggregate {
        config.output.aggregate = true;
    }
    if let Some(jobs) = cli.jobs {
        config.run.jobs = jobs;
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::Parser;
    use nidm_core::GraphFormat;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn flags_override_config() {
        let cli = Cli::try_parse_from([
            "mriqc-nidm",
            "in",
            "out",
            "participant",
            "--dictionary",
            "dict.csv",
            "--graph-format",
            "jsonld",
            "--aggregate",
            "-j",
            "3",
        ])
        .expect("cli should parse");

        let mut config = NidmConfig::default();
        apply_overrides(&mut config, &cli);

        assert_eq!(config.mapping.dictionary, PathBuf::from("dict.csv"));
        assert!(config.mapping.software_metadata.ends_with("mriqc_software_metadata.csv"));
        assert_eq!(config.output.graph_format, GraphFormat::JsonLd);
        assert!(config.output.aggregate);
        assert_eq!(config.run.jobs, 3);
    }

    #[test]
    fn absent_flags_keep_config() {
        let cli = Cli::try_parse_from(["mriqc-nidm", "in", "out", "participant"]).expect("cli should parse");
        let mut config = NidmConfig::default();
        config.output.aggregate = true;
        config.run.jobs = 7;
        apply_overrides(&mut config, &cli);

        assert!(config.output.aggregate);
        assert_eq!(config.run.jobs, 7);
    }

    #[test]
    fn zero_jobs_from_flag_is_rejected() {
        let cli = Cli::try_parse_from(["mriqc-nidm", "in", "out", "participant", "-j", "0"])
            .expect("cli should parse");
        let mut config = NidmConfig::default();
        apply_overrides(&mut config, &cli);
        assert!(config.validate().is_err());
    }
}
