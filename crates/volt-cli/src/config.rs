//! Configuration loading for the CLI.

use crate::cli::Cli;
use crate::error::{CliError, Result};
use std::fs;
use std::path::Path;
use volt_enricher::EnricherConfig;

/// Load the run configuration
///
/// Starts from the TOML file when given (defaults otherwise), then applies
/// command-line overrides and validates the result.
pub fn load(cli: &Cli) -> Result<EnricherConfig> {
    let config = match &cli.config {
        Some(path) => from_file(path)?,
        None => EnricherConfig::default(),
    };
    let config = apply_overrides(config, cli);
    config.validate().map_err(CliError::Config)?;
    Ok(config)
}

/// Read a configuration file
pub fn from_file(path: &Path) -> Result<EnricherConfig> {
    let contents = fs::read_to_string(path)?;
    let config: EnricherConfig = toml::from_str(&contents)?;
    Ok(config)
}

/// Apply command-line flags on top of `config`
pub fn apply_overrides(mut config: EnricherConfig, cli: &Cli) -> EnricherConfig {
    if let Some(threshold) = cli.threshold {
        config.resolver.similarity_threshold = threshold;
    }
    if let Some(concurrency) = cli.concurrency {
        config.max_concurrent_entities = concurrency;
    }
    if cli.llm_fallback {
        config.fallback_enabled = true;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_file() {
        let cli = Cli::parse_from(["volt", "in.txt"]);
        let config = load(&cli).unwrap();
        assert_eq!(config, EnricherConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            "max_concurrent_entities = 2\nlookup_timeout_ms = 5000\n\n[resolver]\nsimilarity_threshold = 0.8"
        )
        .unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["volt", "in.txt", "--config", &path, "--concurrency", "3"]);
        let config = load(&cli).unwrap();
        assert_eq!(config.max_concurrent_entities, 3);
        assert_eq!(config.lookup_timeout_ms, 5000);
        assert_eq!(config.resolver.similarity_threshold, 0.8);

        let cli = Cli::parse_from(["volt", "in.txt", "--config", &path, "--threshold", "0.95"]);
        assert_eq!(load(&cli).unwrap().resolver.similarity_threshold, 0.95);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let cli = Cli::parse_from(["volt", "in.txt", "--threshold", "1.5"]);
        assert!(matches!(load(&cli), Err(CliError::Config(_))));

        let cli = Cli::parse_from(["volt", "in.txt", "--concurrency", "0"]);
        assert!(matches!(load(&cli), Err(CliError::Config(_))));

        let cli = Cli::parse_from(["volt", "in.txt", "--concurrency", "18446744073709551615"]);
        assert!(matches!(load(&cli), Err(CliError::Config(_))));
    }

    #[test]
    fn test_bad_toml_is_reported() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "max_concurrent_entities = \"many\"").unwrap();
        let result = from_file(file.path());
        assert!(matches!(result, Err(CliError::Toml(_))));
    }

    #[test]
    fn test_llm_fallback_flag() {
        let cli = Cli::parse_from(["volt", "in.txt", "--llm-fallback"]);
        let config = apply_overrides(EnricherConfig::default(), &cli);
        assert!(config.fallback_enabled);
    }
}
