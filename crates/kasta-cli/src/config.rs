//! Configuration loading

use anyhow::Result;
use kasta_core::catalog::flatten_supported_types;
use kasta_core::SupportedEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub output: OutputConfig,
    /// Device types the project supports, optionally sub-typed one level
    #[serde(default)]
    pub supported: BTreeMap<String, SupportedEntry<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Config {
    /// Supported types with sub-types flattened to `"Type - SubType"`
    pub fn supported_types(&self) -> BTreeMap<String, Vec<String>> {
        flatten_supported_types(&self.supported)
    }
}

/// Load configuration from file, falling back to defaults when absent
pub fn load_config(path: &Path) -> Result<Config> {
    if path.exists() {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        info!(
            path = %path.display(),
            supported = config.supported.len(),
            "Loaded configuration"
        );
        Ok(config)
    } else {
        info!(
            path = %path.display(),
            "Configuration file not found, using defaults"
        );
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_config(&dir.path().join("kasta.toml")).unwrap();
        assert_eq!(config.output.format, OutputFormat::Text);
        assert!(config.supported.is_empty());
    }

    #[test]
    fn test_load_supported_catalogue() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[output]
format = "json"

[supported]
Lighting = ["LIGHT_DIMMER", "LIGHT_SWITCH"]

[supported."PowerPoint Type"]
"Single-Way" = ["SOCKET_SINGLE"]
"Two-Way" = ["SOCKET_RELAY"]
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.output.format, OutputFormat::Json);

        let flat = config.supported_types();
        assert_eq!(flat["Lighting"], vec!["LIGHT_DIMMER", "LIGHT_SWITCH"]);
        assert_eq!(flat["PowerPoint Type - Single-Way"], vec!["SOCKET_SINGLE"]);
        assert_eq!(flat["PowerPoint Type - Two-Way"], vec!["SOCKET_RELAY"]);
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn test_invalid_toml_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[output\nformat = ").unwrap();
        assert!(load_config(file.path()).is_err());
    }
}
