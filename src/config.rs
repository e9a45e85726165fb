use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::fs;
use anyhow::{Context, Result};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub input: InputConfig,
    pub output: OutputConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InputConfig {
    // When unset, the built-in demographic tables are used.
    pub regions_csv: Option<PathBuf>,
    pub age_brackets_csv: Option<PathBuf>,
    pub notebook: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OutputConfig {
    pub map_html: PathBuf,
    pub text_dump: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub port: u16,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            regions_csv: None,
            age_brackets_csv: None,
            notebook: PathBuf::from("TP_Visualisation.ipynb"),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            map_html: PathBuf::from("carte_demographique_rdc.html"),
            text_dump: PathBuf::from("TP_Visualisation.txt"),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: 3000 }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| "Failed to parse TOML configuration")?;
        Ok(config)
    }

    /// Loads the config file if it exists, otherwise falls back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert!(config.input.regions_csv.is_none());
        assert_eq!(config.input.notebook, PathBuf::from("TP_Visualisation.ipynb"));
        assert_eq!(config.output.map_html, PathBuf::from("carte_demographique_rdc.html"));
        assert_eq!(config.output.text_dump, PathBuf::from("TP_Visualisation.txt"));
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [server]
            port = 8080

            [input]
            regions_csv = "regions.csv"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.input.regions_csv, Some(PathBuf::from("regions.csv")));
        // Untouched sections stay at their defaults
        assert_eq!(config.output.map_html, PathBuf::from("carte_demographique_rdc.html"));
        assert_eq!(config.input.notebook, PathBuf::from("TP_Visualisation.ipynb"));
    }
}
