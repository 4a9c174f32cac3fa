//! Configuration loading and parsing

use anyhow::{bail, Context, Result};
use census_report::{EmptySubsetPolicy, HeaderMode, ReportConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub report: ReportSection,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub path: Option<PathBuf>,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub header: HeaderMode,
}

fn default_delimiter() -> char {
    ','
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: None,
            delimiter: default_delimiter(),
            header: HeaderMode::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportSection {
    #[serde(default)]
    pub empty_subset: EmptySubsetPolicy,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Write the report here instead of stdout
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl AppConfig {
    /// Library configuration for this run
    ///
    /// Text is never emitted by the library itself; the CLI writes the rendered report.
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig::new()
            .with_delimiter(self.input.delimiter)
            .with_header_mode(self.input.header)
            .with_empty_subset_policy(self.report.empty_subset)
    }

    /// The input file, which must be given on the command line or in the config
    pub fn input_path(&self) -> Result<&Path> {
        match &self.input.path {
            Some(path) => Ok(path),
            None => bail!("No input file given (pass DATA or set [input] path in the config)"),
        }
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate(&config).with_context(|| format!("Invalid config file: {:?}", path))?;

    Ok(config)
}

fn validate(config: &AppConfig) -> Result<()> {
    if !config.input.delimiter.is_ascii() {
        bail!(
            "delimiter must be a single ASCII character, got {:?}",
            config.input.delimiter
        );
    }
    Ok(())
}
