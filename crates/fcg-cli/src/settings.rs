// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Settings of the tool itself (not of the document being edited).
//!
//! Layers, lowest first: `settings.toml` in the platform config directory
//! (or `--settings`), then `FCG_*` environment variables. Command-line flags
//! are applied on top by the caller.

use anyhow::{Context, Result};
use fcg_logging::CliLogLevel;
use fcg_schema::Format;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Format used when an output path has no recognised extension
    pub export_format: Option<String>,
    /// Log level used when `--log-level` is not given
    pub log_level: Option<CliLogLevel>,
}

impl Settings {
    /// `<config dir>/frigate-config/settings.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("frigate-config").join("settings.toml"))
    }

    /// Load settings from `file` (or the default path) and the environment.
    /// A missing file is not an error.
    pub fn load(file: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = file.map(Path::to_path_buf).or_else(Self::default_path) {
            builder = builder.add_source(
                config::File::from(path)
                    .format(config::FileFormat::Toml)
                    .required(false),
            );
        }
        let built = builder
            .add_source(config::Environment::with_prefix("FCG"))
            .build()
            .context("loading fcg settings")?;

        let settings: Settings = built
            .try_deserialize()
            .context("decoding fcg settings")?;
        tracing::debug!(?settings, "loaded settings");
        Ok(settings)
    }

    pub fn export_format(&self) -> Result<Format> {
        match &self.export_format {
            Some(s) => s.parse::<Format>().map_err(anyhow::Error::msg),
            None => Ok(Format::default()),
        }
    }

    pub fn log_level(&self) -> CliLogLevel {
        self.log_level.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "export_format = \"json\"\nlog_level = \"debug\"\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.export_format().unwrap(), Format::Json);
        assert_eq!(settings.log_level(), CliLogLevel::Debug);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let settings = Settings::load(Some(&dir.path().join("absent.toml"))).unwrap();
        assert_eq!(settings.export_format().unwrap(), Format::Yaml);
        assert_eq!(settings.log_level(), CliLogLevel::Warn);
    }

    #[test]
    fn test_invalid_export_format() {
        let settings = Settings {
            export_format: Some("ini".into()),
            log_level: None,
        };
        assert!(settings.export_format().is_err());
    }
}
