// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

pub mod commands;
pub mod host;
pub mod settings;

use clap::Subcommand;
use fcg_logging::CliLoggingArgs;
use std::path::PathBuf;

pub use clap::Parser;

#[derive(Parser)]
#[command(name = "fcg")]
#[command(about = "Validate, normalize and create NVR configuration documents")]
#[command(version, propagate_version = true)]
pub struct Cli {
    #[command(flatten)]
    pub logging: CliLoggingArgs,

    /// Settings file (default: <config dir>/frigate-config/settings.toml)
    #[arg(long, global = true, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Overlays applied to the raw document before it is parsed
#[derive(clap::Args, Debug, Clone, Default)]
pub struct OverlayArgs {
    /// Set a value by dotted path; the value is read as a YAML scalar
    #[arg(long = "set", value_name = "PATH=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// Deep-merge another document on top; arrays replace wholesale
    #[arg(long, value_name = "FILE")]
    pub overlay: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse and validate a document
    Validate {
        /// Document to check (.yml, .yaml, .json or .toml)
        file: PathBuf,

        #[command(flatten)]
        overlays: OverlayArgs,
    },
    /// Parse a document and write it back with defaults applied
    Normalize {
        /// Document to read
        input: PathBuf,

        /// Output path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format when the output has no known extension
        #[arg(long)]
        format: Option<fcg_schema::Format>,

        #[command(flatten)]
        overlays: OverlayArgs,
    },
    /// Create a new document with template cameras and streams
    New {
        /// Output path; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Add a camera from the template (repeatable)
        #[arg(long = "camera", value_name = "NAME")]
        cameras: Vec<String>,

        /// Add a go2rtc stream; NAME alone uses a placeholder URL (repeatable)
        #[arg(long = "stream", value_name = "NAME[=URL]")]
        streams: Vec<String>,

        /// Output format when the output has no known extension
        #[arg(long)]
        format: Option<fcg_schema::Format>,
    },
    /// Print the JSON Schema of the document
    Schema,
}

/// Parse `path=value`; the value may itself contain `=`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid PATH=VALUE: no '=' found in '{s}'"))?;
    if key.trim().is_empty() {
        return Err(format!("invalid PATH=VALUE: empty path in '{s}'"));
    }
    Ok((key.trim().to_string(), value.to_string()))
}

impl Cli {
    pub async fn run(self, settings: &settings::Settings) -> anyhow::Result<std::process::ExitCode> {
        match self.command {
            Commands::Validate { file, overlays } => commands::validate(file, overlays).await,
            Commands::Normalize {
                input,
                output,
                format,
                overlays,
            } => {
                let format = match format {
                    Some(f) => f,
                    None => settings.export_format()?,
                };
                commands::normalize(input, output, format, overlays).await
            }
            Commands::New {
                output,
                cameras,
                streams,
                format,
            } => {
                let format = match format {
                    Some(f) => f,
                    None => settings.export_format()?,
                };
                commands::new_document(output, cameras, streams, format).await
            }
            Commands::Schema => commands::schema(),
        }
    }
}
