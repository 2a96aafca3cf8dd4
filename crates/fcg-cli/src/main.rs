// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use anyhow::Result;
use fcg_cli::settings::Settings;
use fcg_cli::{Cli, Parser};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    // Flags win over settings file and FCG_* environment
    let settings = Settings::load(cli.settings.as_deref())?;
    cli.logging.clone().init("fcg-cli", settings.log_level())?;

    cli.run(&settings).await
}
