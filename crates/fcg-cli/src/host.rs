// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

#![allow(clippy::disallowed_methods)] // Export without an output path prints to stdout

//! File-backed host: import reads a document from disk with overlays,
//! export writes it to a path or stdout.

use crate::OverlayArgs;
use async_trait::async_trait;
use fcg_config_types::ConfigDocument;
use fcg_editor::{ConfigHost, HostError};
use fcg_logging::redact;
use fcg_schema::loader::{read_document_file, to_text, write_document_file};
use fcg_schema::merge::{flags_overlay, merge_two_json};
use fcg_schema::Format;
use serde_json::Value as J;
use std::path::PathBuf;

pub struct FileHost {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    overlays: OverlayArgs,
    format: Format,
}

impl FileHost {
    pub fn new(input: Option<PathBuf>, output: Option<PathBuf>, format: Format) -> Self {
        Self {
            input,
            output,
            overlays: OverlayArgs::default(),
            format,
        }
    }

    pub fn with_overlays(mut self, overlays: OverlayArgs) -> Self {
        self.overlays = overlays;
        self
    }

    /// Read the input and apply the overlay file, then the `--set` pairs.
    pub fn load_raw(&self) -> anyhow::Result<J> {
        let Some(input) = &self.input else {
            anyhow::bail!("no input document given");
        };
        let mut raw = read_document_file(input)?;

        if let Some(path) = &self.overlays.overlay {
            let layer = read_document_file(path)?;
            tracing::debug!(overlay = %path.display(), "merging overlay document");
            merge_two_json(&mut raw, layer);
        }

        if !self.overlays.set.is_empty() {
            let pairs: Vec<(&str, &str)> = self
                .overlays
                .set
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            tracing::debug!(count = pairs.len(), "applying --set overrides");
            merge_two_json(&mut raw, flags_overlay(&pairs));
        }

        if let Some(password) = raw.pointer("/mqtt/password").and_then(J::as_str) {
            tracing::debug!(password = %redact(password), "mqtt credentials present");
        }
        Ok(raw)
    }
}

#[async_trait]
impl ConfigHost for FileHost {
    async fn import_config(&self) -> Result<J, HostError> {
        self.load_raw().map_err(|e| HostError::Rejected(format!("{e:#}")))
    }

    async fn export_config(&self, doc: &ConfigDocument) -> Result<bool, HostError> {
        match &self.output {
            Some(path) => write_document_file(path, doc, self.format)
                .map_err(|e| HostError::Rejected(format!("{e:#}")))?,
            None => {
                let text =
                    to_text(doc, self.format).map_err(|e| HostError::Rejected(format!("{e:#}")))?;
                print!("{text}");
            }
        }
        Ok(true)
    }
}
