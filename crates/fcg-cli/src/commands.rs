// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

#![allow(clippy::disallowed_methods)] // CLI commands intentionally print to stdout/stderr

use crate::host::FileHost;
use crate::OverlayArgs;
use anyhow::Result;
use fcg_editor::{Notification, Patch, Session, Severity};
use fcg_schema::Format;
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::sync::mpsc::UnboundedReceiver;

/// Connection string given to streams added without one
pub const PLACEHOLDER_STREAM_URL: &str = "rtsp://...#video=copy";

/// Print every pending notification to stderr, so stdout carries only
/// documents.
fn report(rx: &mut UnboundedReceiver<Notification>) {
    while let Ok(note) = rx.try_recv() {
        match note.severity {
            Severity::Success => eprintln!("{}", note.message),
            Severity::Error => eprintln!("error: {}", note.message),
        }
    }
}

fn exit_code<T, E>(result: &std::result::Result<T, E>) -> ExitCode {
    if result.is_ok() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

pub async fn validate(file: PathBuf, overlays: OverlayArgs) -> Result<ExitCode> {
    let host = FileHost::new(Some(file), None, Format::default()).with_overlays(overlays);
    let (mut session, mut rx) = Session::new(host);

    let imported = session.import().await;
    report(&mut rx);
    if imported.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    let result = session.validate().await;
    report(&mut rx);
    Ok(match result {
        Ok(validation) if validation.valid => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    })
}

pub async fn normalize(
    input: PathBuf,
    output: Option<PathBuf>,
    format: Format,
    overlays: OverlayArgs,
) -> Result<ExitCode> {
    let host = FileHost::new(Some(input), output, format).with_overlays(overlays);
    let (mut session, mut rx) = Session::new(host);

    let imported = session.import().await;
    report(&mut rx);
    if imported.is_err() {
        return Ok(ExitCode::FAILURE);
    }

    let exported = session.export().await;
    report(&mut rx);
    Ok(exit_code(&exported))
}

/// Split `NAME[=URL]`, falling back to the placeholder URL.
fn stream_spec(spec: &str) -> (String, String) {
    match spec.split_once('=') {
        Some((name, url)) => (name.trim().to_string(), url.to_string()),
        None => (spec.trim().to_string(), PLACEHOLDER_STREAM_URL.to_string()),
    }
}

/// The patch a `new` invocation applies to an empty document.
pub fn new_document_patch(cameras: &[String], streams: &[String]) -> Patch {
    let mut patches: Vec<Patch> = cameras.iter().map(|name| Patch::add_camera(name.as_str())).collect();
    patches.extend(streams.iter().map(|spec| {
        let (name, url) = stream_spec(spec);
        Patch::UpsertStream { name, url }
    }));
    Patch::Batch(patches)
}

pub async fn new_document(
    output: Option<PathBuf>,
    cameras: Vec<String>,
    streams: Vec<String>,
    format: Format,
) -> Result<ExitCode> {
    let host = FileHost::new(None, output, format);
    let (mut session, mut rx) = Session::new(host);

    session.start_new();
    let outcome = session.apply(new_document_patch(&cameras, &streams))?;
    tracing::info!(?outcome, cameras = cameras.len(), streams = streams.len(), "created document");

    let exported = session.export().await;
    report(&mut rx);
    Ok(exit_code(&exported))
}

pub fn schema() -> Result<ExitCode> {
    println!("{}", serde_json::to_string_pretty(fcg_schema::json_schema())?);
    Ok(ExitCode::SUCCESS)
}
