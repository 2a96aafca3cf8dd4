// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The document editor: one live document held as immutable snapshots.
//!
//! Every applied patch replaces the current snapshot with a new one. Readers
//! that took a snapshot earlier (a pending export, an in-flight validation)
//! keep seeing the version they took.

use crate::{EditorError, Patch};
use fcg_config_types::ConfigDocument;
use fcg_schema::ValidationErrors;
use std::sync::Arc;

/// Lifecycle of the live document.
///
/// ```text
/// Empty --start_new/load--> Loaded --apply--> Edited --apply--> Edited
///                             ^                  |
///                             +------load--------+
/// Loaded/Edited --mark_exported--> Exported --apply--> Edited
/// any --discard--> Empty
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorState {
    Empty,
    Loaded,
    Edited,
    Exported,
}

impl std::fmt::Display for EditorState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EditorState::Empty => write!(f, "empty"),
            EditorState::Loaded => write!(f, "loaded"),
            EditorState::Edited => write!(f, "edited"),
            EditorState::Exported => write!(f, "exported"),
        }
    }
}

/// Result of applying one patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchOutcome {
    /// A new snapshot replaced the current one
    Applied,
    /// The patch was a no-op or addressed a missing entry; nothing changed
    Skipped,
}

#[derive(Debug)]
pub struct DocumentEditor {
    state: EditorState,
    current: Option<Arc<ConfigDocument>>,
    revision: u64,
}

impl Default for DocumentEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentEditor {
    pub fn new() -> Self {
        Self {
            state: EditorState::Empty,
            current: None,
            revision: 0,
        }
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Number of snapshots produced since the document was loaded.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The current snapshot, if a document is loaded.
    pub fn snapshot(&self) -> Option<Arc<ConfigDocument>> {
        self.current.clone()
    }

    /// Start from the minimal document (`cameras: {}`).
    pub fn start_new(&mut self) {
        self.load(ConfigDocument::empty());
    }

    /// Adopt `doc` as the live document, replacing any previous one.
    pub fn load(&mut self, doc: ConfigDocument) {
        tracing::debug!(from = %self.state, cameras = doc.cameras.len(), "loading document");
        self.current = Some(Arc::new(doc));
        self.state = EditorState::Loaded;
        self.revision = 0;
    }

    /// Apply one patch to the live document.
    ///
    /// A patch that addresses a missing entry is skipped without error; the
    /// only failure is having no document at all.
    pub fn apply(&mut self, patch: Patch) -> Result<PatchOutcome, EditorError> {
        let current = self.current.as_ref().ok_or(EditorError::NoDocument)?;
        let description = patch.describe();

        match patch.apply_to(current) {
            Ok(Some(next)) => {
                self.current = Some(Arc::new(next));
                self.state = EditorState::Edited;
                self.revision += 1;
                tracing::debug!(patch = %description, revision = self.revision, "applied patch");
                Ok(PatchOutcome::Applied)
            }
            Ok(None) => {
                tracing::debug!(patch = %description, "patch had no effect");
                Ok(PatchOutcome::Skipped)
            }
            Err(e) => {
                tracing::debug!(patch = %description, error = %e, "patch precondition not met");
                Ok(PatchOutcome::Skipped)
            }
        }
    }

    /// Validate the current snapshot.
    pub fn validate(&self) -> Result<Result<(), ValidationErrors>, EditorError> {
        let current = self.current.as_ref().ok_or(EditorError::NoDocument)?;
        Ok(fcg_schema::validate(current))
    }

    /// Record that the current snapshot was exported.
    pub fn mark_exported(&mut self) -> Result<(), EditorError> {
        if self.current.is_none() {
            return Err(EditorError::NoDocument);
        }
        self.state = EditorState::Exported;
        Ok(())
    }

    /// Drop the live document.
    pub fn discard(&mut self) {
        tracing::debug!(from = %self.state, "discarding document");
        self.current = None;
        self.state = EditorState::Empty;
        self.revision = 0;
    }
}
