// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Editor, host and session error types

use fcg_schema::ParseError;
use thiserror::Error;

/// A patch addressed something that does not exist.
///
/// The editor treats this as a contract violation by the caller: the patch
/// is skipped and the document is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreconditionError {
    #[error("no entry '{key}' in {mapping}")]
    MissingEntry { mapping: String, key: String },

    #[error("camera '{camera}' has no input {index} ({len} inputs)")]
    MissingInput {
        camera: String,
        index: usize,
        len: usize,
    },
}

/// Operations that are not legal in the editor's current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("no document is loaded")]
    NoDocument,
}

/// Failures reported by the host collaborator.
#[derive(Debug, Error)]
pub enum HostError {
    /// The user closed the dialog
    #[error("operation cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Why an import, export or validate request did not complete.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Host(HostError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<HostError> for SessionError {
    fn from(e: HostError) -> Self {
        match e {
            HostError::Cancelled => SessionError::Cancelled,
            other => SessionError::Host(other),
        }
    }
}
