// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The host collaborator: file dialogs and storage live on the other side
//! of this trait.

use crate::HostError;
use async_trait::async_trait;
use fcg_config_types::ConfigDocument;
use serde_json::Value as J;

/// Outcome of a validation request, displayed verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostValidation {
    pub valid: bool,
    pub error: Option<String>,
}

impl HostValidation {
    pub fn valid() -> Self {
        Self {
            valid: true,
            error: None,
        }
    }

    pub fn invalid(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
        }
    }
}

impl From<Result<(), fcg_schema::ValidationErrors>> for HostValidation {
    fn from(result: Result<(), fcg_schema::ValidationErrors>) -> Self {
        match result {
            Ok(()) => Self::valid(),
            Err(errors) => Self::invalid(errors.to_string()),
        }
    }
}

/// Import, export and validation as provided by the host.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConfigHost: Send + Sync {
    /// Let the user pick a document and return it undecoded.
    ///
    /// The result is untrusted; callers must run it through `parse`.
    async fn import_config(&self) -> Result<J, HostError>;

    /// Store an already-defaulted document. `Ok(false)` means the user
    /// cancelled.
    async fn export_config(&self, doc: &ConfigDocument) -> Result<bool, HostError>;

    /// Check a document. The default runs the local validator.
    async fn validate_config(&self, doc: &ConfigDocument) -> Result<HostValidation, HostError> {
        Ok(fcg_schema::validate(doc).into())
    }
}
