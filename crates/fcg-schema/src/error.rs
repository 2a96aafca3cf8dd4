// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Error types reported by parsing and validation

use crate::loader::Format;
use thiserror::Error;

/// One schema violation: a dotted path into the document and a reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Dotted path, e.g. `cameras.front.snapshots.quality`; sequence
    /// elements use their index as a segment (`ffmpeg.inputs.0.roles`).
    pub path: String,
    pub reason: String,
}

impl FieldError {
    pub fn new(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.path.is_empty() {
            write!(f, "<root>: {}", self.reason)
        } else {
            write!(f, "{}: {}", self.path, self.reason)
        }
    }
}

/// Every violation found by one validation pass, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", render_list(.0))]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    pub fn paths(&self) -> Vec<&str> {
        self.0.iter().map(|e| e.path.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Why raw input could not become a document.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The text is not well-formed in its declared format
    #[error("cannot read {format} document: {message}")]
    Syntax { format: Format, message: String },

    /// The structured value does not have the document's shape
    #[error("document structure is invalid: {}", render_list(.0))]
    Structure(Vec<FieldError>),

    /// Typed decoding failed after the structural pre-check passed
    #[error("cannot decode document at '{path}': {message}")]
    Decode { path: String, message: String },

    /// The document decoded but violates range or content constraints
    #[error("document is invalid: {0}")]
    Invalid(#[from] ValidationErrors),
}

impl ParseError {
    /// Path-level detail for the structural and validation variants.
    pub fn field_errors(&self) -> Vec<FieldError> {
        match self {
            ParseError::Syntax { .. } => Vec::new(),
            ParseError::Structure(errors) => errors.clone(),
            ParseError::Decode { path, message } => vec![FieldError::new(path.clone(), message.clone())],
            ParseError::Invalid(errors) => errors.0.clone(),
        }
    }
}

fn render_list(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_error_display() {
        let err = FieldError::new("cameras.front.snapshots.quality", "must be between 1 and 100");
        assert_eq!(
            err.to_string(),
            "cameras.front.snapshots.quality: must be between 1 and 100"
        );
        assert_eq!(FieldError::new("", "bad").to_string(), "<root>: bad");
    }

    #[test]
    fn test_validation_errors_display_joins_all() {
        let errors = ValidationErrors(vec![
            FieldError::new("a", "x"),
            FieldError::new("b.c", "y"),
        ]);
        assert_eq!(errors.to_string(), "a: x; b.c: y");
        assert_eq!(errors.paths(), vec!["a", "b.c"]);
    }
}
