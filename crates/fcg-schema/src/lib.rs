// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Validation, defaulting and parsing of NVR configuration documents.
//!
//! The contract surface is three pure functions over the typed model from
//! `fcg-config-types`:
//!
//! - [`validate`] collects every range and content violation as a
//!   [`FieldError`] with a dotted path.
//! - [`apply_defaults`] fills declared defaults and is idempotent.
//! - [`parse`] turns a generic structured value into a document: nulls are
//!   stripped, the shape is checked against the generated JSON Schema, the
//!   value is decoded, defaults are applied and the result is validated.
//!
//! All of them work on immutable inputs, so they can run on a snapshot while
//! an editor keeps producing new ones.

pub mod decode;
pub mod defaults;
pub mod error;
pub mod loader;
pub mod merge;
pub mod schema;
pub mod validate;

pub use defaults::apply_defaults;
pub use error::{FieldError, ParseError, ValidationErrors};
pub use loader::Format;
pub use schema::{check_structure, json_schema};
pub use validate::{validate, validate_camera};

use fcg_config_types::ConfigDocument;
use serde_json::Value as J;

/// Decode and validate a raw structured value into a defaulted document.
///
/// Numbers arriving as strings, unknown role literals and other shape errors
/// are rejected as [`ParseError::Structure`]; range violations come back as
/// [`ParseError::Invalid`].
pub fn parse(raw: &J) -> Result<ConfigDocument, ParseError> {
    let mut raw = raw.clone();
    merge::strip_nulls(&mut raw);

    schema::check_structure(&raw).map_err(ParseError::Structure)?;

    let doc = decode::decode(&raw)?;
    let doc = apply_defaults(&doc);
    validate(&doc)?;

    tracing::debug!(cameras = doc.cameras.len(), "parsed document");
    Ok(doc)
}

/// Parse document text in the given format.
pub fn parse_str(text: &str, format: Format) -> Result<ConfigDocument, ParseError> {
    let raw = loader::parse_text(text, format)?;
    parse(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_minimal_document() {
        let doc = parse(&json!({"cameras": {}})).unwrap();
        assert_eq!(doc, ConfigDocument::empty());
    }

    #[test]
    fn test_parse_treats_null_as_absent() {
        let doc = parse(&json!({"cameras": {}, "mqtt": null})).unwrap();
        assert!(doc.mqtt.is_none());
    }

    #[test]
    fn test_parse_rejects_string_numbers() {
        let err = parse(&json!({"cameras": {}, "mqtt": {"host": "h", "port": "1883"}})).unwrap_err();
        match err {
            ParseError::Structure(errors) => {
                assert!(errors.iter().any(|e| e.path == "mqtt.port"), "{errors:?}")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_reports_range_violations() {
        let err = parse(&json!({"cameras": {}, "mqtt": {"host": "h", "port": 0}})).unwrap_err();
        assert_eq!(
            err.field_errors(),
            vec![FieldError::new("mqtt.port", "must be between 1 and 65535 (got 0)")]
        );
    }

    #[test]
    fn test_parse_str_yaml() {
        let doc = parse_str(
            "cameras:\n  front:\n    ffmpeg:\n      inputs:\n        - path: rtsp://x\n          roles: [detect]\n",
            Format::Yaml,
        )
        .unwrap();
        assert!(doc.cameras.contains_key("front"));
    }
}
