// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! JSON Schema for the whole document.
//!
//! The schema is generated from the typed model in `fcg-config-types`, so it
//! describes shape only (types, required fields, closed enumerations). It is
//! used as a structural pre-check that reports every shape violation at once,
//! before typed decoding stops at the first one.

use crate::FieldError;
use fcg_config_types::ConfigDocument;
use schemars::gen::SchemaSettings;
use serde_json::Value as J;
use std::sync::OnceLock;

/// The generated JSON Schema as a JSON value.
pub fn json_schema() -> &'static J {
    static SCHEMA: OnceLock<J> = OnceLock::new();
    SCHEMA.get_or_init(|| {
        // Absent and null are the same thing for optional sections, so
        // optional fields are not made nullable; nulls are stripped first.
        let rs = SchemaSettings::draft07()
            .with(|s| s.option_add_null_type = false)
            .into_generator()
            .into_root_schema_for::<ConfigDocument>();
        serde_json::to_value(rs).unwrap_or(J::Null)
    })
}

/// Check a raw value against the document schema, collecting every violation.
pub fn check_structure(v: &J) -> Result<(), Vec<FieldError>> {
    use jsonschema::{Draft, JSONSchema};

    static VALIDATOR: OnceLock<Option<JSONSchema>> = OnceLock::new();
    let validator = VALIDATOR.get_or_init(|| {
        JSONSchema::options()
            .with_draft(Draft::Draft202012)
            .compile(json_schema())
            .map_err(|e| tracing::error!("document schema failed to compile: {}", e))
            .ok()
    });

    // Without a compiled schema, typed decoding remains the structural gate.
    let Some(validator) = validator else {
        return Ok(());
    };

    if let Err(errors) = validator.validate(v) {
        let errors = errors
            .map(|e| FieldError::new(pointer_to_dotted(&e.instance_path.to_string()), e.to_string()))
            .collect::<Vec<_>>();
        return Err(errors);
    }

    Ok(())
}

/// Convert a JSON pointer (`/cameras/front/ffmpeg`) into a dotted path.
pub(crate) fn pointer_to_dotted(pointer: &str) -> String {
    pointer
        .split('/')
        .filter(|s| !s.is_empty())
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect::<Vec<_>>()
        .join(".")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_pointer_to_dotted() {
        assert_eq!(pointer_to_dotted(""), "");
        assert_eq!(
            pointer_to_dotted("/cameras/front/ffmpeg/inputs/0/roles"),
            "cameras.front.ffmpeg.inputs.0.roles"
        );
        assert_eq!(pointer_to_dotted("/go2rtc/streams/a~1b"), "go2rtc.streams.a/b");
    }

    #[test]
    fn test_schema_lists_document_sections() {
        let schema = json_schema();
        let props = schema["properties"].as_object().unwrap();
        for key in ["mqtt", "cameras", "audio", "detectors", "go2rtc", "network"] {
            assert!(props.contains_key(key), "missing {key}");
        }
        assert_eq!(schema["required"], json!(["cameras"]));
    }

    #[test]
    fn test_well_formed_document_passes() {
        let doc = json!({
            "cameras": {
                "front": {"ffmpeg": {"inputs": [{"path": "rtsp://x", "roles": ["detect"]}]}}
            }
        });
        assert!(check_structure(&doc).is_ok());
    }

    #[test]
    fn test_collects_every_structural_violation() {
        let doc = json!({
            "mqtt": {"host": "broker", "port": "1883"},
            "cameras": {
                "front": {"ffmpeg": {"inputs": [{"path": "rtsp://x", "roles": ["detect", "clips"]}]}}
            }
        });
        let errors = check_structure(&doc).unwrap_err();
        let paths: Vec<&str> = errors.iter().map(|e| e.path.as_str()).collect();
        assert!(paths.contains(&"mqtt.port"), "{paths:?}");
        assert!(paths.contains(&"cameras.front.ffmpeg.inputs.0.roles.1"), "{paths:?}");
    }

    #[test]
    fn test_repeated_roles_are_not_structural() {
        let schema = serde_json::to_string(json_schema()).unwrap();
        assert!(!schema.contains("uniqueItems"));

        let doc = json!({
            "cameras": {
                "front": {"ffmpeg": {"inputs": [{"path": "rtsp://x", "roles": ["detect", "detect"]}]}}
            }
        });
        assert!(check_structure(&doc).is_ok());
    }

    #[test]
    fn test_out_of_range_value_is_not_structural() {
        let doc = json!({
            "cameras": {
                "front": {
                    "ffmpeg": {"inputs": [{"path": "rtsp://x", "roles": ["detect"]}]},
                    "snapshots": {"enabled": true, "quality": 150}
                }
            }
        });
        assert!(check_structure(&doc).is_ok());
    }
}
