// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed decoding of a raw JSON value into a document

use crate::ParseError;
use fcg_config_types::ConfigDocument;
use serde_json::Value as J;
use serde_path_to_error::Segment;

/// Decode a raw value into a [`ConfigDocument`], reporting the failing path.
///
/// Keys the model does not know are dropped and logged at debug level.
pub fn decode(raw: &J) -> Result<ConfigDocument, ParseError> {
    let doc: ConfigDocument =
        serde_path_to_error::deserialize(raw.clone()).map_err(|e| ParseError::Decode {
            path: dotted_path(e.path()),
            message: e.inner().to_string(),
        })?;

    if tracing::enabled!(tracing::Level::DEBUG) {
        if let Ok(decoded) = serde_json::to_value(&doc) {
            let mut dropped = Vec::new();
            dropped_keys(raw, &decoded, "", &mut dropped);
            if !dropped.is_empty() {
                tracing::debug!(?dropped, "ignored keys not described by the document model");
            }
        }
    }

    Ok(doc)
}

fn dotted_path(path: &serde_path_to_error::Path) -> String {
    path.iter()
        .map(|segment| match segment {
            Segment::Seq { index } => index.to_string(),
            Segment::Map { key } => key.clone(),
            Segment::Enum { variant } => variant.clone(),
            Segment::Unknown => "?".to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// Collect dotted paths of object keys present in `raw` but missing from `decoded`.
fn dropped_keys(raw: &J, decoded: &J, prefix: &str, out: &mut Vec<String>) {
    let (J::Object(raw_map), J::Object(decoded_map)) = (raw, decoded) else {
        return;
    };
    for (k, v) in raw_map {
        let pfx = if prefix.is_empty() {
            k.clone()
        } else {
            format!("{}.{}", prefix, k)
        };
        match decoded_map.get(k) {
            Some(d) => dropped_keys(v, d, &pfx, out),
            // Empty and null values are skipped on output; they are not lost.
            None if is_blank(v) => {}
            None => out.push(pfx),
        }
    }
}

fn is_blank(v: &J) -> bool {
    match v {
        J::Null => true,
        J::Object(m) => m.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_reports_path() {
        let raw = json!({
            "cameras": {
                "front": {
                    "ffmpeg": {"inputs": [{"path": "rtsp://x", "roles": ["detect"]}]},
                    "record": {"retain": {"mode": "sometimes"}}
                }
            }
        });
        match decode(&raw).unwrap_err() {
            ParseError::Decode { path, .. } => {
                assert_eq!(path, "cameras.front.record.retain.mode")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_decode_ignores_unknown_keys() {
        let raw = json!({"cameras": {}, "birdseye": {"enabled": true}});
        let doc = decode(&raw).unwrap();
        assert!(doc.cameras.is_empty());

        let mut dropped = Vec::new();
        dropped_keys(&raw, &serde_json::to_value(&doc).unwrap(), "", &mut dropped);
        assert_eq!(dropped, vec!["birdseye".to_string()]);
    }
}
