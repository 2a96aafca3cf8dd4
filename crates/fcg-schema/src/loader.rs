// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Reading and writing document text in YAML, JSON or TOML.
//!
//! Every format is normalised to a `serde_json::Value` before decoding, so
//! structural checks, overlays and decoding all work on one representation.

use crate::{FieldError, ParseError};
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value as J;
use std::path::Path;

/// Textual formats a document may be stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    #[default]
    Yaml,
    Json,
    Toml,
}

impl Format {
    /// Pick the format from a file extension (`.yml`, `.yaml`, `.json`, `.toml`).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "yml" | "yaml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            "toml" => Some(Format::Toml),
            _ => None,
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Yaml => write!(f, "yaml"),
            Format::Json => write!(f, "json"),
            Format::Toml => write!(f, "toml"),
        }
    }
}

impl std::str::FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(Format::Yaml),
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            _ => Err(format!("Invalid document format: {}. Use 'yaml', 'json' or 'toml'", s)),
        }
    }
}

/// Parse document text into a generic JSON value.
///
/// NaN and infinite floats (YAML `.nan`, TOML `inf`) have no JSON form and
/// are rejected as [`ParseError::Structure`] before conversion.
pub fn parse_text(text: &str, format: Format) -> Result<J, ParseError> {
    let syntax = |message: String| ParseError::Syntax { format, message };
    let mut non_finite = Vec::new();
    let json = match format {
        Format::Yaml => {
            let yaml: serde_yaml::Value =
                serde_yaml::from_str(text).map_err(|e| syntax(e.to_string()))?;
            find_non_finite_yaml(&yaml, &mut Vec::new(), &mut non_finite);
            serde_yaml::from_value::<J>(yaml).map_err(|e| syntax(e.to_string()))?
        }
        Format::Json => serde_json::from_str::<J>(text).map_err(|e| syntax(e.to_string()))?,
        Format::Toml => {
            let toml: toml::Value = text.parse::<toml::Value>().map_err(|e| syntax(e.to_string()))?;
            find_non_finite_toml(&toml, &mut Vec::new(), &mut non_finite);
            // toml::Value implements Serialize; convert via serde_json.
            serde_json::to_value(toml).map_err(|e| syntax(e.to_string()))?
        }
    };
    if non_finite.is_empty() {
        Ok(json)
    } else {
        Err(ParseError::Structure(non_finite))
    }
}

fn non_finite_error(path: &[String]) -> FieldError {
    FieldError::new(path.join("."), "must be a finite number")
}

fn find_non_finite_yaml(
    value: &serde_yaml::Value,
    path: &mut Vec<String>,
    found: &mut Vec<FieldError>,
) {
    use serde_yaml::Value as Y;
    match value {
        Y::Number(n) if n.is_nan() || n.is_infinite() => found.push(non_finite_error(path)),
        Y::Sequence(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(i.to_string());
                find_non_finite_yaml(item, path, found);
                path.pop();
            }
        }
        Y::Mapping(map) => {
            for (key, item) in map {
                path.push(match key {
                    Y::String(s) => s.clone(),
                    Y::Number(n) => n.to_string(),
                    Y::Bool(b) => b.to_string(),
                    _ => "~".to_string(),
                });
                find_non_finite_yaml(item, path, found);
                path.pop();
            }
        }
        Y::Tagged(tagged) => find_non_finite_yaml(&tagged.value, path, found),
        _ => {}
    }
}

fn find_non_finite_toml(
    value: &toml::Value,
    path: &mut Vec<String>,
    found: &mut Vec<FieldError>,
) {
    match value {
        toml::Value::Float(f) if !f.is_finite() => found.push(non_finite_error(path)),
        toml::Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push(i.to_string());
                find_non_finite_toml(item, path, found);
                path.pop();
            }
        }
        toml::Value::Table(table) => {
            for (key, item) in table {
                path.push(key.clone());
                find_non_finite_toml(item, path, found);
                path.pop();
            }
        }
        _ => {}
    }
}

/// Render any serializable value (normally a document) in the given format.
pub fn to_text<T: Serialize>(value: &T, format: Format) -> Result<String> {
    let text = match format {
        Format::Yaml => serde_yaml::to_string(value)?,
        Format::Json => serde_json::to_string_pretty(value)?,
        Format::Toml => toml::to_string_pretty(value)?,
    };
    Ok(text)
}

/// Read a document file into a generic JSON value, picking the format from
/// the extension and falling back to YAML.
pub fn read_document_file(path: &Path) -> Result<J> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading config file {:?}", path))?;
    let format = Format::from_path(path).unwrap_or_default();
    let json = parse_text(&content, format).with_context(|| format!("parsing {:?}", path))?;
    tracing::debug!(path = %path.display(), %format, "read document file");
    Ok(json)
}

/// Write a value to `path` in the format implied by its extension.
pub fn write_document_file<T: Serialize>(path: &Path, value: &T, fallback: Format) -> Result<()> {
    let format = Format::from_path(path).unwrap_or(fallback);
    let text = to_text(value, format)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {:?}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("writing config file {:?}", path))?;
    tracing::debug!(path = %path.display(), %format, "wrote document file");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(&PathBuf::from("config.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(&PathBuf::from("a/b.JSON")), Some(Format::Json));
        assert_eq!(Format::from_path(&PathBuf::from("c.toml")), Some(Format::Toml));
        assert_eq!(Format::from_path(&PathBuf::from("noext")), None);
    }

    #[test]
    fn test_toml_parsing() {
        let toml = r#"
            [mqtt]
            host = "broker"
            port = 1883
        "#;

        let json = parse_text(toml, Format::Toml).unwrap();
        assert_eq!(json["mqtt"]["host"], "broker");
        assert_eq!(json["mqtt"]["port"], 1883);
    }

    #[test]
    fn test_yaml_syntax_error() {
        let err = parse_text("cameras: [unclosed", Format::Yaml).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { format: Format::Yaml, .. }));
    }

    #[test]
    fn test_non_finite_floats_are_rejected() {
        let yaml = "audio:\n  enabled: true\n  threshold: -.inf\nlevels: [1.5, .nan]\n";
        match parse_text(yaml, Format::Yaml).unwrap_err() {
            ParseError::Structure(errors) => {
                let paths: Vec<_> = errors.iter().map(|e| e.path.as_str()).collect();
                assert_eq!(paths, vec!["audio.threshold", "levels.1"]);
            }
            other => panic!("unexpected error: {other}"),
        }

        let toml = "[audio]\nenabled = true\nduration = inf\n";
        match parse_text(toml, Format::Toml).unwrap_err() {
            ParseError::Structure(errors) => {
                assert_eq!(errors.len(), 1);
                assert_eq!(errors[0].path, "audio.duration");
            }
            other => panic!("unexpected error: {other}"),
        }

        let finite = parse_text("audio:\n  threshold: -12.5\n", Format::Yaml).unwrap();
        assert_eq!(finite["audio"]["threshold"], -12.5);
    }

    #[test]
    fn test_write_and_read_back() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("nested").join("out.json");
        let value = serde_json::json!({"cameras": {}});

        write_document_file(&path, &value, Format::Yaml).unwrap();
        let read = read_document_file(&path).unwrap();
        assert_eq!(read, value);
    }
}
