// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! JSON merging and dotted-path overlays applied to raw documents

use serde_json::Value as J;

/// Merge two JSON values with deep object merging and array replacement
///
/// Objects are merged recursively, scalars/arrays replace the left value.
pub fn merge_two_json(base: &mut J, layer: J) {
    match (base, layer) {
        (J::Object(a), J::Object(b)) => {
            for (k, v) in b {
                merge_two_json(a.entry(k).or_insert(J::Null), v);
            }
        }
        // Policy: arrays are replaced wholesale
        (a @ J::Array(_), J::Array(b)) => *a = J::Array(b),
        (_, J::Null) => { /* keep left if right is null */ }
        (a, b) => *a = b,
    }
}

/// Insert a value at a dotted path, creating intermediate objects as needed.
///
/// A non-object found on the way is replaced by an object.
pub fn insert_dotted(root: &mut J, dotted: &str, v: J) {
    let parts: Vec<&str> = dotted.split('.').filter(|p| !p.is_empty()).collect();
    let Some((last, parents)) = parts.split_last() else {
        *root = v;
        return;
    };

    let mut cur = root;
    for p in parents {
        if !cur.is_object() {
            *cur = J::Object(Default::default());
        }
        cur = match cur {
            J::Object(map) => map
                .entry(p.to_string())
                .or_insert_with(|| J::Object(Default::default())),
            _ => return,
        };
    }

    if let J::Object(map) = cur {
        map.insert((*last).to_string(), v);
    } else {
        *cur = serde_json::json!({ *last: v });
    }
}

/// Remove object entries whose value is `null`, recursively.
///
/// An explicit null and an absent key mean the same thing in a document.
pub fn strip_nulls(v: &mut J) {
    match v {
        J::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        J::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

/// Interpret override text as a YAML scalar so that `80` becomes a number
/// and `true` a boolean; anything unparseable stays a string, and so do
/// `.nan` and `.inf`, which have no JSON number form.
pub fn parse_scalar(text: &str) -> J {
    match serde_yaml::from_str::<serde_yaml::Value>(text) {
        Ok(serde_yaml::Value::Number(n)) if n.is_nan() || n.is_infinite() => {
            J::String(text.to_string())
        }
        Ok(value) => {
            serde_yaml::from_value::<J>(value).unwrap_or_else(|_| J::String(text.to_string()))
        }
        Err(_) => J::String(text.to_string()),
    }
}

/// Create a JSON overlay from `path=value` pairs.
pub fn flags_overlay(kv_pairs: &[(&str, &str)]) -> J {
    let mut root = serde_json::json!({});
    for (k, v) in kv_pairs {
        insert_dotted(&mut root, k, parse_scalar(v));
    }
    root
}
