// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The three mapping operations, as pure functions from one snapshot to the
//! next.
//!
//! Each function returns `Ok(Some(next))` when the document changed and
//! `Ok(None)` when the operation was a no-op. The input snapshot is never
//! modified; work happens on a clone whose untouched entries stay shared.

use crate::{EntryField, Mapping, PreconditionError};
use fcg_config_types::ConfigDocument;

/// Insert `value` at `key`, wholly replacing any previous entry.
pub fn upsert_entry<M: Mapping>(
    doc: &ConfigDocument,
    mapping: &M,
    key: &str,
    value: M::Entry,
) -> Result<Option<ConfigDocument>, PreconditionError> {
    let mut next = doc.clone();
    let replaced = mapping.entries_mut(&mut next)?.insert(key, value);
    tracing::debug!(mapping = %mapping.describe(), key, replaced, "upserted entry");
    Ok(Some(next))
}

/// Remove the entry at `key`. Removing an absent key is a no-op.
pub fn remove_entry<M: Mapping>(
    doc: &ConfigDocument,
    mapping: &M,
    key: &str,
) -> Result<Option<ConfigDocument>, PreconditionError> {
    let present = mapping
        .entries(doc)
        .is_some_and(|entries| entries.contains_key(key));
    if !present {
        tracing::debug!(mapping = %mapping.describe(), key, "remove of absent entry ignored");
        return Ok(None);
    }

    let mut next = doc.clone();
    mapping.entries_mut(&mut next)?.remove(key);
    tracing::debug!(mapping = %mapping.describe(), key, "removed entry");
    Ok(Some(next))
}

/// Write one field of the existing entry at `key`, preserving its siblings.
pub fn set_field<M, F>(
    doc: &ConfigDocument,
    mapping: &M,
    key: &str,
    field: F,
) -> Result<Option<ConfigDocument>, PreconditionError>
where
    M: Mapping,
    F: EntryField<M::Entry>,
{
    let missing = || PreconditionError::MissingEntry {
        mapping: mapping.describe(),
        key: key.to_string(),
    };
    if !mapping
        .entries(doc)
        .is_some_and(|entries| entries.contains_key(key))
    {
        return Err(missing());
    }

    let path = field.path();
    let mut next = doc.clone();
    let entry = mapping.entries_mut(&mut next)?.get_mut(key).ok_or_else(missing)?;
    field.apply(key, entry)?;
    tracing::debug!(mapping = %mapping.describe(), key, field = %path, "set field");
    Ok(Some(next))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CameraField, Cameras, Detectors, Streams, ZoneField, Zones};
    use fcg_config_types::{
        CameraEntry, DetectorEntry, EventsConfig, InputRole, RecordConfig, Zone,
    };
    use std::sync::Arc;

    fn two_cameras() -> ConfigDocument {
        let mut doc = ConfigDocument::empty();
        doc.cameras
            .insert("front", CameraEntry::with_input("rtsp://a", [InputRole::Detect]));
        doc.cameras
            .insert("back", CameraEntry::with_input("rtsp://b", [InputRole::Record]));
        doc
    }

    #[test]
    fn test_upsert_replaces_whole_entry() {
        let mut a = CameraEntry::with_input("rtsp://a", [InputRole::Detect]);
        a.record = Some(RecordConfig {
            enabled: Some(true),
            ..Default::default()
        });
        let b = CameraEntry::with_input("rtsp://b", [InputRole::Record]);

        let doc = ConfigDocument::empty();
        let doc = upsert_entry(&doc, &Cameras, "front", a).unwrap().unwrap();
        let doc = upsert_entry(&doc, &Cameras, "front", b.clone()).unwrap().unwrap();

        assert_eq!(doc.cameras.get("front"), Some(&b));
        assert!(doc.cameras.get("front").unwrap().record.is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut doc = ConfigDocument::empty();
        doc.detectors.insert("cpu1", DetectorEntry::new("cpu"));
        doc.detectors.insert("coral", DetectorEntry::new("edgetpu"));

        let once = remove_entry(&doc, &Detectors, "cpu1").unwrap().unwrap();
        assert!(remove_entry(&once, &Detectors, "cpu1").unwrap().is_none());
        assert_eq!(once.detectors.keys().collect::<Vec<_>>(), vec!["coral"]);
        assert_eq!(doc.detectors.len(), 2);
    }

    #[test]
    fn test_remove_stream_without_go2rtc_keeps_section_absent() {
        let doc = ConfigDocument::empty();
        assert!(remove_entry(&doc, &Streams, "front").unwrap().is_none());
        assert!(doc.go2rtc.is_none());
    }

    #[test]
    fn test_upsert_stream_creates_go2rtc() {
        let doc = ConfigDocument::empty();
        let next = upsert_entry(&doc, &Streams, "front", "rtsp://a#video=copy".to_string())
            .unwrap()
            .unwrap();
        assert_eq!(
            next.go2rtc.unwrap().streams.get("front").map(String::as_str),
            Some("rtsp://a#video=copy")
        );
    }

    #[test]
    fn test_set_field_preserves_siblings_and_sharing() {
        let mut doc = two_cameras();
        doc.cameras.get_mut("front").unwrap().record = Some(RecordConfig {
            enabled: Some(true),
            retain: None,
            events: Some(EventsConfig {
                pre_capture: Some(5),
                post_capture: Some(5),
                ..Default::default()
            }),
        });

        let next = set_field(&doc, &Cameras, "front", CameraField::RetainDays(Some(10)))
            .unwrap()
            .unwrap();

        let before = doc.cameras.get("front").unwrap().record.as_ref().unwrap();
        let after = next.cameras.get("front").unwrap().record.as_ref().unwrap();
        assert_eq!(after.events, before.events);
        assert_eq!(after.retain.as_ref().unwrap().days, Some(10));
        assert!(before.retain.is_none());
        assert!(Arc::ptr_eq(
            doc.cameras.get_shared("back").unwrap(),
            next.cameras.get_shared("back").unwrap()
        ));
    }

    #[test]
    fn test_set_field_on_missing_entry_fails() {
        let doc = two_cameras();
        let err = set_field(&doc, &Cameras, "side", CameraField::SnapshotsEnabled(true)).unwrap_err();
        assert_eq!(
            err,
            PreconditionError::MissingEntry {
                mapping: "cameras".into(),
                key: "side".into()
            }
        );
    }

    #[test]
    fn test_zone_operations_require_camera() {
        let doc = two_cameras();
        let err = upsert_entry(&doc, &Zones::of("side"), "yard", Zone::new("0,0,1,1")).unwrap_err();
        assert!(matches!(err, PreconditionError::MissingEntry { ref key, .. } if key == "side"));

        let next = upsert_entry(&doc, &Zones::of("front"), "yard", Zone::new("0,0,1,1"))
            .unwrap()
            .unwrap();
        let next = set_field(&next, &Zones::of("front"), "yard", ZoneField::Inertia(Some(3)))
            .unwrap()
            .unwrap();
        let zone = next.cameras.get("front").unwrap().zones.get("yard").unwrap();
        assert_eq!(zone.coordinates, "0,0,1,1");
        assert_eq!(zone.inertia, Some(3));
    }
}
