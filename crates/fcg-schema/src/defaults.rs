// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Filling declared defaults into a document.
//!
//! Defaults are filled inside sections that are present; absent optional
//! sections stay absent. A camera that already carries every default is not
//! touched, so it remains shared with the input document.

use fcg_config_types::{CameraEntry, ConfigDocument, EventsConfig, RecordConfig, RetainConfig};

/// Return `doc` with every absent optional-with-default field filled in.
pub fn apply_defaults(doc: &ConfigDocument) -> ConfigDocument {
    let mut out = doc.clone();
    let pending: Vec<String> = out
        .cameras
        .iter()
        .filter(|(_, camera)| needs_defaults(camera))
        .map(|(name, _)| name.to_string())
        .collect();

    for name in pending {
        if let Some(camera) = out.cameras.get_mut(&name) {
            fill_camera(camera);
        }
    }
    out
}

fn needs_defaults(camera: &CameraEntry) -> bool {
    let Some(record) = &camera.record else {
        return false;
    };
    record.enabled.is_none()
        || record.retain.as_ref().is_some_and(retain_incomplete)
        || record.events.as_ref().is_some_and(events_incomplete)
}

fn retain_incomplete(retain: &RetainConfig) -> bool {
    retain.days.is_none() || retain.mode.is_none()
}

fn events_incomplete(events: &EventsConfig) -> bool {
    events.pre_capture.is_none() || events.post_capture.is_none()
}

fn fill_camera(camera: &mut CameraEntry) {
    if let Some(record) = camera.record.as_mut() {
        fill_record(record);
    }
}

fn fill_record(record: &mut RecordConfig) {
    record.enabled = Some(record.effective_enabled());
    if let Some(retain) = record.retain.as_mut() {
        retain.days = Some(retain.effective_days());
        retain.mode = Some(retain.effective_mode());
    }
    if let Some(events) = record.events.as_mut() {
        events.pre_capture = Some(events.effective_pre_capture());
        events.post_capture = Some(events.effective_post_capture());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcg_config_types::{InputRole, RetainMode};
    use std::sync::Arc;

    fn doc_with_record(record: RecordConfig) -> ConfigDocument {
        let mut camera = CameraEntry::with_input("rtsp://x", [InputRole::Record]);
        camera.record = Some(record);
        let mut doc = ConfigDocument::empty();
        doc.cameras.insert("front", camera);
        doc.cameras
            .insert("back", CameraEntry::with_input("rtsp://y", [InputRole::Detect]));
        doc
    }

    #[test]
    fn test_fills_present_sections() {
        let doc = doc_with_record(RecordConfig {
            enabled: None,
            retain: Some(RetainConfig::default()),
            events: Some(EventsConfig {
                pre_capture: Some(2),
                ..Default::default()
            }),
        });
        let out = apply_defaults(&doc);
        let record = out.cameras.get("front").unwrap().record.clone().unwrap();
        assert_eq!(record.enabled, Some(false));
        let retain = record.retain.unwrap();
        assert_eq!(retain.days, Some(0));
        assert_eq!(retain.mode, Some(RetainMode::All));
        let events = record.events.unwrap();
        assert_eq!(events.pre_capture, Some(2));
        assert_eq!(events.post_capture, Some(5));
    }

    #[test]
    fn test_absent_sections_stay_absent() {
        let doc = doc_with_record(RecordConfig::default());
        let out = apply_defaults(&doc);
        let record = out.cameras.get("front").unwrap().record.clone().unwrap();
        assert_eq!(record.enabled, Some(false));
        assert!(record.retain.is_none());
        assert!(record.events.is_none());
        assert!(out.cameras.get("back").unwrap().record.is_none());
        assert!(out.mqtt.is_none());
    }

    #[test]
    fn test_untouched_cameras_stay_shared() {
        let doc = doc_with_record(RecordConfig::default());
        let out = apply_defaults(&doc);
        assert!(Arc::ptr_eq(
            doc.cameras.get_shared("back").unwrap(),
            out.cameras.get_shared("back").unwrap()
        ));
        assert!(!Arc::ptr_eq(
            doc.cameras.get_shared("front").unwrap(),
            out.cameras.get_shared("front").unwrap()
        ));
    }

    #[test]
    fn test_input_is_not_mutated() {
        let doc = doc_with_record(RecordConfig::default());
        let before = doc.clone();
        let _ = apply_defaults(&doc);
        assert_eq!(doc, before);
    }
}
