// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Typed field setters.
//!
//! Each variant writes exactly one field of an entry (or of a singleton
//! section) and leaves its siblings alone. A setter that writes a value into
//! an absent optional section creates that section; clearing a field inside
//! an absent section does nothing. Sections with a required `enabled` flag
//! (`snapshots`, `network.tls`) are created disabled.

use crate::PreconditionError;
use fcg_config_types::{
    CameraEntry, DetectConfig, DetectorEntry, InputRole, InputSource, MotionConfig, MotionMask,
    NetworkConfig, ObjectsConfig, ProxyConfig, RecordConfig, RetainMode, TlsConfig, Zone,
};
use std::collections::BTreeSet;

/// A setter for one field of an entry of type `E`.
pub trait EntryField<E> {
    /// Dotted path of the field relative to the entry.
    fn path(&self) -> String;

    /// Write the field. `key` names the entry for error reporting.
    fn apply(self, key: &str, entry: &mut E) -> Result<(), PreconditionError>;
}

/// Field setters for a camera.
#[derive(Debug, Clone, PartialEq)]
pub enum CameraField {
    /// Replace the whole input list
    Inputs(Vec<InputSource>),
    AddInput(InputSource),
    RemoveInput(usize),
    InputPath { index: usize, path: String },
    InputRoles { index: usize, roles: BTreeSet<InputRole> },
    InputGlobalArgs { index: usize, args: Option<String> },
    InputInputArgs { index: usize, args: Option<String> },
    Detect(Option<DetectConfig>),
    DetectWidth(Option<i64>),
    DetectHeight(Option<i64>),
    DetectFps(Option<i64>),
    MotionMask(Option<MotionMask>),
    RecordEnabled(Option<bool>),
    RetainDays(Option<i64>),
    RetainMode(Option<RetainMode>),
    PreCapture(Option<i64>),
    PostCapture(Option<i64>),
    RequiredZones(Option<Vec<String>>),
    EventObjects(Option<Vec<String>>),
    /// `None` removes the `objects` section
    TrackObjects(Option<Vec<String>>),
    SnapshotsEnabled(bool),
    SnapshotsTimestamp(Option<bool>),
    SnapshotsBoundingBox(Option<bool>),
    SnapshotsQuality(Option<i64>),
}

/// Present section for writing, or `None` when clearing a field of an
/// absent section.
fn section<T: Default>(slot: &mut Option<T>, writing: bool) -> Option<&mut T> {
    if writing {
        Some(slot.get_or_insert_with(Default::default))
    } else {
        slot.as_mut()
    }
}

fn input_mut<'a>(
    camera: &'a mut CameraEntry,
    key: &str,
    index: usize,
) -> Result<&'a mut InputSource, PreconditionError> {
    let len = camera.ffmpeg.inputs.len();
    camera
        .ffmpeg
        .inputs
        .get_mut(index)
        .ok_or_else(|| PreconditionError::MissingInput {
            camera: key.to_string(),
            index,
            len,
        })
}

fn record_mut(camera: &mut CameraEntry, writing: bool) -> Option<&mut RecordConfig> {
    section(&mut camera.record, writing)
}

impl EntryField<CameraEntry> for CameraField {
    fn path(&self) -> String {
        match self {
            CameraField::Inputs(_) | CameraField::AddInput(_) | CameraField::RemoveInput(_) => {
                "ffmpeg.inputs".to_string()
            }
            CameraField::InputPath { index, .. } => format!("ffmpeg.inputs.{index}.path"),
            CameraField::InputRoles { index, .. } => format!("ffmpeg.inputs.{index}.roles"),
            CameraField::InputGlobalArgs { index, .. } => {
                format!("ffmpeg.inputs.{index}.global_args")
            }
            CameraField::InputInputArgs { index, .. } => {
                format!("ffmpeg.inputs.{index}.input_args")
            }
            CameraField::Detect(_) => "detect".to_string(),
            CameraField::DetectWidth(_) => "detect.width".to_string(),
            CameraField::DetectHeight(_) => "detect.height".to_string(),
            CameraField::DetectFps(_) => "detect.fps".to_string(),
            CameraField::MotionMask(_) => "motion.mask".to_string(),
            CameraField::RecordEnabled(_) => "record.enabled".to_string(),
            CameraField::RetainDays(_) => "record.retain.days".to_string(),
            CameraField::RetainMode(_) => "record.retain.mode".to_string(),
            CameraField::PreCapture(_) => "record.events.pre_capture".to_string(),
            CameraField::PostCapture(_) => "record.events.post_capture".to_string(),
            CameraField::RequiredZones(_) => "record.events.required_zones".to_string(),
            CameraField::EventObjects(_) => "record.events.objects".to_string(),
            CameraField::TrackObjects(_) => "objects.track".to_string(),
            CameraField::SnapshotsEnabled(_) => "snapshots.enabled".to_string(),
            CameraField::SnapshotsTimestamp(_) => "snapshots.timestamp".to_string(),
            CameraField::SnapshotsBoundingBox(_) => "snapshots.bounding_box".to_string(),
            CameraField::SnapshotsQuality(_) => "snapshots.quality".to_string(),
        }
    }

    fn apply(self, key: &str, camera: &mut CameraEntry) -> Result<(), PreconditionError> {
        match self {
            CameraField::Inputs(inputs) => camera.ffmpeg.inputs = inputs,
            CameraField::AddInput(input) => camera.ffmpeg.inputs.push(input),
            CameraField::RemoveInput(index) => {
                input_mut(camera, key, index)?;
                camera.ffmpeg.inputs.remove(index);
            }
            CameraField::InputPath { index, path } => input_mut(camera, key, index)?.path = path,
            CameraField::InputRoles { index, roles } => {
                input_mut(camera, key, index)?.roles = roles
            }
            CameraField::InputGlobalArgs { index, args } => {
                input_mut(camera, key, index)?.global_args = args
            }
            CameraField::InputInputArgs { index, args } => {
                input_mut(camera, key, index)?.input_args = args
            }
            CameraField::Detect(detect) => camera.detect = detect,
            CameraField::DetectWidth(v) => {
                if let Some(d) = section::<DetectConfig>(&mut camera.detect, v.is_some()) {
                    d.width = v;
                }
            }
            CameraField::DetectHeight(v) => {
                if let Some(d) = section::<DetectConfig>(&mut camera.detect, v.is_some()) {
                    d.height = v;
                }
            }
            CameraField::DetectFps(v) => {
                if let Some(d) = section::<DetectConfig>(&mut camera.detect, v.is_some()) {
                    d.fps = v;
                }
            }
            CameraField::MotionMask(mask) => {
                if let Some(m) = section::<MotionConfig>(&mut camera.motion, mask.is_some()) {
                    m.mask = mask;
                }
            }
            CameraField::RecordEnabled(v) => {
                if let Some(r) = record_mut(camera, v.is_some()) {
                    r.enabled = v;
                }
            }
            CameraField::RetainDays(v) => {
                if let Some(r) = record_mut(camera, v.is_some()) {
                    if let Some(retain) = section(&mut r.retain, v.is_some()) {
                        retain.days = v;
                    }
                }
            }
            CameraField::RetainMode(v) => {
                if let Some(r) = record_mut(camera, v.is_some()) {
                    if let Some(retain) = section(&mut r.retain, v.is_some()) {
                        retain.mode = v;
                    }
                }
            }
            CameraField::PreCapture(v) => {
                if let Some(r) = record_mut(camera, v.is_some()) {
                    if let Some(events) = section(&mut r.events, v.is_some()) {
                        events.pre_capture = v;
                    }
                }
            }
            CameraField::PostCapture(v) => {
                if let Some(r) = record_mut(camera, v.is_some()) {
                    if let Some(events) = section(&mut r.events, v.is_some()) {
                        events.post_capture = v;
                    }
                }
            }
            CameraField::RequiredZones(v) => {
                if let Some(r) = record_mut(camera, v.is_some()) {
                    if let Some(events) = section(&mut r.events, v.is_some()) {
                        events.required_zones = v;
                    }
                }
            }
            CameraField::EventObjects(v) => {
                if let Some(r) = record_mut(camera, v.is_some()) {
                    if let Some(events) = section(&mut r.events, v.is_some()) {
                        events.objects = v;
                    }
                }
            }
            CameraField::TrackObjects(track) => {
                camera.objects = track.map(|track| ObjectsConfig { track })
            }
            CameraField::SnapshotsEnabled(enabled) => {
                camera.snapshots.get_or_insert_with(Default::default).enabled = enabled
            }
            CameraField::SnapshotsTimestamp(v) => {
                if let Some(s) = section(&mut camera.snapshots, v.is_some()) {
                    s.timestamp = v;
                }
            }
            CameraField::SnapshotsBoundingBox(v) => {
                if let Some(s) = section(&mut camera.snapshots, v.is_some()) {
                    s.bounding_box = v;
                }
            }
            CameraField::SnapshotsQuality(v) => {
                if let Some(s) = section(&mut camera.snapshots, v.is_some()) {
                    s.quality = v;
                }
            }
        }
        Ok(())
    }
}

/// Field setters for a zone.
#[derive(Debug, Clone, PartialEq)]
pub enum ZoneField {
    Coordinates(String),
    Objects(Option<Vec<String>>),
    Inertia(Option<i64>),
    LoiteringTime(Option<f64>),
}

impl EntryField<Zone> for ZoneField {
    fn path(&self) -> String {
        match self {
            ZoneField::Coordinates(_) => "coordinates",
            ZoneField::Objects(_) => "objects",
            ZoneField::Inertia(_) => "inertia",
            ZoneField::LoiteringTime(_) => "loitering_time",
        }
        .to_string()
    }

    fn apply(self, _key: &str, zone: &mut Zone) -> Result<(), PreconditionError> {
        match self {
            ZoneField::Coordinates(c) => zone.coordinates = c,
            ZoneField::Objects(o) => zone.objects = o,
            ZoneField::Inertia(i) => zone.inertia = i,
            ZoneField::LoiteringTime(t) => zone.loitering_time = t,
        }
        Ok(())
    }
}

/// Field setters for a detector.
#[derive(Debug, Clone, PartialEq)]
pub enum DetectorField {
    Type(String),
    Device(Option<String>),
}

impl EntryField<DetectorEntry> for DetectorField {
    fn path(&self) -> String {
        match self {
            DetectorField::Type(_) => "type",
            DetectorField::Device(_) => "device",
        }
        .to_string()
    }

    fn apply(self, _key: &str, detector: &mut DetectorEntry) -> Result<(), PreconditionError> {
        match self {
            DetectorField::Type(kind) => detector.kind = kind,
            DetectorField::Device(device) => detector.device = device,
        }
        Ok(())
    }
}

/// Field setters for the `network` section.
#[derive(Debug, Clone, PartialEq)]
pub enum NetworkField {
    TlsEnabled(bool),
    TlsCertfile(Option<String>),
    TlsKeyfile(Option<String>),
    ForwardHeaders(Option<bool>),
    TrustedProxies(Option<Vec<String>>),
}

impl NetworkField {
    pub fn path(&self) -> &'static str {
        match self {
            NetworkField::TlsEnabled(_) => "network.tls.enabled",
            NetworkField::TlsCertfile(_) => "network.tls.certfile",
            NetworkField::TlsKeyfile(_) => "network.tls.keyfile",
            NetworkField::ForwardHeaders(_) => "network.proxy.forward_headers",
            NetworkField::TrustedProxies(_) => "network.proxy.trusted_proxies",
        }
    }

    /// Write the field into `network`, creating the section when a value is set.
    pub fn apply(self, network: &mut Option<NetworkConfig>) {
        match self {
            NetworkField::TlsEnabled(enabled) => {
                let n = network.get_or_insert_with(Default::default);
                n.tls.get_or_insert_with(Default::default).enabled = enabled;
            }
            NetworkField::TlsCertfile(v) => {
                if let Some(tls) = tls_mut(network, v.is_some()) {
                    tls.certfile = v;
                }
            }
            NetworkField::TlsKeyfile(v) => {
                if let Some(tls) = tls_mut(network, v.is_some()) {
                    tls.keyfile = v;
                }
            }
            NetworkField::ForwardHeaders(v) => {
                if let Some(proxy) = proxy_mut(network, v.is_some()) {
                    proxy.forward_headers = v;
                }
            }
            NetworkField::TrustedProxies(v) => {
                if let Some(proxy) = proxy_mut(network, v.is_some()) {
                    proxy.trusted_proxies = v;
                }
            }
        }
    }
}

fn tls_mut(network: &mut Option<NetworkConfig>, writing: bool) -> Option<&mut TlsConfig> {
    section(network, writing).and_then(|n| section(&mut n.tls, writing))
}

fn proxy_mut(network: &mut Option<NetworkConfig>, writing: bool) -> Option<&mut ProxyConfig> {
    section(network, writing).and_then(|n| section(&mut n.proxy, writing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcg_config_types::{EventsConfig, RetainConfig};

    fn camera() -> CameraEntry {
        CameraEntry::with_input("rtsp://x", [InputRole::Detect])
    }

    #[test]
    fn test_retain_days_keeps_events() {
        let mut cam = camera();
        cam.record = Some(RecordConfig {
            enabled: Some(true),
            retain: None,
            events: Some(EventsConfig {
                pre_capture: Some(5),
                post_capture: Some(5),
                ..Default::default()
            }),
        });
        let events_before = cam.record.as_ref().unwrap().events.clone();

        CameraField::RetainDays(Some(10)).apply("front", &mut cam).unwrap();

        let record = cam.record.unwrap();
        assert_eq!(record.events, events_before);
        assert_eq!(
            record.retain,
            Some(RetainConfig {
                days: Some(10),
                mode: None
            })
        );
        assert_eq!(record.enabled, Some(true));
    }

    #[test]
    fn test_clearing_field_of_absent_section_is_noop() {
        let mut cam = camera();
        CameraField::RetainDays(None).apply("front", &mut cam).unwrap();
        CameraField::SnapshotsQuality(None).apply("front", &mut cam).unwrap();
        assert_eq!(cam, camera());
    }

    #[test]
    fn test_snapshot_setter_creates_disabled_section() {
        let mut cam = camera();
        CameraField::SnapshotsQuality(Some(150)).apply("front", &mut cam).unwrap();
        let snapshots = cam.snapshots.unwrap();
        assert!(!snapshots.enabled);
        assert_eq!(snapshots.quality, Some(150));
    }

    #[test]
    fn test_input_setters() {
        let mut cam = camera();
        CameraField::AddInput(InputSource::new("rtsp://y", [InputRole::Record]))
            .apply("front", &mut cam)
            .unwrap();
        CameraField::InputPath {
            index: 1,
            path: "rtsp://z".into(),
        }
        .apply("front", &mut cam)
        .unwrap();
        assert_eq!(cam.ffmpeg.inputs[1].path, "rtsp://z");

        CameraField::RemoveInput(0).apply("front", &mut cam).unwrap();
        assert_eq!(cam.ffmpeg.inputs.len(), 1);
        assert_eq!(cam.ffmpeg.inputs[0].path, "rtsp://z");
    }

    #[test]
    fn test_missing_input_is_precondition_error() {
        let mut cam = camera();
        let err = CameraField::InputRoles {
            index: 3,
            roles: BTreeSet::new(),
        }
        .apply("front", &mut cam)
        .unwrap_err();
        assert_eq!(
            err,
            PreconditionError::MissingInput {
                camera: "front".into(),
                index: 3,
                len: 1
            }
        );
    }

    #[test]
    fn test_field_paths() {
        assert_eq!(CameraField::RetainDays(None).path(), "record.retain.days");
        assert_eq!(
            CameraField::InputRoles {
                index: 2,
                roles: BTreeSet::new()
            }
            .path(),
            "ffmpeg.inputs.2.roles"
        );
        assert_eq!(ZoneField::Inertia(None).path(), "inertia");
    }

    #[test]
    fn test_network_fields_create_subsections() {
        let mut network = None;
        NetworkField::TlsCertfile(Some("/certs/a.pem".into())).apply(&mut network);
        let tls = network.as_ref().unwrap().tls.as_ref().unwrap();
        assert!(!tls.enabled);
        assert_eq!(tls.certfile.as_deref(), Some("/certs/a.pem"));
        assert!(network.as_ref().unwrap().proxy.is_none());

        NetworkField::TrustedProxies(None).apply(&mut network);
        assert!(network.as_ref().unwrap().proxy.is_none());
    }
}
