// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Named, composable patches over a document snapshot

use crate::fields::{CameraField, DetectorField, EntryField, NetworkField, ZoneField};
use crate::mapping::{Cameras, Detectors, Streams, Zones};
use crate::ops::{remove_entry, set_field, upsert_entry};
use crate::PreconditionError;
use fcg_config_types::{
    AudioConfig, CameraEntry, ConfigDocument, DetectorEntry, MqttConfig, NetworkConfig, Zone,
};

/// One atomic edit. Each patch is scoped to a single subtree, except
/// [`Patch::Batch`] which applies several patches all-or-nothing.
#[derive(Debug, Clone, PartialEq)]
pub enum Patch {
    UpsertCamera { name: String, camera: CameraEntry },
    RemoveCamera { name: String },
    SetCameraField { camera: String, field: CameraField },

    UpsertDetector { name: String, detector: DetectorEntry },
    RemoveDetector { name: String },
    SetDetectorField { detector: String, field: DetectorField },

    UpsertStream { name: String, url: String },
    RemoveStream { name: String },

    UpsertZone { camera: String, name: String, zone: Zone },
    RemoveZone { camera: String, name: String },
    SetZoneField { camera: String, zone: String, field: ZoneField },

    /// Replace or clear the whole `mqtt` section
    SetMqtt(Option<MqttConfig>),
    /// Replace or clear the whole `audio` section
    SetAudio(Option<AudioConfig>),
    /// Replace or clear the whole `network` section
    SetNetwork(Option<NetworkConfig>),
    SetNetworkField(NetworkField),

    Batch(Vec<Patch>),
}

impl Patch {
    /// "Add camera": a camera with one empty-path detect input.
    pub fn add_camera(name: impl Into<String>) -> Self {
        Patch::UpsertCamera {
            name: name.into(),
            camera: CameraEntry::template(),
        }
    }

    pub fn set_camera_field(camera: impl Into<String>, field: CameraField) -> Self {
        Patch::SetCameraField {
            camera: camera.into(),
            field,
        }
    }

    /// Short description for logs.
    pub fn describe(&self) -> String {
        match self {
            Patch::UpsertCamera { name, .. } => format!("upsert cameras.{name}"),
            Patch::RemoveCamera { name } => format!("remove cameras.{name}"),
            Patch::SetCameraField { camera, field } => {
                format!("set cameras.{camera}.{}", field.path())
            }
            Patch::UpsertDetector { name, .. } => format!("upsert detectors.{name}"),
            Patch::RemoveDetector { name } => format!("remove detectors.{name}"),
            Patch::SetDetectorField { detector, field } => {
                format!("set detectors.{detector}.{}", field.path())
            }
            Patch::UpsertStream { name, .. } => format!("upsert go2rtc.streams.{name}"),
            Patch::RemoveStream { name } => format!("remove go2rtc.streams.{name}"),
            Patch::UpsertZone { camera, name, .. } => format!("upsert cameras.{camera}.zones.{name}"),
            Patch::RemoveZone { camera, name } => format!("remove cameras.{camera}.zones.{name}"),
            Patch::SetZoneField { camera, zone, field } => {
                format!("set cameras.{camera}.zones.{zone}.{}", field.path())
            }
            Patch::SetMqtt(_) => "set mqtt".to_string(),
            Patch::SetAudio(_) => "set audio".to_string(),
            Patch::SetNetwork(_) => "set network".to_string(),
            Patch::SetNetworkField(field) => format!("set {}", field.path()),
            Patch::Batch(patches) => format!("batch of {}", patches.len()),
        }
    }

    /// Apply to `doc`, returning the next snapshot, or `None` for a no-op.
    pub fn apply_to(self, doc: &ConfigDocument) -> Result<Option<ConfigDocument>, PreconditionError> {
        match self {
            Patch::UpsertCamera { name, camera } => upsert_entry(doc, &Cameras, &name, camera),
            Patch::RemoveCamera { name } => remove_entry(doc, &Cameras, &name),
            Patch::SetCameraField { camera, field } => set_field(doc, &Cameras, &camera, field),

            Patch::UpsertDetector { name, detector } => {
                upsert_entry(doc, &Detectors, &name, detector)
            }
            Patch::RemoveDetector { name } => remove_entry(doc, &Detectors, &name),
            Patch::SetDetectorField { detector, field } => {
                set_field(doc, &Detectors, &detector, field)
            }

            Patch::UpsertStream { name, url } => upsert_entry(doc, &Streams, &name, url),
            Patch::RemoveStream { name } => remove_entry(doc, &Streams, &name),

            Patch::UpsertZone { camera, name, zone } => {
                upsert_entry(doc, &Zones::of(camera), &name, zone)
            }
            Patch::RemoveZone { camera, name } => remove_entry(doc, &Zones::of(camera), &name),
            Patch::SetZoneField { camera, zone, field } => {
                set_field(doc, &Zones::of(camera), &zone, field)
            }

            Patch::SetMqtt(mqtt) => Ok(Some(ConfigDocument {
                mqtt,
                ..doc.clone()
            })),
            Patch::SetAudio(audio) => Ok(Some(ConfigDocument {
                audio,
                ..doc.clone()
            })),
            Patch::SetNetwork(network) => Ok(Some(ConfigDocument {
                network,
                ..doc.clone()
            })),
            Patch::SetNetworkField(field) => {
                let mut next = doc.clone();
                field.apply(&mut next.network);
                Ok(Some(next))
            }

            Patch::Batch(patches) => {
                let mut current: Option<ConfigDocument> = None;
                for patch in patches {
                    let base = current.as_ref().unwrap_or(doc);
                    if let Some(next) = patch.apply_to(base)? {
                        current = Some(next);
                    }
                }
                Ok(current)
            }
        }
    }
}
