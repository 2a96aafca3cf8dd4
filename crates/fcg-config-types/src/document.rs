// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! The configuration document root.

use crate::{AudioConfig, CameraEntry, DetectorEntry, EntryMap, Go2RtcConfig, MqttConfig, NetworkConfig};
use serde::{Deserialize, Serialize};

/// Root of one configuration document.
///
/// Field order is the order in which sections are validated and serialized.
/// Only `cameras` is required; a fresh document has no cameras and every
/// other section absent.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, schemars::JsonSchema)]
pub struct ConfigDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mqtt: Option<MqttConfig>,
    pub cameras: EntryMap<CameraEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioConfig>,
    #[serde(default, skip_serializing_if = "EntryMap::is_empty")]
    pub detectors: EntryMap<DetectorEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go2rtc: Option<Go2RtcConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkConfig>,
}

impl ConfigDocument {
    /// The minimal document used by "start new".
    pub fn empty() -> Self {
        Self::default()
    }
}
