// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Strongly-typed model of the NVR configuration document.
//!
//! These types define the *shape* of a document: which sections exist, which
//! fields are required, and which enumerations are closed. Range and content
//! constraints (quality 1-100, non-negative retention, ...) are not encoded in
//! the types; they are checked by the validator in `fcg-schema` so that an
//! editor can hold a transiently out-of-range value.

pub mod camera;
pub mod document;
pub mod entry_map;
pub mod network;
pub mod services;

pub use camera::{
    parse_roles, CameraEntry, DetectConfig, EventsConfig, FfmpegConfig, InputRole, InputSource,
    MotionConfig, MotionMask, ObjectsConfig, RecordConfig, RetainConfig, RetainMode,
    SnapshotsConfig, UnknownRole, Zone, DEFAULT_POST_CAPTURE, DEFAULT_PRE_CAPTURE,
    DEFAULT_RETAIN_DAYS,
};
pub use document::ConfigDocument;
pub use entry_map::EntryMap;
pub use network::{split_trusted_proxies, NetworkConfig, ProxyConfig, TlsConfig};
pub use services::{AudioConfig, DetectorEntry, Go2RtcConfig, MqttConfig};
