// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! In-memory editing of one NVR configuration document.
//!
//! The [`DocumentEditor`] holds the live document as a chain of immutable
//! snapshots and applies typed [`Patch`]es to it. Patches never reject an
//! out-of-range value; validity is reported on demand by `fcg-schema`.
//! A [`Session`] adds the host boundary: import, export and validation
//! requests, each reported on a single [`Notification`] channel.

pub mod editor;
pub mod error;
pub mod fields;
pub mod host;
pub mod mapping;
pub mod notify;
pub mod ops;
pub mod patch;
pub mod session;

pub use editor::{DocumentEditor, EditorState, PatchOutcome};
pub use error::{EditorError, HostError, PreconditionError, SessionError};
pub use fields::{CameraField, DetectorField, EntryField, NetworkField, ZoneField};
pub use host::{ConfigHost, HostValidation};
pub use mapping::{Cameras, Detectors, Mapping, Streams, Zones};
pub use notify::{Notification, Notifier, Severity};
pub use ops::{remove_entry, set_field, upsert_entry};
pub use patch::Patch;
pub use session::Session;
