// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Addressing of the record-of-named-entries mappings in a document.
//!
//! Cameras, detectors, go2rtc streams and per-camera zones share one set of
//! operations (upsert, remove, field set). A [`Mapping`] tells those
//! operations where the entries live.

use crate::PreconditionError;
use fcg_config_types::{CameraEntry, ConfigDocument, DetectorEntry, EntryMap, Zone};

pub trait Mapping {
    type Entry: Clone;

    /// Dotted path of the mapping, used in logs and errors.
    fn describe(&self) -> String;

    /// The mapping, if the document has it.
    fn entries<'a>(&self, doc: &'a ConfigDocument) -> Option<&'a EntryMap<Self::Entry>>;

    /// Mutable access to the mapping, creating an absent optional parent
    /// section. Fails when the parent is itself a missing entry.
    fn entries_mut<'a>(
        &self,
        doc: &'a mut ConfigDocument,
    ) -> Result<&'a mut EntryMap<Self::Entry>, PreconditionError>;
}

/// `cameras`
#[derive(Debug, Clone, Copy, Default)]
pub struct Cameras;

/// `detectors`
#[derive(Debug, Clone, Copy, Default)]
pub struct Detectors;

/// `go2rtc.streams`
#[derive(Debug, Clone, Copy, Default)]
pub struct Streams;

/// `cameras.<camera>.zones`
#[derive(Debug, Clone)]
pub struct Zones {
    pub camera: String,
}

impl Zones {
    pub fn of(camera: impl Into<String>) -> Self {
        Self {
            camera: camera.into(),
        }
    }
}

impl Mapping for Cameras {
    type Entry = CameraEntry;

    fn describe(&self) -> String {
        "cameras".to_string()
    }

    fn entries<'a>(&self, doc: &'a ConfigDocument) -> Option<&'a EntryMap<CameraEntry>> {
        Some(&doc.cameras)
    }

    fn entries_mut<'a>(
        &self,
        doc: &'a mut ConfigDocument,
    ) -> Result<&'a mut EntryMap<CameraEntry>, PreconditionError> {
        Ok(&mut doc.cameras)
    }
}

impl Mapping for Detectors {
    type Entry = DetectorEntry;

    fn describe(&self) -> String {
        "detectors".to_string()
    }

    fn entries<'a>(&self, doc: &'a ConfigDocument) -> Option<&'a EntryMap<DetectorEntry>> {
        Some(&doc.detectors)
    }

    fn entries_mut<'a>(
        &self,
        doc: &'a mut ConfigDocument,
    ) -> Result<&'a mut EntryMap<DetectorEntry>, PreconditionError> {
        Ok(&mut doc.detectors)
    }
}

impl Mapping for Streams {
    type Entry = String;

    fn describe(&self) -> String {
        "go2rtc.streams".to_string()
    }

    fn entries<'a>(&self, doc: &'a ConfigDocument) -> Option<&'a EntryMap<String>> {
        doc.go2rtc.as_ref().map(|g| &g.streams)
    }

    fn entries_mut<'a>(
        &self,
        doc: &'a mut ConfigDocument,
    ) -> Result<&'a mut EntryMap<String>, PreconditionError> {
        Ok(&mut doc.go2rtc.get_or_insert_with(Default::default).streams)
    }
}

impl Mapping for Zones {
    type Entry = Zone;

    fn describe(&self) -> String {
        format!("cameras.{}.zones", self.camera)
    }

    fn entries<'a>(&self, doc: &'a ConfigDocument) -> Option<&'a EntryMap<Zone>> {
        doc.cameras.get(&self.camera).map(|c| &c.zones)
    }

    fn entries_mut<'a>(
        &self,
        doc: &'a mut ConfigDocument,
    ) -> Result<&'a mut EntryMap<Zone>, PreconditionError> {
        doc.cameras
            .get_mut(&self.camera)
            .map(|c| &mut c.zones)
            .ok_or_else(|| PreconditionError::MissingEntry {
                mapping: "cameras".to_string(),
                key: self.camera.clone(),
            })
    }
}
