// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Record-of-named-entries mapping with copy-on-write entries.
//!
//! Cameras, detectors, go2rtc streams and zones are all keyed by a unique
//! name. Each value sits behind an [`Arc`], so cloning a map (and therefore
//! cloning a whole document) only bumps reference counts. Mutating one entry
//! through [`EntryMap::get_mut`] clones that entry alone, leaving every other
//! entry shared with older snapshots.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, schemars::JsonSchema)]
#[serde(transparent)]
pub struct EntryMap<T>(BTreeMap<String, Arc<T>>);

impl<T> Default for EntryMap<T> {
    fn default() -> Self {
        Self(BTreeMap::new())
    }
}

impl<T> EntryMap<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.get(key).map(Arc::as_ref)
    }

    /// Shared handle to an entry, used to check structural sharing between snapshots.
    pub fn get_shared(&self, key: &str) -> Option<&Arc<T>> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    /// Insert or wholly replace the entry at `key`.
    ///
    /// Returns `true` when a previous value was replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: T) -> bool {
        self.0.insert(key.into(), Arc::new(value)).is_some()
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<T>> {
        self.0.remove(key)
    }
}

impl<T: Clone> EntryMap<T> {
    /// Mutable access to one entry. The entry is cloned first if another
    /// snapshot still holds it.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.0.get_mut(key).map(Arc::make_mut)
    }
}

impl<T, K: Into<String>> FromIterator<(K, T)> for EntryMap<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), Arc::new(v))).collect())
    }
}
