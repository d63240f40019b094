//! Display snapshot model for pull-based surfaces.
//!
//! # Responsibility
//! - Define the denormalized entry handed to the display surface.
//! - Define the finite timeline batch and its refresh policy.
//! - Provide the built-in placeholder entries.
//!
//! # Invariants
//! - `categories` is non-empty for every entry (renderers index `[0]`).
//! - Timeline entries are strictly increasing in `timestamp_ms`.
//! - Entries are plain values with no link back to the store.

use crate::model::record::{DomainRecord, ImageRef};
use serde::{Deserialize, Serialize};

const PLACEHOLDER_NAME: &str = "bulbasaur";
const PLACEHOLDER_CATEGORIES: &[&str] = &["grass", "poison"];
const PLACEHOLDER_IMAGE: &str = "bulbasaur";

const ALTERNATE_PLACEHOLDER_NAME: &str = "mew";
const ALTERNATE_PLACEHOLDER_CATEGORIES: &[&str] = &["psychic"];
const ALTERNATE_PLACEHOLDER_IMAGE: &str = "mew";

/// One timestamped projection of a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotEntry {
    /// Unix epoch milliseconds at which this entry becomes current.
    pub timestamp_ms: i64,
    pub name: String,
    /// Primary category first. Never empty.
    pub categories: Vec<String>,
    pub image_reference: ImageRef,
}

impl SnapshotEntry {
    /// Projects a validated record at the given instant.
    pub fn from_record(record: &DomainRecord, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            name: record.name().to_string(),
            categories: record.categories().to_vec(),
            image_reference: record.image_reference().clone(),
        }
    }

    /// Built-in entry used before any record is resolved.
    pub fn placeholder_at(timestamp_ms: i64) -> Self {
        fixed_entry(
            timestamp_ms,
            PLACEHOLDER_NAME,
            PLACEHOLDER_CATEGORIES,
            PLACEHOLDER_IMAGE,
        )
    }

    /// Second built-in entry, used for previews and placeholder rotation.
    pub fn alternate_placeholder_at(timestamp_ms: i64) -> Self {
        fixed_entry(
            timestamp_ms,
            ALTERNATE_PLACEHOLDER_NAME,
            ALTERNATE_PLACEHOLDER_CATEGORIES,
            ALTERNATE_PLACEHOLDER_IMAGE,
        )
    }

    /// Returns a copy of this entry re-stamped at `timestamp_ms`.
    pub fn at(&self, timestamp_ms: i64) -> Self {
        Self {
            timestamp_ms,
            ..self.clone()
        }
    }

    /// Primary category used for accent/background selection.
    pub fn primary_category(&self) -> &str {
        self.categories
            .first()
            .map(String::as_str)
            .unwrap_or(PLACEHOLDER_CATEGORIES[0])
    }
}

fn fixed_entry(timestamp_ms: i64, name: &str, categories: &[&str], image: &str) -> SnapshotEntry {
    SnapshotEntry {
        timestamp_ms,
        name: name.to_string(),
        categories: categories.iter().map(|value| value.to_string()).collect(),
        image_reference: ImageRef::new(image),
    }
}

/// When the display surface should ask for the next timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefreshPolicy {
    /// Request a new timeline once the last entry's timestamp has passed.
    AtEnd,
}

/// Finite, ordered batch of snapshot entries.
///
/// Serialize-only: timelines are built by the generator, never read back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Timeline {
    entries: Vec<SnapshotEntry>,
    policy: RefreshPolicy,
}

impl Timeline {
    /// Wraps already-ordered entries.
    ///
    /// Callers inside core guarantee ordering; this is checked in debug
    /// builds only.
    pub(crate) fn new(entries: Vec<SnapshotEntry>, policy: RefreshPolicy) -> Self {
        debug_assert!(entries
            .windows(2)
            .all(|pair| pair[0].timestamp_ms < pair[1].timestamp_ms));
        Self { entries, policy }
    }

    pub fn entries(&self) -> &[SnapshotEntry] {
        &self.entries
    }

    pub fn policy(&self) -> RefreshPolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Timestamp after which the surface should pull again.
    pub fn refresh_after_ms(&self) -> Option<i64> {
        self.entries.last().map(|entry| entry.timestamp_ms)
    }

    pub fn into_entries(self) -> Vec<SnapshotEntry> {
        self.entries
    }
}
