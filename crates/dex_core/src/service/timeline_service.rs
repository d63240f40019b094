//! Snapshot timeline generation for pull-based display surfaces.
//!
//! # Responsibility
//! - Produce finite, evenly spaced timelines of snapshot entries.
//! - Decide entry content: resolved record projection or placeholder.
//!
//! # Invariants
//! - Timestamps are `now, now+interval, …` and strictly increasing.
//! - Every entry has at least one category.
//! - The generator keeps no memory of earlier timelines; each call reads the
//!   store through to its latest state.
//! - Store read failures degrade to placeholder content, never to an error.

use crate::model::record::DomainRecord;
use crate::model::snapshot::{RefreshPolicy, SnapshotEntry, Timeline};
use crate::repo::record_repo::{RecordRepository, RepoResult};
use log::{info, warn};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

const DEFAULT_ENTRY_COUNT: usize = 5;
const DEFAULT_INTERVAL: Duration = Duration::from_secs(60 * 60);
const NANOS_PER_MILLI: u32 = 1_000_000;

/// How entry content varies inside one timeline.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentMode {
    /// Every entry repeats the current best projection.
    #[default]
    Repeat,
    /// Entry `i` shows candidate `i mod n`: stored records in insertion
    /// order, or the placeholder roster when the store is empty.
    Rotate,
}

/// Timeline shape used by `generate_default`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineConfig {
    pub entry_count: usize,
    pub interval: Duration,
    pub content_mode: ContentMode,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            entry_count: DEFAULT_ENTRY_COUNT,
            interval: DEFAULT_INTERVAL,
            content_mode: ContentMode::Repeat,
        }
    }
}

/// Stateless timeline generator over an optional record source.
pub struct TimelineGenerator<'a> {
    source: Option<&'a dyn RecordRepository>,
    config: TimelineConfig,
}

impl<'a> TimelineGenerator<'a> {
    /// Generator reading entry content from `source`.
    pub fn new(source: &'a dyn RecordRepository, config: TimelineConfig) -> Self {
        Self {
            source: Some(source),
            config,
        }
    }

    /// Generator with no resolved record; always emits placeholders.
    pub fn placeholder_only(config: TimelineConfig) -> Self {
        Self {
            source: None,
            config,
        }
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    /// Immediate placeholder entry stamped with the current clock. No I/O.
    pub fn placeholder(&self) -> SnapshotEntry {
        SnapshotEntry::placeholder_at(now_epoch_ms())
    }

    /// Single entry with the current best content at `now_ms`.
    ///
    /// Always the latest stored record, whatever the content mode.
    pub fn snapshot(&self, now_ms: i64) -> SnapshotEntry {
        let latest = match self.source.map(|source| source.latest_record()) {
            Some(Ok(latest)) => latest,
            Some(Err(err)) => {
                warn!(
                    "event=timeline_snapshot module=timeline status=fallback error_code=store_read_failed error={err}"
                );
                None
            }
            None => None,
        };
        latest
            .map(|record| SnapshotEntry::from_record(&record, now_ms))
            .unwrap_or_else(|| SnapshotEntry::placeholder_at(now_ms))
    }

    /// Generates `count` entries spaced by `interval`, starting at `now_ms`.
    ///
    /// # Panics
    /// - When `count == 0`.
    /// - When `interval` is not a positive whole number of milliseconds.
    /// - When the last timestamp does not fit in `i64` milliseconds.
    pub fn generate(&self, now_ms: i64, count: usize, interval: Duration) -> Timeline {
        assert!(count >= 1, "timeline count must be >= 1");
        assert!(
            !interval.is_zero() && interval.subsec_nanos() % NANOS_PER_MILLI == 0,
            "timeline interval must be a positive whole number of milliseconds, got {interval:?}"
        );
        let interval_ms = i64::try_from(interval.as_millis()).unwrap_or(i64::MAX);
        assert!(
            timeline_end_ms(now_ms, count, interval_ms).is_some(),
            "timeline end overflows i64 milliseconds"
        );

        let candidates = self.candidates();
        let entries = (0..count)
            .zip(candidates.iter().cycle())
            .map(|(offset, template)| template.at(now_ms + offset as i64 * interval_ms))
            .collect::<Vec<_>>();

        info!(
            "event=timeline_generate module=timeline status=ok entries={} interval_ms={} mode={:?} candidates={}",
            entries.len(),
            interval_ms,
            self.config.content_mode,
            candidates.len()
        );
        Timeline::new(entries, RefreshPolicy::AtEnd)
    }

    /// Generates a timeline using the configured count and interval.
    pub fn generate_default(&self, now_ms: i64) -> Timeline {
        self.generate(now_ms, self.config.entry_count, self.config.interval)
    }

    /// Content templates in display order. Never empty.
    fn candidates(&self) -> Vec<SnapshotEntry> {
        let resolved = match self.source {
            Some(source) => match self.read_source(source) {
                Ok(entries) => entries,
                Err(err) => {
                    warn!(
                        "event=timeline_generate module=timeline status=fallback error_code=store_read_failed error={err}"
                    );
                    Vec::new()
                }
            },
            None => Vec::new(),
        };

        if !resolved.is_empty() {
            return resolved;
        }

        match self.config.content_mode {
            ContentMode::Repeat => vec![SnapshotEntry::placeholder_at(0)],
            ContentMode::Rotate => vec![
                SnapshotEntry::placeholder_at(0),
                SnapshotEntry::alternate_placeholder_at(0),
            ],
        }
    }

    fn read_source(&self, source: &dyn RecordRepository) -> RepoResult<Vec<SnapshotEntry>> {
        let records: Vec<DomainRecord> = match self.config.content_mode {
            ContentMode::Repeat => source.latest_record()?.into_iter().collect(),
            ContentMode::Rotate => source.list_records()?,
        };
        Ok(records
            .iter()
            .map(|record| SnapshotEntry::from_record(record, 0))
            .collect())
    }
}

fn timeline_end_ms(now_ms: i64, count: usize, interval_ms: i64) -> Option<i64> {
    let steps = i64::try_from(count - 1).ok()?;
    steps
        .checked_mul(interval_ms)
        .and_then(|span| now_ms.checked_add(span))
}

/// Current wall clock as Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
