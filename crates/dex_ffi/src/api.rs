//! FFI widget API for the display surface host.
//!
//! # Responsibility
//! - Expose placeholder, snapshot, timeline and layout entry points via FRB.
//! - Adapt the synchronous core to the host's pull-based timeline protocol.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Core preconditions are checked here and reported in the envelope.
//! - Each pull builds its own store; nothing is cached between pulls.

use crate::layout::{layout, RenderDescription, WidgetSizeClass};
use dex_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, load_preview_store,
    now_epoch_ms, ping as ping_inner, ContentMode, EmbeddedBundle, ImageRef, ResourceBundle,
    SnapshotEntry, SqliteRecordRepository, Timeline, TimelineConfig, TimelineGenerator,
};
use log::warn;
use std::time::Duration;

const TIMELINE_COUNT_MAX: u32 = 48;

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// # FFI contract
/// - `level`: `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path for rolling logs.
/// - Returns empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// Host-facing projection of one snapshot entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetEntry {
    /// Unix epoch milliseconds.
    pub timestamp_ms: i64,
    pub name: String,
    /// Primary category first; never empty for entries produced here.
    pub categories: Vec<String>,
    pub image_reference: String,
}

impl From<SnapshotEntry> for WidgetEntry {
    fn from(value: SnapshotEntry) -> Self {
        Self {
            timestamp_ms: value.timestamp_ms,
            name: value.name,
            categories: value.categories,
            image_reference: value.image_reference.as_str().to_string(),
        }
    }
}

impl From<WidgetEntry> for SnapshotEntry {
    fn from(value: WidgetEntry) -> Self {
        SnapshotEntry {
            timestamp_ms: value.timestamp_ms,
            name: value.name,
            categories: value.categories,
            image_reference: ImageRef::new(value.image_reference),
        }
    }
}

/// Timeline envelope for the host's pull protocol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WidgetTimelineResponse {
    /// False only when the request itself was invalid.
    pub ok: bool,
    pub entries: Vec<WidgetEntry>,
    /// Pull again once this instant has passed (`at_end` policy).
    pub refresh_after_ms: Option<i64>,
    /// Human-readable diagnostics; notes placeholder fallback when it happens.
    pub message: String,
}

impl WidgetTimelineResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entries: Vec::new(),
            refresh_after_ms: None,
            message: message.into(),
        }
    }
}

/// Returns the built-in placeholder entry immediately.
///
/// # FFI contract
/// - Sync call, no I/O.
/// - Never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn widget_placeholder() -> WidgetEntry {
    SnapshotEntry::placeholder_at(now_epoch_ms()).into()
}

/// Returns one entry with the best content available right now.
///
/// # FFI contract
/// - Sync call; builds a preview store from the bundled record.
/// - Falls back to the placeholder when the bundled record cannot load.
#[flutter_rust_bridge::frb(sync)]
pub fn widget_snapshot() -> WidgetEntry {
    let now_ms = now_epoch_ms();
    with_generator(
        &EmbeddedBundle::bundled(),
        TimelineConfig::default(),
        |generator, _| generator.snapshot(now_ms),
    )
    .into()
}

/// Builds the next timeline for the display surface.
///
/// Input semantics:
/// - `now_epoch_ms`: first entry timestamp.
/// - `count`: number of entries, `1..=48`.
/// - `interval_secs`: spacing between entries, `>= 1`.
/// - `rotate`: cycle through available records instead of repeating one.
///
/// # FFI contract
/// - Sync call; builds a preview store from the bundled record.
/// - Invalid input returns `ok=false`; never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn widget_timeline(
    now_epoch_ms: i64,
    count: u32,
    interval_secs: u64,
    rotate: bool,
) -> WidgetTimelineResponse {
    widget_timeline_with(
        &EmbeddedBundle::bundled(),
        now_epoch_ms,
        count,
        interval_secs,
        rotate,
    )
}

fn widget_timeline_with(
    bundle: &impl ResourceBundle,
    now_epoch_ms: i64,
    count: u32,
    interval_secs: u64,
    rotate: bool,
) -> WidgetTimelineResponse {
    if count == 0 || count > TIMELINE_COUNT_MAX {
        return WidgetTimelineResponse::failure(format!(
            "widget_timeline failed: count must be within 1..={TIMELINE_COUNT_MAX}, got {count}"
        ));
    }
    if interval_secs == 0 {
        return WidgetTimelineResponse::failure(
            "widget_timeline failed: interval_secs must be >= 1",
        );
    }
    let end_fits = i64::try_from(interval_secs)
        .ok()
        .and_then(|secs| secs.checked_mul(1000))
        .and_then(|interval_ms| interval_ms.checked_mul(i64::from(count - 1)))
        .and_then(|span| now_epoch_ms.checked_add(span))
        .is_some();
    if !end_fits {
        return WidgetTimelineResponse::failure(
            "widget_timeline failed: timeline end is out of range",
        );
    }

    let config = TimelineConfig {
        entry_count: count as usize,
        interval: Duration::from_secs(interval_secs),
        content_mode: if rotate {
            ContentMode::Rotate
        } else {
            ContentMode::Repeat
        },
    };

    with_generator(bundle, config, |generator, fallback| {
        let timeline = generator.generate_default(now_epoch_ms);
        to_timeline_response(timeline, fallback)
    })
}

/// Lays out an entry for the given widget size class.
///
/// # FFI contract
/// - Sync call, pure.
/// - Entries with no categories are laid out with the placeholder's.
#[flutter_rust_bridge::frb(sync)]
pub fn widget_layout(size_class: WidgetSizeClass, entry: WidgetEntry) -> RenderDescription {
    let mut entry = SnapshotEntry::from(entry);
    if entry.categories.is_empty() {
        entry.categories = SnapshotEntry::placeholder_at(entry.timestamp_ms).categories;
    }
    layout(size_class, &entry)
}

/// Runs `f` with a generator over a fresh preview store built from `bundle`.
///
/// The second argument carries the fallback reason when the sample record
/// could not be loaded and the generator only has placeholders.
fn with_generator<T>(
    bundle: &impl ResourceBundle,
    config: TimelineConfig,
    f: impl FnOnce(&TimelineGenerator<'_>, Option<String>) -> T,
) -> T {
    match load_preview_store(bundle) {
        Ok(conn) => {
            let repo = SqliteRecordRepository::new(&conn);
            let generator = TimelineGenerator::new(&repo, config);
            f(&generator, None)
        }
        Err(err) => {
            warn!(
                "event=widget_pull module=ffi status=fallback error_code=record_load_failed error={err}"
            );
            let generator = TimelineGenerator::placeholder_only(config);
            f(&generator, Some(err.to_string()))
        }
    }
}

fn to_timeline_response(timeline: Timeline, fallback: Option<String>) -> WidgetTimelineResponse {
    let refresh_after_ms = timeline.refresh_after_ms();
    let entries = timeline
        .into_entries()
        .into_iter()
        .map(WidgetEntry::from)
        .collect::<Vec<_>>();
    let message = match fallback {
        Some(reason) => format!("Showing placeholder: {reason}"),
        None => format!("Generated {} entries.", entries.len()),
    };
    WidgetTimelineResponse {
        ok: true,
        entries,
        refresh_after_ms,
        message,
    }
}
