//! Core domain logic for Dex.
//! Loads the bundled creature profile into a record store and produces
//! snapshot timelines for pull-based display surfaces.

pub mod db;
pub mod decode;
pub mod logging;
pub mod model;
pub mod repo;
pub mod resource;
pub mod service;

pub use decode::{convert_from_snake_case, decode_record, DecodeError, DecodeResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{record_id_for, DomainRecord, ImageRef, RecordId, RecordValidationError};
pub use model::snapshot::{RefreshPolicy, SnapshotEntry, Timeline};
pub use repo::record_repo::{
    make_in_memory_store, InsertOutcome, RecordRepository, RepoError, RepoResult,
    SqliteRecordRepository,
};
pub use resource::{DirectoryBundle, EmbeddedBundle, ResourceBundle, SAMPLE_RECORD_RESOURCE};
pub use service::record_loader::{
    decode_bundled, load_preview_store, LoadError, LoadResult, RecordLoader,
};
pub use service::timeline_service::{now_epoch_ms, ContentMode, TimelineConfig, TimelineGenerator};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
