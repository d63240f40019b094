//! Bundled record loader.
//!
//! # Responsibility
//! - Read the fixed bundled resource, decode it and insert it into the store.
//! - Build explicit preview stores seeded from the bundled record.
//!
//! # Invariants
//! - Decode failures are returned, never replaced by a default record.
//! - Loading twice against one store leaves exactly one record.

use crate::decode::{decode_record, DecodeError, DecodeResult};
use crate::model::record::DomainRecord;
use crate::repo::record_repo::{make_in_memory_store, RecordRepository, RepoError};
use crate::resource::{ResourceBundle, SAMPLE_RECORD_RESOURCE};
use log::{error, info};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

pub type LoadResult<T> = Result<T, LoadError>;

/// Loader failure: either the resource or the store rejected the record.
#[derive(Debug)]
pub enum LoadError {
    Decode(DecodeError),
    Repo(RepoError),
}

impl Display for LoadError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LoadError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<DecodeError> for LoadError {
    fn from(value: DecodeError) -> Self {
        Self::Decode(value)
    }
}

impl From<RepoError> for LoadError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Loads the bundled record into a record store.
pub struct RecordLoader<R: RecordRepository, B: ResourceBundle> {
    repo: R,
    bundle: B,
}

impl<R: RecordRepository, B: ResourceBundle> RecordLoader<R, B> {
    pub fn new(repo: R, bundle: B) -> Self {
        Self { repo, bundle }
    }

    /// Decodes the bundled record without touching the store.
    pub fn decode(&self) -> DecodeResult<DomainRecord> {
        decode_bundled(&self.bundle)
    }

    /// Decodes the bundled record and inserts it into the store.
    ///
    /// # Contract
    /// - Returns the decoded record on success.
    /// - Insert is deduplicating; a second call is a no-op on the store.
    ///
    /// # Errors
    /// - `Decode` when the resource is missing or malformed.
    /// - `Repo` when the store rejects the record.
    pub fn load(&self) -> LoadResult<DomainRecord> {
        let started_at = Instant::now();
        info!("event=record_load module=loader status=start resource={SAMPLE_RECORD_RESOURCE}");

        let record = match self.decode() {
            Ok(record) => record,
            Err(err) => {
                error!(
                    "event=record_load module=loader status=error duration_ms={} error_code=decode_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                return Err(err.into());
            }
        };

        match self.repo.insert_record(&record) {
            Ok(outcome) => {
                info!(
                    "event=record_load module=loader status=ok duration_ms={} inserted={}",
                    started_at.elapsed().as_millis(),
                    outcome.was_inserted()
                );
                Ok(record)
            }
            Err(err) => {
                error!(
                    "event=record_load module=loader status=error duration_ms={} error_code=store_insert_failed error={err}",
                    started_at.elapsed().as_millis()
                );
                Err(err.into())
            }
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
}

/// Decodes the sample record from any bundle.
pub fn decode_bundled(bundle: &impl ResourceBundle) -> DecodeResult<DomainRecord> {
    let bytes = bundle.read(SAMPLE_RECORD_RESOURCE)?;
    decode_record(&bytes)
}

/// Builds an in-memory store seeded with the bundled record.
pub fn load_preview_store(bundle: &impl ResourceBundle) -> LoadResult<Connection> {
    let record = decode_bundled(bundle)?;
    Ok(make_in_memory_store(&record)?)
}
