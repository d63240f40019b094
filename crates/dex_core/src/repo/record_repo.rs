//! Record store contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide insert / fetch-all semantics over canonical `records` storage.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Inserting a record equal to a stored one is a no-op.
//! - A stored record is never replaced; same name with different content is
//!   a conflict.
//! - Read paths re-validate persisted rows instead of masking bad state.

use crate::db::{open_db_in_memory, DbError};
use crate::model::record::{record_id_for, DomainRecord, ImageRef, RecordId, RecordValidationError};
use log::{debug, warn};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const RECORD_SELECT_SQL: &str = "SELECT
    id,
    name,
    image_reference
FROM records";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for record persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    /// A different record with the same name is already stored.
    Conflict {
        name: String,
    },
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::Conflict { name } => {
                write!(f, "record `{name}` is already stored with different content")
            }
            Self::InvalidData(message) => write!(f, "invalid persisted record data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::Conflict { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Result of an insert against the deduplicating store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(RecordId),
    /// An equal record was already stored; nothing was written.
    AlreadyPresent(RecordId),
}

impl InsertOutcome {
    pub fn id(self) -> RecordId {
        match self {
            Self::Inserted(id) | Self::AlreadyPresent(id) => id,
        }
    }

    pub fn was_inserted(self) -> bool {
        matches!(self, Self::Inserted(_))
    }
}

/// Repository interface for the record store.
pub trait RecordRepository {
    fn insert_record(&self, record: &DomainRecord) -> RepoResult<InsertOutcome>;
    /// Returns all records in insertion order.
    fn list_records(&self) -> RepoResult<Vec<DomainRecord>>;
    fn get_record(&self, id: RecordId) -> RepoResult<Option<DomainRecord>>;
    fn count_records(&self) -> RepoResult<u64>;
    /// Returns the most recently inserted record, if any.
    fn latest_record(&self) -> RepoResult<Option<DomainRecord>>;
}

/// SQLite-backed record repository.
pub struct SqliteRecordRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRecordRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl RecordRepository for SqliteRecordRepository<'_> {
    fn insert_record(&self, record: &DomainRecord) -> RepoResult<InsertOutcome> {
        record.validate()?;
        let id = record.id();

        if let Some(existing) = self.get_record(id)? {
            if existing == *record {
                debug!("event=record_insert module=repo status=skipped reason=duplicate");
                return Ok(InsertOutcome::AlreadyPresent(id));
            }
            warn!("event=record_insert module=repo status=error error_code=record_conflict");
            return Err(RepoError::Conflict {
                name: record.name().to_string(),
            });
        }

        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            "INSERT INTO records (id, seq, name, image_reference)
             VALUES (?1, (SELECT COALESCE(MAX(seq), 0) + 1 FROM records), ?2, ?3);",
            params![
                id.to_string(),
                record.name(),
                record.image_reference().as_str()
            ],
        )?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO record_categories (record_id, position, category)
                 VALUES (?1, ?2, ?3);",
            )?;
            for (position, category) in record.categories().iter().enumerate() {
                stmt.execute(params![id.to_string(), position as i64, category])?;
            }
        }
        tx.commit()?;

        Ok(InsertOutcome::Inserted(id))
    }

    fn list_records(&self) -> RepoResult<Vec<DomainRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(self.parse_record_row(row)?);
        }

        Ok(records)
    }

    fn get_record(&self, id: RecordId) -> RepoResult<Option<DomainRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{RECORD_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id.to_string()])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(self.parse_record_row(row)?));
        }

        Ok(None)
    }

    fn count_records(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM records;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative record count `{count}`")))
    }

    fn latest_record(&self) -> RepoResult<Option<DomainRecord>> {
        let id_text: Option<String> = self
            .conn
            .query_row(
                "SELECT id FROM records ORDER BY seq DESC LIMIT 1;",
                [],
                |row| row.get(0),
            )
            .optional()?;

        match id_text {
            Some(id_text) => self.get_record(parse_record_id(&id_text)?),
            None => Ok(None),
        }
    }
}

impl SqliteRecordRepository<'_> {
    fn parse_record_row(&self, row: &Row<'_>) -> RepoResult<DomainRecord> {
        let id_text: String = row.get("id")?;
        let id = parse_record_id(&id_text)?;
        let name: String = row.get("name")?;
        let image_reference: String = row.get("image_reference")?;

        if id != record_id_for(&name) {
            return Err(RepoError::InvalidData(format!(
                "records.id `{id_text}` does not match name `{name}`"
            )));
        }

        let categories = self.load_categories(&id_text)?;
        DomainRecord::new(name, categories, ImageRef::new(image_reference))
            .map_err(|err| RepoError::InvalidData(format!("record `{id_text}`: {err}")))
    }

    fn load_categories(&self, id_text: &str) -> RepoResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT category
             FROM record_categories
             WHERE record_id = ?1
             ORDER BY position ASC;",
        )?;
        let categories = stmt
            .query_map([id_text], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(categories)
    }
}

fn parse_record_id(value: &str) -> RepoResult<RecordId> {
    RecordId::parse_str(value)
        .map_err(|_| RepoError::InvalidData(format!("invalid uuid value `{value}` in records.id")))
}

/// Opens a fresh in-memory store seeded with one record.
///
/// Replaces a process-wide preview container: callers own the returned
/// connection and pass it to whatever needs the store.
pub fn make_in_memory_store(seed: &DomainRecord) -> RepoResult<Connection> {
    let conn = open_db_in_memory()?;
    SqliteRecordRepository::new(&conn).insert_record(seed)?;
    Ok(conn)
}
