//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record store contract (insert, fetch all).
//! - Isolate SQLite query details from loader/timeline orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `DomainRecord::validate()` before
//!   persistence.
//! - Repository APIs return semantic errors (`Conflict`) in addition to DB
//!   transport errors.

pub mod record_repo;
