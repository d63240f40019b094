//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate decode + store calls into the record loading use case.
//! - Produce display timelines from whatever the store currently holds.
//!
//! # See also
//! - DESIGN.md (services)

pub mod record_loader;
pub mod timeline_service;
