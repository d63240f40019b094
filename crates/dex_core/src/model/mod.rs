//! Domain model for the creature profile and its display projections.
//!
//! # Responsibility
//! - Define the canonical record loaded from the bundled resource.
//! - Define timeline entries consumed by the display surface.
//!
//! # Invariants
//! - Records are immutable after construction.
//! - Snapshot entries never reference the record they were projected from.
//!
//! # See also
//! - DESIGN.md (model)

pub mod record;
pub mod snapshot;
