//! SQLite-backed persistence.
//!
//! One store struct owns all tables so that cross-entity units (ticket +
//! log + follow-up, or ticket + staff occupancy + log) commit in a single
//! transaction.

mod sqlite;

pub use sqlite::SqliteStore;
