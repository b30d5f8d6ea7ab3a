//! Append-only ticket log.
//!
//! Every lifecycle-affecting action writes one immutable log row in the same
//! transaction as the entity change, so a ticket can never exist without its
//! `created` entry. This module holds the event payloads and the read-only
//! query contract; insertion happens inside the storage transactions.

mod events;
mod store;

pub use events::{LogRecord, TicketEvent};
pub use store::{AuditError, LogFilter, LogStore};
