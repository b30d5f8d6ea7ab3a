//! Ticket engine: creation orchestration, assignment coordination and
//! derived statistics over the storage contract.

mod tickets;

pub use tickets::{CreateTicketRequest, CreatedTicket, TicketService};
