use chrono::{DateTime, Utc};
use thiserror::Error;

use super::LogRecord;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Filter for querying ticket log entries.
#[derive(Debug, Clone, Default)]
pub struct LogFilter {
    pub ticket_id: Option<String>,
    pub action: Option<String>,
    pub performed_by: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: i64,
    pub offset: i64,
}

impl LogFilter {
    pub fn new() -> Self {
        Self {
            limit: 100,
            offset: 0,
            ..Default::default()
        }
    }

    pub fn with_ticket_id(mut self, ticket_id: impl Into<String>) -> Self {
        self.ticket_id = Some(ticket_id.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    pub fn with_performed_by(mut self, performed_by: impl Into<String>) -> Self {
        self.performed_by = Some(performed_by.into());
        self
    }

    pub fn with_time_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }
}

/// Read-only query contract over the ticket log.
///
/// Entries are written exclusively inside ticket storage transactions;
/// there is no standalone insert path.
pub trait LogStore: Send + Sync {
    /// Query log entries, newest first.
    fn query(&self, filter: &LogFilter) -> Result<Vec<LogRecord>, AuditError>;

    /// Count matching log entries.
    fn count(&self, filter: &LogFilter) -> Result<i64, AuditError>;
}
