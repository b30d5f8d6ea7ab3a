//! SQLite store implementation.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Transaction};

use crate::audit::{AuditError, LogFilter, LogRecord, LogStore, TicketEvent};
use crate::staff::{Staff, StaffError, StaffSkill, StaffStore};
use crate::ticket::{
    can_transition, FollowUpTask, TaskPriority, TaskStatus, Ticket, TicketDetails, TicketError,
    TicketFilter, TicketStats, TicketStatus, TicketStore,
};

const TICKET_COLUMNS: &str = "id, organization_id, created_by, status, description, category, \
     priority_level, details, required_fields, assigned_staff_id, estimated_response_time, \
     extensions, client_request_id, created_at, updated_at, is_deleted";

const STAFF_COLUMNS: &str =
    "id, organization_id, name, email, is_on_job, is_active, skills, created_at";

/// SQLite-backed store for tickets, staff, follow-up tasks and the ticket
/// log. All tables share one connection so multi-entity operations run as
/// single transactions.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database file and initialize the schema.
    pub fn new(path: &Path) -> Result<Self, TicketError> {
        let conn = Connection::open(path).map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, TicketError> {
        let conn = Connection::open_in_memory().map_err(db_err)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), TicketError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id TEXT PRIMARY KEY,
                organization_id TEXT NOT NULL,
                created_by TEXT NOT NULL,
                kind TEXT NOT NULL,
                status TEXT NOT NULL,
                description TEXT,
                category TEXT,
                priority_level INTEGER,
                details TEXT NOT NULL,
                required_fields TEXT NOT NULL,
                assigned_staff_id TEXT,
                estimated_response_time INTEGER,
                extensions TEXT,
                client_request_id TEXT UNIQUE,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                is_deleted INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_tickets_organization ON tickets(organization_id);
            CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
            CREATE INDEX IF NOT EXISTS idx_tickets_created_by ON tickets(created_by);

            CREATE TABLE IF NOT EXISTS staff (
                id TEXT PRIMARY KEY,
                organization_id TEXT NOT NULL,
                name TEXT NOT NULL,
                email TEXT UNIQUE,
                is_on_job INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                skills TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_staff_organization ON staff(organization_id);

            CREATE TABLE IF NOT EXISTS followup_tasks (
                id TEXT PRIMARY KEY,
                ticket_id TEXT NOT NULL REFERENCES tickets(id) ON DELETE CASCADE,
                missing_fields TEXT NOT NULL,
                priority TEXT NOT NULL,
                due_date TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_followup_tasks_ticket ON followup_tasks(ticket_id);

            CREATE TABLE IF NOT EXISTS ticket_logs (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                ticket_id TEXT NOT NULL,
                action TEXT NOT NULL,
                performed_by TEXT,
                timestamp TEXT NOT NULL,
                data TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_ticket_logs_ticket ON ticket_logs(ticket_id);
            CREATE INDEX IF NOT EXISTS idx_ticket_logs_action ON ticket_logs(action);
            CREATE INDEX IF NOT EXISTS idx_ticket_logs_performed_by ON ticket_logs(performed_by);
            "#,
        )
        .map_err(db_err)
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let id: String = row.get(0)?;
        let organization_id: String = row.get(1)?;
        let created_by: String = row.get(2)?;
        let status_str: String = row.get(3)?;
        let description: Option<String> = row.get(4)?;
        let category: Option<String> = row.get(5)?;
        let priority_level: Option<u8> = row.get(6)?;
        let details_json: String = row.get(7)?;
        let required_json: String = row.get(8)?;
        let assigned_staff_id: Option<String> = row.get(9)?;
        let estimated_response_time: Option<u32> = row.get(10)?;
        let extensions_json: Option<String> = row.get(11)?;
        let client_request_id: Option<String> = row.get(12)?;
        let created_at_str: String = row.get(13)?;
        let updated_at_str: String = row.get(14)?;
        let is_deleted: bool = row.get(15)?;

        let status = TicketStatus::parse(&status_str)
            .ok_or_else(|| conversion_err(3, format!("unknown ticket status: {status_str}")))?;

        let details: TicketDetails = serde_json::from_str(&details_json)
            .map_err(|e| conversion_err(7, e.to_string()))?;

        let required_fields_status: BTreeMap<String, bool> =
            serde_json::from_str(&required_json).map_err(|e| conversion_err(8, e.to_string()))?;

        let extensions: BTreeMap<String, serde_json::Value> = match extensions_json {
            Some(json) => {
                serde_json::from_str(&json).map_err(|e| conversion_err(11, e.to_string()))?
            }
            None => BTreeMap::new(),
        };

        Ok(Ticket {
            id,
            organization_id,
            created_by,
            status,
            description,
            category,
            priority_level,
            details,
            required_fields_status,
            assigned_staff_id,
            estimated_response_time,
            extensions,
            client_request_id,
            created_at: parse_timestamp(13, &created_at_str)?,
            updated_at: parse_timestamp(14, &updated_at_str)?,
            is_deleted,
        })
    }

    fn row_to_staff(row: &rusqlite::Row) -> rusqlite::Result<Staff> {
        let id: String = row.get(0)?;
        let organization_id: String = row.get(1)?;
        let name: String = row.get(2)?;
        let email: Option<String> = row.get(3)?;
        let is_on_job: bool = row.get(4)?;
        let is_active: bool = row.get(5)?;
        let skills_json: String = row.get(6)?;
        let created_at_str: String = row.get(7)?;

        let skills: Vec<StaffSkill> =
            serde_json::from_str(&skills_json).map_err(|e| conversion_err(6, e.to_string()))?;

        Ok(Staff {
            id,
            organization_id,
            name,
            email,
            is_on_job,
            is_active,
            skills,
            created_at: parse_timestamp(7, &created_at_str)?,
        })
    }

    fn row_to_followup(row: &rusqlite::Row) -> rusqlite::Result<FollowUpTask> {
        let id: String = row.get(0)?;
        let ticket_id: String = row.get(1)?;
        let missing_json: String = row.get(2)?;
        let priority_str: String = row.get(3)?;
        let due_date_str: String = row.get(4)?;
        let status_str: String = row.get(5)?;
        let created_at_str: String = row.get(6)?;

        let missing_fields: Vec<String> =
            serde_json::from_str(&missing_json).map_err(|e| conversion_err(2, e.to_string()))?;

        let priority = TaskPriority::parse(&priority_str)
            .ok_or_else(|| conversion_err(3, format!("unknown task priority: {priority_str}")))?;

        let status = TaskStatus::parse(&status_str)
            .ok_or_else(|| conversion_err(5, format!("unknown task status: {status_str}")))?;

        Ok(FollowUpTask {
            id,
            ticket_id,
            missing_fields,
            priority,
            due_date: parse_timestamp(4, &due_date_str)?,
            status,
            created_at: parse_timestamp(6, &created_at_str)?,
        })
    }

    fn get_ticket_tx(tx: &Transaction, id: &str) -> Result<Option<Ticket>, TicketError> {
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ? AND is_deleted = 0");
        match tx.query_row(&sql, params![id], Self::row_to_ticket) {
            Ok(ticket) => Ok(Some(ticket)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    /// Append one log row. Always called inside the transaction of the
    /// operation it records.
    fn insert_log(
        tx: &Transaction,
        event: &TicketEvent,
        performed_by: Option<&str>,
        timestamp: DateTime<Utc>,
    ) -> Result<(), TicketError> {
        let data_json = serde_json::to_string(event)
            .map_err(|e| TicketError::Database(e.to_string()))?;
        let performer = event.performer().or(performed_by);

        tx.execute(
            "INSERT INTO ticket_logs (ticket_id, action, performed_by, timestamp, data) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                event.ticket_id(),
                event.action(),
                performer,
                timestamp.to_rfc3339(),
                data_json,
            ],
        )
        .map_err(db_err)?;
        Ok(())
    }

    fn build_ticket_where(filter: &TicketFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = vec!["is_deleted = 0"];
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref organization_id) = filter.organization_id {
            conditions.push("organization_id = ?");
            params.push(Box::new(organization_id.clone()));
        }

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(kind) = filter.kind {
            conditions.push("kind = ?");
            params.push(Box::new(kind.as_str()));
        }

        if let Some(ref created_by) = filter.created_by {
            conditions.push("created_by = ?");
            params.push(Box::new(created_by.clone()));
        }

        if let Some(ref staff_id) = filter.assigned_staff_id {
            conditions.push("assigned_staff_id = ?");
            params.push(Box::new(staff_id.clone()));
        }

        (format!("WHERE {}", conditions.join(" AND ")), params)
    }

    fn build_log_where(filter: &LogFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref ticket_id) = filter.ticket_id {
            conditions.push("ticket_id = ?");
            params.push(Box::new(ticket_id.clone()));
        }

        if let Some(ref action) = filter.action {
            conditions.push("action = ?");
            params.push(Box::new(action.clone()));
        }

        if let Some(ref performed_by) = filter.performed_by {
            conditions.push("performed_by = ?");
            params.push(Box::new(performed_by.clone()));
        }

        if let Some(ref from) = filter.from {
            conditions.push("timestamp >= ?");
            params.push(Box::new(from.to_rfc3339()));
        }

        if let Some(ref to) = filter.to {
            conditions.push("timestamp <= ?");
            params.push(Box::new(to.to_rfc3339()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }
}

impl TicketStore for SqliteStore {
    fn create(&self, ticket: &Ticket, followup: Option<&FollowUpTask>) -> Result<(), TicketError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(db_err)?;

        let details_json = serde_json::to_string(&ticket.details)
            .map_err(|e| TicketError::Database(e.to_string()))?;
        let required_json = serde_json::to_string(&ticket.required_fields_status)
            .map_err(|e| TicketError::Database(e.to_string()))?;
        let extensions_json = if ticket.extensions.is_empty() {
            None
        } else {
            Some(
                serde_json::to_string(&ticket.extensions)
                    .map_err(|e| TicketError::Database(e.to_string()))?,
            )
        };

        tx.execute(
            "INSERT INTO tickets (id, organization_id, created_by, kind, status, description, \
             category, priority_level, details, required_fields, assigned_staff_id, \
             estimated_response_time, extensions, client_request_id, created_at, updated_at, \
             is_deleted) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 0)",
            params![
                ticket.id,
                ticket.organization_id,
                ticket.created_by,
                ticket.kind().as_str(),
                ticket.status.as_str(),
                ticket.description,
                ticket.category,
                ticket.priority_level,
                details_json,
                required_json,
                ticket.assigned_staff_id,
                ticket.estimated_response_time,
                extensions_json,
                ticket.client_request_id,
                ticket.created_at.to_rfc3339(),
                ticket.updated_at.to_rfc3339(),
            ],
        )
        .map_err(db_err)?;

        Self::insert_log(
            &tx,
            &TicketEvent::Created {
                ticket_id: ticket.id.clone(),
                initial_status: ticket.status,
                missing_fields: ticket.missing_fields(),
            },
            None,
            ticket.created_at,
        )?;

        if let Some(task) = followup {
            let missing_json = serde_json::to_string(&task.missing_fields)
                .map_err(|e| TicketError::Database(e.to_string()))?;
            tx.execute(
                "INSERT INTO followup_tasks (id, ticket_id, missing_fields, priority, due_date, \
                 status, created_at) VALUES (?, ?, ?, ?, ?, ?, ?)",
                params![
                    task.id,
                    task.ticket_id,
                    missing_json,
                    task.priority.as_str(),
                    task.due_date.to_rfc3339(),
                    task.status.as_str(),
                    task.created_at.to_rfc3339(),
                ],
            )
            .map_err(db_err)?;
        }

        tx.commit().map_err(db_err)
    }

    fn get(&self, id: &str) -> Result<Option<Ticket>, TicketError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {TICKET_COLUMNS} FROM tickets WHERE id = ? AND is_deleted = 0");
        match conn.query_row(&sql, params![id], Self::row_to_ticket) {
            Ok(ticket) => Ok(Some(ticket)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    fn find_by_request_id(&self, client_request_id: &str) -> Result<Option<Ticket>, TicketError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets WHERE client_request_id = ? AND is_deleted = 0"
        );
        match conn.query_row(&sql, params![client_request_id], Self::row_to_ticket) {
            Ok(ticket) => Ok(Some(ticket)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(db_err(e)),
        }
    }

    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError> {
        let conn = self.conn.lock().unwrap();
        let (where_clause, params) = Self::build_ticket_where(filter);

        let sql = format!(
            "SELECT {TICKET_COLUMNS} FROM tickets {where_clause} \
             ORDER BY created_at DESC LIMIT ? OFFSET ?"
        );

        let mut stmt = conn.prepare(&sql).map_err(db_err)?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));
        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_ticket)
            .map_err(db_err)?;

        let mut tickets = Vec::new();
        for row in rows {
            tickets.push(row.map_err(db_err)?);
        }
        Ok(tickets)
    }

    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError> {
        let conn = self.conn.lock().unwrap();
        let (where_clause, params) = Self::build_ticket_where(filter);
        let sql = format!("SELECT COUNT(*) FROM tickets {where_clause}");
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(db_err)
    }

    fn assign(
        &self,
        id: &str,
        staff_id: &str,
        eta_minutes: u32,
        now: DateTime<Utc>,
    ) -> Result<Ticket, TicketError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(db_err)?;

        let ticket = Self::get_ticket_tx(&tx, id)?
            .ok_or_else(|| TicketError::NotFound(id.to_string()))?;

        if !can_transition(ticket.status, TicketStatus::Assigned) {
            return Err(TicketError::InvalidTransition {
                ticket_id: id.to_string(),
                from: ticket.status,
                to: TicketStatus::Assigned,
            });
        }

        let staff_exists: bool = tx
            .query_row(
                "SELECT COUNT(*) FROM staff WHERE id = ? AND is_active = 1",
                params![staff_id],
                |row| row.get::<_, i64>(0).map(|n| n > 0),
            )
            .map_err(db_err)?;
        if !staff_exists {
            return Err(TicketError::StaffNotFound(staff_id.to_string()));
        }

        // Occupancy claim: the guarded update makes exactly one concurrent
        // assignment win; the loser observes zero affected rows.
        let claimed = tx
            .execute(
                "UPDATE staff SET is_on_job = 1 WHERE id = ? AND is_on_job = 0",
                params![staff_id],
            )
            .map_err(db_err)?;
        if claimed == 0 {
            return Err(TicketError::StaffBusy(staff_id.to_string()));
        }

        tx.execute(
            "UPDATE tickets SET status = ?, assigned_staff_id = ?, estimated_response_time = ?, \
             updated_at = ? WHERE id = ?",
            params![
                TicketStatus::Assigned.as_str(),
                staff_id,
                eta_minutes,
                now.to_rfc3339(),
                id,
            ],
        )
        .map_err(db_err)?;

        Self::insert_log(
            &tx,
            &TicketEvent::Assigned {
                ticket_id: id.to_string(),
                staff_id: staff_id.to_string(),
                estimated_response_time: eta_minutes,
            },
            None,
            now,
        )?;

        tx.commit().map_err(db_err)?;

        Ok(Ticket {
            status: TicketStatus::Assigned,
            assigned_staff_id: Some(staff_id.to_string()),
            estimated_response_time: Some(eta_minutes),
            updated_at: now,
            ..ticket
        })
    }

    fn update_status(
        &self,
        id: &str,
        requested: TicketStatus,
        performed_by: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Ticket, TicketError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(db_err)?;

        let ticket = Self::get_ticket_tx(&tx, id)?
            .ok_or_else(|| TicketError::NotFound(id.to_string()))?;

        if !can_transition(ticket.status, requested) {
            return Err(TicketError::InvalidTransition {
                ticket_id: id.to_string(),
                from: ticket.status,
                to: requested,
            });
        }

        tx.execute(
            "UPDATE tickets SET status = ?, updated_at = ? WHERE id = ?",
            params![requested.as_str(), now.to_rfc3339(), id],
        )
        .map_err(db_err)?;

        Self::insert_log(
            &tx,
            &TicketEvent::StatusChanged {
                ticket_id: id.to_string(),
                from: ticket.status,
                to: requested,
            },
            performed_by,
            now,
        )?;

        tx.commit().map_err(db_err)?;

        Ok(Ticket {
            status: requested,
            updated_at: now,
            ..ticket
        })
    }

    fn soft_delete(
        &self,
        id: &str,
        performed_by: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<Ticket, TicketError> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction().map_err(db_err)?;

        let ticket = Self::get_ticket_tx(&tx, id)?
            .ok_or_else(|| TicketError::NotFound(id.to_string()))?;

        tx.execute(
            "UPDATE tickets SET is_deleted = 1, updated_at = ? WHERE id = ?",
            params![now.to_rfc3339(), id],
        )
        .map_err(db_err)?;

        Self::insert_log(
            &tx,
            &TicketEvent::Deleted {
                ticket_id: id.to_string(),
                previous_status: ticket.status,
            },
            performed_by,
            now,
        )?;

        tx.commit().map_err(db_err)?;

        Ok(Ticket {
            updated_at: now,
            is_deleted: true,
            ..ticket
        })
    }

    fn stats(&self, organization_id: &str) -> Result<TicketStats, TicketError> {
        let conn = self.conn.lock().unwrap();

        let total: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM tickets WHERE organization_id = ? AND is_deleted = 0",
                params![organization_id],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        let open: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM tickets WHERE organization_id = ? AND is_deleted = 0 \
                 AND status IN ('pending', 'assigned')",
                params![organization_id],
                |row| row.get(0),
            )
            .map_err(db_err)?;

        let resolution_rate = if total > 0 {
            (total - open) as f64 / total as f64
        } else {
            0.0
        };

        Ok(TicketStats {
            total_tickets: total,
            open_tickets: open,
            resolution_rate,
        })
    }

    fn followups(&self, ticket_id: &str) -> Result<Vec<FollowUpTask>, TicketError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, ticket_id, missing_fields, priority, due_date, status, created_at \
                 FROM followup_tasks WHERE ticket_id = ? ORDER BY created_at ASC",
            )
            .map_err(db_err)?;

        let rows = stmt
            .query_map(params![ticket_id], Self::row_to_followup)
            .map_err(db_err)?;

        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row.map_err(db_err)?);
        }
        Ok(tasks)
    }
}

impl StaffStore for SqliteStore {
    fn create(&self, staff: &Staff) -> Result<(), StaffError> {
        let conn = self.conn.lock().unwrap();
        let skills_json =
            serde_json::to_string(&staff.skills).map_err(|e| StaffError::Database(e.to_string()))?;

        conn.execute(
            "INSERT INTO staff (id, organization_id, name, email, is_on_job, is_active, skills, \
             created_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                staff.id,
                staff.organization_id,
                staff.name,
                staff.email,
                staff.is_on_job,
                staff.is_active,
                skills_json,
                staff.created_at.to_rfc3339(),
            ],
        )
        .map_err(staff_err)?;
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<Staff>, StaffError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?");
        match conn.query_row(&sql, params![id], Self::row_to_staff) {
            Ok(staff) => Ok(Some(staff)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(staff_err(e)),
        }
    }

    fn list_available(
        &self,
        organization_id: &str,
        skill_category: Option<&str>,
    ) -> Result<Vec<Staff>, StaffError> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT {STAFF_COLUMNS} FROM staff WHERE organization_id = ? AND is_on_job = 0 \
             AND is_active = 1 ORDER BY name ASC"
        );
        let mut stmt = conn.prepare(&sql).map_err(staff_err)?;
        let rows = stmt
            .query_map(params![organization_id], Self::row_to_staff)
            .map_err(staff_err)?;

        let mut members = Vec::new();
        for row in rows {
            let staff = row.map_err(staff_err)?;
            if skill_category.is_none_or(|category| staff.has_skill(category)) {
                members.push(staff);
            }
        }
        Ok(members)
    }

    fn release(&self, id: &str) -> Result<Staff, StaffError> {
        let conn = self.conn.lock().unwrap();

        let updated = conn
            .execute("UPDATE staff SET is_on_job = 0 WHERE id = ?", params![id])
            .map_err(staff_err)?;
        if updated == 0 {
            return Err(StaffError::NotFound(id.to_string()));
        }

        let sql = format!("SELECT {STAFF_COLUMNS} FROM staff WHERE id = ?");
        conn.query_row(&sql, params![id], Self::row_to_staff)
            .map_err(staff_err)
    }
}

impl LogStore for SqliteStore {
    fn query(&self, filter: &LogFilter) -> Result<Vec<LogRecord>, AuditError> {
        let conn = self.conn.lock().unwrap();
        let (where_clause, params) = Self::build_log_where(filter);

        let sql = format!(
            "SELECT id, ticket_id, action, performed_by, timestamp, data FROM ticket_logs \
             {where_clause} ORDER BY timestamp DESC, id DESC LIMIT ? OFFSET ?"
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| AuditError::Database(e.to_string()))?;

        let mut all_params: Vec<Box<dyn rusqlite::ToSql>> = params;
        all_params.push(Box::new(filter.limit));
        all_params.push(Box::new(filter.offset));
        let param_refs: Vec<&dyn rusqlite::ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), |row| {
                let id: i64 = row.get(0)?;
                let ticket_id: String = row.get(1)?;
                let action: String = row.get(2)?;
                let performed_by: Option<String> = row.get(3)?;
                let timestamp_str: String = row.get(4)?;
                let data_json: String = row.get(5)?;
                Ok((id, ticket_id, action, performed_by, timestamp_str, data_json))
            })
            .map_err(|e| AuditError::Database(e.to_string()))?;

        let mut records = Vec::new();
        for row in rows {
            let (id, ticket_id, action, performed_by, timestamp_str, data_json) =
                row.map_err(|e| AuditError::Database(e.to_string()))?;

            let timestamp: DateTime<Utc> = DateTime::parse_from_rfc3339(&timestamp_str)
                .map_err(|e| AuditError::Database(format!("invalid timestamp: {e}")))?
                .into();

            let data: TicketEvent = serde_json::from_str(&data_json)
                .map_err(|e| AuditError::Serialization(e.to_string()))?;

            records.push(LogRecord {
                id,
                ticket_id,
                action,
                performed_by,
                timestamp,
                data,
            });
        }
        Ok(records)
    }

    fn count(&self, filter: &LogFilter) -> Result<i64, AuditError> {
        let conn = self.conn.lock().unwrap();
        let (where_clause, params) = Self::build_log_where(filter);
        let sql = format!("SELECT COUNT(*) FROM ticket_logs {where_clause}");
        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| AuditError::Database(e.to_string()))
    }
}

fn parse_timestamp(idx: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_err(idx, e.to_string()))
}

fn conversion_err(idx: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        idx,
        rusqlite::types::Type::Text,
        message.into(),
    )
}

/// Translate rusqlite failures into the caller-facing taxonomy.
fn db_err(e: rusqlite::Error) -> TicketError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) => match err.code {
            rusqlite::ErrorCode::ConstraintViolation => TicketError::Constraint(e.to_string()),
            rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                TicketError::Unavailable(e.to_string())
            }
            _ => TicketError::Database(e.to_string()),
        },
        _ => TicketError::Database(e.to_string()),
    }
}

fn staff_err(e: rusqlite::Error) -> StaffError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) => match err.code {
            rusqlite::ErrorCode::ConstraintViolation => StaffError::Constraint(e.to_string()),
            rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked => {
                StaffError::Unavailable(e.to_string())
            }
            _ => StaffError::Database(e.to_string()),
        },
        _ => StaffError::Database(e.to_string()),
    }
}
