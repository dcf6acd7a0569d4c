//! SQLite-backed ticket store implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::{params, Connection};

use super::{NewTicket, Ticket, TicketError, TicketFilter, TicketStatus, TicketStore};

const TICKET_COLUMNS: &str = "id, title, description, category_id, assigned_employee_id, status, resolution_notes, date_created, date_resolved";

/// SQLite-backed ticket store.
pub struct SqliteTicketStore {
    conn: Mutex<Connection>,
}

impl SqliteTicketStore {
    /// Create a new SQLite ticket store, creating the database file and tables if needed.
    pub fn new(path: &Path) -> Result<Self, TicketError> {
        let conn = Connection::open(path).map_err(|e| TicketError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite ticket store (useful for testing).
    pub fn in_memory() -> Result<Self, TicketError> {
        let conn =
            Connection::open_in_memory().map_err(|e| TicketError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), TicketError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS tickets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT,
                category_id INTEGER NOT NULL,
                assigned_employee_id INTEGER,
                status TEXT NOT NULL,
                resolution_notes TEXT,
                date_created TEXT NOT NULL,
                date_resolved TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_tickets_status ON tickets(status);
            CREATE INDEX IF NOT EXISTS idx_tickets_category ON tickets(category_id);
            CREATE INDEX IF NOT EXISTS idx_tickets_date_created ON tickets(date_created);
            "#,
        )
        .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, TicketError> {
        self.conn
            .lock()
            .map_err(|_| TicketError::Database("connection lock poisoned".to_string()))
    }

    fn build_where_clause(filter: &TicketFilter) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(status) = filter.status {
            conditions.push("status = ?");
            params.push(Box::new(status.as_str()));
        }

        if let Some(category_id) = filter.category_id {
            conditions.push("category_id = ?");
            params.push(Box::new(category_id));
        }

        if let Some(ref keyword) = filter.keyword {
            conditions.push(
                "(LOWER(title) LIKE ? ESCAPE '\\' OR LOWER(COALESCE(description, '')) LIKE ? ESCAPE '\\')",
            );
            let pattern = format!("%{}%", escape_like(&keyword.to_ascii_lowercase()));
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    fn row_to_ticket(row: &rusqlite::Row) -> rusqlite::Result<Ticket> {
        let status_str: String = row.get(5)?;
        let status: TicketStatus = status_str.parse().map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e))
        })?;

        let date_created_str: String = row.get(7)?;
        let date_resolved_str: Option<String> = row.get(8)?;

        Ok(Ticket {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            category_id: row.get(3)?,
            assigned_employee_id: row.get(4)?,
            status,
            resolution_notes: row.get(6)?,
            date_created: parse_timestamp(7, &date_created_str)?,
            date_resolved: date_resolved_str
                .map(|s| parse_timestamp(8, &s))
                .transpose()?,
        })
    }

    fn get_with(conn: &Connection, id: i64) -> Result<Option<Ticket>, TicketError> {
        let sql = format!("SELECT {} FROM tickets WHERE id = ?", TICKET_COLUMNS);
        let result = conn.query_row(&sql, params![id], Self::row_to_ticket);

        match result {
            Ok(ticket) => Ok(Some(ticket)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(TicketError::Database(e.to_string())),
        }
    }
}

/// Fixed-width RFC 3339 so stored timestamps sort lexically.
fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl TicketStore for SqliteTicketStore {
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError> {
        let conn = self.lock()?;

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT {} FROM tickets {} ORDER BY date_created DESC, id DESC",
            TICKET_COLUMNS, where_clause
        );

        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let rows = stmt
            .query_map(param_refs.as_slice(), Self::row_to_ticket)
            .map_err(|e| TicketError::Database(e.to_string()))?;

        let mut tickets = Vec::new();
        for row_result in rows {
            let ticket = row_result.map_err(|e| TicketError::Database(e.to_string()))?;
            tickets.push(ticket);
        }

        Ok(tickets)
    }

    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError> {
        let conn = self.lock()?;

        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!("SELECT COUNT(*) FROM tickets {}", where_clause);

        let param_refs: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let count: i64 = conn
            .query_row(&sql, param_refs.as_slice(), |row| row.get(0))
            .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(count)
    }

    fn get(&self, id: i64) -> Result<Option<Ticket>, TicketError> {
        let conn = self.lock()?;
        Self::get_with(&conn, id)
    }

    fn add(&self, ticket: NewTicket) -> Result<Ticket, TicketError> {
        let conn = self.lock()?;

        conn.execute(
            "INSERT INTO tickets (title, description, category_id, assigned_employee_id, status, resolution_notes, date_created, date_resolved) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                ticket.title,
                ticket.description,
                ticket.category_id,
                ticket.assigned_employee_id,
                ticket.status.as_str(),
                ticket.resolution_notes,
                format_timestamp(&ticket.date_created),
                ticket.date_resolved.as_ref().map(format_timestamp),
            ],
        )
        .map_err(|e| TicketError::Database(e.to_string()))?;

        let id = conn.last_insert_rowid();
        Ok(ticket.into_ticket(id))
    }

    fn update(&self, ticket: &Ticket) -> Result<(), TicketError> {
        let conn = self.lock()?;

        let changed = conn
            .execute(
                "UPDATE tickets SET title = ?, description = ?, category_id = ?, assigned_employee_id = ?, status = ?, resolution_notes = ?, date_created = ?, date_resolved = ? WHERE id = ?",
                params![
                    ticket.title,
                    ticket.description,
                    ticket.category_id,
                    ticket.assigned_employee_id,
                    ticket.status.as_str(),
                    ticket.resolution_notes,
                    format_timestamp(&ticket.date_created),
                    ticket.date_resolved.as_ref().map(format_timestamp),
                    ticket.id,
                ],
            )
            .map_err(|e| TicketError::Database(e.to_string()))?;

        if changed == 0 {
            return Err(TicketError::NotFound(ticket.id));
        }

        Ok(())
    }

    fn delete(&self, id: i64) -> Result<Ticket, TicketError> {
        let conn = self.lock()?;

        // First, get the ticket to return it
        let ticket = Self::get_with(&conn, id)?.ok_or(TicketError::NotFound(id))?;

        conn.execute("DELETE FROM tickets WHERE id = ?", params![id])
            .map_err(|e| TicketError::Database(e.to_string()))?;

        Ok(ticket)
    }
}
