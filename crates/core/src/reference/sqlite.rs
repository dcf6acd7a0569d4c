//! SQLite-backed category and employee lookups.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{params, Connection};
use tracing::info;

use super::{Category, CategoryStore, Employee, EmployeeStore, ReferenceError};
use crate::config::ReferenceConfig;

/// Rows inserted by [`SqliteReferenceStore::seed`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub categories: usize,
    pub employees: usize,
}

/// SQLite store for the reference lists tickets point at.
pub struct SqliteReferenceStore {
    conn: Mutex<Connection>,
}

impl SqliteReferenceStore {
    /// Open (or create) the reference tables in the database at `path`.
    pub fn new(path: &Path) -> Result<Self, ReferenceError> {
        let conn = Connection::open(path).map_err(|e| ReferenceError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory store (useful for testing).
    pub fn in_memory() -> Result<Self, ReferenceError> {
        let conn =
            Connection::open_in_memory().map_err(|e| ReferenceError::Database(e.to_string()))?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), ReferenceError> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL UNIQUE
            );

            CREATE TABLE IF NOT EXISTS employees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                first_name TEXT NOT NULL,
                last_name TEXT NOT NULL
            );
            "#,
        )
        .map_err(|e| ReferenceError::Database(e.to_string()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, ReferenceError> {
        self.conn
            .lock()
            .map_err(|_| ReferenceError::Database("connection lock poisoned".to_string()))
    }

    /// Insert configured categories and employees that do not exist yet.
    pub fn seed(&self, config: &ReferenceConfig) -> Result<SeedSummary, ReferenceError> {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction()
            .map_err(|e| ReferenceError::Database(e.to_string()))?;

        let mut summary = SeedSummary::default();

        for name in &config.categories {
            summary.categories += tx
                .execute(
                    "INSERT OR IGNORE INTO categories (name) VALUES (?)",
                    params![name.trim()],
                )
                .map_err(|e| ReferenceError::Database(e.to_string()))?;
        }

        for employee in &config.employees {
            summary.employees += tx
                .execute(
                    "INSERT INTO employees (first_name, last_name) SELECT ?1, ?2 WHERE NOT EXISTS (SELECT 1 FROM employees WHERE first_name = ?1 AND last_name = ?2)",
                    params![employee.first_name.trim(), employee.last_name.trim()],
                )
                .map_err(|e| ReferenceError::Database(e.to_string()))?;
        }

        tx.commit()
            .map_err(|e| ReferenceError::Database(e.to_string()))?;

        if summary != SeedSummary::default() {
            info!(
                categories = summary.categories,
                employees = summary.employees,
                "Seeded reference data"
            );
        }

        Ok(summary)
    }
}

impl CategoryStore for SqliteReferenceStore {
    fn list(&self) -> Result<Vec<Category>, ReferenceError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare("SELECT id, name FROM categories ORDER BY name ASC")
            .map_err(|e| ReferenceError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                })
            })
            .map_err(|e| ReferenceError::Database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| ReferenceError::Database(e.to_string()))
    }

    fn create(&self, name: &str) -> Result<Category, ReferenceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ReferenceError::Invalid(
                "category name must not be empty".to_string(),
            ));
        }

        let conn = self.lock()?;
        conn.execute("INSERT INTO categories (name) VALUES (?)", params![name])
            .map_err(|e| ReferenceError::Database(e.to_string()))?;

        Ok(Category {
            id: conn.last_insert_rowid(),
            name: name.to_string(),
        })
    }
}

impl EmployeeStore for SqliteReferenceStore {
    fn list(&self) -> Result<Vec<Employee>, ReferenceError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, first_name, last_name FROM employees ORDER BY last_name ASC, first_name ASC",
            )
            .map_err(|e| ReferenceError::Database(e.to_string()))?;

        let rows = stmt
            .query_map([], |row| {
                Ok(Employee {
                    id: row.get(0)?,
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                })
            })
            .map_err(|e| ReferenceError::Database(e.to_string()))?;

        rows.collect::<Result<Vec<_>, _>>()
            .map_err(|e| ReferenceError::Database(e.to_string()))
    }

    fn create(&self, first_name: &str, last_name: &str) -> Result<Employee, ReferenceError> {
        let (first_name, last_name) = (first_name.trim(), last_name.trim());
        if first_name.is_empty() || last_name.is_empty() {
            return Err(ReferenceError::Invalid(
                "employee needs a first and last name".to_string(),
            ));
        }

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO employees (first_name, last_name) VALUES (?, ?)",
            params![first_name, last_name],
        )
        .map_err(|e| ReferenceError::Database(e.to_string()))?;

        Ok(Employee {
            id: conn.last_insert_rowid(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
        })
    }
}
