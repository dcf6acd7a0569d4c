use thiserror::Error;

use super::{Category, Employee};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReferenceError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid reference data: {0}")]
    Invalid(String),
}

/// Lookup list of ticket categories.
pub trait CategoryStore: Send + Sync {
    /// All categories, ordered by name.
    fn list(&self) -> Result<Vec<Category>, ReferenceError>;

    /// Insert a category, returning it with its assigned ID.
    fn create(&self, name: &str) -> Result<Category, ReferenceError>;
}

/// Lookup list of employees.
pub trait EmployeeStore: Send + Sync {
    /// All employees, ordered by last then first name.
    fn list(&self) -> Result<Vec<Employee>, ReferenceError>;

    /// Insert an employee, returning it with its assigned ID.
    fn create(&self, first_name: &str, last_name: &str) -> Result<Employee, ReferenceError>;
}
