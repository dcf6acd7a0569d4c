//! Reference lists (categories, employees) that tickets point at.

mod sqlite;
mod store;
mod types;

pub use sqlite::{SeedSummary, SqliteReferenceStore};
pub use store::{CategoryStore, EmployeeStore, ReferenceError};
pub use types::{Category, Employee};
