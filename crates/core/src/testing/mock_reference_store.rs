//! In-memory category and employee lookups for testing.

use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::config::ReferenceConfig;
use crate::reference::{Category, CategoryStore, Employee, EmployeeStore, ReferenceError};

#[derive(Debug, Default)]
struct Inner {
    categories: Vec<Category>,
    employees: Vec<Employee>,
}

/// Mock implementation of the CategoryStore and EmployeeStore traits.
///
/// Ids are assigned in insertion order starting at 1. Lists come back in
/// insertion order.
#[derive(Debug, Default)]
pub struct MockReferenceStore {
    inner: Mutex<Inner>,
    /// If set, every list call fails with this error.
    fail_with: Mutex<Option<ReferenceError>>,
}

impl MockReferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store holding the configured categories and employees.
    pub fn from_config(config: &ReferenceConfig) -> Self {
        let store = Self::new();
        {
            let mut inner = store.inner();
            for (i, name) in config.categories.iter().enumerate() {
                inner.categories.push(Category {
                    id: i as i64 + 1,
                    name: name.clone(),
                });
            }
            for (i, seed) in config.employees.iter().enumerate() {
                inner.employees.push(Employee {
                    id: i as i64 + 1,
                    first_name: seed.first_name.clone(),
                    last_name: seed.last_name.clone(),
                });
            }
        }
        store
    }

    /// Make every subsequent list call fail.
    pub fn set_failure(&self, error: ReferenceError) {
        *self.fail_with.lock().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn check_failure(&self) -> Result<(), ReferenceError> {
        match &*self.fail_with.lock().unwrap_or_else(PoisonError::into_inner) {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl CategoryStore for MockReferenceStore {
    fn list(&self) -> Result<Vec<Category>, ReferenceError> {
        self.check_failure()?;
        Ok(self.inner().categories.clone())
    }

    fn create(&self, name: &str) -> Result<Category, ReferenceError> {
        let mut inner = self.inner();
        let category = Category {
            id: inner.categories.len() as i64 + 1,
            name: name.trim().to_string(),
        };
        inner.categories.push(category.clone());
        Ok(category)
    }
}

impl EmployeeStore for MockReferenceStore {
    fn list(&self) -> Result<Vec<Employee>, ReferenceError> {
        self.check_failure()?;
        Ok(self.inner().employees.clone())
    }

    fn create(&self, first_name: &str, last_name: &str) -> Result<Employee, ReferenceError> {
        let mut inner = self.inner();
        let employee = Employee {
            id: inner.employees.len() as i64 + 1,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        };
        inner.employees.push(employee.clone());
        Ok(employee)
    }
}
