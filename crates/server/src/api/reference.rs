//! Lookup lists for ticket forms.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;

use helpdesk_core::{Category, Employee};

use super::ApiError;
use crate::state::AppState;

/// Employee as listed for assignment, with the display name precomputed.
#[derive(Debug, Serialize)]
pub struct EmployeeResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

impl From<Employee> for EmployeeResponse {
    fn from(employee: Employee) -> Self {
        Self {
            full_name: employee.full_name(),
            id: employee.id,
            first_name: employee.first_name,
            last_name: employee.last_name,
        }
    }
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(state.service().categories()?))
}

pub async fn list_employees(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EmployeeResponse>>, ApiError> {
    let employees = state.service().employees()?;
    Ok(Json(employees.into_iter().map(Into::into).collect()))
}
