//! Ticket API handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use helpdesk_core::{
    ticket::BulkDeleteFailure, OperationOutcome, ServiceError, Ticket, TicketDraft, TicketFilter,
    TicketOperation, TicketStatus, TicketView, ValidationError,
};

use super::ApiError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for creating or updating a ticket.
///
/// `status` is free text so an unknown value can be answered with the
/// validation message instead of a deserialization error.
#[derive(Debug, Default, Deserialize)]
pub struct TicketBody {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub category_id: Option<i64>,
    pub assigned_employee_id: Option<i64>,
    pub status: Option<String>,
    pub resolution_notes: Option<String>,
}

impl TryFrom<TicketBody> for TicketDraft {
    type Error = ValidationError;

    fn try_from(body: TicketBody) -> Result<Self, Self::Error> {
        Ok(TicketDraft {
            title: body.title,
            description: body.description,
            category_id: body.category_id,
            assigned_employee_id: body.assigned_employee_id,
            status: parse_status(body.status.as_deref())?,
            resolution_notes: body.resolution_notes,
        })
    }
}

/// Blank means "not selected"; anything else must name a status.
fn parse_status(raw: Option<&str>) -> Result<Option<TicketStatus>, ValidationError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some),
    }
}

/// Query parameters for listing tickets
#[derive(Debug, Deserialize)]
pub struct ListTicketsParams {
    pub status: Option<String>,
    pub category_id: Option<i64>,
    pub keyword: Option<String>,
}

/// Response for listing tickets
#[derive(Debug, Serialize)]
pub struct ListTicketsResponse {
    pub tickets: Vec<TicketView>,
    pub total: usize,
}

/// Response for a successful add, update or delete.
#[derive(Debug, Serialize)]
pub struct MutationResponse {
    #[serde(flatten)]
    pub outcome: OperationOutcome,
    pub ticket: Ticket,
}

/// Response for deleting every ticket.
#[derive(Debug, Serialize)]
pub struct DeleteAllResponse {
    pub success: bool,
    pub message: String,
    pub deleted: Vec<i64>,
    pub failures: Vec<BulkDeleteFailure>,
}

// ============================================================================
// Handlers
// ============================================================================

fn mutation(
    operation: TicketOperation,
    result: Result<Ticket, ServiceError>,
) -> Result<Json<MutationResponse>, ApiError> {
    let outcome = OperationOutcome::from_result(operation, &result);
    let ticket = result?;
    Ok(Json(MutationResponse { outcome, ticket }))
}

/// Create a new ticket
pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(body): Json<TicketBody>,
) -> Result<(StatusCode, Json<MutationResponse>), ApiError> {
    let draft = TicketDraft::try_from(body)?;
    let response = mutation(TicketOperation::Add, state.service().add(draft))?;
    Ok((StatusCode::CREATED, response))
}

/// Get a ticket by ID
pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<TicketView>, ApiError> {
    state
        .service()
        .get(id)?
        .map(Json)
        .ok_or(ApiError(ServiceError::NotFound(id)))
}

/// List tickets with optional filters
pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListTicketsParams>,
) -> Result<Json<ListTicketsResponse>, ApiError> {
    let mut filter = TicketFilter::new();

    if let Some(status) = parse_status(params.status.as_deref())? {
        filter = filter.with_status(status);
    }

    if let Some(category_id) = params.category_id {
        filter = filter.with_category(category_id);
    }

    if let Some(keyword) = params.keyword {
        filter = filter.with_keyword(keyword);
    }

    let tickets = state.service().list(&filter)?;

    Ok(Json(ListTicketsResponse {
        total: tickets.len(),
        tickets,
    }))
}

/// Replace a ticket's editable fields
pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
    Json(body): Json<TicketBody>,
) -> Result<Json<MutationResponse>, ApiError> {
    let draft = TicketDraft::try_from(body)?;
    mutation(TicketOperation::Update, state.service().update(id, draft))
}

/// Delete a ticket
pub async fn delete_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<MutationResponse>, ApiError> {
    mutation(TicketOperation::Delete, state.service().delete(id))
}

/// Delete every ticket, reporting the ones that could not be removed
pub async fn delete_all_tickets(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DeleteAllResponse>, ApiError> {
    let report = state.service().delete_all()?;

    Ok(Json(DeleteAllResponse {
        success: report.failures.is_empty(),
        message: report.message(),
        deleted: report.deleted,
        failures: report.failures,
    }))
}
