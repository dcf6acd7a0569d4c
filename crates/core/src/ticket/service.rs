//! Ticket service: validates candidate tickets, applies the status rules and
//! persists accepted changes.
//!
//! Every mutating operation is all-or-nothing. Validation failures come back
//! as [`ServiceError::Validation`] with the user-facing message; store faults
//! are wrapped as "Error <verb>ing ticket: <detail>" and never propagate raw.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::rules::{
    apply_status_rules, check_required, normalize_text, ResolutionFields, RuleContext,
    StatusChange,
};
use super::{
    Clock, NewTicket, SystemClock, Ticket, TicketDraft, TicketError, TicketFilter, TicketStatus,
    TicketStore, TicketView, ValidationError,
};
use crate::metrics::TICKET_OPERATIONS;
use crate::reference::{Category, CategoryStore, Employee, EmployeeStore, ReferenceError};

/// The operations the service performs, for messages and metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketOperation {
    Add,
    Update,
    Delete,
    Load,
}

impl TicketOperation {
    /// Label used in metrics and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketOperation::Add => "add",
            TicketOperation::Update => "update",
            TicketOperation::Delete => "delete",
            TicketOperation::Load => "load",
        }
    }

    /// Message shown when the operation succeeds.
    pub fn success_message(&self) -> &'static str {
        match self {
            TicketOperation::Add => "Ticket added successfully.",
            TicketOperation::Update => "Ticket updated successfully.",
            TicketOperation::Delete => "Ticket deleted successfully.",
            TicketOperation::Load => "Tickets loaded successfully.",
        }
    }

    fn failure_prefix(&self) -> &'static str {
        match self {
            TicketOperation::Add => "Error adding ticket",
            TicketOperation::Update => "Error updating ticket",
            TicketOperation::Delete => "Error deleting ticket",
            TicketOperation::Load => "Error loading tickets",
        }
    }
}

impl fmt::Display for TicketOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors returned by [`TicketService`].
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Expected rejection with a user-facing message.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Ticket not found.")]
    NotFound(i64),

    /// Unexpected store failure, wrapped with the operation it interrupted.
    #[error("{}: {}", .operation.failure_prefix(), .source)]
    Store {
        operation: TicketOperation,
        source: TicketError,
    },

    #[error("Error loading reference data: {0}")]
    Reference(#[from] ReferenceError),
}

impl ServiceError {
    fn store(operation: TicketOperation) -> impl FnOnce(TicketError) -> ServiceError {
        move |source| match source {
            TicketError::NotFound(id) => ServiceError::NotFound(id),
            source => ServiceError::Store { operation, source },
        }
    }

    /// Metrics outcome label.
    pub fn outcome(&self) -> &'static str {
        match self {
            ServiceError::Validation(_) => "rejected",
            ServiceError::NotFound(_) => "not_found",
            ServiceError::Store { .. } | ServiceError::Reference(_) => "error",
        }
    }

    /// Returns true for failures caused by the request rather than the system.
    pub fn is_expected(&self) -> bool {
        matches!(self, ServiceError::Validation(_) | ServiceError::NotFound(_))
    }
}

/// Result handed to the presentation layer for every mutating operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationOutcome {
    pub success: bool,
    pub message: String,
}

impl OperationOutcome {
    pub fn from_result<T>(operation: TicketOperation, result: &Result<T, ServiceError>) -> Self {
        match result {
            Ok(_) => Self {
                success: true,
                message: operation.success_message().to_string(),
            },
            Err(e) => Self {
                success: false,
                message: e.to_string(),
            },
        }
    }
}

/// A record that could not be removed during [`TicketService::delete_all`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BulkDeleteFailure {
    pub id: i64,
    pub message: String,
}

impl fmt::Display for BulkDeleteFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Failed to delete ticket ID {}: {}", self.id, self.message)
    }
}

/// Per-record results of deleting every ticket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BulkDeleteReport {
    pub deleted: Vec<i64>,
    pub failures: Vec<BulkDeleteFailure>,
}

impl BulkDeleteReport {
    /// True when there was nothing to delete.
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.failures.is_empty()
    }

    pub fn message(&self) -> String {
        if self.is_empty() {
            "No tickets to clear or delete.".to_string()
        } else if self.failures.is_empty() {
            "All tickets have been deleted successfully.".to_string()
        } else {
            format!(
                "Deleted {} ticket(s); {} could not be deleted.",
                self.deleted.len(),
                self.failures.len()
            )
        }
    }
}

/// Business logic over a ticket store and the reference lookups.
pub struct TicketService {
    tickets: Arc<dyn TicketStore>,
    categories: Arc<dyn CategoryStore>,
    employees: Arc<dyn EmployeeStore>,
    clock: Arc<dyn Clock>,
}

impl TicketService {
    /// Create a service reading the wall clock.
    pub fn new(
        tickets: Arc<dyn TicketStore>,
        categories: Arc<dyn CategoryStore>,
        employees: Arc<dyn EmployeeStore>,
    ) -> Self {
        Self {
            tickets,
            categories,
            employees,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the time source.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// List tickets matching `filter`, projected with display names.
    pub fn list(&self, filter: &TicketFilter) -> Result<Vec<TicketView>, ServiceError> {
        let tickets = self
            .tickets
            .list(filter)
            .map_err(ServiceError::store(TicketOperation::Load))?;
        let names = self.name_lookup()?;

        Ok(tickets.into_iter().map(|t| names.project(t)).collect())
    }

    /// Fetch a single ticket view.
    pub fn get(&self, id: i64) -> Result<Option<TicketView>, ServiceError> {
        let ticket = self
            .tickets
            .get(id)
            .map_err(ServiceError::store(TicketOperation::Load))?;

        match ticket {
            Some(ticket) => Ok(Some(self.name_lookup()?.project(ticket))),
            None => Ok(None),
        }
    }

    /// Number of tickets matching `filter`.
    pub fn count(&self, filter: &TicketFilter) -> Result<i64, ServiceError> {
        self.tickets
            .count(filter)
            .map_err(ServiceError::store(TicketOperation::Load))
    }

    /// Validate and store a new ticket.
    pub fn add(&self, draft: TicketDraft) -> Result<Ticket, ServiceError> {
        let result = self.try_add(draft);
        record(TicketOperation::Add, &result);
        result
    }

    /// Validate `draft` and apply it to the stored ticket `id`.
    ///
    /// Title, description, category, assignee and status are overwritten;
    /// the creation date is kept. If nothing changes, nothing is written.
    pub fn update(&self, id: i64, draft: TicketDraft) -> Result<Ticket, ServiceError> {
        let result = self.try_update(id, draft);
        record(TicketOperation::Update, &result);
        result
    }

    /// Remove the ticket `id`.
    pub fn delete(&self, id: i64) -> Result<Ticket, ServiceError> {
        let result = self.try_delete(id);
        record(TicketOperation::Delete, &result);
        result
    }

    /// Delete every ticket, one at a time.
    ///
    /// Not atomic: a failure on one record is reported and the batch carries on.
    pub fn delete_all(&self) -> Result<BulkDeleteReport, ServiceError> {
        let tickets = self
            .tickets
            .list(&TicketFilter::new())
            .map_err(ServiceError::store(TicketOperation::Load))?;

        let mut report = BulkDeleteReport::default();
        for ticket in tickets {
            match self.delete(ticket.id) {
                Ok(deleted) => report.deleted.push(deleted.id),
                Err(e) => report.failures.push(BulkDeleteFailure {
                    id: ticket.id,
                    message: e.to_string(),
                }),
            }
        }

        info!(
            deleted = report.deleted.len(),
            failed = report.failures.len(),
            "Bulk delete finished"
        );

        Ok(report)
    }

    /// Category lookup list.
    pub fn categories(&self) -> Result<Vec<Category>, ServiceError> {
        Ok(self.categories.list()?)
    }

    /// Employee lookup list.
    pub fn employees(&self) -> Result<Vec<Employee>, ServiceError> {
        Ok(self.employees.list()?)
    }

    fn try_add(&self, draft: TicketDraft) -> Result<Ticket, ServiceError> {
        let required = check_required(&draft)?;
        let now = self.clock.now();

        let notes = normalize_text(draft.resolution_notes.as_deref());
        let change = StatusChange {
            status: required.status,
            assigned_employee_id: draft.assigned_employee_id,
            resolution_notes: notes.as_deref(),
            date_created: now,
        };
        let current = ResolutionFields {
            resolution_notes: notes.clone(),
            date_resolved: None,
        };
        let resolution = apply_status_rules(&change, current, RuleContext::Create, now)?;

        let ticket = self
            .tickets
            .add(NewTicket {
                title: required.title,
                description: normalize_text(draft.description.as_deref()),
                category_id: required.category_id,
                assigned_employee_id: draft.assigned_employee_id,
                status: required.status,
                resolution_notes: resolution.resolution_notes,
                date_created: now,
                date_resolved: resolution.date_resolved,
            })
            .map_err(ServiceError::store(TicketOperation::Add))?;

        info!(ticket_id = ticket.id, status = %ticket.status, "Ticket added");
        Ok(ticket)
    }

    fn try_update(&self, id: i64, draft: TicketDraft) -> Result<Ticket, ServiceError> {
        let existing = self
            .tickets
            .get(id)
            .map_err(ServiceError::store(TicketOperation::Update))?
            .ok_or(ServiceError::NotFound(id))?;

        let required = check_required(&draft)?;
        let now = self.clock.now();

        let notes = normalize_text(draft.resolution_notes.as_deref());
        let description = normalize_text(draft.description.as_deref());

        // Only a re-save with nothing changed keeps the stored resolution date.
        let resolved = matches!(
            required.status,
            TicketStatus::Resolved | TicketStatus::Closed
        );
        let unchanged = required.status == existing.status
            && required.title == existing.title
            && description == existing.description
            && required.category_id == existing.category_id
            && draft.assigned_employee_id == existing.assigned_employee_id
            && (!resolved || notes == existing.resolution_notes);

        let change = StatusChange {
            status: required.status,
            assigned_employee_id: draft.assigned_employee_id,
            resolution_notes: notes.as_deref(),
            date_created: existing.date_created,
        };
        let current = ResolutionFields {
            resolution_notes: existing.resolution_notes.clone(),
            date_resolved: existing.date_resolved.filter(|_| unchanged),
        };
        let resolution = apply_status_rules(&change, current, RuleContext::Update, now)?;

        let updated = Ticket {
            id: existing.id,
            title: required.title,
            description,
            category_id: required.category_id,
            assigned_employee_id: draft.assigned_employee_id,
            status: required.status,
            resolution_notes: resolution.resolution_notes,
            date_created: existing.date_created,
            date_resolved: resolution.date_resolved,
        };

        if updated == existing {
            debug!(ticket_id = id, "Ticket unchanged, skipping write");
            return Ok(existing);
        }

        self.tickets
            .update(&updated)
            .map_err(ServiceError::store(TicketOperation::Update))?;

        info!(
            ticket_id = id,
            from = %existing.status,
            to = %updated.status,
            "Ticket updated"
        );
        Ok(updated)
    }

    fn try_delete(&self, id: i64) -> Result<Ticket, ServiceError> {
        if self
            .tickets
            .get(id)
            .map_err(ServiceError::store(TicketOperation::Delete))?
            .is_none()
        {
            return Err(ServiceError::NotFound(id));
        }

        let ticket = self
            .tickets
            .delete(id)
            .map_err(ServiceError::store(TicketOperation::Delete))?;

        info!(ticket_id = id, "Ticket deleted");
        Ok(ticket)
    }

    fn name_lookup(&self) -> Result<NameLookup, ServiceError> {
        let categories = self
            .categories
            .list()?
            .into_iter()
            .map(|c| (c.id, c.name))
            .collect();
        let employees = self
            .employees
            .list()?
            .into_iter()
            .map(|e| (e.id, e.full_name()))
            .collect();

        Ok(NameLookup {
            categories,
            employees,
        })
    }
}

/// Display names keyed by id, for projecting tickets into views.
struct NameLookup {
    categories: HashMap<i64, String>,
    employees: HashMap<i64, String>,
}

impl NameLookup {
    fn project(&self, ticket: Ticket) -> TicketView {
        let category = self
            .categories
            .get(&ticket.category_id)
            .cloned()
            .unwrap_or_default();
        let assigned_employee = ticket
            .assigned_employee_id
            .and_then(|id| self.employees.get(&id).cloned())
            .unwrap_or_default();

        TicketView {
            id: ticket.id,
            title: ticket.title,
            description: ticket.description,
            category_id: ticket.category_id,
            category,
            assigned_employee_id: ticket.assigned_employee_id,
            assigned_employee,
            status: ticket.status,
            resolution_notes: ticket.resolution_notes,
            date_created: ticket.date_created,
            date_resolved: ticket.date_resolved,
        }
    }
}

fn record<T>(operation: TicketOperation, result: &Result<T, ServiceError>) {
    let outcome = match result {
        Ok(_) => "ok",
        Err(e) => e.outcome(),
    };
    TICKET_OPERATIONS
        .with_label_values(&[operation.as_str(), outcome])
        .inc();

    match result {
        Ok(_) => {}
        Err(e) if e.is_expected() => {
            debug!(operation = %operation, reason = %e, "Ticket operation rejected");
        }
        Err(e) => {
            warn!(operation = %operation, error = %e, "Ticket operation failed");
        }
    }
}
