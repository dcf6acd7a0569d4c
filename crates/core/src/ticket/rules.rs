//! Ticket lifecycle rules shared by create and update.
//!
//! Validation runs in two steps. [`check_required`] verifies the fields every
//! ticket needs, in a fixed order, stopping at the first failure.
//! [`apply_status_rules`] then works out what the resolution fields must be
//! for the requested status:
//!
//! | Status      | Resolution notes            | Date resolved                 |
//! |-------------|-----------------------------|-------------------------------|
//! | New         | cleared                     | cleared                       |
//! | In-Progress | untouched                   | cleared                       |
//! | Resolved    | required (with an assignee) | stamped, not before creation  |
//! | Closed      | required (with an assignee) | stamped, not before creation  |

use chrono::{DateTime, Utc};
use thiserror::Error;

use super::{TicketDraft, TicketStatus};

/// Expected, user-facing validation failures.
///
/// The `Display` text of each variant is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Title must not be empty.")]
    TitleRequired,

    #[error("Category must be selected.")]
    CategoryRequired,

    #[error("Status must be selected.")]
    StatusRequired,

    /// Only produced when parsing external text into a [`TicketStatus`].
    #[error("Invalid ticket status.")]
    InvalidStatus,

    #[error("Resolution Notes are required.")]
    ResolutionNotesRequired,

    /// Missing assignee when creating a resolved/closed ticket.
    #[error("Employee must be assigned.")]
    EmployeeNotAssigned,

    /// Missing assignee when updating a ticket to resolved/closed.
    #[error("Assigned Employee is required.")]
    AssigneeRequired,

    #[error("Date Resolved cannot be earlier than Date Created.")]
    ResolvedBeforeCreated,
}

/// Whether the rules run for a brand-new record or an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleContext {
    Create,
    Update,
}

/// The fields every ticket must carry, extracted from a draft.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredFields {
    /// Trimmed title.
    pub title: String,
    pub category_id: i64,
    pub status: TicketStatus,
}

/// Check title, category and status, in that order.
pub fn check_required(draft: &TicketDraft) -> Result<RequiredFields, ValidationError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ValidationError::TitleRequired);
    }

    let category_id = match draft.category_id {
        Some(id) if id != 0 => id,
        _ => return Err(ValidationError::CategoryRequired),
    };

    let status = draft.status.ok_or(ValidationError::StatusRequired)?;

    Ok(RequiredFields {
        title: title.to_string(),
        category_id,
        status,
    })
}

/// The status-dependent fields of a ticket.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionFields {
    pub resolution_notes: Option<String>,
    pub date_resolved: Option<DateTime<Utc>>,
}

/// A requested status together with the fields the rules read.
#[derive(Debug, Clone)]
pub struct StatusChange<'a> {
    pub status: TicketStatus,
    pub assigned_employee_id: Option<i64>,
    /// Notes supplied with the request.
    pub resolution_notes: Option<&'a str>,
    pub date_created: DateTime<Utc>,
}

/// Compute the resolution fields for `change`.
///
/// `current` holds the values an "untouched" field keeps: the stored notes on
/// update, the submitted ones on create. `now` is read once by the caller and
/// used both for stamping and for the date check; equal timestamps pass.
///
/// Resolved and Closed stamp `now` unless `current.date_resolved` is set, in
/// which case that date is kept. Callers only pass one when re-saving a
/// resolved ticket without changes.
///
/// Create checks the notes before the assignee; update checks the assignee
/// first.
pub fn apply_status_rules(
    change: &StatusChange<'_>,
    current: ResolutionFields,
    context: RuleContext,
    now: DateTime<Utc>,
) -> Result<ResolutionFields, ValidationError> {
    match change.status {
        TicketStatus::New => Ok(ResolutionFields::default()),
        TicketStatus::InProgress => Ok(ResolutionFields {
            resolution_notes: current.resolution_notes,
            date_resolved: None,
        }),
        TicketStatus::Resolved | TicketStatus::Closed => {
            let notes = normalize_text(change.resolution_notes);
            let assigned = change.assigned_employee_id.is_some();

            let notes = match context {
                RuleContext::Create => {
                    let notes = notes.ok_or(ValidationError::ResolutionNotesRequired)?;
                    if !assigned {
                        return Err(ValidationError::EmployeeNotAssigned);
                    }
                    notes
                }
                RuleContext::Update => {
                    if !assigned {
                        return Err(ValidationError::AssigneeRequired);
                    }
                    notes.ok_or(ValidationError::ResolutionNotesRequired)?
                }
            };

            let date_resolved = current.date_resolved.unwrap_or(now);
            if date_resolved < change.date_created {
                return Err(ValidationError::ResolvedBeforeCreated);
            }

            Ok(ResolutionFields {
                resolution_notes: Some(notes),
                date_resolved: Some(date_resolved),
            })
        }
    }
}

/// Trim free text, mapping blank text to `None`.
pub fn normalize_text(text: Option<&str>) -> Option<String> {
    text.map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}
