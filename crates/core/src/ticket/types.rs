//! Core ticket data types.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// Lifecycle status of a ticket.
///
/// Transitions are unrestricted: any status can be reached from any other
/// through an update, and every transition re-applies the status rules.
/// ```text
/// New <-> In-Progress <-> Resolved <-> Closed
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TicketStatus {
    /// Reported, nobody working on it yet.
    New,
    /// Being worked on.
    #[serde(rename = "In-Progress")]
    InProgress,
    /// Fixed, with resolution notes and an assignee.
    Resolved,
    /// Closed out, same requirements as `Resolved`.
    Closed,
}

impl TicketStatus {
    /// All statuses, in display order.
    pub const ALL: [TicketStatus; 4] = [
        TicketStatus::New,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ];

    /// Returns the display/storage name of the status.
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "New",
            TicketStatus::InProgress => "In-Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    /// Returns true for the statuses that resolve a ticket.
    pub fn is_resolution(&self) -> bool {
        matches!(self, TicketStatus::Resolved | TicketStatus::Closed)
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        TicketStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == trimmed)
            .ok_or(ValidationError::InvalidStatus)
    }
}

/// Candidate ticket fields as collected by the presentation layer.
///
/// Nothing here is validated yet; `TicketService` turns a draft into a
/// stored [`Ticket`] or rejects it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketDraft {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category_id: Option<i64>,
    #[serde(default)]
    pub assigned_employee_id: Option<i64>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default)]
    pub resolution_notes: Option<String>,
}

impl TicketDraft {
    /// Create a draft with the three required fields.
    pub fn new(title: impl Into<String>, category_id: i64, status: TicketStatus) -> Self {
        Self {
            title: title.into(),
            category_id: Some(category_id),
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_assignee(mut self, employee_id: i64) -> Self {
        self.assigned_employee_id = Some(employee_id);
        self
    }

    pub fn with_resolution_notes(mut self, notes: impl Into<String>) -> Self {
        self.resolution_notes = Some(notes.into());
        self
    }
}

/// A validated ticket that has not been stored yet (no id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewTicket {
    pub title: String,
    pub description: Option<String>,
    pub category_id: i64,
    pub assigned_employee_id: Option<i64>,
    pub status: TicketStatus,
    pub resolution_notes: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_resolved: Option<DateTime<Utc>>,
}

impl NewTicket {
    /// Attach the store-assigned id.
    pub fn into_ticket(self, id: i64) -> Ticket {
        Ticket {
            id,
            title: self.title,
            description: self.description,
            category_id: self.category_id,
            assigned_employee_id: self.assigned_employee_id,
            status: self.status,
            resolution_notes: self.resolution_notes,
            date_created: self.date_created,
            date_resolved: self.date_resolved,
        }
    }
}

/// A stored help desk ticket.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Ticket {
    /// Store-assigned identifier.
    pub id: i64,

    /// Issue title, never blank.
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Category reference, never zero.
    pub category_id: i64,

    /// Employee working the ticket. Required once resolved or closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_employee_id: Option<i64>,

    pub status: TicketStatus,

    /// Present only for resolved/closed tickets (and in-progress tickets
    /// that kept notes from earlier).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,

    /// Stamped once on creation.
    pub date_created: DateTime<Utc>,

    /// Stamped when the ticket becomes resolved or closed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_resolved: Option<DateTime<Utc>>,
}

/// Read-only projection of a ticket with references resolved to names.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TicketView {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub category_id: i64,
    /// Category name, empty if the category no longer exists.
    pub category: String,
    pub assigned_employee_id: Option<i64>,
    /// Assignee full name, empty if unassigned.
    pub assigned_employee: String,
    pub status: TicketStatus,
    pub resolution_notes: Option<String>,
    pub date_created: DateTime<Utc>,
    pub date_resolved: Option<DateTime<Utc>>,
}
