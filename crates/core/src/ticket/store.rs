//! Ticket storage trait and types.

use thiserror::Error;

use crate::ticket::{NewTicket, Ticket, TicketStatus};

/// Error type for ticket storage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TicketError {
    /// Ticket not found.
    #[error("Ticket not found: {0}")]
    NotFound(i64),

    /// Database error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Filter for querying tickets. All set fields must match.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TicketFilter {
    /// Filter by status.
    pub status: Option<TicketStatus>,
    /// Filter by category.
    pub category_id: Option<i64>,
    /// Case-insensitive substring of the title or description.
    ///
    /// Case folding is ASCII-only, the same as SQLite's `LOWER`, so every
    /// backend agrees on which tickets match.
    pub keyword: Option<String>,
}

impl TicketFilter {
    /// Create a filter that matches every ticket.
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status.
    pub fn with_status(mut self, status: TicketStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Filter by category.
    pub fn with_category(mut self, category_id: i64) -> Self {
        self.category_id = Some(category_id);
        self
    }

    /// Filter by keyword. Blank keywords are ignored.
    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        let keyword = keyword.into();
        let trimmed = keyword.trim();
        self.keyword = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
        self
    }

    /// Returns true if `ticket` satisfies every set criterion.
    pub fn matches(&self, ticket: &Ticket) -> bool {
        if let Some(status) = self.status {
            if ticket.status != status {
                return false;
            }
        }

        if let Some(category_id) = self.category_id {
            if ticket.category_id != category_id {
                return false;
            }
        }

        if let Some(ref keyword) = self.keyword {
            let needle = keyword.to_ascii_lowercase();
            let in_title = ticket.title.to_ascii_lowercase().contains(&needle);
            let in_description = ticket
                .description
                .as_deref()
                .is_some_and(|d| d.to_ascii_lowercase().contains(&needle));
            if !in_title && !in_description {
                return false;
            }
        }

        true
    }
}

/// Trait for ticket storage backends.
///
/// Every mutating call commits on its own: a successful return means the
/// change is durable, an error means nothing was written.
pub trait TicketStore: Send + Sync {
    /// List tickets matching the filter, newest first.
    fn list(&self, filter: &TicketFilter) -> Result<Vec<Ticket>, TicketError>;

    /// Count tickets matching the filter.
    fn count(&self, filter: &TicketFilter) -> Result<i64, TicketError>;

    /// Get a ticket by ID.
    fn get(&self, id: i64) -> Result<Option<Ticket>, TicketError>;

    /// Insert a new ticket, assigning its ID.
    fn add(&self, ticket: NewTicket) -> Result<Ticket, TicketError>;

    /// Overwrite a stored ticket with `ticket`.
    fn update(&self, ticket: &Ticket) -> Result<(), TicketError>;

    /// Permanently delete a ticket. Returns the deleted ticket.
    fn delete(&self, id: i64) -> Result<Ticket, TicketError>;
}
