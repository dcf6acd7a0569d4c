//! Help-desk tickets: data model, lifecycle rules, storage and the service
//! that ties them together.

mod clock;
mod rules;
mod service;
mod sqlite_store;
mod store;
mod types;

pub use clock::{Clock, SystemClock};
pub use rules::{
    apply_status_rules, check_required, normalize_text, RequiredFields, ResolutionFields,
    RuleContext, StatusChange, ValidationError,
};
pub use service::{
    BulkDeleteFailure, BulkDeleteReport, OperationOutcome, ServiceError, TicketOperation,
    TicketService,
};
pub use sqlite_store::SqliteTicketStore;
pub use store::{TicketError, TicketFilter, TicketStore};
pub use types::{NewTicket, Ticket, TicketDraft, TicketStatus, TicketView};
