//! Testing utilities and in-memory implementations of the store traits.
//!
//! These let the service and the HTTP layer be exercised without a database
//! and with a controllable clock.
//!
//! # Example
//!
//! ```rust,ignore
//! use helpdesk_core::testing::{fixtures, FixedClock, MockTicketStore};
//!
//! let store = Arc::new(MockTicketStore::new());
//! let reference = Arc::new(fixtures::reference_store());
//! let service = TicketService::new(store.clone(), reference.clone(), reference)
//!     .with_clock(Arc::new(FixedClock::new(Utc::now())));
//!
//! // Make the next write fail
//! store.set_next_error(TicketError::Database("disk full".into()));
//! ```

mod clock;
mod mock_reference_store;
mod mock_ticket_store;

pub use clock::FixedClock;
pub use mock_reference_store::MockReferenceStore;
pub use mock_ticket_store::MockTicketStore;

/// Test fixtures and helper functions.
pub mod fixtures {
    use super::MockReferenceStore;
    use crate::config::{EmployeeSeed, ReferenceConfig};
    use crate::ticket::{TicketDraft, TicketStatus};

    /// Categories seeded by [`reference_store`], in id order.
    pub const CATEGORIES: [&str; 3] = ["Hardware", "Network", "Software"];

    /// Employees seeded by [`reference_store`], in id order.
    pub const EMPLOYEES: [(&str, &str); 3] = [
        ("Ada", "Lovelace"),
        ("Alan", "Turing"),
        ("Grace", "Hopper"),
    ];

    /// A reference store holding [`CATEGORIES`] and [`EMPLOYEES`] with ids from 1.
    pub fn reference_store() -> MockReferenceStore {
        MockReferenceStore::from_config(&reference_config())
    }

    /// The same reference data as configuration, for seeding real stores.
    pub fn reference_config() -> ReferenceConfig {
        ReferenceConfig {
            categories: CATEGORIES.iter().map(|c| c.to_string()).collect(),
            employees: EMPLOYEES
                .iter()
                .map(|(first, last)| EmployeeSeed {
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                })
                .collect(),
        }
    }

    /// A fresh, unassigned hardware ticket.
    pub fn printer_jam() -> TicketDraft {
        TicketDraft::new("Printer jam", 1, TicketStatus::New)
    }
}
