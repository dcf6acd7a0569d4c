//! Prometheus metrics for core components.
//!
//! Registered into the server's registry through [`all_metrics`].

use once_cell::sync::Lazy;
use prometheus::{IntCounterVec, Opts};

/// Ticket operations by kind and outcome.
pub static TICKET_OPERATIONS: Lazy<IntCounterVec> = Lazy::new(|| {
    IntCounterVec::new(
        Opts::new(
            "helpdesk_ticket_operations_total",
            "Ticket service operations by outcome",
        ),
        &["operation", "outcome"], // outcome: "ok", "rejected", "not_found", "error"
    )
    .expect("valid metric definition")
});

/// All core metrics, for registration.
pub fn all_metrics() -> Vec<Box<dyn prometheus::core::Collector>> {
    vec![Box::new(TICKET_OPERATIONS.clone())]
}
