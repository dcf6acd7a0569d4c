use std::sync::Arc;

use helpdesk_core::TicketService;

/// Shared application state
pub struct AppState {
    service: Arc<TicketService>,
}

impl AppState {
    pub fn new(service: Arc<TicketService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &TicketService {
        self.service.as_ref()
    }
}
