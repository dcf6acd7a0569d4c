pub mod config;
pub mod metrics;
pub mod reference;
pub mod testing;
pub mod ticket;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    EmployeeSeed, ReferenceConfig, ServerConfig,
};
pub use reference::{
    Category, CategoryStore, Employee, EmployeeStore, ReferenceError, SqliteReferenceStore,
};
pub use ticket::{
    BulkDeleteReport, OperationOutcome, ServiceError, SqliteTicketStore, Ticket, TicketDraft,
    TicketError, TicketFilter, TicketOperation, TicketService, TicketStatus, TicketStore,
    TicketView, ValidationError,
};
