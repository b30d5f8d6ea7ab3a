pub mod audit;
pub mod auth;
pub mod clock;
pub mod config;
pub mod service;
pub mod staff;
pub mod storage;
pub mod ticket;

pub use audit::{AuditError, LogFilter, LogRecord, LogStore, TicketEvent};
pub use auth::{
    create_authenticator, ApiKeyAuthenticator, AuthError, AuthRequest, Authenticator, Identity,
    NoneAuthenticator,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{
    load_config, load_config_from_str, validate_config, AuthConfig, AuthMethod, Config,
    ConfigError, DatabaseConfig, SanitizedConfig, ServerConfig,
};
pub use service::{CreateTicketRequest, CreatedTicket, TicketService};
pub use staff::{SkillLevel, Staff, StaffError, StaffSkill, StaffStore};
pub use storage::SqliteStore;
pub use ticket::{
    can_transition, generate_followup, required_fields, transitions_from, validate_completion,
    FollowUpTask, TaskPriority, TaskStatus, Ticket, TicketDetails, TicketError, TicketFilter,
    TicketKind, TicketPayload, TicketStats, TicketStatus, TicketStore,
};
