use std::sync::Arc;

use dispatch_core::{
    Authenticator, Clock, Config, LogStore, SanitizedConfig, StaffStore, TicketService,
};

/// Shared application state
pub struct AppState {
    config: Config,
    authenticator: Arc<dyn Authenticator>,
    tickets: TicketService,
    staff_store: Arc<dyn StaffStore>,
    log_store: Arc<dyn LogStore>,
    clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        config: Config,
        authenticator: Arc<dyn Authenticator>,
        tickets: TicketService,
        staff_store: Arc<dyn StaffStore>,
        log_store: Arc<dyn LogStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            config,
            authenticator,
            tickets,
            staff_store,
            log_store,
            clock,
        }
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn authenticator(&self) -> &dyn Authenticator {
        self.authenticator.as_ref()
    }

    pub fn tickets(&self) -> &TicketService {
        &self.tickets
    }

    pub fn staff_store(&self) -> &dyn StaffStore {
        self.staff_store.as_ref()
    }

    pub fn log_store(&self) -> &dyn LogStore {
        self.log_store.as_ref()
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }
}
