//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so each
//! can be exercised with mocks and no I/O.

use std::sync::Arc;

use crate::domain::SessionAuthenticator;
use crate::domain::ports::{ItemsCommand, ItemsQuery, RegistrationService, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub registration: Arc<dyn RegistrationService>,
    pub users: Arc<dyn UsersQuery>,
    pub sessions: Arc<SessionAuthenticator>,
    pub items: Arc<dyn ItemsQuery>,
    pub items_command: Arc<dyn ItemsCommand>,
}
