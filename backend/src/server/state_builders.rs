//! Builders wiring domain services to the in-process adapters.

use std::sync::Arc;

use mockable::DefaultClock;

use herbarium::domain::{CredentialStore, ItemRepository, SessionAuthenticator};
use herbarium::inbound::http::state::HttpState;
use herbarium::outbound::document::InMemoryDocumentStore;
use herbarium::outbound::password::Argon2PasswordHasher;
use herbarium::outbound::session::InMemorySessionStore;

use super::ServerConfig;

/// Build the handler state shared by every worker.
///
/// Users and items share one document store so a single process sees a
/// consistent view of both collections.
pub(super) fn build_http_state(config: &ServerConfig) -> HttpState {
    let store = Arc::new(InMemoryDocumentStore::new());
    let credentials = Arc::new(CredentialStore::new(
        store.clone(),
        Arc::new(Argon2PasswordHasher::new()),
    ));
    let sessions = Arc::new(SessionAuthenticator::new(
        credentials.clone(),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(DefaultClock),
        config.session_ttl,
    ));
    let items = Arc::new(ItemRepository::new(store).with_starter_items(config.seed_starter_items));

    HttpState {
        registration: credentials.clone(),
        users: credentials,
        sessions,
        items: items.clone(),
        items_command: items,
    }
}
