//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use chrono::TimeDelta;

use herbarium::domain::DEFAULT_SESSION_TTL_MINUTES;
use herbarium::inbound::http::session_config::SessionSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) session_ttl: TimeDelta,
    pub(crate) seed_starter_items: bool,
}

impl ServerConfig {
    /// Construct a server configuration from validated session settings.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        let SessionSettings {
            key,
            cookie_secure,
            same_site,
        } = session;
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            session_ttl: TimeDelta::minutes(DEFAULT_SESSION_TTL_MINUTES),
            seed_starter_items: false,
        }
    }

    /// Lifetime of both the session cookie and its server-side record.
    #[must_use]
    pub fn with_session_ttl(mut self, ttl: TimeDelta) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Seed empty inventories with the starter herbs on first listing.
    #[must_use]
    pub fn with_starter_items(mut self, enabled: bool) -> Self {
        self.seed_starter_items = enabled;
        self
    }

    /// Cookie lifetime in the `time` crate's representation.
    pub(crate) fn cookie_ttl(&self) -> actix_web::cookie::time::Duration {
        actix_web::cookie::time::Duration::seconds(self.session_ttl.num_seconds())
    }
}
