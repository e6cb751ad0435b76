//! Server configuration loaded via OrthoConfig.
//!
//! Every value can come from CLI flags, `HERBARIUM_*` environment variables
//! or a configuration file. Unset values fall back to the accessors' defaults.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use chrono::TimeDelta;
use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_SESSION_TTL_MINUTES;
use crate::inbound::http::session_config::SessionToggles;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_SESSION_KEY_FILE: &str = "/var/run/secrets/session_key";

/// Values controlling the listener, session cookie and inventory seeding.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HERBARIUM")]
pub struct AppSettings {
    /// Interface to bind; defaults to all IPv4 interfaces.
    pub host: Option<IpAddr>,
    /// TCP port to bind.
    pub port: Option<u16>,
    /// File holding the session cookie key material.
    pub session_key_file: Option<PathBuf>,
    /// Whether the session cookie carries the `Secure` attribute.
    pub cookie_secure: Option<bool>,
    /// `SameSite` policy: `Strict`, `Lax` or `None`.
    pub same_site: Option<String>,
    /// Allow a generated key when the key file is missing.
    #[ortho_config(default = false)]
    pub allow_ephemeral: bool,
    /// Minutes after login before a session expires.
    pub session_ttl_minutes: Option<u32>,
    /// Give a user's empty inventory a starter set on first listing.
    #[ortho_config(default = false)]
    pub seed_starter_items: bool,
}

impl AppSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(
            self.host.unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED)),
            self.port.unwrap_or(DEFAULT_PORT),
        )
    }

    /// Session lifetime, shared by the cookie and the server-side record.
    pub fn session_ttl(&self) -> TimeDelta {
        self.session_ttl_minutes
            .map_or(TimeDelta::minutes(DEFAULT_SESSION_TTL_MINUTES), |minutes| {
                TimeDelta::minutes(i64::from(minutes))
            })
    }

    /// Raw session toggles for [`crate::inbound::http::session_config::session_settings`].
    pub fn session_toggles(&self) -> SessionToggles {
        SessionToggles {
            key_file: self
                .session_key_file
                .clone()
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_KEY_FILE)),
            cookie_secure: self.cookie_secure.unwrap_or(true),
            same_site: self.same_site.clone(),
            allow_ephemeral: self.allow_ephemeral,
        }
    }
}
