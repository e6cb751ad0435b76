//! Driven port for the server-side session table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{SessionDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Failures raised by session store adapters.
    pub enum SessionStoreError {
        /// The backing table could not be read or written.
        Unavailable { message: String } => "session store unavailable: {message}",
    }
}

/// Row of the session table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionRecord {
    pub user_id: UserId,
    pub expires_at: DateTime<Utc>,
}

impl SessionRecord {
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Maps session digests to authenticated identities.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Store `record` under `digest`, replacing any previous row.
    async fn insert(
        &self,
        digest: SessionDigest,
        record: SessionRecord,
    ) -> Result<(), SessionStoreError>;

    async fn find(&self, digest: &SessionDigest)
    -> Result<Option<SessionRecord>, SessionStoreError>;

    /// Remove the row; `Ok(false)` when nothing was stored.
    async fn remove(&self, digest: &SessionDigest) -> Result<bool, SessionStoreError>;

    /// Drop every row expired at `now`; returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionStoreError>;
}
