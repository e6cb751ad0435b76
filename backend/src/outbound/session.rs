//! In-process session table keyed by token digest.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::SessionDigest;
use crate::domain::ports::{SessionRecord, SessionStore, SessionStoreError};

/// Volatile [`SessionStore`]; sessions do not survive a restart.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<SessionDigest, SessionRecord>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> SessionStoreError {
    SessionStoreError::unavailable("session table lock poisoned")
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert(
        &self,
        digest: SessionDigest,
        record: SessionRecord,
    ) -> Result<(), SessionStoreError> {
        self.sessions
            .write()
            .map_err(poisoned)?
            .insert(digest, record);
        Ok(())
    }

    async fn find(
        &self,
        digest: &SessionDigest,
    ) -> Result<Option<SessionRecord>, SessionStoreError> {
        Ok(self.sessions.read().map_err(poisoned)?.get(digest).cloned())
    }

    async fn remove(&self, digest: &SessionDigest) -> Result<bool, SessionStoreError> {
        Ok(self
            .sessions
            .write()
            .map_err(poisoned)?
            .remove(digest)
            .is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, SessionStoreError> {
        let mut sessions = self.sessions.write().map_err(poisoned)?;
        let before = sessions.len();
        sessions.retain(|_, record| !record.is_expired(now));
        Ok(u64::try_from(before - sessions.len()).unwrap_or(u64::MAX))
    }
}
