//! Session authenticator: `Anonymous -> Authenticated(UserId) -> Anonymous`.
//!
//! A session is an opaque [`SessionToken`] held by the client. The server
//! keeps only its digest, bound to a user id and an expiry instant read from
//! the injected clock.

use std::sync::Arc;

use chrono::TimeDelta;
use mockable::Clock;
use tracing::{debug, info};

use super::document_mapping::map_session_store_error;
use super::ports::{LoginService, SessionRecord, SessionStore};
use super::{Error, LoginCredentials, SessionToken, UserId};

/// Session lifetime used when configuration does not override it.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 120;

/// Issues, resolves and revokes session tokens.
#[derive(Clone)]
pub struct SessionAuthenticator {
    login: Arc<dyn LoginService>,
    sessions: Arc<dyn SessionStore>,
    clock: Arc<dyn Clock>,
    ttl: TimeDelta,
}

impl SessionAuthenticator {
    pub fn new(
        login: Arc<dyn LoginService>,
        sessions: Arc<dyn SessionStore>,
        clock: Arc<dyn Clock>,
        ttl: TimeDelta,
    ) -> Self {
        Self {
            login,
            sessions,
            clock,
            ttl,
        }
    }

    /// Verify `credentials` and issue a fresh token.
    ///
    /// A `previous` token is revoked first, so a pre-login token can never
    /// become authenticated. Rows that expired without ever being presented
    /// again are swept from the table on every successful login.
    pub async fn login(
        &self,
        credentials: &LoginCredentials,
        previous: Option<&SessionToken>,
    ) -> Result<SessionToken, Error> {
        let user_id = self.login.authenticate(credentials).await?;
        if let Some(previous) = previous {
            self.logout(previous).await?;
        }

        let now = self.clock.utc();
        let purged = self
            .sessions
            .purge_expired(now)
            .await
            .map_err(map_session_store_error)?;
        if purged > 0 {
            debug!(purged, "expired sessions purged");
        }

        let token = SessionToken::generate();
        let record = SessionRecord {
            user_id: user_id.clone(),
            expires_at: now + self.ttl,
        };
        self.sessions
            .insert(token.digest(), record)
            .await
            .map_err(map_session_store_error)?;
        info!(user_id = %user_id, "session established");
        Ok(token)
    }

    /// Revoke `token`. Unknown and already revoked tokens are not an error.
    pub async fn logout(&self, token: &SessionToken) -> Result<(), Error> {
        let removed = self
            .sessions
            .remove(&token.digest())
            .await
            .map_err(map_session_store_error)?;
        if removed {
            info!("session revoked");
        }
        Ok(())
    }

    /// The identity bound to `token`, or `None` when anonymous or expired.
    pub async fn current_identity(&self, token: &SessionToken) -> Result<Option<UserId>, Error> {
        let digest = token.digest();
        let Some(record) = self
            .sessions
            .find(&digest)
            .await
            .map_err(map_session_store_error)?
        else {
            return Ok(None);
        };

        if record.is_expired(self.clock.utc()) {
            debug!(user_id = %record.user_id, "session expired");
            self.sessions
                .remove(&digest)
                .await
                .map_err(map_session_store_error)?;
            return Ok(None);
        }
        Ok(Some(record.user_id))
    }

    /// Guard for owner-scoped operations.
    pub async fn require_authenticated(
        &self,
        token: Option<&SessionToken>,
    ) -> Result<UserId, Error> {
        let identity = match token {
            Some(token) => self.current_identity(token).await?,
            None => None,
        };
        identity.ok_or_else(|| Error::unauthorized("login required"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockLoginService, MockSessionStore, SessionStoreError};
    use crate::outbound::session::InMemorySessionStore;
    use crate::test_support::MutableClock;
    use chrono::{TimeZone, Utc};
    use rstest::{fixture, rstest};

    struct Harness {
        clock: Arc<MutableClock>,
        user_id: UserId,
        authenticator: SessionAuthenticator,
    }

    fn creds() -> LoginCredentials {
        LoginCredentials::try_from_parts("alice", "secret").expect("credential shape")
    }

    #[fixture]
    fn harness() -> Harness {
        let user_id = UserId::random();
        let returned = user_id.clone();
        let mut login = MockLoginService::new();
        login
            .expect_authenticate()
            .returning(move |_| Ok(returned.clone()));
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().expect("valid instant"),
        ));
        let authenticator = SessionAuthenticator::new(
            Arc::new(login),
            Arc::new(InMemorySessionStore::new()),
            clock.clone(),
            TimeDelta::minutes(30),
        );
        Harness {
            clock,
            user_id,
            authenticator,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn login_binds_identity(harness: Harness) {
        let token = harness
            .authenticator
            .login(&creds(), None)
            .await
            .expect("login");
        let identity = harness
            .authenticator
            .require_authenticated(Some(&token))
            .await
            .expect("authenticated");
        assert_eq!(identity, harness.user_id);
    }

    #[rstest]
    #[tokio::test]
    async fn logout_returns_session_to_anonymous(harness: Harness) {
        let token = harness
            .authenticator
            .login(&creds(), None)
            .await
            .expect("login");
        harness.authenticator.logout(&token).await.expect("logout");
        harness
            .authenticator
            .logout(&token)
            .await
            .expect("second logout is a no-op");

        let err = harness
            .authenticator
            .require_authenticated(Some(&token))
            .await
            .expect_err("session revoked");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_token_is_unauthorized(harness: Harness) {
        let err = harness
            .authenticator
            .require_authenticated(None)
            .await
            .expect_err("anonymous");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case(29, true)]
    #[case(30, false)]
    #[case(90, false)]
    #[tokio::test]
    async fn sessions_expire_after_ttl(
        harness: Harness,
        #[case] elapsed_minutes: i64,
        #[case] still_valid: bool,
    ) {
        let token = harness
            .authenticator
            .login(&creds(), None)
            .await
            .expect("login");
        harness.clock.advance_minutes(elapsed_minutes);
        let identity = harness
            .authenticator
            .current_identity(&token)
            .await
            .expect("lookup");
        assert_eq!(identity.is_some(), still_valid);
    }

    #[rstest]
    #[tokio::test]
    async fn relogin_revokes_previous_token(harness: Harness) {
        let first = harness
            .authenticator
            .login(&creds(), None)
            .await
            .expect("first login");
        let second = harness
            .authenticator
            .login(&creds(), Some(&first))
            .await
            .expect("second login");
        assert_ne!(first, second);
        assert!(
            harness
                .authenticator
                .current_identity(&first)
                .await
                .expect("lookup")
                .is_none()
        );
        assert!(
            harness
                .authenticator
                .current_identity(&second)
                .await
                .expect("lookup")
                .is_some()
        );
    }

    #[tokio::test]
    async fn login_sweeps_abandoned_sessions() {
        let mut login = MockLoginService::new();
        login
            .expect_authenticate()
            .returning(|_| Ok(UserId::random()));
        let store = Arc::new(InMemorySessionStore::new());
        let clock = Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).single().expect("valid instant"),
        ));
        let authenticator = SessionAuthenticator::new(
            Arc::new(login),
            store.clone(),
            clock.clone(),
            TimeDelta::minutes(30),
        );

        let mut abandoned = Vec::new();
        for _ in 0..200 {
            abandoned.push(authenticator.login(&creds(), None).await.expect("login"));
        }
        clock.advance_minutes(600);
        let fresh = authenticator.login(&creds(), None).await.expect("login");

        for token in &abandoned {
            assert_eq!(
                store.find(&token.digest()).await.expect("find"),
                None,
                "expired row should be gone without being presented"
            );
        }
        assert!(store.find(&fresh.digest()).await.expect("find").is_some());
    }

    #[tokio::test]
    async fn failed_login_issues_no_session() {
        let mut login = MockLoginService::new();
        login
            .expect_authenticate()
            .returning(|_| Err(Error::invalid_credentials("invalid credentials")));
        let mut sessions = MockSessionStore::new();
        sessions.expect_insert().never();
        sessions.expect_remove().never();
        sessions.expect_purge_expired().never();
        let authenticator = SessionAuthenticator::new(
            Arc::new(login),
            Arc::new(sessions),
            Arc::new(mockable::DefaultClock),
            TimeDelta::minutes(DEFAULT_SESSION_TTL_MINUTES),
        );

        let previous = SessionToken::generate();
        let err = authenticator
            .login(&creds(), Some(&previous))
            .await
            .expect_err("bad credentials");
        assert_eq!(err.code(), ErrorCode::InvalidCredentials);
    }

    #[tokio::test]
    async fn session_store_outage_is_unavailable() {
        let mut sessions = MockSessionStore::new();
        sessions
            .expect_find()
            .returning(|_| Err(SessionStoreError::unavailable("lock poisoned")));
        let authenticator = SessionAuthenticator::new(
            Arc::new(MockLoginService::new()),
            Arc::new(sessions),
            Arc::new(mockable::DefaultClock),
            TimeDelta::minutes(DEFAULT_SESSION_TTL_MINUTES),
        );

        let err = authenticator
            .require_authenticated(Some(&SessionToken::generate()))
            .await
            .expect_err("store down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
