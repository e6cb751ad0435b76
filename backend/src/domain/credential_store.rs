//! Credential store: username → password-hash records in the `users`
//! collection.
//!
//! Username uniqueness is enforced by check-then-insert. Two concurrent
//! registrations of the same name can both pass the check, so after inserting
//! the store is read back: the earliest document holding the name wins and
//! any later one is deleted again and reported as a conflict.

use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use super::document_mapping::{
    from_document, map_document_store_error, map_password_hash_error, to_document,
};
use super::ports::{
    Collection, DocumentStore, Filter, ID_FIELD, LoginService, PasswordHasher,
    RegistrationService, UsersQuery,
};
use super::{Error, LoginCredentials, PasswordHash, User, UserId, UserRecord, Username};

const USERNAME_FIELD: &str = "username";

/// Plaintext hashed once to give unknown-username lookups a real hash to
/// verify against.
const DUMMY_PASSWORD: &str = "herbarium-dummy-password";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    id: UserId,
    username: Username,
    password_hash: String,
}

impl From<UserDocument> for UserRecord {
    fn from(value: UserDocument) -> Self {
        Self {
            user: User::new(value.id, value.username),
            password_hash: PasswordHash::from_encoded(value.password_hash),
        }
    }
}

/// Registers users and verifies their passwords.
#[derive(Clone)]
pub struct CredentialStore {
    store: Arc<dyn DocumentStore>,
    hasher: Arc<dyn PasswordHasher>,
    dummy_hash: Arc<OnceLock<Option<PasswordHash>>>,
}

impl CredentialStore {
    pub fn new(store: Arc<dyn DocumentStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self {
            store,
            hasher,
            dummy_hash: Arc::new(OnceLock::new()),
        }
    }

    /// Create a user. Fails with `Conflict` when the username is taken.
    pub async fn register(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let username = credentials.username();
        if self.find_by_username(username).await?.is_some() {
            info!(username = %username, "registration rejected: username taken");
            return Err(username_taken());
        }

        let password = Zeroizing::new(credentials.password().to_owned());
        let hasher = Arc::clone(&self.hasher);
        let password_hash = run_blocking(move || hasher.hash(&password))
            .await?
            .map_err(map_password_hash_error)?;

        let id = UserId::random();
        let document = to_document(&UserDocument {
            id: id.clone(),
            username: username.clone(),
            password_hash: password_hash.as_str().to_owned(),
        })?;
        self.store
            .insert(Collection::Users, document)
            .await
            .map_err(map_document_store_error)?;
        self.settle_username_race(username, &id).await?;

        info!(user_id = %id, username = %username, "user registered");
        Ok(id)
    }

    /// Keep only the first registration of `username`; undo ours if it lost.
    async fn settle_username_race(&self, username: &Username, id: &UserId) -> Result<(), Error> {
        let holders = self
            .store
            .find(Collection::Users, &username_filter(username))
            .await
            .map_err(map_document_store_error)?;
        let winner = holders
            .first()
            .and_then(|document| document.get(ID_FIELD))
            .and_then(|value| value.as_str());
        if winner == Some(id.as_ref()) {
            return Ok(());
        }

        self.store
            .delete(Collection::Users, &Filter::by_id(id.as_ref()))
            .await
            .map_err(map_document_store_error)?;
        info!(username = %username, "registration rejected: concurrent registration won");
        Err(username_taken())
    }

    /// Check a username/password pair. Unknown usernames and wrong passwords
    /// both fail with `InvalidCredentials`.
    pub async fn verify(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let password = Zeroizing::new(credentials.password().to_owned());
        let Some(record) = self.find_by_username(credentials.username()).await? else {
            self.verify_against_dummy(password).await;
            debug!(username = %credentials.username(), "login rejected: unknown username");
            return Err(invalid_credentials());
        };

        let hasher = Arc::clone(&self.hasher);
        let stored = record.password_hash.clone();
        let matches = run_blocking(move || hasher.verify(&password, &stored))
            .await?
            .map_err(map_password_hash_error)?;
        if !matches {
            debug!(user_id = %record.user.id(), "login rejected: password mismatch");
            return Err(invalid_credentials());
        }
        Ok(record.user.id().clone())
    }

    /// Look a user record up by exact username.
    pub async fn find_by_username(&self, username: &Username) -> Result<Option<UserRecord>, Error> {
        self.find_one(&username_filter(username)).await
    }

    async fn find_one(&self, filter: &Filter) -> Result<Option<UserRecord>, Error> {
        self.store
            .find_one(Collection::Users, filter)
            .await
            .map_err(map_document_store_error)?
            .map(|document| from_document::<UserDocument>(document).map(UserRecord::from))
            .transpose()
    }

    async fn verify_against_dummy(&self, password: Zeroizing<String>) {
        let hasher = Arc::clone(&self.hasher);
        let dummy = Arc::clone(&self.dummy_hash);
        // The outcome is irrelevant; only the elapsed time matters.
        let _ = run_blocking(move || {
            let hash = dummy.get_or_init(|| hasher.hash(DUMMY_PASSWORD).ok());
            if let Some(hash) = hash {
                let _ = hasher.verify(&password, hash);
            }
        })
        .await;
    }
}

fn username_filter(username: &Username) -> Filter {
    Filter::new().eq(USERNAME_FIELD, username.as_ref())
}

fn username_taken() -> Error {
    Error::conflict("username already exists")
        .with_details(json!({ "field": "username", "code": "username_taken" }))
}

fn invalid_credentials() -> Error {
    Error::invalid_credentials("invalid credentials")
}

async fn run_blocking<T, F>(work: F) -> Result<T, Error>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|err| Error::internal(format!("password hashing task failed: {err}")))
}

#[async_trait]
impl RegistrationService for CredentialStore {
    async fn register(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        CredentialStore::register(self, credentials).await
    }
}

#[async_trait]
impl LoginService for CredentialStore {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        self.verify(credentials).await
    }
}

#[async_trait]
impl UsersQuery for CredentialStore {
    async fn find_user(&self, id: &UserId) -> Result<Option<User>, Error> {
        let record = self.find_one(&Filter::by_id(id.as_ref())).await?;
        Ok(record.map(|record| record.user))
    }
}
