//! Test doubles shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for `cfg(test)` and behind the `test-support` feature.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;
use sha2::{Digest, Sha256};

use crate::domain::PasswordHash;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

/// Clock whose current instant only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance_minutes(&self, minutes: i64) {
        *self.lock_clock() += TimeDelta::minutes(minutes);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Fast salted hasher for tests that do not exercise Argon2 itself.
///
/// Encoded form: `stub$<salt>$<hex sha256(salt || plaintext)>`.
#[derive(Debug, Default)]
pub struct StubHasher {
    next_salt: AtomicU64,
}

impl StubHasher {
    fn digest(salt: &str, plaintext: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(plaintext.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl PasswordHasher for StubHasher {
    fn hash(&self, plaintext: &str) -> Result<PasswordHash, PasswordHashError> {
        let salt = self.next_salt.fetch_add(1, Ordering::Relaxed).to_string();
        let digest = Self::digest(&salt, plaintext);
        Ok(PasswordHash::from_encoded(format!("stub${salt}${digest}")))
    }

    fn verify(&self, plaintext: &str, hash: &PasswordHash) -> Result<bool, PasswordHashError> {
        let mut parts = hash.as_str().splitn(3, '$');
        match (parts.next(), parts.next(), parts.next()) {
            (Some("stub"), Some(salt), Some(digest)) => Ok(Self::digest(salt, plaintext) == digest),
            _ => Err(PasswordHashError::malformed("not a stub hash")),
        }
    }
}
