//! Authentication primitives: submitted credentials, stored password hashes
//! and opaque session tokens.
//!
//! Inbound adapters build these from raw strings so the domain services only
//! ever see validated values.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use super::{UserValidationError, Username};

/// Number of random bytes in a session token.
const SESSION_TOKEN_BYTES: usize = 32;

/// Errors raised while validating submitted credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Username was blank or otherwise invalid.
    Username(UserValidationError),
    /// Password was empty.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Username(inner) => inner.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Username/password pair submitted at registration or login.
///
/// ## Invariants
/// - `username` satisfies [`Username`] rules (trimmed, non-empty).
/// - `password` is non-empty; whitespace is preserved verbatim.
/// - The password buffer is zeroed on drop.
///
/// # Examples
/// ```
/// use herbarium::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" bob ", "pw1").unwrap();
/// assert_eq!(creds.username().as_ref(), "bob");
/// assert_eq!(creds.password(), "pw1");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    username: Username,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    pub fn try_from_parts(username: &str, password: &str) -> Result<Self, LoginValidationError> {
        let username = Username::new(username).map_err(LoginValidationError::Username)?;
        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }
        Ok(Self {
            username,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    #[must_use]
    pub fn username(&self) -> &Username {
        &self.username
    }

    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Salted one-way password hash in PHC string form.
///
/// Opaque to the domain: only a [`crate::domain::ports::PasswordHasher`]
/// can produce or check one.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an encoded hash read back from storage.
    pub fn from_encoded(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Opaque bearer token identifying a server-side session.
///
/// Only the client holds the raw value; the session table is keyed by
/// [`SessionToken::digest`].
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(Zeroizing<String>);

impl SessionToken {
    /// Draw a new token from the operating system RNG.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0_u8; SESSION_TOKEN_BYTES]);
        OsRng.fill_bytes(&mut *bytes);
        Self(Zeroizing::new(hex::encode(&*bytes)))
    }

    /// Rehydrate a token presented by a client.
    ///
    /// Returns `None` for values that could not have been issued by
    /// [`SessionToken::generate`].
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = raw.len() == SESSION_TOKEN_BYTES * 2
            && raw.bytes().all(|b| b.is_ascii_hexdigit() && !b.is_ascii_uppercase());
        well_formed.then(|| Self(Zeroizing::new(raw.to_owned())))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// SHA-256 of the token, hex encoded; the session table key.
    #[must_use]
    pub fn digest(&self) -> SessionDigest {
        SessionDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Key under which a session is stored server-side.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionDigest(String);

impl AsRef<str> for SessionDigest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
