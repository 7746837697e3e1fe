//! Session token issuing and validation
//!
//! Tokens are HS256-signed JWTs. They are issued once at sign-in and carried
//! back by the browser in the `token` cookie; there is no refresh or
//! revocation flow, a token is valid until it expires.
//!
//! Keys are held by a [`JwtKeys`] value that the service constructs at
//! startup and passes to whoever needs it; nothing is stored globally.
//!
//! ```rust
//! use crypto_core::jwt::{JwtKeys, TokenSubject};
//! use uuid::Uuid;
//!
//! let keys = JwtKeys::from_secret("0123456789abcdef0123456789abcdef", 3600).unwrap();
//! let subject = TokenSubject {
//!     user_id: Uuid::new_v4(),
//!     email: "reader@example.com",
//!     name: "Reader",
//!     role: "USER",
//! };
//! let token = keys.issue(&subject).unwrap();
//! assert!(keys.validate(&token).is_ok());
//! ```

use crate::{CryptoError, Result};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

const JWT_ALGORITHM: Algorithm = Algorithm::HS256;

/// Shortest secret accepted for HS256 signing.
pub const MIN_SECRET_LEN: usize = 32;

/// Claims carried by a session token
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Subject (user ID as UUID string)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    pub email: String,
    /// Display name
    pub name: String,
    /// "USER" or "ADMIN"
    pub role: String,
}

impl Claims {
    pub fn user_id(&self) -> Result<Uuid> {
        Uuid::parse_str(&self.sub)
            .map_err(|e| CryptoError::TokenValidation(format!("invalid subject: {e}")))
    }
}

/// Identity fields written into a fresh token.
#[derive(Debug, Clone, Copy)]
pub struct TokenSubject<'a> {
    pub user_id: Uuid,
    pub email: &'a str,
    pub name: &'a str,
    pub role: &'a str,
}

#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("secret", &"[REDACTED]")
            .field("ttl_secs", &self.ttl.num_seconds())
            .finish()
    }
}

impl JwtKeys {
    /// Build signing and verification keys from a shared secret.
    ///
    /// `ttl_secs` is the lifetime stamped into every issued token.
    pub fn from_secret(secret: &str, ttl_secs: i64) -> Result<Self> {
        if secret.len() < MIN_SECRET_LEN {
            return Err(CryptoError::InvalidSecret(format!(
                "secret must be at least {MIN_SECRET_LEN} bytes"
            )));
        }

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::seconds(ttl_secs),
        })
    }

    pub fn ttl_secs(&self) -> i64 {
        self.ttl.num_seconds()
    }

    /// Issue a signed token for `subject`
    pub fn issue(&self, subject: &TokenSubject<'_>) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
            email: subject.email.to_string(),
            name: subject.name.to_string(),
            role: subject.role.to_string(),
        };

        encode(&Header::new(JWT_ALGORITHM), &claims, &self.encoding)
            .map_err(|e| CryptoError::TokenEncoding(e.to_string()))
    }

    /// Validate signature and expiry, returning the claims.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(JWT_ALGORITHM);
        validation.validate_exp = true;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| CryptoError::TokenValidation(e.to_string()))
    }
}
