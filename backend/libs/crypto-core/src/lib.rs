//! Credential primitives shared by blog services.
//!
//! - `jwt`: issuing and validating the signed session token carried in the
//!   `token` cookie
//! - `password`: Argon2id hashing and verification

pub mod jwt;
pub mod password;

#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("token encoding failed: {0}")]
    TokenEncoding(String),

    #[error("token validation failed: {0}")]
    TokenValidation(String),

    #[error("invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("password hashing failed: {0}")]
    PasswordHash(String),
}

pub type Result<T> = std::result::Result<T, CryptoError>;
