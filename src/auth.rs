//! Password hashing and session tokens.
//!
//! Passwords are stored as `pbkdf2$<iterations>$<salt>$<hash>` with base64
//! encoded salt and hash, derived with PBKDF2-HMAC-SHA256. Sessions are HS256
//! JWTs signed with the configured secret.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::Utc;
use hmac::{Hmac, Mac};
use jwt::{SignWithKey, VerifyWithKey};
use pbkdf2::pbkdf2_hmac;
use rand::{RngCore, thread_rng};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::error::AppError;

#[cfg(not(test))]
const PBKDF2_ITERATIONS: u32 = 100_000;
#[cfg(test)]
const PBKDF2_ITERATIONS: u32 = 1_000;

const SALT_LEN: usize = 16;
const HASH_LEN: usize = 32;
const HASH_SCHEME: &str = "pbkdf2";

/// How long a login stays valid.
pub const SESSION_TTL_SECS: i64 = 60 * 60;

pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    thread_rng().fill_bytes(&mut salt);

    let hash = derive(password, &salt, PBKDF2_ITERATIONS);

    format!(
        "{HASH_SCHEME}${PBKDF2_ITERATIONS}${}${}",
        BASE64.encode(salt),
        BASE64.encode(hash)
    )
}

/// Malformed stored hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(HASH_SCHEME), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    let (Ok(iterations), Ok(salt), Ok(expected)) = (
        iterations.parse::<u32>(),
        BASE64.decode(salt),
        BASE64.decode(hash),
    ) else {
        return false;
    };

    let actual = derive(password, &salt, iterations);
    actual.len() == expected.len()
        && actual
            .iter()
            .zip(expected.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut out = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Claims carried by a session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionClaims {
    /// User id.
    pub sub: i64,
    pub username: String,
    /// Issued-at, unix seconds.
    pub iat: i64,
    /// Expiration, unix seconds.
    pub exp: i64,
}

/// Issues and verifies session tokens.
#[derive(Clone)]
pub struct TokenSigner {
    key: Hmac<Sha256>,
}

impl TokenSigner {
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config("JWT_SECRET must not be empty".into()));
        }
        let key = Hmac::new_from_slice(secret.as_bytes())
            .map_err(|e| AppError::Config(format!("invalid JWT secret: {e}")))?;
        Ok(Self { key })
    }

    pub fn issue(&self, user_id: i64, username: &str) -> Result<String, AppError> {
        let iat = Utc::now().timestamp();
        let claims = SessionClaims {
            sub: user_id,
            username: username.to_string(),
            iat,
            exp: iat + SESSION_TTL_SECS,
        };

        claims
            .sign_with_key(&self.key)
            .map_err(|e| AppError::Token(format!("failed to sign session token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<SessionClaims, AppError> {
        let claims: SessionClaims = token
            .verify_with_key(&self.key)
            .map_err(|e| AppError::Token(format!("failed to verify session token: {e}")))?;

        if claims.exp <= Utc::now().timestamp() {
            return Err(AppError::Token("session token is expired".into()));
        }

        Ok(claims)
    }
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}
