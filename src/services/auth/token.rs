/*
 * Responsibility
 * - bearer token verification (header extraction -> HS256 verify -> claims)
 * - the decoding key is built once at construction and read-only afterwards;
 *   safe to share across requests behind an Arc
 */
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

// Verification failures, ordered the way checks run: header presence,
// header shape, then token validity (signature, expiry, claim structure).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authorization header missing or empty")]
    MissingHeader,

    #[error("authorization header has no token field")]
    MalformedHeader,

    #[error("token verification failed: {0}")]
    InvalidToken(#[source] jsonwebtoken::errors::Error),
}

/// Caller role carried in the token.
///
/// Closed set on purpose: a token with any other role value fails
/// deserialization and is rejected as invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Claims this API trusts as the source of truth for the caller's identity.
///
/// No cross-check against the user store happens here: a still-valid token
/// with a stale role is accepted until it expires.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub role: Role,
    pub exp: u64,
}

/// HS256 bearer-token verifier.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AuthService {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for AuthService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AuthService")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AuthService {
    pub fn new(secret: &str, leeway_seconds: u64) -> Self {
        let decoding_key = DecodingKey::from_secret(secret.as_bytes());

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;

        Self {
            decoding_key,
            validation,
        }
    }

    /// Verify the raw `Authorization` header value and return the claims.
    ///
    /// The header is expected as `"<scheme> <token>"`. The scheme word is not
    /// inspected; only the second whitespace-delimited field is used.
    /// `jsonwebtoken::Validation` checks signature and `exp`; missing
    /// `userId`/`role` (or an unknown role value) fail deserialization and
    /// surface as `InvalidToken`.
    pub fn authenticate(&self, header_value: Option<&str>) -> Result<TokenClaims, AuthError> {
        let header = header_value
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AuthError::MissingHeader)?;

        let token = header
            .split_whitespace()
            .nth(1)
            .ok_or(AuthError::MalformedHeader)?;

        let data = jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(AuthError::InvalidToken)?;

        Ok(data.claims)
    }
}
