// JWT token generation and validation service

use std::collections::HashSet;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::error::AuthError;

/// HMAC keys shorter than 256 bits are refused
pub const MIN_SECRET_BYTES: usize = 32;

/// JWT claims structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // username
    pub iat: i64,    // issued at timestamp
    pub exp: i64,    // expiration timestamp
}

/// Reasons a bearer token is refused
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid JWT signature")]
    InvalidSignature,

    #[error("Expired JWT token")]
    Expired,

    #[error("Invalid JWT token")]
    Malformed,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Issues and validates HS512-signed access tokens
///
/// Both operations take the clock reading explicitly so the provider stays a
/// pure function of its key, its TTL and its inputs.
#[derive(Clone)]
pub struct TokenProvider {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl TokenProvider {
    /// Create a provider from a base64-encoded secret of at least 256 bits
    pub fn new(base64_secret: &str, ttl: Duration) -> Result<Self, AuthError> {
        let secret = STANDARD
            .decode(base64_secret.trim())
            .map_err(|_| AuthError::Config("JWT_SECRET must be valid base64".to_string()))?;
        if secret.len() < MIN_SECRET_BYTES {
            return Err(AuthError::Config(format!(
                "JWT_SECRET must decode to at least {} bytes, got {}",
                MIN_SECRET_BYTES,
                secret.len()
            )));
        }
        if ttl < Duration::seconds(1) {
            return Err(AuthError::Config("token lifetime must be at least one second".to_string()));
        }

        Ok(Self::from_secret_bytes(&secret, ttl))
    }

    /// Create a provider from raw key bytes
    pub fn from_secret_bytes(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Lifetime of issued tokens
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Sign a token for `subject`, valid from `now` until `now + ttl`
    pub fn issue(&self, subject: &str, now: DateTime<Utc>) -> Result<String, AuthError> {
        let iat = now.timestamp();
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp: iat + self.ttl.num_seconds(),
        };

        encode(&Header::new(Algorithm::HS512), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Config(format!("token signing failed: {}", e)))
    }

    /// Verify signature and structure, then check expiry against `now`
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        if token.trim().is_empty() {
            return Err(TokenError::Malformed);
        }

        let mut validation = Validation::new(Algorithm::HS512);
        // Expiry is compared against the caller's clock below.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = HashSet::from(["exp".to_string(), "sub".to_string()]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)?.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }
        if claims.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    /// Validate against the wall clock
    pub fn validate_now(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate(token, Utc::now())
    }
}
