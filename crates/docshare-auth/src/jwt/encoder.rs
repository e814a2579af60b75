//! JWT token creation.
//!
//! DocShare only verifies tokens in production; minting exists for local
//! tooling and tests against a shared secret.

use chrono::{Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use docshare_core::config::AuthConfig;
use docshare_core::error::AppError;
use docshare_core::types::{TeamId, UserId};

use super::claims::Claims;
use crate::rbac::UserRole;

/// Signs HS256 tokens with the configured secret.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: Option<String>,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .finish()
    }
}

impl JwtEncoder {
    /// Creates a new encoder from auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            issuer: (!config.issuer.is_empty()).then(|| config.issuer.clone()),
        }
    }

    /// Signs arbitrary claims.
    pub fn encode(&self, claims: &Claims) -> Result<String, AppError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode token: {e}")))
    }

    /// Issues a token for a platform user valid for `ttl`.
    pub fn issue(
        &self,
        user_id: UserId,
        name: &str,
        role: UserRole,
        team: Option<TeamId>,
        ttl: Duration,
    ) -> Result<String, AppError> {
        let now = Utc::now();
        self.encode(&Claims {
            sub: user_id,
            name: name.to_string(),
            role,
            team,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
            iss: self.issuer.clone(),
        })
    }
}
