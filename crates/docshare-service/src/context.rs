//! Request context carrying the authenticated platform user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docshare_auth::jwt::Claims;
use docshare_auth::rbac::{Actor, UserRole};
use docshare_core::types::{TeamId, UserId};
use docshare_entity::access_log::ClientInfo;

/// Context for the current authenticated request.
///
/// Built by the API extractor from verified token claims and passed into
/// service methods so every operation knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's ID.
    pub user_id: UserId,
    /// Display name from the token.
    pub username: String,
    /// The user's role at the time the token was issued.
    pub role: UserRole,
    /// The user's team, if any.
    pub team_id: Option<TeamId>,
    /// IP address of the request origin.
    pub ip_address: Option<String>,
    /// User-Agent header value.
    pub user_agent: Option<String>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Builds a context from verified claims and request metadata.
    pub fn from_claims(claims: &Claims, client: ClientInfo) -> Self {
        Self {
            user_id: claims.sub,
            username: claims.display_name().to_string(),
            role: claims.role,
            team_id: claims.team,
            ip_address: client.ip_address,
            user_agent: client.user_agent,
            request_time: Utc::now(),
        }
    }

    /// The authorization view of this context.
    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.user_id,
            role: self.role,
            team_id: self.team_id,
        }
    }

    /// Returns whether the current user is an admin.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
