//! JWT claims issued by the platform's auth system.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use docshare_core::types::{TeamId, UserId};

use crate::rbac::UserRole;

/// Claims carried by a platform access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the platform user ID.
    pub sub: UserId,
    /// Display name, shown to recipients as the share sender.
    #[serde(default)]
    pub name: String,
    /// Platform role.
    pub role: UserRole,
    /// Team the user belongs to, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<TeamId>,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Issuer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

impl Claims {
    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Sender name to display, falling back to a neutral label.
    pub fn display_name(&self) -> &str {
        let name = self.name.trim();
        if name.is_empty() { "Fleet user" } else { name }
    }
}
