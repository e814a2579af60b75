//! Platform user roles.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Roles carried in platform tokens.
///
/// Ordered by privilege: Admin > Manager > Member. Any role name the
/// platform adds later is treated as `Member`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Fleet administrator; may manage every share.
    Admin,
    /// Team manager; may manage shares created within their team.
    Manager,
    /// Regular crew or office user.
    #[serde(other)]
    Member,
}

impl UserRole {
    /// Return the privilege level (higher = more privileged).
    pub fn privilege_level(&self) -> u8 {
        match self {
            Self::Admin => 3,
            Self::Manager => 2,
            Self::Member => 1,
        }
    }

    /// Check if this role has at least the given role's privileges.
    pub fn has_at_least(&self, other: &UserRole) -> bool {
        self.privilege_level() >= other.privilege_level()
    }

    /// Check if this role is an admin.
    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Return the role as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
            Self::Member => "member",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy() {
        assert!(UserRole::Admin.has_at_least(&UserRole::Manager));
        assert!(UserRole::Manager.has_at_least(&UserRole::Manager));
        assert!(!UserRole::Member.has_at_least(&UserRole::Manager));
    }

    #[test]
    fn test_wire_names() {
        let role: UserRole = serde_json::from_str("\"manager\"").unwrap();
        assert_eq!(role, UserRole::Manager);
        let role: UserRole = serde_json::from_str("\"superintendent\"").unwrap();
        assert_eq!(role, UserRole::Member);
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"admin\"");
    }
}
