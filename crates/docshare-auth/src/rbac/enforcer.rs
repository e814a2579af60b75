//! Share management authorization.

use docshare_core::error::AppError;
use docshare_core::types::{TeamId, UserId};
use docshare_entity::share::Share;

use super::role::UserRole;

/// The acting platform user, as far as authorization is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    /// User ID from the token subject.
    pub user_id: UserId,
    /// Role from the token.
    pub role: UserRole,
    /// Team from the token.
    pub team_id: Option<TeamId>,
}

/// Decides who may revoke, extend, list, email, or audit a share.
///
/// Allowed: the share's creator, any admin, or a manager whose team is the
/// team the share was created under.
#[derive(Debug, Clone, Copy, Default)]
pub struct RbacEnforcer;

impl RbacEnforcer {
    /// Creates a new enforcer.
    pub fn new() -> Self {
        Self
    }

    /// Whether `actor` may manage `share`.
    pub fn can_manage_share(&self, actor: &Actor, share: &Share) -> bool {
        if actor.user_id == share.created_by || actor.role.is_admin() {
            return true;
        }
        actor.role.has_at_least(&UserRole::Manager)
            && actor.team_id.is_some()
            && actor.team_id == share.team_id
    }

    /// Returns `Err(Authorization)` unless `actor` may manage `share`.
    pub fn require_share_manager(&self, actor: &Actor, share: &Share) -> Result<(), AppError> {
        if self.can_manage_share(actor, share) {
            Ok(())
        } else {
            Err(AppError::authorization(format!(
                "Role '{}' may not manage share {}",
                actor.role, share.id
            )))
        }
    }
}
