//! Role-based access control for share management.

pub mod enforcer;
pub mod role;

pub use enforcer::{Actor, RbacEnforcer};
pub use role::UserRole;
