//! # docshare-auth
//!
//! Verification of bearer tokens issued by the fleet platform and the
//! rules deciding which platform users may manage a share.
//!
//! ## Modules
//!
//! - `jwt`: claims, HS256 verification, and token minting for tooling
//! - `rbac`: platform roles and share management authorization

pub mod jwt;
pub mod rbac;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
pub use rbac::{Actor, RbacEnforcer, UserRole};
