//! Route handlers organized by audience.

pub mod access;
pub mod health;
pub mod share;
