//! # docshare-entity
//!
//! Domain entity models for DocShare. Shares, access log entries and the
//! read-only catalog summaries that share views are assembled from. All
//! entities derive `Debug`, `Clone`, `Serialize`, `Deserialize`; they
//! serialize in camelCase because the frontend consumes them directly.

pub mod access_log;
pub mod catalog;
pub mod share;
