//! # docshare-database
//!
//! Persistence for DocShare: the [`store`] traits the service layer is
//! written against, PostgreSQL implementations in [`repositories`], and
//! process-local implementations in [`memory`] for single-node
//! development and tests.

pub mod connection;
pub mod memory;
pub mod migration;
pub mod repositories;
pub mod store;

pub use connection::DatabasePool;
pub use store::{AccessLogStore, BatchRevokeOutcome, DocumentCatalog, ShareStore};
