//! Process-local store implementations backed by `DashMap`.
//!
//! Used for single-node development (`database.backend = "memory"`) and in
//! tests. Every mutation holds the record's shard guard for the whole
//! read-check-write, so per-record atomicity matches the PostgreSQL
//! repositories.

pub mod access_log;
pub mod catalog;
pub mod share;

pub use access_log::MemoryAccessLogStore;
pub use catalog::{CatalogSeed, MemoryCatalog};
pub use share::MemoryShareStore;
