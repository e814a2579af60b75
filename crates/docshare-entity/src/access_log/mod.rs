//! Access log domain entities and the hash chain that makes them
//! tamper-evident.

pub mod chain;
pub mod model;

pub use chain::{ChainVerification, GENESIS_HASH, verify_chain};
pub use model::{AccessAction, AccessLogEntry, ClientInfo, NewAccessLogEntry};
