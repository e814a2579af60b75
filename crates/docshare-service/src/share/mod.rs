//! Share lifecycle: token generation, access policy, access logging and the
//! service tying them together.

pub mod logger;
pub mod policy;
pub mod service;
pub mod token;

pub use logger::AccessLogger;
pub use policy::{DenialReason, PolicyDecision};
pub use service::{
    CreateShareRequest, DocumentAccessOutcome, ShareLifecycleService, ShareResolution,
};
