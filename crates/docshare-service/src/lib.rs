//! # docshare-service
//!
//! Business logic for DocShare. The share lifecycle service orchestrates
//! the share store, the document catalog, the access policy, the access
//! logger and the notification dispatcher.
//!
//! Services follow constructor injection: all dependencies are provided
//! at construction time via `Arc` references to the store traits.

pub mod context;
pub mod notification;
pub mod share;

pub use context::RequestContext;
pub use notification::{DeliveryReport, NotificationDispatcher};
pub use share::{
    AccessLogger, CreateShareRequest, DocumentAccessOutcome, ShareLifecycleService, ShareResolution,
};
