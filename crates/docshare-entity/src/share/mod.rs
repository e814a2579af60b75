//! Share domain entities.

pub mod duration;
pub mod model;
pub mod view;

pub use duration::DurationPreset;
pub use model::{
    NewShare, Recipient, RecipientType, SecurityOptions, Share, ShareStatus, normalize_email,
};
pub use view::{DocumentAccess, ShareCreated, ShareInfo, ShareSummary, ShareView};
