//! Read-only vessel and document summaries supplied by the platform's
//! document catalog.

pub mod model;

pub use model::{DocumentSummary, VesselSummary};
