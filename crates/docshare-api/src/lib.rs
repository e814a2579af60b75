//! # docshare-api
//!
//! HTTP API layer for DocShare built on Axum.
//!
//! Provides the owner-facing share management endpoints, the public
//! recipient endpoints, middleware (CORS, request logging), extractors,
//! DTOs, and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, serve};
pub use error::ApiError;
pub use state::AppState;
