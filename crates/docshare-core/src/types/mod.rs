//! Core type definitions used across the DocShare workspace.

pub mod id;

pub use id::*;
