//! Shared types for the marketplace backend
//!
//! Common types used across crates: the error-code system with its API
//! response envelope, wire models for every resource, and small utilities.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use http;
pub use serde::{Deserialize, Serialize};
