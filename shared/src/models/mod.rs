//! Data models
//!
//! Shared between market-server and API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (PostgreSQL BIGSERIAL); timestamps are Unix millis.

pub mod advertisement;
pub mod category;
pub mod image;
pub mod message;
pub mod order;
pub mod page;
pub mod product;
pub mod serde_helpers;
pub mod user;

// Re-exports
pub use advertisement::*;
pub use category::*;
pub use image::*;
pub use message::*;
pub use order::*;
pub use page::*;
pub use product::*;
pub use user::*;
