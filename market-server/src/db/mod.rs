//! Database access layer

pub mod advertisements;
pub mod categories;
pub mod images;
pub mod messages;
pub mod orders;
pub mod products;
pub mod query_builder;
pub mod tokens;
pub mod users;
