//! Authentication: JWT service and request extractors

pub mod extractor;
pub mod jwt;

pub use extractor::AdminUser;
pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
