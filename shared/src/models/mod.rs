//! Data models
//!
//! Domain records in their canonical (snake_case) shape. The hosted store's
//! column naming is translated in `loyalty-client::rows` and never leaks here.
//! All IDs are UUID v4 generated client-side.

pub mod customer;
pub mod redemption;
pub mod reward;
pub mod settings;
pub mod visit;

// Re-exports
pub use customer::*;
pub use redemption::*;
pub use reward::*;
pub use settings::*;
pub use visit::*;
