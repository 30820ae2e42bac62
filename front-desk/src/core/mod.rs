//! Core desk types: configuration, errors and application state

pub mod config;
pub mod error;
pub mod state;

pub use config::Config;
pub use error::{DeskError, DeskResult};
pub use state::LoyaltyState;
