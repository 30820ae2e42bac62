//! Front Desk - salon loyalty administration core
//!
//! # 架构概述
//!
//! - **状态** (`core`): configuration, [`DeskError`], [`LoyaltyState`]
//! - **积分** (`loyalty`): points ledger, reward reconciliation, dashboard stats
//! - **签到** (`checkin`): phone lookup, registration and visit forms
//! - **奖励** (`catalog`): reward catalog editing
//! - **初始化** (`seed`): demo data for an empty store
//!
//! Persistence goes through [`loyalty_client::LoyaltyGateway`].
//!
//! ```text
//! front-desk/src/
//! ├── core/          # 配置、状态、错误
//! ├── loyalty/       # ledger, reconcile, stats
//! ├── checkin.rs
//! ├── catalog.rs
//! ├── seed.rs
//! └── utils/         # logger
//! ```

pub mod catalog;
pub mod checkin;
pub mod core;
pub mod loyalty;
pub mod seed;
pub mod utils;

// Re-export 公共类型
pub use self::core::{Config, DeskError, DeskResult, LoyaltyState};
pub use loyalty::{DashboardStats, RewardDiff};
pub use seed::{InitOutcome, initialize_database};
pub use utils::init_logger_with_level;

/// Load `.env` and start logging
///
/// Logging settings are read straight from the environment so that errors in
/// the rest of the configuration are logged.
pub fn setup_environment() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").ok();
    let json = std::env::var("LOG_JSON")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false);
    init_logger_with_level(level.as_deref(), json);
    Ok(())
}
