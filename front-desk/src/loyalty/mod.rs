//! Loyalty ledger
//!
//! Pure functions over the in-memory record lists. Nothing here talks to the
//! store; [`crate::core::LoyaltyState`] calls into these after loading.

pub mod ledger;
pub mod reconcile;
pub mod stats;

pub use ledger::{
    available_points, can_redeem, customer_points, customer_visits, find_customer_by_phone,
    points_for_amount, redeemed_points, search_customers,
};
pub use reconcile::RewardDiff;
pub use stats::DashboardStats;
