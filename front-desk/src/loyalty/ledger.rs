//! Points Ledger
//!
//! Balance and lookup reducers. The earned balance is the sum of visit
//! points and never goes down; redemptions reduce only the available
//! balance.

use shared::models::{Customer, MINOR_UNITS_PER_MAJOR, Redemption, Reward, Visit};
use shared::util::digits_only;
use uuid::Uuid;

/// Find a customer by phone, ignoring formatting.
///
/// Both sides are reduced to digits; the first customer whose digits contain
/// the query's digits wins. A query without digits matches nobody.
pub fn find_customer_by_phone<'a>(phone: &str, customers: &'a [Customer]) -> Option<&'a Customer> {
    let query = digits_only(phone);
    if query.is_empty() {
        return None;
    }
    customers
        .iter()
        .find(|c| digits_only(&c.phone).contains(&query))
}

/// Visits of one customer, in stored order
pub fn customer_visits(customer_id: Uuid, visits: &[Visit]) -> Vec<&Visit> {
    visits.iter().filter(|v| v.customer_id == customer_id).collect()
}

/// Earned balance: sum of the customer's visit points
pub fn customer_points(customer_id: Uuid, visits: &[Visit]) -> i64 {
    visits
        .iter()
        .filter(|v| v.customer_id == customer_id)
        .map(|v| v.points)
        .sum()
}

/// Points spent on redemptions
pub fn redeemed_points(customer_id: Uuid, redemptions: &[Redemption]) -> i64 {
    redemptions
        .iter()
        .filter(|r| r.customer_id == customer_id)
        .map(|r| r.points)
        .sum()
}

/// Spendable balance: earned minus redeemed
pub fn available_points(customer_id: Uuid, visits: &[Visit], redemptions: &[Redemption]) -> i64 {
    customer_points(customer_id, visits) - redeemed_points(customer_id, redemptions)
}

/// Threshold check; activity is checked by the caller
pub fn can_redeem(reward: &Reward, total_points: i64) -> bool {
    total_points >= reward.points_required
}

/// One point per whole major currency unit (floor)
pub fn points_for_amount(amount_minor: i64) -> i64 {
    amount_minor.max(0) / MINOR_UNITS_PER_MAJOR
}

/// Customer list filter: names and email case-insensitively, phone as typed.
pub fn search_customers<'a>(term: &str, customers: &'a [Customer]) -> Vec<&'a Customer> {
    let term = term.trim();
    if term.is_empty() {
        return customers.iter().collect();
    }
    let lower = term.to_lowercase();
    customers
        .iter()
        .filter(|c| {
            c.first_name.to_lowercase().contains(&lower)
                || c.last_name.to_lowercase().contains(&lower)
                || c.email.to_lowercase().contains(&lower)
                || c.phone.contains(term)
        })
        .collect()
}
