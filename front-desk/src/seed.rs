//! Database initialization and demo data
//!
//! On startup an empty store is seeded with a small salon: five customers,
//! eight visits and five rewards. Demo ids are fixed so seeding twice is a
//! no-op upsert.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use loyalty_client::{ClientResult, LoyaltyGateway};
use shared::models::{Customer, Reward, Visit};
use uuid::Uuid;

use crate::loyalty::points_for_amount;

/// Demo records
#[derive(Debug, Clone)]
pub struct DemoData {
    pub customers: Vec<Customer>,
    pub visits: Vec<Visit>,
    pub rewards: Vec<Reward>,
}

/// What [`initialize_database`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
    /// Customers already present; nothing written
    AlreadyPopulated,
    /// Store was empty and demo data was written
    Seeded,
    /// Store is empty and seeding is disabled
    LeftEmpty,
}

const DEMO_ID_BASE: u128 = 0x5a10_0000_0000_4000_8000_0000_0000_0000;

fn demo_id(n: u128) -> Uuid {
    Uuid::from_u128(DEMO_ID_BASE | n)
}

#[allow(clippy::too_many_arguments)]
fn customer(
    n: u128,
    first: &str,
    last: &str,
    phone: &str,
    joined: DateTime<Utc>,
    birthday: Option<NaiveDate>,
    notes: Option<&str>,
    preferences: &[&str],
) -> Customer {
    Customer {
        id: demo_id(n),
        first_name: first.to_string(),
        last_name: last.to_string(),
        phone: phone.to_string(),
        email: format!("{}@example.com", first.to_lowercase()),
        join_date: joined,
        birthday,
        notes: notes.map(str::to_string),
        preferences: preferences.iter().map(|p| p.to_string()).collect(),
    }
}

#[allow(clippy::too_many_arguments)]
fn visit(
    n: u128,
    customer: u128,
    date: DateTime<Utc>,
    service: &str,
    amount: i64,
    staff: &str,
    notes: Option<&str>,
) -> Visit {
    Visit {
        id: demo_id(n),
        customer_id: demo_id(customer),
        date,
        service: service.to_string(),
        amount,
        points: points_for_amount(amount),
        notes: notes.map(str::to_string),
        staff_member: Some(staff.to_string()),
    }
}

fn reward(
    n: u128,
    name: &str,
    description: &str,
    points_required: i64,
    expiry_days: i32,
    category: &str,
) -> Reward {
    Reward {
        id: demo_id(n),
        name: name.to_string(),
        description: description.to_string(),
        points_required,
        expiry_days: Some(expiry_days),
        is_active: true,
        category: Some(category.to_string()),
    }
}

/// Demo data dated relative to `now`
pub fn demo_data(now: DateTime<Utc>) -> DemoData {
    let days_ago = |d: i64| now - Duration::days(d);

    let customers = vec![
        customer(
            1,
            "John",
            "Doe",
            "+254 712 345 678",
            days_ago(110),
            NaiveDate::from_ymd_opt(1985, 4, 15),
            Some("Prefers appointments on weekends"),
            &["short haircuts", "beard trim"],
        ),
        customer(
            2,
            "Jane",
            "Smith",
            "+254 723 456 789",
            days_ago(65),
            NaiveDate::from_ymd_opt(1990, 7, 22),
            Some("Allergic to certain hair products"),
            &["balayage", "natural products"],
        ),
        customer(
            3,
            "Sarah",
            "Johnson",
            "+254 734 567 890",
            days_ago(45),
            NaiveDate::from_ymd_opt(1982, 9, 10),
            None,
            &["blowouts", "color touch-ups"],
        ),
        customer(
            4,
            "Michael",
            "Brown",
            "+254 745 678 901",
            days_ago(70),
            None,
            Some("Prefers quick appointments during lunch breaks"),
            &["classic cuts", "beard shaping"],
        ),
        customer(
            5,
            "Emily",
            "Davis",
            "+254 756 789 012",
            days_ago(120),
            NaiveDate::from_ymd_opt(1995, 2, 18),
            None,
            &["hair treatments", "styling"],
        ),
    ];

    let visits = vec![
        visit(101, 1, days_ago(55), "Haircut", 3500, "Maria", None),
        visit(102, 1, days_ago(19), "Haircut & Beard Trim", 5000, "Carlos", None),
        visit(
            103,
            2,
            days_ago(40),
            "Color & Style",
            12000,
            "Jessica",
            Some("Used hypoallergenic products"),
        ),
        visit(104, 2, days_ago(14), "Balayage", 15000, "Jessica", None),
        visit(105, 3, days_ago(24), "Blowout", 4500, "David", None),
        visit(
            106,
            4,
            days_ago(35),
            "Quick Cut",
            2500,
            "Carlos",
            Some("Lunch break appointment"),
        ),
        visit(107, 5, days_ago(50), "Hair Treatment", 7500, "Maria", None),
        visit(108, 5, days_ago(28), "Cut & Style", 6500, "Jessica", None),
    ];

    let rewards = vec![
        reward(
            201,
            "Free Basic Haircut",
            "Redeem for a complimentary basic haircut service",
            200,
            90,
            "service",
        ),
        reward(
            202,
            "50% Off Color Service",
            "Get half off your next color service",
            300,
            60,
            "discount",
        ),
        reward(
            203,
            "Free Product Sample Kit",
            "Receive a kit of premium hair care samples",
            100,
            30,
            "product",
        ),
        reward(
            204,
            "VIP Treatment Add-on",
            "Add a luxury treatment to any service",
            150,
            45,
            "addon",
        ),
        reward(
            205,
            "Bring a Friend Discount",
            "Both you and a friend get 25% off services",
            250,
            30,
            "special",
        ),
    ];

    DemoData {
        customers,
        visits,
        rewards,
    }
}

/// Seed demo data into an empty store.
///
/// A populated store is left alone. Missing tables are reported as the
/// store's error; creating them is a deployment step.
pub async fn initialize_database<G: LoyaltyGateway>(gateway: &G, seed: bool) -> ClientResult<InitOutcome> {
    let populated = gateway.has_customers().await.inspect_err(|e| {
        if e.is_undefined_table() {
            tracing::error!("Loyalty tables do not exist; create customers, visits, rewards and redemptions first");
        }
    })?;

    if populated {
        tracing::info!("Database already contains data");
        return Ok(InitOutcome::AlreadyPopulated);
    }
    if !seed {
        tracing::info!("No data found, seeding disabled");
        return Ok(InitOutcome::LeftEmpty);
    }

    tracing::info!("No data found, seeding database...");
    let demo = demo_data(shared::util::now());
    gateway.seed(&demo.customers, &demo.visits, &demo.rewards).await?;
    tracing::info!("Database seeded successfully");
    Ok(InitOutcome::Seeded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loyalty::customer_points;
    use loyalty_client::{MemoryTableClient, RemoteGateway};

    #[test]
    fn test_demo_data_is_consistent() {
        let demo = demo_data(Utc::now());
        assert_eq!(demo.customers.len(), 5);
        assert_eq!(demo.visits.len(), 8);
        assert_eq!(demo.rewards.len(), 5);

        for v in &demo.visits {
            assert!(demo.customers.iter().any(|c| c.id == v.customer_id));
            assert_eq!(v.points, v.amount / 100);
        }
        assert_eq!(customer_points(demo_id(2), &demo.visits), 270);

        for r in &demo.rewards {
            let category = r.category.as_deref().unwrap();
            assert!(crate::catalog::CATEGORIES.iter().any(|(known, _)| *known == category));
        }
    }

    #[tokio::test]
    async fn test_initialize_seeds_once() {
        let gateway = RemoteGateway::new(MemoryTableClient::with_loyalty_schema());

        assert_eq!(initialize_database(&gateway, true).await.unwrap(), InitOutcome::Seeded);
        assert_eq!(
            initialize_database(&gateway, true).await.unwrap(),
            InitOutcome::AlreadyPopulated
        );
        assert_eq!(gateway.fetch_customers().await.unwrap().len(), 5);
        assert_eq!(gateway.fetch_visits(None).await.unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_initialize_without_seeding() {
        let gateway = RemoteGateway::new(MemoryTableClient::with_loyalty_schema());
        assert_eq!(initialize_database(&gateway, false).await.unwrap(), InitOutcome::LeftEmpty);
        assert!(!gateway.has_customers().await.unwrap());
    }

    #[tokio::test]
    async fn test_initialize_reports_missing_tables() {
        let gateway = RemoteGateway::new(MemoryTableClient::new());
        let err = initialize_database(&gateway, true).await.unwrap_err();
        assert!(err.is_undefined_table());
    }
}
