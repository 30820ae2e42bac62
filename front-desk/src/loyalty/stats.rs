//! Dashboard statistics
//!
//! Aggregates for the overview screen, computed from local state. `now` is
//! passed in so the period windows are testable.

use std::collections::HashMap;

use chrono::{DateTime, Datelike, Duration, Utc, Weekday};
use serde::Serialize;
use shared::models::{Customer, Reward, Visit};

/// Rows shown in the "recent" and "top" lists
const LIST_LEN: usize = 5;

/// Length of the visit-growth comparison window
const PERIOD_DAYS: i64 = 30;

/// Months covered by the revenue chart (current month included)
const REVENUE_MONTHS: i32 = 6;

const WEEK: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCount {
    pub service: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthRevenue {
    pub year: i32,
    /// 1..=12
    pub month: u32,
    /// Minor currency units
    pub revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_customers: usize,
    pub total_visits: usize,
    /// Minor currency units
    pub total_revenue: i64,
    /// Minor currency units, 0 without visits
    pub average_ticket: i64,
    pub total_points_awarded: i64,
    pub active_rewards: usize,
    /// Visits in the last 30 days
    pub recent_period_visits: usize,
    /// Visits in the 30 days before that
    pub previous_period_visits: usize,
    /// Growth of the last period over the previous one, in percent
    pub visit_growth_percent: f64,
    /// Sunday first
    pub visits_by_weekday: Vec<(Weekday, usize)>,
    pub top_services: Vec<ServiceCount>,
    /// Oldest month first
    pub monthly_revenue: Vec<MonthRevenue>,
    /// Newest first
    pub recent_visits: Vec<Visit>,
    /// Newest joiners first
    pub recent_customers: Vec<Customer>,
}

impl DashboardStats {
    pub fn compute(customers: &[Customer], visits: &[Visit], rewards: &[Reward], now: DateTime<Utc>) -> Self {
        let total_revenue: i64 = visits.iter().map(|v| v.amount).sum();
        let average_ticket = match visits.len() {
            0 => 0,
            n => total_revenue / n as i64,
        };

        let recent_start = now - Duration::days(PERIOD_DAYS);
        let previous_start = now - Duration::days(PERIOD_DAYS * 2);
        let recent_period_visits = visits.iter().filter(|v| v.date >= recent_start).count();
        let previous_period_visits = visits
            .iter()
            .filter(|v| v.date >= previous_start && v.date < recent_start)
            .count();

        Self {
            total_customers: customers.len(),
            total_visits: visits.len(),
            total_revenue,
            average_ticket,
            total_points_awarded: visits.iter().map(|v| v.points).sum(),
            active_rewards: rewards.iter().filter(|r| r.is_active).count(),
            recent_period_visits,
            previous_period_visits,
            visit_growth_percent: growth_percent(recent_period_visits, previous_period_visits),
            visits_by_weekday: visits_by_weekday(visits),
            top_services: top_services(visits),
            monthly_revenue: monthly_revenue(visits, now),
            recent_visits: newest(visits, |v| v.date),
            recent_customers: newest(customers, |c| c.join_date),
        }
    }
}

/// Percent change; 100 when growing from zero, 0 when both are zero
fn growth_percent(recent: usize, previous: usize) -> f64 {
    match (recent, previous) {
        (0, 0) => 0.0,
        (_, 0) => 100.0,
        (r, p) => (r as f64 - p as f64) / p as f64 * 100.0,
    }
}

fn visits_by_weekday(visits: &[Visit]) -> Vec<(Weekday, usize)> {
    WEEK.iter()
        .map(|day| (*day, visits.iter().filter(|v| v.date.weekday() == *day).count()))
        .collect()
}

fn top_services(visits: &[Visit]) -> Vec<ServiceCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for visit in visits {
        *counts.entry(visit.service.as_str()).or_default() += 1;
    }
    let mut services: Vec<ServiceCount> = counts
        .into_iter()
        .map(|(service, count)| ServiceCount {
            service: service.to_string(),
            count,
        })
        .collect();
    services.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.service.cmp(&b.service)));
    services.truncate(LIST_LEN);
    services
}

fn monthly_revenue(visits: &[Visit], now: DateTime<Utc>) -> Vec<MonthRevenue> {
    let current = now.year() * 12 + now.month0() as i32;
    (0..REVENUE_MONTHS)
        .rev()
        .map(|back| {
            let index = current - back;
            let (year, month) = (index.div_euclid(12), index.rem_euclid(12) as u32 + 1);
            let revenue = visits
                .iter()
                .filter(|v| v.date.year() == year && v.date.month() == month)
                .map(|v| v.amount)
                .sum();
            MonthRevenue { year, month, revenue }
        })
        .collect()
}

fn newest<T: Clone>(items: &[T], key: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by_key(|item| std::cmp::Reverse(key(*item)));
    sorted.into_iter().take(LIST_LEN).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use shared::models::NewCustomer;
    use uuid::Uuid;

    fn now() -> DateTime<Utc> {
        // A Saturday
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    fn visit(days_ago: i64, service: &str, amount: i64) -> Visit {
        Visit {
            id: Uuid::new_v4(),
            customer_id: Uuid::new_v4(),
            date: now() - Duration::days(days_ago),
            service: service.into(),
            amount,
            points: amount / 100,
            notes: None,
            staff_member: None,
        }
    }

    #[test]
    fn test_totals() {
        let visits = vec![visit(1, "Haircut", 3500), visit(2, "Balayage", 15000), visit(3, "Haircut", 5000)];
        let stats = DashboardStats::compute(&[], &visits, &[], now());

        assert_eq!(stats.total_visits, 3);
        assert_eq!(stats.total_revenue, 23500);
        assert_eq!(stats.average_ticket, 7833);
        assert_eq!(stats.total_points_awarded, 235);
        assert_eq!(
            stats.top_services[0],
            ServiceCount {
                service: "Haircut".into(),
                count: 2
            }
        );
        assert_eq!(stats.recent_visits[0].amount, 3500);
    }

    #[test]
    fn test_empty_state() {
        let stats = DashboardStats::compute(&[], &[], &[], now());
        assert_eq!(stats.average_ticket, 0);
        assert_eq!(stats.visit_growth_percent, 0.0);
        assert!(stats.top_services.is_empty());
        assert_eq!(stats.visits_by_weekday.len(), 7);
        assert_eq!(stats.monthly_revenue.len(), 6);
    }

    #[test]
    fn test_visit_growth() {
        let visits = vec![visit(5, "A", 100), visit(10, "A", 100), visit(40, "A", 100)];
        let stats = DashboardStats::compute(&[], &visits, &[], now());
        assert_eq!(stats.recent_period_visits, 2);
        assert_eq!(stats.previous_period_visits, 1);
        assert_eq!(stats.visit_growth_percent, 100.0);

        let stats = DashboardStats::compute(&[], &visits[..2], &[], now());
        assert_eq!(stats.visit_growth_percent, 100.0);

        let visits = vec![visit(5, "A", 100), visit(40, "A", 100), visit(45, "A", 100)];
        let stats = DashboardStats::compute(&[], &visits, &[], now());
        assert_eq!(stats.visit_growth_percent, -50.0);
    }

    #[test]
    fn test_weekday_and_months() {
        let visits = vec![visit(0, "A", 1000), visit(7, "A", 2000), visit(60, "A", 500)];
        let stats = DashboardStats::compute(&[], &visits, &[], now());

        assert_eq!(stats.visits_by_weekday[6], (Weekday::Sat, 2));
        let last = stats.monthly_revenue.last().unwrap();
        assert_eq!((last.year, last.month, last.revenue), (2025, 3, 3000));
        let first = &stats.monthly_revenue[0];
        assert_eq!((first.year, first.month), (2024, 10));
        // 60 days before March 15 is January 14
        let january = stats.monthly_revenue.iter().find(|m| m.month == 1).unwrap();
        assert_eq!(january.revenue, 500);
    }

    #[test]
    fn test_recent_customers_and_active_rewards() {
        let mut customers: Vec<Customer> = (0..7)
            .map(|i| {
                let mut c = NewCustomer::joining_now(format!("C{i}"), "X", "0700000000", "")
                    .into_customer(Uuid::new_v4());
                c.join_date = now() - Duration::days(i);
                c
            })
            .collect();
        customers.reverse();
        let rewards = vec![
            Reward {
                id: Uuid::new_v4(),
                name: "On".into(),
                description: String::new(),
                points_required: 100,
                expiry_days: None,
                is_active: true,
                category: None,
            },
            Reward {
                id: Uuid::new_v4(),
                name: "Off".into(),
                description: String::new(),
                points_required: 100,
                expiry_days: None,
                is_active: false,
                category: None,
            },
        ];

        let stats = DashboardStats::compute(&customers, &[], &rewards, now());
        assert_eq!(stats.active_rewards, 1);
        assert_eq!(stats.recent_customers.len(), 5);
        assert_eq!(stats.recent_customers[0].first_name, "C0");
        assert_eq!(stats.recent_customers[4].first_name, "C4");
    }
}
