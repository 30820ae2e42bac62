//! Application state (应用状态)
//!
//! [`LoyaltyState`] owns the desk's view of the store: customers, visits,
//! rewards and redemptions, plus the gateway used to change them. Every
//! mutation goes to the store first; local lists change only after the store
//! accepted the write.

use chrono::{DateTime, Utc};
use loyalty_client::LoyaltyGateway;
use shared::error::{AppError, ErrorCode};
use shared::models::{Customer, CustomerUpdate, NewCustomer, Redemption, Reward, Visit};
use shared::util::{new_id, now};
use uuid::Uuid;

use super::error::{DeskError, DeskResult};
use crate::loyalty::{self, DashboardStats, RewardDiff};

pub struct LoyaltyState<G> {
    gateway: G,
    customers: Vec<Customer>,
    visits: Vec<Visit>,
    rewards: Vec<Reward>,
    redemptions: Vec<Redemption>,
}

impl<G: LoyaltyGateway> LoyaltyState<G> {
    /// Empty state; call [`refresh`](Self::refresh) to load
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            customers: Vec::new(),
            visits: Vec::new(),
            rewards: Vec::new(),
            redemptions: Vec::new(),
        }
    }

    /// Create the state and load everything from the store
    pub async fn load(gateway: G) -> DeskResult<Self> {
        let mut state = Self::new(gateway);
        state.refresh().await?;
        Ok(state)
    }

    /// Reload all lists; on failure the previous lists are kept
    pub async fn refresh(&mut self) -> DeskResult<()> {
        let (customers, visits, rewards, redemptions) = tokio::try_join!(
            self.gateway.fetch_customers(),
            self.gateway.fetch_visits(None),
            self.gateway.fetch_rewards(None),
            self.gateway.fetch_redemptions(None),
        )?;

        tracing::info!(
            customers = customers.len(),
            visits = visits.len(),
            rewards = rewards.len(),
            redemptions = redemptions.len(),
            "Loyalty data loaded"
        );
        self.customers = customers;
        self.visits = visits;
        self.rewards = rewards;
        self.redemptions = redemptions;
        Ok(())
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    // ========== Queries ==========

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Visits, newest first as loaded, then in recording order
    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    pub fn redemptions(&self) -> &[Redemption] {
        &self.redemptions
    }

    pub fn customer(&self, id: Uuid) -> Option<&Customer> {
        self.customers.iter().find(|c| c.id == id)
    }

    pub fn reward(&self, id: Uuid) -> Option<&Reward> {
        self.rewards.iter().find(|r| r.id == id)
    }

    pub fn find_customer_by_phone(&self, phone: &str) -> Option<&Customer> {
        loyalty::find_customer_by_phone(phone, &self.customers)
    }

    pub fn search_customers(&self, term: &str) -> Vec<&Customer> {
        loyalty::search_customers(term, &self.customers)
    }

    pub fn customer_visits(&self, customer_id: Uuid) -> Vec<&Visit> {
        loyalty::customer_visits(customer_id, &self.visits)
    }

    /// Earned balance (visit points)
    pub fn customer_points(&self, customer_id: Uuid) -> i64 {
        loyalty::customer_points(customer_id, &self.visits)
    }

    /// Earned balance minus redeemed points
    pub fn available_points(&self, customer_id: Uuid) -> i64 {
        loyalty::available_points(customer_id, &self.visits, &self.redemptions)
    }

    pub fn customer_redemptions(&self, customer_id: Uuid) -> Vec<&Redemption> {
        self.redemptions
            .iter()
            .filter(|r| r.customer_id == customer_id)
            .collect()
    }

    pub fn active_rewards(&self) -> Vec<&Reward> {
        self.rewards.iter().filter(|r| r.is_active).collect()
    }

    /// Active rewards the customer's available balance covers
    pub fn redeemable_rewards(&self, customer_id: Uuid) -> Vec<&Reward> {
        let available = self.available_points(customer_id);
        self.rewards
            .iter()
            .filter(|r| r.is_active && loyalty::can_redeem(r, available))
            .collect()
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> DashboardStats {
        DashboardStats::compute(&self.customers, &self.visits, &self.rewards, now)
    }

    // ========== Mutations ==========

    /// Store a new customer and append it locally
    pub async fn add_customer(&mut self, customer: NewCustomer) -> DeskResult<Customer> {
        let stored = self.gateway.add_customer(customer).await?;
        self.customers.push(stored.clone());
        Ok(stored)
    }

    /// Apply a partial edit to a known customer
    pub async fn update_customer(&mut self, id: Uuid, update: CustomerUpdate) -> DeskResult<Customer> {
        update.validate()?;
        if self.customer(id).is_none() {
            return Err(DeskError::NotFound("Customer".into()));
        }
        let stored = self.gateway.update_customer(id, update).await?;
        if let Some(local) = self.customers.iter_mut().find(|c| c.id == id) {
            *local = stored.clone();
        }
        Ok(stored)
    }

    /// Store a visit for a known customer and append it locally
    pub async fn add_visit(&mut self, visit: Visit) -> DeskResult<Visit> {
        if self.customer(visit.customer_id).is_none() {
            return Err(DeskError::NotFound("Customer".into()));
        }
        let stored = self.gateway.add_visit(visit).await?;
        self.visits.push(stored.clone());
        Ok(stored)
    }

    /// Replace the reward catalog with `new`.
    ///
    /// Unsaved rewards get their id here, then the difference to the current
    /// catalog is written: additions, updates, deletions. The local catalog
    /// becomes `new` only when every write succeeded. A failure part way
    /// leaves earlier writes in the store; [`refresh`](Self::refresh)
    /// resynchronizes.
    pub async fn update_rewards(&mut self, new: Vec<Reward>) -> DeskResult<()> {
        let new: Vec<Reward> = new
            .into_iter()
            .map(|mut reward| {
                if reward.is_unsaved() {
                    reward.id = new_id();
                }
                reward
            })
            .collect();

        let diff = RewardDiff::between(&self.rewards, &new);
        if diff.is_empty() {
            return Ok(());
        }
        tracing::debug!(
            additions = diff.additions.len(),
            updates = diff.updates.len(),
            deletions = diff.deletions.len(),
            "Reconciling rewards"
        );

        for reward in diff.additions {
            self.gateway.add_reward(reward).await?;
        }
        for reward in diff.updates {
            self.gateway.update_reward(reward).await?;
        }
        for id in diff.deletions {
            self.gateway.delete_reward(id).await?;
        }

        self.rewards = new;
        Ok(())
    }

    /// Spend a customer's available points on an active reward
    pub async fn redeem_reward(&mut self, customer_id: Uuid, reward_id: Uuid) -> DeskResult<Redemption> {
        if self.customer(customer_id).is_none() {
            return Err(DeskError::NotFound("Customer".into()));
        }
        let reward = self
            .reward(reward_id)
            .ok_or_else(|| DeskError::NotFound("Reward".into()))?;
        if !reward.is_active {
            return Err(DeskError::rejected(ErrorCode::RewardInactive));
        }

        let available = self.available_points(customer_id);
        if !loyalty::can_redeem(reward, available) {
            tracing::warn!(%customer_id, %reward_id, available, required = reward.points_required, "Redemption refused");
            return Err(DeskError::Rejected(
                AppError::new(ErrorCode::InsufficientPoints)
                    .with_detail("available", available)
                    .with_detail("required", reward.points_required),
            ));
        }

        let redemption = Redemption {
            id: new_id(),
            customer_id,
            reward_id,
            date: now(),
            points: reward.points_required,
        };
        let stored = self.gateway.add_redemption(redemption).await?;
        self.redemptions.push(stored.clone());
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loyalty_client::rows::{CUSTOMERS, REDEMPTIONS, REWARDS, VISITS};
    use loyalty_client::{MemoryTableClient, Operation, RemoteGateway};
    use std::sync::Arc;

    type TestState = LoyaltyState<RemoteGateway<Arc<MemoryTableClient>>>;

    async fn empty_state() -> (Arc<MemoryTableClient>, TestState) {
        let store = Arc::new(MemoryTableClient::with_loyalty_schema());
        let state = LoyaltyState::load(RemoteGateway::new(store.clone())).await.unwrap();
        (store, state)
    }

    fn visit_for(customer_id: Uuid, amount: i64) -> Visit {
        Visit {
            id: new_id(),
            customer_id,
            date: now(),
            service: "Haircut".into(),
            amount,
            points: loyalty::points_for_amount(amount),
            notes: None,
            staff_member: None,
        }
    }

    fn reward(name: &str, points: i64) -> Reward {
        Reward {
            id: Uuid::nil(),
            name: name.into(),
            description: String::new(),
            points_required: points,
            expiry_days: None,
            is_active: true,
            category: Some("service".into()),
        }
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_lists() {
        let (store, mut state) = empty_state().await;
        let c = state
            .add_customer(NewCustomer::joining_now("Ann", "A", "0711111111", ""))
            .await
            .unwrap();

        store.fail_next(VISITS, Operation::Select);
        assert!(state.refresh().await.unwrap_err().is_persistence());
        assert_eq!(state.customers().len(), 1);
        assert_eq!(state.customers()[0].id, c.id);
    }

    #[tokio::test]
    async fn test_add_visit_failure_leaves_state_unchanged() {
        let (store, mut state) = empty_state().await;
        let c = state
            .add_customer(NewCustomer::joining_now("Ann", "A", "0711111111", ""))
            .await
            .unwrap();
        state.add_visit(visit_for(c.id, 5000)).await.unwrap();
        let before = state.visits().to_vec();

        store.fail_next(VISITS, Operation::Insert);
        let err = state.add_visit(visit_for(c.id, 3000)).await.unwrap_err();

        assert!(matches!(err, DeskError::Persistence(_)));
        assert_eq!(state.visits(), before.as_slice());
        assert_eq!(state.customer_points(c.id), 50);
        assert_eq!(store.rows(VISITS).len(), 1);
    }

    #[tokio::test]
    async fn test_add_visit_for_unknown_customer() {
        let (store, mut state) = empty_state().await;
        let err = state.add_visit(visit_for(Uuid::new_v4(), 1000)).await.unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
        assert!(store.write_operations().is_empty());
    }

    #[tokio::test]
    async fn test_update_customer_replaces_local_record() {
        let (_, mut state) = empty_state().await;
        let c = state
            .add_customer(NewCustomer::joining_now("Ann", "A", "0711111111", ""))
            .await
            .unwrap();
        state
            .update_customer(
                c.id,
                CustomerUpdate {
                    last_name: Some("Anderson".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(state.customer(c.id).unwrap().full_name(), "Ann Anderson");

        let err = state
            .update_customer(Uuid::new_v4(), CustomerUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_invalid_customer_edit_never_reaches_store() {
        let (store, mut state) = empty_state().await;
        let jane = state
            .add_customer(NewCustomer::joining_now("Jane", "Doe", "+254 723 456 789", "jane@example.com"))
            .await
            .unwrap();
        store.clear_operations();

        let err = state
            .update_customer(
                jane.id,
                CustomerUpdate {
                    first_name: Some(String::new()),
                    phone: Some("x".into()),
                    email: Some("not-an-email".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DeskError::Validation(_)));
        assert!(store.operations().is_empty());
        assert_eq!(state.customer(jane.id), Some(&jane));
        assert_eq!(state.find_customer_by_phone("723456789").map(|c| c.id), Some(jane.id));

        for update in [
            CustomerUpdate {
                phone: Some("x".into()),
                ..Default::default()
            },
            CustomerUpdate {
                email: Some("not-an-email".into()),
                ..Default::default()
            },
        ] {
            let err = state.update_customer(jane.id, update).await.unwrap_err();
            assert!(matches!(err, DeskError::Validation(_)));
        }
        assert!(store.operations().is_empty());
    }

    #[tokio::test]
    async fn test_customer_edit_clears_notes() {
        let (_, mut state) = empty_state().await;
        let c = state
            .add_customer(NewCustomer::joining_now("Ann", "A", "0711111111", ""))
            .await
            .unwrap();
        let noted = CustomerUpdate {
            notes: Some(Some("Sensitive scalp".into())),
            ..Default::default()
        };
        state.update_customer(c.id, noted).await.unwrap();
        assert_eq!(state.customer(c.id).unwrap().notes.as_deref(), Some("Sensitive scalp"));

        let cleared = CustomerUpdate {
            notes: Some(None),
            ..Default::default()
        };
        state.update_customer(c.id, cleared).await.unwrap();
        assert_eq!(state.customer(c.id).unwrap().notes, None);
    }

    #[tokio::test]
    async fn test_update_rewards_applies_exactly_the_diff() {
        let (store, mut state) = empty_state().await;
        state
            .update_rewards(vec![reward("A", 100), reward("B", 200)])
            .await
            .unwrap();
        let a = state.rewards()[0].clone();
        assert!(!a.is_unsaved());

        let mut a2 = a.clone();
        a2.points_required = 150;
        store.clear_operations();

        state
            .update_rewards(vec![a2.clone(), reward("C", 300)])
            .await
            .unwrap();

        let writes = store.write_operations();
        assert_eq!(
            writes,
            vec![
                (REWARDS.to_string(), Operation::Insert),
                (REWARDS.to_string(), Operation::Update),
                (REWARDS.to_string(), Operation::Delete),
            ]
        );
        let names: Vec<_> = state.rewards().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["A", "C"]);
        assert_eq!(state.rewards()[0], a2);
        assert!(!state.rewards()[1].is_unsaved());

        let stored = state.gateway().fetch_rewards(None).await.unwrap();
        assert_eq!(stored.len(), 2);
        assert!(stored.iter().any(|r| r.id == state.rewards()[1].id));
    }

    #[tokio::test]
    async fn test_update_rewards_failure_keeps_local_catalog() {
        let (store, mut state) = empty_state().await;
        state.update_rewards(vec![reward("A", 100)]).await.unwrap();
        let before = state.rewards().to_vec();

        let mut edited = before[0].clone();
        edited.is_active = false;
        store.fail_next(REWARDS, Operation::Update);

        let err = state.update_rewards(vec![edited]).await.unwrap_err();
        assert!(err.is_persistence());
        assert_eq!(state.rewards(), before.as_slice());
    }

    #[tokio::test]
    async fn test_redeem_reward_spends_available_points() {
        let (store, mut state) = empty_state().await;
        let c = state
            .add_customer(NewCustomer::joining_now("Ann", "A", "0711111111", ""))
            .await
            .unwrap();
        state.add_visit(visit_for(c.id, 25000)).await.unwrap();
        state.update_rewards(vec![reward("Free Haircut", 200)]).await.unwrap();
        let r = state.rewards()[0].id;

        assert_eq!(state.redeemable_rewards(c.id).len(), 1);
        let redemption = state.redeem_reward(c.id, r).await.unwrap();

        assert_eq!(redemption.points, 200);
        assert_eq!(state.customer_points(c.id), 250);
        assert_eq!(state.available_points(c.id), 50);
        assert_eq!(state.customer_redemptions(c.id).len(), 1);
        assert_eq!(store.rows(REDEMPTIONS).len(), 1);
        assert!(state.redeemable_rewards(c.id).is_empty());

        // 50 left, 200 needed
        let err = state.redeem_reward(c.id, r).await.unwrap_err();
        match err {
            DeskError::Rejected(e) => assert_eq!(e.code, ErrorCode::InsufficientPoints),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(state.redemptions().len(), 1);
    }

    #[tokio::test]
    async fn test_redeem_inactive_or_unknown_reward() {
        let (_, mut state) = empty_state().await;
        let c = state
            .add_customer(NewCustomer::joining_now("Ann", "A", "0711111111", ""))
            .await
            .unwrap();
        state.add_visit(visit_for(c.id, 50000)).await.unwrap();
        let mut off = reward("Retired", 10);
        off.is_active = false;
        state.update_rewards(vec![off]).await.unwrap();
        let off_id = state.rewards()[0].id;

        let err = state.redeem_reward(c.id, off_id).await.unwrap_err();
        assert_eq!(err.notice(), "Reward is not active");

        let err = state.redeem_reward(c.id, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
        let err = state.redeem_reward(Uuid::new_v4(), off_id).await.unwrap_err();
        assert!(matches!(err, DeskError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_redeem_failure_keeps_balance() {
        let (store, mut state) = empty_state().await;
        let c = state
            .add_customer(NewCustomer::joining_now("Ann", "A", "0711111111", ""))
            .await
            .unwrap();
        state.add_visit(visit_for(c.id, 30000)).await.unwrap();
        state.update_rewards(vec![reward("Free Haircut", 200)]).await.unwrap();
        let r = state.rewards()[0].id;

        store.fail_next(REDEMPTIONS, Operation::Insert);
        assert!(state.redeem_reward(c.id, r).await.is_err());
        assert_eq!(state.available_points(c.id), 300);
        assert!(store.rows(REDEMPTIONS).is_empty());
        assert_eq!(store.rows(CUSTOMERS).len(), 1);
    }
}
