//! Loyalty data gateway
//!
//! Domain-level fetch/add/update/delete operations. Each call is one request
//! to the table store; failures are logged here and returned to the caller
//! with their cause attached.

use async_trait::async_trait;
use serde_json::Value;
use shared::models::{Customer, CustomerUpdate, NewCustomer, Redemption, Reward, Visit};
use shared::util::new_id;
use uuid::Uuid;

use crate::client::{RestTableClient, TableClient};
use crate::query::{Direction, Filter, Query};
use crate::rows::{
    self, CUSTOMER_ID, CUSTOMERS, CustomerPatch, CustomerRow, DATE, ID, IS_ACTIVE, REDEMPTIONS,
    REWARDS, RedemptionRow, RewardRow, VISITS, VisitRow,
};
use crate::{ClientConfig, ClientError, ClientResult};

/// Persistence operations of the loyalty desk
#[async_trait]
pub trait LoyaltyGateway: Send + Sync {
    // ── Customers ──

    async fn fetch_customers(&self) -> ClientResult<Vec<Customer>>;

    /// Insert a new customer; the identifier is generated here
    async fn add_customer(&self, customer: NewCustomer) -> ClientResult<Customer>;

    /// Apply a partial edit and return the stored record
    async fn update_customer(&self, id: Uuid, update: CustomerUpdate) -> ClientResult<Customer>;

    /// Delete a customer (the store cascades to visits and redemptions)
    async fn delete_customer(&self, id: Uuid) -> ClientResult<()>;

    /// Whether at least one customer is stored
    async fn has_customers(&self) -> ClientResult<bool>;

    // ── Visits ──

    /// Visits, newest first, optionally for one customer
    async fn fetch_visits(&self, customer_id: Option<Uuid>) -> ClientResult<Vec<Visit>>;

    async fn add_visit(&self, visit: Visit) -> ClientResult<Visit>;

    // ── Rewards ──

    /// Rewards, optionally filtered by active flag
    async fn fetch_rewards(&self, is_active: Option<bool>) -> ClientResult<Vec<Reward>>;

    /// Insert a reward; a nil id is replaced with a generated one
    async fn add_reward(&self, reward: Reward) -> ClientResult<Reward>;

    async fn update_reward(&self, reward: Reward) -> ClientResult<Reward>;

    async fn delete_reward(&self, id: Uuid) -> ClientResult<()>;

    // ── Redemptions ──

    /// Redemption history, newest first, optionally for one customer
    async fn fetch_redemptions(&self, customer_id: Option<Uuid>) -> ClientResult<Vec<Redemption>>;

    async fn add_redemption(&self, redemption: Redemption) -> ClientResult<Redemption>;

    // ── Seeding ──

    /// Upsert demo records on `id`
    async fn seed(&self, customers: &[Customer], visits: &[Visit], rewards: &[Reward]) -> ClientResult<()>;
}

/// [`LoyaltyGateway`] over any [`TableClient`]
#[derive(Debug, Clone)]
pub struct RemoteGateway<C> {
    client: C,
}

/// Gateway talking to the hosted store over HTTP
pub type RestGateway = RemoteGateway<RestTableClient>;

impl RestGateway {
    pub fn from_config(config: &ClientConfig) -> ClientResult<Self> {
        Ok(Self::new(RestTableClient::new(config)?))
    }
}

impl<C: TableClient> RemoteGateway<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Insert one row and decode the stored representation
    async fn insert_one<R, T>(&self, table: &str, row: &R) -> ClientResult<T>
    where
        R: serde::Serialize + serde::de::DeserializeOwned + Into<T>,
    {
        let stored = self.client.insert(table, vec![rows::encode(row)?]).await?;
        single(table, rows::decode::<R, T>(stored)?)
    }

    /// Update the row with `id` and decode the stored representation
    async fn update_one<R, T>(&self, table: &str, id: Uuid, patch: Value) -> ClientResult<T>
    where
        R: serde::de::DeserializeOwned + Into<T>,
    {
        let stored = self
            .client
            .update(table, &[Filter::eq(ID, id.to_string())], patch)
            .await?;
        single(table, rows::decode::<R, T>(stored)?)
    }

    async fn upsert_all<R: serde::Serialize>(&self, table: &str, records: Vec<R>) -> ClientResult<()> {
        if records.is_empty() {
            return Ok(());
        }
        let values = records
            .iter()
            .map(rows::encode)
            .collect::<ClientResult<Vec<_>>>()?;
        self.client.upsert(table, values, ID).await?;
        Ok(())
    }
}

/// Exactly one row is expected back from a single-row write
fn single<T>(table: &str, mut records: Vec<T>) -> ClientResult<T> {
    match records.len() {
        0 => Err(ClientError::NotFound(format!("no matching row in {table}"))),
        _ => Ok(records.swap_remove(0)),
    }
}

fn for_customer(query: Query, customer_id: Option<Uuid>) -> Query {
    match customer_id {
        Some(id) => query.eq(CUSTOMER_ID, id.to_string()),
        None => query,
    }
}

#[async_trait]
impl<C: TableClient> LoyaltyGateway for RemoteGateway<C> {
    async fn fetch_customers(&self) -> ClientResult<Vec<Customer>> {
        let stored = self
            .client
            .select(CUSTOMERS, &Query::all())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching customers"))?;
        rows::decode::<CustomerRow, _>(stored)
    }

    async fn add_customer(&self, customer: NewCustomer) -> ClientResult<Customer> {
        let row = CustomerRow::from(customer.into_customer(new_id()));
        let customer: Customer = self
            .insert_one(CUSTOMERS, &row)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error adding customer"))?;
        tracing::info!(customer_id = %customer.id, "Customer added");
        Ok(customer)
    }

    async fn update_customer(&self, id: Uuid, update: CustomerUpdate) -> ClientResult<Customer> {
        if update.is_empty() {
            // Nothing to write; answer with the stored record
            let stored = self
                .client
                .select(CUSTOMERS, &Query::all().eq(ID, id.to_string()).limit(1))
                .await
                .inspect_err(|e| tracing::error!(error = %e, %id, "Error updating customer"))?;
            return single(CUSTOMERS, rows::decode::<CustomerRow, _>(stored)?);
        }
        let patch = rows::encode(&CustomerPatch::from(update))?;
        self.update_one::<CustomerRow, _>(CUSTOMERS, id, patch)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %id, "Error updating customer"))
    }

    async fn delete_customer(&self, id: Uuid) -> ClientResult<()> {
        self.client
            .delete(CUSTOMERS, &[Filter::eq(ID, id.to_string())])
            .await
            .inspect_err(|e| tracing::error!(error = %e, %id, "Error deleting customer"))?;
        tracing::info!(customer_id = %id, "Customer deleted");
        Ok(())
    }

    async fn has_customers(&self) -> ClientResult<bool> {
        let stored = self
            .client
            .select(CUSTOMERS, &Query::all().limit(1))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error checking customers"))?;
        Ok(!stored.is_empty())
    }

    async fn fetch_visits(&self, customer_id: Option<Uuid>) -> ClientResult<Vec<Visit>> {
        let query = for_customer(Query::all(), customer_id).order_by(DATE, Direction::Desc);
        let stored = self
            .client
            .select(VISITS, &query)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching visits"))?;
        rows::decode::<VisitRow, _>(stored)
    }

    async fn add_visit(&self, visit: Visit) -> ClientResult<Visit> {
        let row = VisitRow::from(visit);
        let visit: Visit = self
            .insert_one(VISITS, &row)
            .await
            .inspect_err(|e| tracing::error!(error = %e, customer_id = %row.customer_id, "Error adding visit"))?;
        tracing::info!(visit_id = %visit.id, points = visit.points, "Visit recorded");
        Ok(visit)
    }

    async fn fetch_rewards(&self, is_active: Option<bool>) -> ClientResult<Vec<Reward>> {
        let query = match is_active {
            Some(active) => Query::all().eq(IS_ACTIVE, active),
            None => Query::all(),
        };
        let stored = self
            .client
            .select(REWARDS, &query)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching rewards"))?;
        rows::decode::<RewardRow, _>(stored)
    }

    async fn add_reward(&self, mut reward: Reward) -> ClientResult<Reward> {
        if reward.is_unsaved() {
            reward.id = new_id();
        }
        let reward: Reward = self
            .insert_one(REWARDS, &RewardRow::from(reward))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error adding reward"))?;
        tracing::info!(reward_id = %reward.id, name = %reward.name, "Reward added");
        Ok(reward)
    }

    async fn update_reward(&self, reward: Reward) -> ClientResult<Reward> {
        let id = reward.id;
        let patch = rows::encode(&RewardRow::from(reward))?;
        self.update_one::<RewardRow, _>(REWARDS, id, patch)
            .await
            .inspect_err(|e| tracing::error!(error = %e, %id, "Error updating reward"))
    }

    async fn delete_reward(&self, id: Uuid) -> ClientResult<()> {
        self.client
            .delete(REWARDS, &[Filter::eq(ID, id.to_string())])
            .await
            .inspect_err(|e| tracing::error!(error = %e, %id, "Error deleting reward"))?;
        tracing::info!(reward_id = %id, "Reward deleted");
        Ok(())
    }

    async fn fetch_redemptions(&self, customer_id: Option<Uuid>) -> ClientResult<Vec<Redemption>> {
        let query = for_customer(Query::all(), customer_id).order_by(DATE, Direction::Desc);
        let stored = self
            .client
            .select(REDEMPTIONS, &query)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error fetching redemptions"))?;
        rows::decode::<RedemptionRow, _>(stored)
    }

    async fn add_redemption(&self, redemption: Redemption) -> ClientResult<Redemption> {
        let redemption: Redemption = self
            .insert_one(REDEMPTIONS, &RedemptionRow::from(redemption))
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error adding redemption"))?;
        tracing::info!(
            customer_id = %redemption.customer_id,
            reward_id = %redemption.reward_id,
            points = redemption.points,
            "Reward redeemed"
        );
        Ok(redemption)
    }

    async fn seed(&self, customers: &[Customer], visits: &[Visit], rewards: &[Reward]) -> ClientResult<()> {
        // Parents first so visit foreign keys resolve
        self.upsert_all(CUSTOMERS, customers.iter().cloned().map(CustomerRow::from).collect::<Vec<_>>())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error seeding customers"))?;
        self.upsert_all(VISITS, visits.iter().cloned().map(VisitRow::from).collect::<Vec<_>>())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error seeding visits"))?;
        self.upsert_all(REWARDS, rewards.iter().cloned().map(RewardRow::from).collect::<Vec<_>>())
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error seeding rewards"))?;

        tracing::info!(
            customers = customers.len(),
            visits = visits.len(),
            rewards = rewards.len(),
            "Seeded data"
        );
        Ok(())
    }
}
