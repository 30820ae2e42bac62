//! Loyalty Client - data gateway for the hosted table store
//!
//! Translates domain operations (fetch/add/update/delete of customers, visits,
//! rewards and redemptions) into row queries against a PostgREST-style table
//! service. All naming translation between domain records and store columns
//! lives in [`rows`].

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod query;
pub mod rows;

pub use client::{RestTableClient, TableClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use gateway::{LoyaltyGateway, RemoteGateway, RestGateway};
pub use query::{Direction, Filter, Query};

#[cfg(any(test, feature = "in-memory"))]
pub use client::memory::{MemoryTableClient, Operation};
