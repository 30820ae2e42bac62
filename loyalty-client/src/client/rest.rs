//! REST table client for the hosted store

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde_json::Value;

use super::TableClient;
use crate::query::{Filter, Query};
use crate::{ClientConfig, ClientError, ClientResult};

const RETURN_REPRESENTATION: &str = "return=representation";
const RETURN_MINIMAL: &str = "return=minimal";
const MERGE_DUPLICATES: &str = "resolution=merge-duplicates,return=representation";

/// HTTP client for the PostgREST-style row API (`{url}/rest/v1/{table}`)
#[derive(Debug, Clone)]
pub struct RestTableClient {
    client: Client,
    rest_url: String,
    api_key: String,
}

impl RestTableClient {
    /// Create a new REST client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        if config.base_url.trim().is_empty() {
            return Err(ClientError::Config("store URL is empty".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            rest_url: config.rest_url(),
            api_key: config.api_key.clone(),
        })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }

    /// Request with the key headers every call carries
    fn request(&self, method: Method, table: &str) -> RequestBuilder {
        self.client
            .request(method, self.table_url(table))
            .header("apikey", &self.api_key)
            .header(reqwest::header::AUTHORIZATION, format!("Bearer {}", self.api_key))
    }

    /// Decode a row list, or the store's error body
    async fn handle_rows(response: Response) -> ClientResult<Vec<Value>> {
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        match serde_json::from_str::<Value>(&text)? {
            Value::Array(rows) => Ok(rows),
            other => Err(ClientError::InvalidResponse(format!(
                "expected a row array, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl TableClient for RestTableClient {
    async fn select(&self, table: &str, query: &Query) -> ClientResult<Vec<Value>> {
        let response = self
            .request(Method::GET, table)
            .query(&query.to_params())
            .send()
            .await?;
        Self::handle_rows(response).await
    }

    async fn insert(&self, table: &str, rows: Vec<Value>) -> ClientResult<Vec<Value>> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(&rows)
            .send()
            .await?;
        Self::handle_rows(response).await
    }

    async fn update(&self, table: &str, filters: &[Filter], patch: Value) -> ClientResult<Vec<Value>> {
        let params: Vec<_> = filters.iter().map(Filter::to_param).collect();
        let response = self
            .request(Method::PATCH, table)
            .header("Prefer", RETURN_REPRESENTATION)
            .query(&params)
            .json(&patch)
            .send()
            .await?;
        Self::handle_rows(response).await
    }

    async fn delete(&self, table: &str, filters: &[Filter]) -> ClientResult<()> {
        let params: Vec<_> = filters.iter().map(Filter::to_param).collect();
        let response = self
            .request(Method::DELETE, table)
            .header("Prefer", RETURN_MINIMAL)
            .query(&params)
            .send()
            .await?;
        Self::handle_rows(response).await.map(|_| ())
    }

    async fn upsert(&self, table: &str, rows: Vec<Value>, on_conflict: &str) -> ClientResult<Vec<Value>> {
        let response = self
            .request(Method::POST, table)
            .header("Prefer", MERGE_DUPLICATES)
            .query(&[("on_conflict", on_conflict)])
            .json(&rows)
            .send()
            .await?;
        Self::handle_rows(response).await
    }
}

/// Error body returned by the store
#[derive(Debug, Default, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    details: Option<String>,
    #[serde(default)]
    hint: Option<String>,
}

/// Map a non-success response to [`ClientError`].
///
/// Bodies that are not the store's JSON error shape (proxies, gateways) keep
/// the raw text as the message.
fn api_error(status: u16, text: &str) -> ClientError {
    let body: ApiErrorBody = serde_json::from_str(text).unwrap_or_default();
    let message = body
        .message
        .unwrap_or_else(|| text.trim().to_string());

    if status == 404 && body.code.is_none() {
        return ClientError::NotFound(message);
    }
    ClientError::Api {
        status,
        code: body.code.unwrap_or_else(|| status.to_string()),
        message,
        details: body.details,
        hint: body.hint,
    }
}
