//! Supabase REST API client for the TrustFlow backend.
//!
//! This crate provides:
//! - [`ApiSource`] config enum for choosing between mock and live clients
//! - [`SupabaseApi`] trait for abstracting the REST surface
//! - [`SupabaseClient`] production client talking to a Supabase project
//! - [`MockSupabaseApi`] in-memory client for testing without network access
//!
//! ## Usage with ApiSource (Recommended)
//!
//! ```ignore
//! use supabase::ApiSource;
//!
//! // Development/testing: in-memory tables
//! let api = ApiSource::mock().into_api();
//!
//! // Production: live project
//! let api = ApiSource::live("https://xyz.supabase.co", service_key).into_api();
//!
//! api.probe_table("spaces").await?;
//! ```

mod mock;

pub use mock::MockSupabaseApi;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::Value;

/// Timeout for read requests (table probes and row selects).
pub const READ_TIMEOUT: Duration = Duration::from_secs(10);

/// Timeout for the schema-apply RPC, which may run many DDL statements.
pub const RPC_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, thiserror::Error)]
pub enum SupabaseError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected response body: {0}")]
    UnexpectedBody(String),
}

impl SupabaseError {
    /// HTTP status carried by this error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            SupabaseError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SupabaseError>;

/// Trait for accessing a Supabase project's REST surface.
///
/// This trait abstracts the PostgREST routes so the setup flow and the
/// typed stores can be exercised against [`MockSupabaseApi`] in tests while
/// production code uses [`SupabaseClient`].
#[async_trait]
pub trait SupabaseApi: Send + Sync {
    /// Check that a table is queryable.
    ///
    /// Issues `GET /rest/v1/{table}?select=id&limit=1` with a bounded
    /// timeout. `Ok(())` means the table answered with a success status.
    async fn probe_table(&self, table: &str) -> Result<()>;

    /// Execute raw SQL through the `exec_sql` RPC.
    ///
    /// The RPC is not part of a stock Supabase project; when it is missing
    /// server-side the call fails with a status error like any other
    /// request.
    async fn exec_sql(&self, sql: &str) -> Result<()>;

    /// Fetch rows from a table. `query` is a PostgREST query string such as
    /// `select=*&space_id=eq.<uuid>&order=created_at.desc`.
    async fn select_rows(&self, table: &str, query: &str) -> Result<Vec<Value>>;

    /// Insert a row and return the created representation.
    async fn insert_row(&self, table: &str, row: Value) -> Result<Value>;

    /// Patch all rows matching a PostgREST filter such as `id=eq.<uuid>`.
    async fn update_rows(&self, table: &str, filter: &str, patch: Value) -> Result<()>;

    /// Delete all rows matching a PostgREST filter.
    async fn delete_rows(&self, table: &str, filter: &str) -> Result<()>;
}

/// Production client for a Supabase project.
///
/// Every request authenticates with the service-role key, sent both as the
/// `apikey` header and as a bearer token, the way PostgREST expects.
pub struct SupabaseClient {
    base_url: String,
    service_key: String,
    client: ReqwestClient,
}

impl SupabaseClient {
    pub fn new(base_url: &str, service_key: &str) -> Self {
        SupabaseClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            service_key: service_key.to_string(),
            client: ReqwestClient::new(),
        }
    }

    fn rest_url(&self, path: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, path)
    }

    fn authed(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
    }

    /// Map a response to `Ok(body)` on success or a status error otherwise.
    async fn check(response: reqwest::Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            Ok(body)
        } else {
            Err(SupabaseError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }
}

#[async_trait]
impl SupabaseApi for SupabaseClient {
    async fn probe_table(&self, table: &str) -> Result<()> {
        let url = self.rest_url(&format!("{}?select=id&limit=1", table));
        let response = self
            .authed(self.client.get(&url))
            .timeout(READ_TIMEOUT)
            .send()
            .await?;

        Self::check(response).await.map(|_| ())
    }

    async fn exec_sql(&self, sql: &str) -> Result<()> {
        let url = self.rest_url("rpc/exec_sql");
        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=minimal")
            .timeout(RPC_TIMEOUT)
            .json(&serde_json::json!({ "query": sql }))
            .send()
            .await?;

        Self::check(response).await.map(|_| ())
    }

    async fn select_rows(&self, table: &str, query: &str) -> Result<Vec<Value>> {
        let url = self.rest_url(&format!("{}?{}", table, query));
        let response = self
            .authed(self.client.get(&url))
            .timeout(READ_TIMEOUT)
            .send()
            .await?;

        let body = Self::check(response).await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn insert_row(&self, table: &str, row: Value) -> Result<Value> {
        let url = self.rest_url(table);
        let response = self
            .authed(self.client.post(&url))
            .header("Prefer", "return=representation")
            .timeout(READ_TIMEOUT)
            .json(&row)
            .send()
            .await?;

        let body = Self::check(response).await?;
        let mut rows: Vec<Value> = serde_json::from_str(&body)?;
        if rows.is_empty() {
            return Err(SupabaseError::UnexpectedBody(
                "insert returned no representation".to_string(),
            ));
        }
        Ok(rows.remove(0))
    }

    async fn update_rows(&self, table: &str, filter: &str, patch: Value) -> Result<()> {
        let url = self.rest_url(&format!("{}?{}", table, filter));
        let response = self
            .authed(self.client.patch(&url))
            .header("Prefer", "return=minimal")
            .timeout(READ_TIMEOUT)
            .json(&patch)
            .send()
            .await?;

        Self::check(response).await.map(|_| ())
    }

    async fn delete_rows(&self, table: &str, filter: &str) -> Result<()> {
        let url = self.rest_url(&format!("{}?{}", table, filter));
        let response = self
            .authed(self.client.delete(&url))
            .header("Prefer", "return=minimal")
            .timeout(READ_TIMEOUT)
            .send()
            .await?;

        Self::check(response).await.map(|_| ())
    }
}

/// Configuration for the API backend.
///
/// Use this to explicitly choose between mock and live clients, following
/// the same pattern as the stream and cache sources elsewhere in the stack.
#[derive(Debug, Clone)]
pub enum ApiSource {
    /// Use an in-memory mock with no registered tables.
    Mock,

    /// Connect to a live Supabase project.
    Live {
        /// Project base URL (e.g. "https://xyz.supabase.co")
        base_url: String,
        /// Service-role key used for both `apikey` and bearer auth
        service_key: String,
    },
}

impl ApiSource {
    /// Create a mock API source.
    pub fn mock() -> Self {
        Self::Mock
    }

    /// Create a live source for the given project.
    pub fn live(base_url: impl Into<String>, service_key: impl Into<String>) -> Self {
        Self::Live {
            base_url: base_url.into(),
            service_key: service_key.into(),
        }
    }

    /// Create the appropriate [`SupabaseApi`] implementation.
    pub fn into_api(self) -> Arc<dyn SupabaseApi> {
        match self {
            Self::Mock => Arc::new(MockSupabaseApi::new()),
            Self::Live {
                base_url,
                service_key,
            } => Arc::new(SupabaseClient::new(&base_url, &service_key)),
        }
    }
}
