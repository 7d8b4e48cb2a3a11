pub mod error;
pub mod query;

pub use error::{Result, SupabaseError};
pub use query::Query;

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Merge rows that collide on the conflict target instead of failing.
const PREFER_MERGE: &str = "resolution=merge-duplicates";

/// Skip echoing affected rows back.
const PREFER_MINIMAL: &str = "return=minimal";

pub struct SupabaseClient {
    client: reqwest::Client,
    rest_url: String,
    key: String,
}

impl SupabaseClient {
    /// `project_url` is the project root, e.g. `https://xyz.supabase.co`.
    pub fn new(project_url: &str, key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            rest_url: format!("{}/rest/v1", project_url.trim_end_matches('/')),
            key: key.into(),
        }
    }

    fn request(&self, method: reqwest::Method, table: &str, query: &Query) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.rest_url, table))
            .query(query.params())
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    /// Insert `row`, merging into an existing row when `on_conflict` columns match.
    pub async fn upsert<T: Serialize + ?Sized>(
        &self,
        table: &str,
        on_conflict: Option<&str>,
        row: &T,
    ) -> Result<()> {
        let query = match on_conflict {
            Some(columns) => Query::new().on_conflict(columns),
            None => Query::new(),
        };

        let resp = self
            .request(reqwest::Method::POST, table, &query)
            .header("Prefer", PREFER_MERGE)
            .json(row)
            .send()
            .await?;

        ensure_success(resp).await?;
        tracing::debug!(table, "supabase: upserted row");
        Ok(())
    }

    /// Plain insert with no conflict target.
    pub async fn insert<T: Serialize + ?Sized>(&self, table: &str, row: &T) -> Result<()> {
        self.upsert(table, None, row).await
    }

    /// Fetch rows matching `query`.
    pub async fn select<T: DeserializeOwned>(&self, table: &str, query: &Query) -> Result<Vec<T>> {
        let resp = self
            .request(reqwest::Method::GET, table, query)
            .send()
            .await?;

        let resp = ensure_success(resp).await?;
        let rows: Vec<T> = resp.json().await?;
        tracing::debug!(table, count = rows.len(), "supabase: selected rows");
        Ok(rows)
    }

    /// Patch every row matching `filter` with the fields of `body`.
    pub async fn update<T: Serialize + ?Sized>(
        &self,
        table: &str,
        filter: &Query,
        body: &T,
    ) -> Result<()> {
        let resp = self
            .request(reqwest::Method::PATCH, table, filter)
            .header("Prefer", PREFER_MERGE)
            .json(body)
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }

    /// Delete every row matching `filter`. PostgREST refuses unfiltered deletes,
    /// so callers wanting "all rows" pass a filter that always matches.
    pub async fn delete(&self, table: &str, filter: &Query) -> Result<()> {
        let resp = self
            .request(reqwest::Method::DELETE, table, filter)
            .header("Prefer", PREFER_MINIMAL)
            .send()
            .await?;

        ensure_success(resp).await?;
        Ok(())
    }
}

async fn ensure_success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(SupabaseError::Api {
        status: status.as_u16(),
        message: body,
    })
}
