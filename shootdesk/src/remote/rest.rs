//! REST client for the remote shoots table
//!
//! Speaks the PostgREST dialect used by hosted Postgres backends:
//! `GET /rest/v1/<table>?select=*`, `POST` to insert, `PATCH ?id=eq.<id>`
//! to update and `DELETE ?id=eq.<id>` to delete. The project API key goes in
//! both the `apikey` header and the bearer token.

use super::{RemoteResult, RemoteShootRow, RemoteStore};
use crate::config;
use crate::error::RemoteError;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::{Map, Value};
use std::time::Duration;

/// PostgREST-backed remote store
#[derive(Clone)]
pub struct RestRemoteStore {
    client: Client,
    base_url: String,
    api_key: String,
    table: String,
}

impl RestRemoteStore {
    pub fn new(
        base_url: &str,
        api_key: &str,
        table: &str,
        timeout: Duration,
    ) -> RemoteResult<Self> {
        let client = Client::builder()
            .user_agent(concat!("shootdesk/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            table: table.to_string(),
        })
    }

    fn table_url(&self) -> String {
        format!("{}/{}/{}", self.base_url, config::REMOTE_REST_PATH, self.table)
    }

    fn request(&self, method: Method, query: &[(&str, String)]) -> RequestBuilder {
        self.client
            .request(method, self.table_url())
            .query(query)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    fn id_filter(id: &str) -> [(&'static str, String); 1] {
        [("id", format!("eq.{}", id))]
    }
}

/// Best human-readable message from an error response body
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

/// Turn a non-success response into `RemoteError::Rejected`
async fn ensure_success(response: Response) -> RemoteResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Rejected {
        status: status.as_u16(),
        message: rejection_message(&body),
    })
}

#[async_trait]
impl RemoteStore for RestRemoteStore {
    async fn select_all(&self) -> RemoteResult<Vec<Value>> {
        let response = self
            .request(Method::GET, &[("select", "*".to_string())])
            .send()
            .await?;

        let body = ensure_success(response).await?.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    async fn insert(&self, row: &RemoteShootRow) -> RemoteResult<()> {
        let response = self
            .request(Method::POST, &[])
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn update(&self, id: &str, columns: &Map<String, Value>) -> RemoteResult<()> {
        let response = self
            .request(Method::PATCH, &Self::id_filter(id))
            .header("Prefer", "return=minimal")
            .json(columns)
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> RemoteResult<()> {
        let response = self
            .request(Method::DELETE, &Self::id_filter(id))
            .send()
            .await?;

        ensure_success(response).await?;
        Ok(())
    }
}
