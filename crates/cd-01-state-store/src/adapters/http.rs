//! REST JSON document store client.
//!
//! Documents live at `{base_url}/{key}.json` (Firebase Realtime Database
//! layout). `GET` returns the document or `null`, `PUT` replaces it.
//!
//! Conditional writes are on unless `conditional_writes` is cleared: the read
//! sends `X-Firebase-ETag: true`, the write sends `if-match`, and a
//! `412 Precondition Failed` means another writer got there first. Clear it
//! only for stores that ignore entity tags.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_MATCH};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared_types::LotteryState;
use tracing::debug;

use crate::domain::{CasOutcome, StoreError};
use crate::ports::DocumentStore;

const ETAG_REQUEST_HEADER: &str = "X-Firebase-ETag";

/// HTTP document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpStoreConfig {
    /// Root URL of the document tree, without trailing slash.
    pub base_url: String,
    /// Optional access token, sent as the `auth` query parameter.
    pub auth_token: Option<String>,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Use entity tags for conditional writes.
    pub conditional_writes: bool,
}

impl Default for HttpStoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:9000".to_string(),
            auth_token: None,
            timeout_ms: 5_000,
            conditional_writes: true,
        }
    }
}

/// DocumentStore backed by a REST JSON store.
pub struct HttpDocumentStore {
    client: Client,
    config: HttpStoreConfig,
}

impl HttpDocumentStore {
    pub fn new(config: HttpStoreConfig) -> Result<Self, StoreError> {
        let timeout = Duration::from_millis(config.timeout_ms);
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout.min(Duration::from_secs(2)))
            .build()
            .map_err(|e| StoreError::Transport {
                backend: "http".to_string(),
                reason: e.to_string(),
            })?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &HttpStoreConfig {
        &self.config
    }

    fn url(&self, key: &str) -> String {
        format!("{}/{}.json", self.config.base_url.trim_end_matches('/'), key)
    }

    fn request(&self, method: Method, key: &str) -> RequestBuilder {
        let builder = self.client.request(method, self.url(key));
        match &self.config.auth_token {
            Some(token) => builder.query(&[("auth", token)]),
            None => builder,
        }
    }

    fn transport(&self, e: reqwest::Error) -> StoreError {
        StoreError::Transport {
            backend: self.name().to_string(),
            reason: e.to_string(),
        }
    }

    fn status(&self, key: &str, status: StatusCode) -> StoreError {
        StoreError::Status {
            backend: self.name().to_string(),
            key: key.to_string(),
            status: status.as_u16(),
        }
    }

    async fn decode(&self, key: &str, response: reqwest::Response) -> Result<Option<Value>, StoreError> {
        let body: Value = response.json().await.map_err(|e| StoreError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        })?;

        Ok(if body.is_null() { None } else { Some(body) })
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    fn name(&self) -> &str {
        "http"
    }

    async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let response = self
            .request(Method::GET, key)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(self.status(key, status));
        }

        self.decode(key, response).await
    }

    async fn put(&self, key: &str, document: &Value) -> Result<(), StoreError> {
        let response = self
            .request(Method::PUT, key)
            .json(document)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.status(key, status));
        }

        debug!(key, status = status.as_u16(), "Document written");
        Ok(())
    }

    fn supports_conditional_write(&self) -> bool {
        self.config.conditional_writes
    }

    async fn compare_and_put(
        &self,
        key: &str,
        expected_version: u64,
        document: &Value,
    ) -> Result<CasOutcome, StoreError> {
        if !self.config.conditional_writes {
            return Err(StoreError::Unsupported(self.name().to_string()));
        }

        let response = self
            .request(Method::GET, key)
            .header(ETAG_REQUEST_HEADER, "true")
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let status = response.status();
        if !status.is_success() && status != StatusCode::NOT_FOUND {
            return Err(self.status(key, status));
        }

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| StoreError::Malformed {
                key: key.to_string(),
                reason: "missing ETag header".to_string(),
            })?;

        let current = if status == StatusCode::NOT_FOUND {
            None
        } else {
            self.decode(key, response).await?
        };

        let found = LotteryState::version_of(current.as_ref());
        if found != expected_version {
            return Ok(CasOutcome::Conflict { found: Some(found) });
        }

        let response = self
            .request(Method::PUT, key)
            .header(IF_MATCH, etag)
            .json(document)
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        match response.status() {
            StatusCode::PRECONDITION_FAILED => {
                debug!(key, expected_version, "Conditional write lost the race");
                Ok(CasOutcome::Conflict { found: None })
            }
            status if status.is_success() => Ok(CasOutcome::Committed),
            status => Err(self.status(key, status)),
        }
    }
}
