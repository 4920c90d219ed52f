//! HTTP secret store client
//!
//! ```text
//! POST {endpoint}/secret       {"message", "expiration", "one_time"} -> 200/201 {"message": id}
//! GET  {endpoint}/secret/{id}                                        -> 200 {"message": envelope}
//!                                                                       404/410 gone
//! ```

use std::time::Duration;

use burnlink_core::config::ApiConfig;
use burnlink_core::{BurnlinkError, NewSecret, SecretMessage};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, trace};

use super::{SecretStore, StoreError};

/// Secret store reached over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: Client,
    endpoint: String,
}

impl HttpStore {
    pub fn new(endpoint: &str, timeout: Duration) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("burnlink/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StoreError::Transport(format!("building HTTP client: {e}")))?;

        Ok(Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }

    /// Build from the `[api]` config section, enforcing its TLS policy.
    pub fn from_config(api: &ApiConfig) -> Result<Self, BurnlinkError> {
        api.check_endpoint()?;
        Self::new(&api.endpoint, Duration::from_secs(api.timeout_secs))
            .map_err(|e| BurnlinkError::Config(e.to_string()))
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn secret_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!("{}/secret/{}", self.endpoint, id),
            None => format!("{}/secret", self.endpoint),
        }
    }
}

impl SecretStore for HttpStore {
    async fn submit(&self, secret: &NewSecret) -> Result<String, StoreError> {
        let url = self.secret_url(None);
        debug!(
            url = %url,
            expiration = secret.expiration,
            one_time = secret.one_time,
            envelope_len = secret.message.len(),
            "POST secret"
        );

        let response = self
            .client
            .post(&url)
            .json(secret)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(%status, "submit response");
        if !status.is_success() {
            return Err(rejected(status, response).await);
        }

        let body = read_message(response).await?;
        if body.message.is_empty() {
            return Err(StoreError::Malformed("empty secret id".into()));
        }
        Ok(body.message)
    }

    async fn fetch(&self, id: &str) -> Result<String, StoreError> {
        let url = self.secret_url(Some(id));
        debug!(url = %url, "GET secret");

        let response = self.client.get(&url).send().await.map_err(transport_error)?;

        let status = response.status();
        debug!(%status, "fetch response");
        match status {
            StatusCode::NOT_FOUND | StatusCode::GONE => Err(StoreError::NotFound),
            s if s.is_success() => Ok(read_message(response).await?.message),
            s => Err(rejected(s, response).await),
        }
    }
}

fn transport_error(e: reqwest::Error) -> StoreError {
    // reqwest includes the request URL, which only ever carries the id
    StoreError::Transport(e.to_string())
}

async fn rejected(status: StatusCode, response: Response) -> StoreError {
    let detail = response
        .text()
        .await
        .unwrap_or_else(|_| "<unable to read error>".to_string());
    trace!("error response body: {detail}");
    StoreError::Rejected {
        status: status.as_u16(),
        detail: detail.trim().to_string(),
    }
}

async fn read_message(response: Response) -> Result<SecretMessage, StoreError> {
    let body = response
        .text()
        .await
        .map_err(|e| StoreError::Transport(format!("reading response body: {e}")))?;
    serde_json::from_str(&body).map_err(|e| StoreError::Malformed(e.to_string()))
}
