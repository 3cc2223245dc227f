//! Request plumbing shared by every state-changing call.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::ClientError;

/// The two request shapes the pages issue. `fetch_json` returns `None` for
/// an empty body; callers decide success with [`shared::protocol::is_truthy`].
#[async_trait]
pub trait StoreTransport: Send + Sync {
    async fn fetch_json(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Option<Value>, ClientError>;

    async fn fetch_raw(&self, path: &str, params: &[(String, String)])
        -> Result<String, ClientError>;
}

pub struct HttpTransport {
    http: Client,
    base: Url,
}

impl HttpTransport {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        let mut normalized = server_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base = Url::parse(&normalized).map_err(|source| ClientError::InvalidUrl {
            url: server_url.to_string(),
            source,
        })?;
        Ok(Self { http, base })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, ClientError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(|source| ClientError::InvalidUrl {
                url: path.to_string(),
                source,
            })
    }

    async fn get_text(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<String, ClientError> {
        let url = self.endpoint(path)?;
        debug!(%url, params = params.len(), "issuing request");
        let transport = |source| ClientError::Transport {
            path: path.to_string(),
            source,
        };
        self.http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(transport)?
            .error_for_status()
            .map_err(transport)?
            .text()
            .await
            .map_err(transport)
    }
}

#[async_trait]
impl StoreTransport for HttpTransport {
    async fn fetch_json(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<Option<Value>, ClientError> {
        let body = self.get_text(path, params).await?;
        if body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&body)
            .map(Some)
            .map_err(|source| ClientError::Decode {
                path: path.to_string(),
                source,
            })
    }

    async fn fetch_raw(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<String, ClientError> {
        self.get_text(path, params).await
    }
}

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod tests;
