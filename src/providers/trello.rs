use async_trait::async_trait;

use super::{BoardApi, Form, RawResponse};
use crate::error::TrelloError;

pub const DEFAULT_API: &str = "https://api.trello.com/1";

/// Where to reach Trello and the credentials attached to every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api: String,
    pub key: String,
    pub token: String,
}

pub struct TrelloClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl TrelloClient {
    pub fn new(config: ClientConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn auth_params(&self) -> [(&str, &str); 2] {
        [("key", &self.config.key), ("token", &self.config.token)]
    }

    fn url(&self, resource: &str) -> String {
        format!("{}/{}", self.config.api.trim_end_matches('/'), resource)
    }

    async fn send(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> Result<reqwest::Response, TrelloError> {
        let response = request.query(&self.auth_params()).send().await?;
        let status = response.status();
        tracing::debug!(%url, status = status.as_u16(), "trello call");
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrelloError::Remote {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }
        Ok(response)
    }

    async fn raw(response: reqwest::Response) -> Result<RawResponse, TrelloError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(RawResponse { status, body })
    }
}

#[async_trait]
impl BoardApi for TrelloClient {
    async fn fetch(&self, resource: &str) -> Result<serde_json::Value, TrelloError> {
        let url = self.url(resource);
        let response = self.send(self.client.get(&url), &url).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|source| TrelloError::Decode {
            resource: resource.to_string(),
            source,
        })
    }

    async fn create(&self, resource: &str, form: &Form) -> Result<RawResponse, TrelloError> {
        let url = self.url(resource);
        let response = self.send(self.client.post(&url).form(form), &url).await?;
        Self::raw(response).await
    }

    async fn update(&self, resource: &str, form: &Form) -> Result<RawResponse, TrelloError> {
        let url = self.url(resource);
        let response = self.send(self.client.put(&url).form(form), &url).await?;
        Self::raw(response).await
    }
}
