use async_trait::async_trait;
use reqwest::header::ACCEPT;
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    api::{responses::CompareResponse, CompareBackend},
    error::{AppError, Result},
    models::{
        comparison::{ComparisonRequest, ComparisonResult},
        embedding::{EmbedRequest, EmbedResponse},
    },
    state::Config,
};

/// `CompareBackend` over JSON-over-HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    compare_url: String,
    embed_url: String,
}

impl HttpBackend {
    /// Build a client for the service described by `config`
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            compare_url: config.compare_url(),
            embed_url: config.embed_url(),
        })
    }

    /// URL used for comparisons
    pub fn compare_url(&self) -> &str {
        &self.compare_url
    }

    /// URL used for embeddings
    pub fn embed_url(&self) -> &str {
        &self.embed_url
    }

    async fn post_json<B, R>(&self, url: &str, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        log::debug!("POST {}", url);

        let resp = self
            .client
            .post(url)
            .header(ACCEPT, "application/json")
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            log::warn!("POST {} returned {}", url, status);
            return Err(AppError::Server {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = resp.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| AppError::MalformedResponse(e.to_string()))
    }
}

#[async_trait]
impl CompareBackend for HttpBackend {
    async fn compare(&self, request: &ComparisonRequest) -> Result<Vec<ComparisonResult>> {
        let response: CompareResponse = self.post_json(&self.compare_url, request).await?;
        Ok(response.results)
    }

    async fn embed_text(&self, text: &str) -> Result<EmbedResponse> {
        let request = EmbedRequest {
            text: text.to_string(),
        };
        self.post_json(&self.embed_url, &request).await
    }
}
