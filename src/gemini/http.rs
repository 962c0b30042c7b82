use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;
use std::time::Duration;

use super::{ApiError, GenerateContentRequest, GenerateContentResponse, GenerativeBackend, ModelInfo};
use crate::config::Config;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone)]
pub struct GeminiClientConfig {
    pub base_url: String,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout_secs: 30,
        }
    }
}

impl GeminiClientConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            api_key: config.resolved_api_key(),
            timeout_secs: config.timeout_seconds,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelList {
    models: Option<Vec<ModelInfo>>,
}

#[derive(Debug, Deserialize, Default)]
struct ErrorEnvelope {
    error: Option<ErrorBody>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct GeminiClient {
    client: Client,
    config: GeminiClientConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiClientConfig) -> Result<Self, ApiError> {
        if config.api_key.is_none() {
            tracing::warn!("no API key configured; requests will likely be rejected");
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(Self { client, config })
    }

    fn models_url(&self) -> String {
        format!("{}/models", self.config.base_url)
    }

    fn generate_url(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.config.base_url, model)
    }

    fn with_key(&self, builder: RequestBuilder) -> RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.query(&[("key", key.as_str())]),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, ApiError> {
        let response = self.with_key(builder).send().await.map_err(|e| {
            // reqwest errors embed the URL, which carries the key
            let e = e.without_url();
            if e.is_timeout() {
                ApiError::Transport(format!(
                    "timed out after {}s",
                    self.config.timeout_secs
                ))
            } else if e.is_connect() {
                ApiError::Transport(format!("cannot connect to {}: {}", self.config.base_url, e))
            } else {
                ApiError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .unwrap_or_default()
            .error
            .and_then(|error| error.message)
            .filter(|message| !message.trim().is_empty());
        Err(ApiError::Status {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl GenerativeBackend for GeminiClient {
    async fn list_models(&self) -> Result<Vec<ModelInfo>, ApiError> {
        tracing::debug!(url = %self.models_url(), "listing models");
        let response = self.send(self.client.get(self.models_url())).await?;
        let list: ModelList = response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.without_url().to_string()))?;
        list.models
            .ok_or_else(|| ApiError::Decode("model list has no `models` field".to_string()))
    }

    async fn generate_content(
        &self,
        model: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, ApiError> {
        tracing::debug!(model, url = %self.generate_url(model), "generateContent");
        let builder = self.client.post(self.generate_url(model)).json(request);
        let response = self.send(builder).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.without_url().to_string()))
    }
}
