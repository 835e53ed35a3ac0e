use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::backend::ChatBackend;
use super::types::{ApiError, ChatReply, ChatRequest};
use crate::chat::Language;
use crate::config::ServerConfig;
use crate::error::{ChatError, Result};

/// JSON-over-HTTP client for the answering service
pub struct HttpBackend {
    http_client: Client,
    chat_url: String,
    health_url: String,
    request_timeout_secs: u64,
    health_timeout: Duration,
}

impl HttpBackend {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ChatError::HttpClient(e.to_string()))?;

        let base = config.base_url.trim_end_matches('/');
        Ok(Self {
            http_client,
            chat_url: format!("{}{}", base, config.chat_path),
            health_url: format!("{}{}", base, config.health_path),
            request_timeout_secs: config.request_timeout_secs,
            health_timeout: Duration::from_secs(config.health_timeout_secs),
        })
    }

    #[cfg(test)]
    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    #[cfg(test)]
    pub fn health_url(&self) -> &str {
        &self.health_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> ApiError {
        if e.is_timeout() {
            ApiError::Timeout {
                timeout_secs: self.request_timeout_secs,
            }
        } else {
            ApiError::Network {
                message: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl ChatBackend for HttpBackend {
    async fn send_message(&self, text: &str, language: Language) -> std::result::Result<ChatReply, ApiError> {
        let body = ChatRequest {
            message: text,
            language: language.code(),
        };

        let response = self
            .http_client
            .post(&self.chat_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: text.chars().take(200).collect(),
            });
        }

        let text = response.text().await.map_err(|e| self.map_send_error(e))?;
        parse_reply(&text)
    }

    async fn check_health(&self) -> bool {
        match self
            .http_client
            .get(&self.health_url)
            .timeout(self.health_timeout)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!("Health check failed: {}", e);
                false
            }
        }
    }
}

fn parse_reply(body: &str) -> std::result::Result<ChatReply, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Parse {
        message: format!("{} - Response: {}", e, body.chars().take(200).collect::<String>()),
    })
}
