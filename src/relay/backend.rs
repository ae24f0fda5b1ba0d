//! Generation backend trait and the Ollama implementation.

use super::error::BackendError;
use super::types::{GenerationRequest, GenerationResponse};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// A downstream service that turns a prompt into text.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Human-readable name for logs.
    fn name(&self) -> &str;

    /// Run one generation. The call must give up once `timeout` elapses.
    async fn generate(
        &self,
        request: &GenerationRequest,
        timeout: Duration,
    ) -> Result<GenerationResponse, BackendError>;
}

/// Ollama-compatible backend using `POST /api/generate`.
pub struct OllamaBackend {
    generate_url: String,
    /// Shared HTTP client for connection pooling
    client: Client,
}

impl OllamaBackend {
    pub fn new(generate_url: String, client: Client) -> Self {
        Self {
            generate_url,
            client,
        }
    }

    fn classify(e: reqwest::Error, timeout_ms: u64) -> BackendError {
        if e.is_timeout() {
            BackendError::Timeout(timeout_ms)
        } else if e.is_connect() {
            BackendError::Unreachable(e.to_string())
        } else {
            BackendError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl GenerationBackend for OllamaBackend {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn generate(
        &self,
        request: &GenerationRequest,
        timeout: Duration,
    ) -> Result<GenerationResponse, BackendError> {
        let timeout_ms = timeout.as_millis() as u64;

        let call = async {
            let response = self
                .client
                .post(&self.generate_url)
                .json(request)
                .send()
                .await
                .map_err(|e| Self::classify(e, timeout_ms))?;

            let status = response.status();
            if status == StatusCode::NOT_FOUND {
                return Err(BackendError::ModelNotFound(request.model.clone()));
            }
            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(BackendError::Upstream {
                    status: status.as_u16(),
                    message,
                });
            }

            response
                .json::<GenerationResponse>()
                .await
                .map_err(|e| BackendError::InvalidResponse(e.to_string()))
        };

        tokio::time::timeout(timeout, call)
            .await
            .map_err(|_| BackendError::Timeout(timeout_ms))?
    }
}
