//! # Chat Relay
//!
//! Validates a free-text prompt, forwards it to the generation backend under
//! a deadline, and maps every downstream failure to a typed [`RelayError`].
//!
//! ## Example
//!
//! ```no_run
//! use sogum::config::RelayConfig;
//! use sogum::relay::{ChatRelay, RelayOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let relay = ChatRelay::ollama(RelayConfig::default(), reqwest::Client::new());
//! let answer = relay
//!     .relay("req-1", "What is 6*7?", &RelayOptions::default())
//!     .await?;
//! println!("{}", answer.answer);
//! # Ok(())
//! # }
//! ```

mod backend;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use backend::{GenerationBackend, OllamaBackend};
pub use error::{BackendError, RelayError};
pub use types::*;

use crate::config::RelayConfig;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Instrument;

/// Forwards prompts to a [`GenerationBackend`].
///
/// Holds no per-request state; every call is independent and never retried.
pub struct ChatRelay {
    backend: Arc<dyn GenerationBackend>,
    config: RelayConfig,
    timeout: Duration,
    content_logging: bool,
}

impl ChatRelay {
    pub fn new(backend: Arc<dyn GenerationBackend>, config: RelayConfig) -> Self {
        let timeout = Duration::from_secs(config.generation_timeout_seconds);
        Self {
            backend,
            config,
            timeout,
            content_logging: false,
        }
    }

    /// Relay backed by the Ollama `/api/generate` endpoint in `config`.
    pub fn ollama(config: RelayConfig, client: reqwest::Client) -> Self {
        let backend = OllamaBackend::new(config.generate_url(), client);
        Self::new(Arc::new(backend), config)
    }

    /// Override the generation deadline.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Log a truncated preview of each prompt.
    pub fn with_content_logging(mut self, enabled: bool) -> Self {
        self.content_logging = enabled;
        self
    }

    pub fn config(&self) -> &RelayConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Check a prompt and return it trimmed.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for an empty or whitespace-only prompt, or one longer
    /// than `max_prompt_chars` characters.
    pub fn validate<'a>(&self, prompt: &'a str) -> Result<&'a str, RelayError> {
        let trimmed = prompt.trim();
        if trimmed.is_empty() {
            return Err(RelayError::InvalidInput("Prompt is required".to_string()));
        }
        if prompt.chars().count() > self.config.max_prompt_chars {
            return Err(RelayError::InvalidInput(format!(
                "Prompt exceeds maximum length of {} characters",
                self.config.max_prompt_chars
            )));
        }
        Ok(trimmed)
    }

    /// Build the downstream request, filling unset options from config.
    pub fn build_request(&self, prompt: &str, options: &RelayOptions) -> GenerationRequest {
        let model = options
            .model
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .unwrap_or(self.config.model.as_str())
            .to_string();

        GenerationRequest {
            model,
            prompt: prompt.to_string(),
            stream: false,
            options: GenerationOptions {
                temperature: options
                    .temperature
                    .unwrap_or(self.config.default_temperature),
                num_predict: self.config.num_predict,
            },
        }
    }

    /// Relay one prompt.
    ///
    /// `request_id` is attached to every log line of the exchange.
    pub async fn relay(
        &self,
        request_id: &str,
        prompt: &str,
        options: &RelayOptions,
    ) -> Result<RelayAnswer, RelayError> {
        let span = tracing::info_span!("relay", request_id = %request_id);
        self.relay_inner(request_id, prompt, options)
            .instrument(span)
            .await
    }

    async fn relay_inner(
        &self,
        request_id: &str,
        prompt: &str,
        options: &RelayOptions,
    ) -> Result<RelayAnswer, RelayError> {
        let start = Instant::now();

        let result = match self.validate(prompt) {
            Ok(trimmed) => {
                let request = self.build_request(trimmed, options);
                let preview =
                    crate::logging::truncate_prompt(&request.prompt, self.content_logging);
                tracing::info!(
                    backend = self.backend.name(),
                    model = %request.model,
                    prompt_chars = request.prompt.chars().count(),
                    prompt_preview = ?preview,
                    "Relaying prompt"
                );

                let timeout_ms = self.timeout.as_millis() as u64;
                let call = self.backend.generate(&request, self.timeout);
                let outcome = tokio::time::timeout(self.timeout, call)
                    .await
                    .unwrap_or(Err(BackendError::Timeout(timeout_ms)));

                match outcome {
                    Ok(response) => Ok(RelayAnswer {
                        answer: response.response,
                        model: response.model.unwrap_or(request.model),
                        request_id: request_id.to_string(),
                    }),
                    Err(e) => {
                        tracing::error!(error = %e, "Generation backend call failed");
                        Err(RelayError::from(e))
                    }
                }
            }
            Err(e) => {
                tracing::debug!(error = %e, "Rejected prompt");
                Err(e)
            }
        };

        let elapsed = start.elapsed();
        let outcome = match &result {
            Ok(_) => "success",
            Err(e) => e.code(),
        };
        metrics::counter!("sogum_relay_requests_total", "outcome" => outcome).increment(1);
        metrics::histogram!("sogum_relay_duration_seconds").record(elapsed.as_secs_f64());
        tracing::info!(
            outcome,
            latency_ms = elapsed.as_millis() as u64,
            "Relay completed"
        );

        result
    }
}
