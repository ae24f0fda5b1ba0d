//! Terminal chat client for a running relay.
//!
//! A [`ChatSession`] keeps the ordered exchange and never surfaces a raw
//! error: a failed request becomes a conversational fallback reply.

mod error;

pub use error::ClientError;

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client-side deadline for one prompt.
pub const DEFAULT_CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// Shown when the relay answers 2xx without any text.
pub const EMPTY_ANSWER_MESSAGE: &str =
    "I received your message but could not generate a response.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub text: String,
    pub sender: Sender,
}

/// Ordered, append-only conversation. Lives only as long as the session.
#[derive(Debug, Clone, Default)]
pub struct ChatExchange {
    messages: Vec<ChatMessage>,
}

impl ChatExchange {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sender: Sender, text: impl Into<String>) -> &ChatMessage {
        self.messages.push(ChatMessage {
            text: text.into(),
            sender,
        });
        &self.messages[self.messages.len() - 1]
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[derive(Serialize)]
struct AskBody<'a> {
    prompt: &'a str,
}

#[derive(Deserialize)]
struct AskReply {
    #[serde(default)]
    answer: String,
}

#[derive(Deserialize)]
struct ErrorReply {
    error: String,
}

/// HTTP client for `POST <url>/ask`.
#[derive(Debug, Clone)]
pub struct RelayClient {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_CLIENT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn ask_url(&self) -> String {
        format!("{}/ask", self.base_url)
    }

    /// Send one prompt and return the answer text, which may be empty.
    ///
    /// # Errors
    ///
    /// Any transport failure, the client deadline, a non-2xx status or a body
    /// without the expected shape.
    pub async fn ask(&self, prompt: &str) -> Result<String, ClientError> {
        let timeout_ms = self.timeout.as_millis() as u64;
        let call = async {
            let response = self
                .client
                .post(self.ask_url())
                .json(&AskBody { prompt })
                .send()
                .await
                .map_err(|e| ClientError::Connect(e.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                let message = response
                    .json::<ErrorReply>()
                    .await
                    .map(|body| body.error)
                    .unwrap_or_else(|_| status.to_string());
                return Err(ClientError::Http {
                    status: status.as_u16(),
                    message,
                });
            }

            let reply: AskReply = response
                .json()
                .await
                .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
            Ok(reply.answer)
        };

        tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| ClientError::Timeout(timeout_ms))?
    }
}

/// A conversation against one relay.
pub struct ChatSession {
    client: RelayClient,
    exchange: ChatExchange,
}

impl ChatSession {
    pub fn new(client: RelayClient) -> Self {
        Self {
            client,
            exchange: ChatExchange::new(),
        }
    }

    pub fn exchange(&self) -> &ChatExchange {
        &self.exchange
    }

    /// Send a prompt and append both sides of the turn.
    ///
    /// Blank input is ignored and returns `None`. Otherwise returns the
    /// assistant message, which is the fallback text if the request failed.
    pub async fn send(&mut self, prompt: &str) -> Option<&ChatMessage> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return None;
        }
        self.exchange.push(Sender::User, prompt);

        let reply = match self.client.ask(prompt).await {
            Ok(answer) if answer.trim().is_empty() => EMPTY_ANSWER_MESSAGE.to_string(),
            Ok(answer) => answer,
            Err(e) => {
                tracing::debug!(error = %e, "Relay request failed");
                e.fallback_message().to_string()
            }
        };
        Some(self.exchange.push(Sender::Assistant, reply))
    }
}
