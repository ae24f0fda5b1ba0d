//! Outbound probes: the shallow health GET and the generation round-trip.

use super::error::HealthCheckError;
use super::state::HealthCheckResult;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Prompt sent by the generation probe.
pub const PROBE_PROMPT: &str = "Hello, this is a test message. Please respond briefly.";

/// Outcome of an on-demand deep probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum ProbeOutcome {
    Success { latency_ms: u32 },
    Failure { reason: String },
}

impl ProbeOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

impl From<HealthCheckResult> for ProbeOutcome {
    fn from(result: HealthCheckResult) -> Self {
        match result {
            HealthCheckResult::Online { latency_ms } => Self::Success { latency_ms },
            HealthCheckResult::Offline { error } => Self::Failure {
                reason: error.to_string(),
            },
        }
    }
}

fn elapsed_ms(start: Instant) -> u32 {
    start.elapsed().as_millis().min(u32::MAX as u128) as u32
}

/// GET `url` with a deadline. Online iff a 2xx status arrives in time; the
/// body is never read.
pub async fn get_health(client: &reqwest::Client, url: &str, timeout: Duration) -> HealthCheckResult {
    let timeout_ms = timeout.as_millis() as u64;
    let start = Instant::now();

    match tokio::time::timeout(timeout, client.get(url).send()).await {
        Err(_) => HealthCheckResult::Offline {
            error: HealthCheckError::Timeout(timeout_ms),
        },
        Ok(Err(e)) => HealthCheckResult::Offline {
            error: HealthCheckError::from_reqwest(e, timeout_ms),
        },
        Ok(Ok(response)) if response.status().is_success() => HealthCheckResult::Online {
            latency_ms: elapsed_ms(start),
        },
        Ok(Ok(response)) => HealthCheckResult::Offline {
            error: HealthCheckError::HttpError(response.status().as_u16()),
        },
    }
}

#[derive(Serialize)]
struct ProbeRequest<'a> {
    prompt: &'a str,
}

/// POST the probe prompt to a relay's `/ask` endpoint.
///
/// Succeeds only when the relay answers 2xx with a non-blank `answer`, all
/// within the deadline.
pub async fn post_generation(client: &reqwest::Client, url: &str, timeout: Duration) -> ProbeOutcome {
    let start = Instant::now();

    let call = async {
        let response = client
            .post(url)
            .json(&ProbeRequest {
                prompt: PROBE_PROMPT,
            })
            .send()
            .await
            .map_err(|e| HealthCheckError::from_reqwest(e, timeout.as_millis() as u64).to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(HealthCheckError::HttpError(status.as_u16()).to_string());
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| format!("invalid response body: {}", e))?;

        match body.get("answer").and_then(|a| a.as_str()) {
            Some(answer) if !answer.trim().is_empty() => Ok(()),
            _ => Err("response contained no answer".to_string()),
        }
    };

    match tokio::time::timeout(timeout, call).await {
        Ok(Ok(())) => ProbeOutcome::Success {
            latency_ms: elapsed_ms(start),
        },
        Ok(Err(reason)) => ProbeOutcome::Failure { reason },
        Err(_) => ProbeOutcome::Failure {
            reason: HealthCheckError::Timeout(timeout.as_millis() as u64).to_string(),
        },
    }
}
