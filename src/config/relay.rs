//! Chat relay configuration

use serde::{Deserialize, Serialize};

/// Settings for forwarding prompts to the generation backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Base URL of the generation backend (e.g. an Ollama server)
    pub backend_host: String,
    /// Model used when a request does not name one
    pub model: String,
    /// Sampling temperature used when a request does not set one
    pub default_temperature: f32,
    /// Upper bound on generated tokens
    pub num_predict: u32,
    /// Longest accepted prompt, in characters
    pub max_prompt_chars: usize,
    /// Deadline for one generation call
    pub generation_timeout_seconds: u64,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            backend_host: "http://localhost:11434".to_string(),
            model: "llama3.2".to_string(),
            default_temperature: 0.7,
            num_predict: 512,
            max_prompt_chars: 4000,
            generation_timeout_seconds: 60,
        }
    }
}

impl RelayConfig {
    /// URL of the backend's generate endpoint.
    pub fn generate_url(&self) -> String {
        format!("{}/api/generate", self.backend_host.trim_end_matches('/'))
    }
}
