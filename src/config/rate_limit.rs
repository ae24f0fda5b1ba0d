//! Rate limit configuration

use serde::{Deserialize, Serialize};

/// Fixed-window limit applied per client IP to `/ask`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub enabled: bool,
    /// Window length in milliseconds
    pub window_ms: u64,
    /// Requests allowed per window
    pub max: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            window_ms: 15 * 60 * 1000,
            max: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_limit_defaults() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.window_ms, 900_000);
        assert_eq!(config.max, 100);
    }
}
