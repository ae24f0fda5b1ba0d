//! Fixed-window rate limiting for the relay endpoint.
//!
//! Each client IP gets `max` requests per window. The window starts with the
//! client's first request and resets once it has fully elapsed.

use crate::api::{ApiError, AppState};
use crate::config::RateLimitConfig;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Tracked clients before expired windows are swept.
const PRUNE_THRESHOLD: usize = 10_000;

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of one rate limit check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Per-IP fixed-window counter.
pub struct RateLimiter {
    window: Duration,
    max: u32,
    clients: DashMap<IpAddr, Window>,
}

impl RateLimiter {
    pub fn new(window: Duration, max: u32) -> Self {
        Self {
            window,
            max,
            clients: DashMap::new(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(Duration::from_millis(config.window_ms), config.max)
    }

    pub fn check(&self, ip: IpAddr) -> Decision {
        self.check_at(ip, Instant::now())
    }

    /// Count one request from `ip` at `now`.
    pub fn check_at(&self, ip: IpAddr, now: Instant) -> Decision {
        if self.clients.len() > PRUNE_THRESHOLD {
            self.prune(now);
        }

        let mut window = self.clients.entry(ip).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(window.started) >= self.window {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        if window.count >= self.max {
            let retry_after = self.window.saturating_sub(now.duration_since(window.started));
            return Decision::Limited { retry_after };
        }

        window.count += 1;
        Decision::Allowed {
            remaining: self.max - window.count,
        }
    }

    /// Drop windows that have fully elapsed.
    pub fn prune(&self, now: Instant) {
        self.clients
            .retain(|_, w| now.duration_since(w.started) < self.window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.clients.len()
    }
}

/// Whole seconds, rounded up, never below one.
fn retry_after_secs(retry_after: Duration) -> u64 {
    let secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
    secs.max(1)
}

/// Middleware guarding `/ask`.
///
/// Clients are keyed by peer address; requests without connection info share
/// one bucket.
pub async fn enforce(State(state): State<Arc<AppState>>, request: Request, next: Next) -> Response {
    let ip = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    match state.rate_limiter.check(ip) {
        Decision::Allowed { .. } => next.run(request).await,
        Decision::Limited { retry_after } => {
            let secs = retry_after_secs(retry_after);
            tracing::warn!(client_ip = %ip, retry_after_secs = secs, "Rate limit exceeded");
            let mut response = ApiError::rate_limited().into_response();
            response
                .headers_mut()
                .insert(RETRY_AFTER, HeaderValue::from(secs));
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::V4(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_allows_up_to_max() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 3);
        let now = Instant::now();
        assert_eq!(limiter.check_at(ip(1), now), Decision::Allowed { remaining: 2 });
        assert_eq!(limiter.check_at(ip(1), now), Decision::Allowed { remaining: 1 });
        assert_eq!(limiter.check_at(ip(1), now), Decision::Allowed { remaining: 0 });
        assert!(matches!(
            limiter.check_at(ip(1), now),
            Decision::Limited { .. }
        ));
    }

    #[test]
    fn test_clients_counted_separately() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let now = Instant::now();
        assert!(matches!(limiter.check_at(ip(1), now), Decision::Allowed { .. }));
        assert!(matches!(limiter.check_at(ip(2), now), Decision::Allowed { .. }));
        assert!(matches!(limiter.check_at(ip(1), now), Decision::Limited { .. }));
    }

    #[test]
    fn test_window_resets_after_elapsed() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        limiter.check_at(ip(1), start);
        assert!(matches!(
            limiter.check_at(ip(1), start + Duration::from_secs(59)),
            Decision::Limited { .. }
        ));
        assert!(matches!(
            limiter.check_at(ip(1), start + Duration::from_secs(60)),
            Decision::Allowed { .. }
        ));
    }

    #[test]
    fn test_retry_after_counts_down() {
        let limiter = RateLimiter::new(Duration::from_secs(60), 1);
        let start = Instant::now();
        limiter.check_at(ip(1), start);
        match limiter.check_at(ip(1), start + Duration::from_secs(20)) {
            Decision::Limited { retry_after } => assert_eq!(retry_after, Duration::from_secs(40)),
            other => panic!("expected limit, got {:?}", other),
        }
    }

    #[test]
    fn test_retry_after_secs_rounds_up() {
        assert_eq!(retry_after_secs(Duration::from_millis(1500)), 2);
        assert_eq!(retry_after_secs(Duration::from_secs(3)), 3);
        assert_eq!(retry_after_secs(Duration::ZERO), 1);
    }

    #[test]
    fn test_prune_drops_expired() {
        let limiter = RateLimiter::new(Duration::from_secs(1), 5);
        let start = Instant::now();
        limiter.check_at(ip(1), start);
        limiter.check_at(ip(2), start + Duration::from_millis(900));
        limiter.prune(start + Duration::from_millis(1500));
        assert_eq!(limiter.tracked_clients(), 1);
    }
}
