//! SOGUM dashboard core
//!
//! Polls a fixed set of network services for liveness, keeps a per-service
//! status table, and relays free-text prompts to a language-model generation
//! backend with bounded latency and typed failures.

pub mod api;
pub mod chat;
pub mod cli;
pub mod config;
pub mod health;
pub mod logging;
pub mod metrics;
pub mod registry;
pub mod relay;
