//! Orchestrator configuration.

use std::time::Duration;

/// Polling cadence and batch limits.
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Delay between status checks in `run_to_completion`
    pub poll_interval: Duration,
    /// Status checks before `run_to_completion` gives up
    pub poll_max_attempts: u32,
    /// High-resolution result lookups before `NoResultUrl`
    pub high_res_attempts: u32,
    /// Delay between high-resolution lookups
    pub high_res_interval: Duration,
    /// Jobs rendered at once by `render_batch`
    pub batch_concurrency: usize,
    /// Forwarded as `callBackUrl` on task-poll submissions
    pub callback_url: Option<String>,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(15),
            poll_max_attempts: 60,
            high_res_attempts: 12,
            high_res_interval: Duration::from_secs(25),
            batch_concurrency: 2,
            callback_url: None,
        }
    }
}

impl OrchestratorConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            poll_interval: Duration::from_secs(
                std::env::var("ADGEN_POLL_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(15),
            ),
            poll_max_attempts: std::env::var("ADGEN_POLL_MAX_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            high_res_attempts: std::env::var("ADGEN_HIGH_RES_ATTEMPTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(12),
            high_res_interval: Duration::from_secs(
                std::env::var("ADGEN_HIGH_RES_INTERVAL_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(25),
            ),
            batch_concurrency: std::env::var("ADGEN_BATCH_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(2),
            callback_url: std::env::var("ADGEN_CALLBACK_URL")
                .ok()
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }

    /// Fast cadence for tests against mock servers.
    pub fn immediate() -> Self {
        Self {
            poll_interval: Duration::from_millis(1),
            high_res_interval: Duration::from_millis(1),
            ..Default::default()
        }
    }
}
