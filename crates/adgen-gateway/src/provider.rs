//! Render provider abstraction.
//!
//! Both provider families expose the same two calls: submit a task and read
//! its state. Adapters translate their wire shapes into [`RawStatus`].

use async_trait::async_trait;

use adgen_models::{JobState, ProviderFamily};

use crate::error::GatewayResult;
use crate::task::TaskSpec;

/// Provider state before locator resolution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawStatus {
    pub state: JobState,
    /// Result URLs in provider order; may be empty on success.
    pub result_urls: Vec<String>,
    /// Provider failure text, verbatim.
    pub fail_message: Option<String>,
}

impl RawStatus {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn success(result_urls: Vec<String>) -> Self {
        Self {
            state: JobState::Success,
            result_urls,
            fail_message: None,
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            state: JobState::Fail,
            result_urls: Vec::new(),
            fail_message: Some(message.into()),
        }
    }

    /// First result URL, if any.
    pub fn first_url(&self) -> Option<&str> {
        self.result_urls.first().map(String::as_str)
    }
}

/// Adapter for one provider family.
#[async_trait]
pub trait RenderProvider: Send + Sync {
    /// Family this adapter serves.
    fn family(&self) -> ProviderFamily;

    /// Submit a render task and return the provider task id.
    ///
    /// Called exactly once per job; never retried here.
    async fn submit(&self, api_key: &str, task: &TaskSpec) -> GatewayResult<String>;

    /// Read the current state of a task. Never sleeps or retries.
    ///
    /// Usually one request; the direct-poll adapter adds a single
    /// high-resolution lookup when a success carries no result URL.
    async fn query_status(&self, api_key: &str, task_id: &str) -> GatewayResult<RawStatus>;
}
