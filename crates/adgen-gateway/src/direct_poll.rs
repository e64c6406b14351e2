//! Direct-poll adapter (Veo endpoints).
//!
//! Status carries a numeric `successFlag`: 0 generating, 1 success, 2 and 3
//! failed. A finished task sometimes reports no URLs until the separate
//! high-resolution endpoint is consulted.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info, warn};

use adgen_models::ProviderFamily;

use crate::client::KieClient;
use crate::envelope::{non_empty, string_list};
use crate::error::{GatewayError, GatewayResult};
use crate::provider::{RawStatus, RenderProvider};
use crate::task::TaskSpec;

const GENERATE_PATH: &str = "/api/v1/veo/generate";
const RECORD_INFO_PATH: &str = "/api/v1/veo/record-info";
const HIGH_RES_PATH: &str = "/api/v1/veo/get-1080p-video";

const DEFAULT_FAIL_MESSAGE: &str = "Video generation failed.";

#[derive(Debug, Clone)]
pub struct DirectPollProvider {
    client: KieClient,
}

impl DirectPollProvider {
    pub fn new(client: KieClient) -> Self {
        Self { client }
    }

    /// One lookup of the high-resolution result. `Ok(None)` means not ready yet.
    pub async fn high_res_result(&self, api_key: &str, task_id: &str) -> GatewayResult<Option<String>> {
        let url = self.client.api_url(HIGH_RES_PATH);
        let request = self.client.get(&url, api_key)?.query(&[("taskId", task_id)]);
        let envelope = self.client.execute("Veo 1080p", request).await?;

        let result = envelope
            .data()
            .get("resultUrl")
            .and_then(Value::as_str)
            .and_then(non_empty);
        debug!(task_id, found = result.is_some(), "High-resolution lookup");
        Ok(result)
    }
}

#[async_trait]
impl RenderProvider for DirectPollProvider {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::DirectPoll
    }

    async fn submit(&self, api_key: &str, task: &TaskSpec) -> GatewayResult<String> {
        let TaskSpec::DirectPoll(body) = task else {
            return Err(GatewayError::InvalidRequest(
                "task-poll task sent to direct-poll provider".to_string(),
            ));
        };

        let url = self.client.api_url(GENERATE_PATH);
        let request = self.client.post(&url, api_key)?.json(body);
        let envelope = self.client.execute("Veo generate", request).await?;

        let task_id = envelope
            .data()
            .get("taskId")
            .and_then(Value::as_str)
            .and_then(non_empty)
            .ok_or_else(|| GatewayError::NoTaskId("Veo".to_string()))?;

        info!(task_id = %task_id, model = %body.model, "Submitted direct-poll task");
        Ok(task_id)
    }

    async fn query_status(&self, api_key: &str, task_id: &str) -> GatewayResult<RawStatus> {
        let url = self.client.api_url(RECORD_INFO_PATH);
        let request = self.client.get(&url, api_key)?.query(&[("taskId", task_id)]);
        let envelope = self.client.execute("Veo record-info", request).await?;
        let data = envelope.data();

        match success_flag(data) {
            Some(1) => {
                let mut urls = result_urls(data);
                if urls.is_empty() {
                    // Single attempt; bounded waiting belongs to the caller.
                    match self.high_res_result(api_key, task_id).await {
                        Ok(Some(url)) => urls.push(url),
                        Ok(None) => {}
                        Err(GatewayError::InvalidApiKey) => return Err(GatewayError::InvalidApiKey),
                        Err(e) => warn!(task_id, error = %e, "High-resolution lookup failed"),
                    }
                }
                Ok(RawStatus::success(urls))
            }
            Some(2) | Some(3) => {
                let message = data
                    .get("failMsg")
                    .or_else(|| data.get("errorMessage"))
                    .and_then(Value::as_str)
                    .and_then(non_empty)
                    .unwrap_or_else(|| DEFAULT_FAIL_MESSAGE.to_string());
                Ok(RawStatus::fail(message))
            }
            _ => Ok(RawStatus::pending()),
        }
    }
}

/// `successFlag` arrives as a number or a numeric string.
fn success_flag(data: &Value) -> Option<i64> {
    let flag = data.get("successFlag")?;
    flag.as_i64()
        .or_else(|| flag.as_str().and_then(|s| s.trim().parse().ok()))
}

/// URLs live at `resultUrls` or `response.resultUrls`.
fn result_urls(data: &Value) -> Vec<String> {
    let top = string_list(data.get("resultUrls"));
    if !top.is_empty() {
        return top;
    }
    string_list(data.get("response").and_then(|r| r.get("resultUrls")))
}
