//! Task-poll adapter (generic jobs endpoints).
//!
//! Status carries a string `state`; results arrive as a JSON-encoded
//! `resultJson` string.

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, info};

use adgen_models::ProviderFamily;

use crate::client::KieClient;
use crate::envelope::{non_empty, string_list};
use crate::error::{GatewayError, GatewayResult};
use crate::provider::{RawStatus, RenderProvider};
use crate::task::TaskSpec;

const CREATE_TASK_PATH: &str = "/api/v1/jobs/createTask";
const RECORD_INFO_PATH: &str = "/api/v1/jobs/recordInfo";

const DEFAULT_FAIL_MESSAGE: &str = "Video generation failed.";

#[derive(Debug, Clone)]
pub struct TaskPollProvider {
    client: KieClient,
}

impl TaskPollProvider {
    pub fn new(client: KieClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl RenderProvider for TaskPollProvider {
    fn family(&self) -> ProviderFamily {
        ProviderFamily::TaskPoll
    }

    async fn submit(&self, api_key: &str, task: &TaskSpec) -> GatewayResult<String> {
        let TaskSpec::TaskPoll(body) = task else {
            return Err(GatewayError::InvalidRequest(
                "direct-poll task sent to task-poll provider".to_string(),
            ));
        };

        let url = self.client.api_url(CREATE_TASK_PATH);
        let request = self.client.post(&url, api_key)?.json(body);
        let envelope = self.client.execute("Create task", request).await?;

        let task_id = envelope
            .data()
            .get("taskId")
            .and_then(Value::as_str)
            .and_then(non_empty)
            .ok_or_else(|| GatewayError::NoTaskId("createTask".to_string()))?;

        info!(task_id = %task_id, model = %body.model, "Submitted task-poll task");
        Ok(task_id)
    }

    async fn query_status(&self, api_key: &str, task_id: &str) -> GatewayResult<RawStatus> {
        let url = self.client.api_url(RECORD_INFO_PATH);
        let request = self.client.get(&url, api_key)?.query(&[("taskId", task_id)]);
        let envelope = self.client.execute("Record info", request).await?;
        let data = envelope.data();

        let state = data.get("state").and_then(Value::as_str).unwrap_or_default();
        debug!(task_id, state, "Task-poll state");

        match state {
            "success" => Ok(RawStatus::success(parse_result_json(data.get("resultJson")))),
            "fail" => {
                let message = data
                    .get("failMsg")
                    .and_then(Value::as_str)
                    .and_then(non_empty)
                    .unwrap_or_else(|| DEFAULT_FAIL_MESSAGE.to_string());
                Ok(RawStatus::fail(message))
            }
            _ => Ok(RawStatus::pending()),
        }
    }
}

/// `resultJson` is a string holding `{"resultUrls": [...]}`. Malformed input
/// yields no URLs rather than an error.
fn parse_result_json(value: Option<&Value>) -> Vec<String> {
    let parsed = match value {
        Some(Value::String(raw)) => serde_json::from_str::<Value>(raw).ok(),
        Some(obj @ Value::Object(_)) => Some(obj.clone()),
        _ => None,
    };
    parsed
        .map(|result| string_list(result.get("resultUrls")))
        .unwrap_or_default()
}
