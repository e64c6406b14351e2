//! Task submission payloads.

use serde::Serialize;

use adgen_models::ProviderFamily;

/// Body of a direct-poll generate call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirectPollTask {
    pub prompt: String,
    #[serde(rename = "imageUrls")]
    pub image_urls: Vec<String>,
    pub model: String,
    pub aspect_ratio: String,
    #[serde(rename = "generationType")]
    pub generation_type: String,
    #[serde(rename = "callBackUrl", skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Body of a task-poll createTask call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskPollTask {
    pub model: String,
    pub input: TaskPollInput,
    #[serde(rename = "callBackUrl", skip_serializing_if = "Option::is_none")]
    pub callback_url: Option<String>,
}

/// Model-specific `input` object of a task-poll submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TaskPollInput {
    /// Frame-count models, with or without a start image.
    Frames {
        prompt: String,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        image_urls: Vec<String>,
        aspect_ratio: String,
        n_frames: String,
        remove_watermark: bool,
    },
    /// Seconds-based image models.
    Clip {
        prompt: String,
        image_urls: Vec<String>,
        sound: bool,
        duration: String,
    },
    /// Reference frame animated by a reference motion clip.
    MotionControl {
        prompt: String,
        input_urls: Vec<String>,
        video_urls: Vec<String>,
        character_orientation: String,
        mode: String,
    },
}

/// Submission for either provider family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskSpec {
    DirectPoll(DirectPollTask),
    TaskPoll(TaskPollTask),
}

impl TaskSpec {
    pub fn family(&self) -> ProviderFamily {
        match self {
            TaskSpec::DirectPoll(_) => ProviderFamily::DirectPoll,
            TaskSpec::TaskPoll(_) => ProviderFamily::TaskPoll,
        }
    }

    pub fn prompt(&self) -> &str {
        match self {
            TaskSpec::DirectPoll(task) => &task.prompt,
            TaskSpec::TaskPoll(task) => match &task.input {
                TaskPollInput::Frames { prompt, .. }
                | TaskPollInput::Clip { prompt, .. }
                | TaskPollInput::MotionControl { prompt, .. } => prompt,
            },
        }
    }

    pub fn model(&self) -> &str {
        match self {
            TaskSpec::DirectPoll(task) => &task.model,
            TaskSpec::TaskPoll(task) => &task.model,
        }
    }
}
