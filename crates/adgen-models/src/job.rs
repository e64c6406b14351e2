//! Render job definitions.
//!
//! The remote provider is the system of record for job state. The only
//! thing a caller must keep is the [`RenderJob`] handle returned on submit;
//! [`JobStatus`] is recomputed on every poll and never cached.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::media::{ImageInputs, MediaInput};
use crate::model::{Provider, VideoModel};
use crate::style::AspectRatio;

/// Caller request for one rendered ad video.
#[derive(Debug, Clone)]
pub struct RenderSpec {
    /// Requested model identifier; unknown values fall back to the default.
    pub model: String,
    pub images: ImageInputs,
    pub reference_video: Option<MediaInput>,
    /// Ad concept to expand into a rendering prompt.
    pub concept: String,
    pub duration_seconds: u32,
    /// Replaces the expander's system instruction when non-blank.
    pub prompt_override: Option<String>,
    pub aspect_ratio: AspectRatio,
    /// Position of this job in the caller's batch (drives the artifact name).
    pub index: u32,
}

impl RenderSpec {
    pub fn new(model: impl Into<String>, concept: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            images: ImageInputs::None,
            reference_video: None,
            concept: concept.into(),
            duration_seconds: 8,
            prompt_override: None,
            aspect_ratio: AspectRatio::default(),
            index: 0,
        }
    }

    pub fn with_images(mut self, images: ImageInputs) -> Self {
        self.images = images;
        self
    }

    pub fn with_reference_video(mut self, video: MediaInput) -> Self {
        self.reference_video = Some(video);
        self
    }

    pub fn with_duration(mut self, seconds: u32) -> Self {
        self.duration_seconds = seconds;
        self
    }

    pub fn with_prompt_override(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_override = Some(prompt.into());
        self
    }

    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    pub fn with_index(mut self, index: u32) -> Self {
        self.index = index;
        self
    }
}

/// Durable handle for a submitted render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenderJob {
    /// Provider-issued task identifier
    pub task_id: String,
    pub provider: Provider,
    /// Model actually used (after default fallback)
    pub model: VideoModel,
    /// Rendering prompt sent with the task
    pub created_prompt: String,
    pub index: u32,
}

/// Uniform job state across provider families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    #[default]
    Pending,
    Success,
    Fail,
}

impl JobState {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Pending => "pending",
            JobState::Success => "success",
            JobState::Fail => "fail",
        }
    }

    /// No further transitions are expected.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Success | JobState::Fail)
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result of one status query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct JobStatus {
    pub state: JobState,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result_locator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl JobStatus {
    pub fn pending() -> Self {
        Self::default()
    }

    pub fn success(result_locator: Option<String>) -> Self {
        Self {
            state: JobState::Success,
            result_locator,
            error_message: None,
        }
    }

    pub fn fail(error_message: impl Into<String>) -> Self {
        Self {
            state: JobState::Fail,
            result_locator: None,
            error_message: Some(error_message.into()),
        }
    }
}

/// Downloaded video, handed straight to the caller.
#[derive(Clone, PartialEq, Eq)]
pub struct RenderedArtifact {
    pub bytes: Vec<u8>,
    pub suggested_filename: String,
}

impl fmt::Debug for RenderedArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderedArtifact")
            .field("bytes", &self.bytes.len())
            .field("suggested_filename", &self.suggested_filename)
            .finish()
    }
}

/// Deterministic artifact name: `ad_<index+1>.mp4`.
pub fn artifact_filename(output_index: u32) -> String {
    format!("ad_{}.mp4", output_index.saturating_add(1))
}
