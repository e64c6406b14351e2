//! Video model identifiers and provider families.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::error::{ValidationError, ValidationResult};

/// How a provider reports asynchronous task progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProviderFamily {
    /// Numeric success flag, with a secondary high-resolution result endpoint.
    DirectPoll,
    /// Generic create-task / poll-by-id API with string states.
    TaskPoll,
}

impl ProviderFamily {
    /// The provider handle recorded on a [`crate::RenderJob`].
    pub fn provider(&self) -> Provider {
        match self {
            ProviderFamily::DirectPoll => Provider::Veo,
            ProviderFamily::TaskPoll => Provider::Jobs,
        }
    }
}

/// Provider tag carried by the caller between status checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    Veo,
    Jobs,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Veo => "veo",
            Provider::Jobs => "jobs",
        }
    }

    pub fn family(&self) -> ProviderFamily {
        match self {
            Provider::Veo => ProviderFamily::DirectPoll,
            Provider::Jobs => ProviderFamily::TaskPoll,
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Provider {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "veo" => Ok(Provider::Veo),
            "jobs" => Ok(Provider::Jobs),
            _ => Err(ModelParseError(s.to_string())),
        }
    }
}

/// Video models known to the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum VideoModel {
    /// Frame model, fast tier (default).
    #[serde(rename = "veo3_fast")]
    Veo3Fast,
    /// Frame model, quality tier.
    #[serde(rename = "veo3")]
    Veo3,
    #[serde(rename = "sora-2-image-to-video")]
    Sora2ImageToVideo,
    #[serde(rename = "sora-2-text-to-video")]
    Sora2TextToVideo,
    #[serde(rename = "kling-2.6/image-to-video")]
    KlingImageToVideo,
    #[serde(rename = "kling-2.6/motion-control")]
    KlingMotionControl,
}

impl VideoModel {
    pub const ALL: &'static [VideoModel] = &[
        VideoModel::Veo3Fast,
        VideoModel::Veo3,
        VideoModel::Sora2ImageToVideo,
        VideoModel::Sora2TextToVideo,
        VideoModel::KlingImageToVideo,
        VideoModel::KlingMotionControl,
    ];

    /// Identifier sent to the provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoModel::Veo3Fast => "veo3_fast",
            VideoModel::Veo3 => "veo3",
            VideoModel::Sora2ImageToVideo => "sora-2-image-to-video",
            VideoModel::Sora2TextToVideo => "sora-2-text-to-video",
            VideoModel::KlingImageToVideo => "kling-2.6/image-to-video",
            VideoModel::KlingMotionControl => "kling-2.6/motion-control",
        }
    }

    pub fn family(&self) -> ProviderFamily {
        match self {
            VideoModel::Veo3Fast | VideoModel::Veo3 => ProviderFamily::DirectPoll,
            _ => ProviderFamily::TaskPoll,
        }
    }
}

impl fmt::Display for VideoModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for VideoModel {
    type Err = ModelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VideoModel::ALL
            .iter()
            .copied()
            .find(|model| model.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModelParseError(s.to_string()))
    }
}

#[derive(Debug, Error)]
#[error("Unknown identifier: {0}")]
pub struct ModelParseError(String);

/// Input cardinality constraints of one model.
///
/// A `*_max` of 0 disables the upper bound check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ModelCapability {
    pub model: VideoModel,
    pub provider_family: ProviderFamily,
    pub image_min: u32,
    pub image_max: u32,
    pub video_min: u32,
    pub video_max: u32,
}

impl ModelCapability {
    pub const fn new(
        model: VideoModel,
        provider_family: ProviderFamily,
        images: (u32, u32),
        videos: (u32, u32),
    ) -> Self {
        Self {
            model,
            provider_family,
            image_min: images.0,
            image_max: images.1,
            video_min: videos.0,
            video_max: videos.1,
        }
    }

    /// Check an input set against these bounds.
    pub fn check(&self, image_count: u32, has_video: bool) -> ValidationResult<()> {
        if image_count < self.image_min {
            return Err(ValidationError::TooFewImages {
                min: self.image_min,
                got: image_count,
            });
        }
        if self.image_max > 0 && image_count > self.image_max {
            return Err(ValidationError::TooManyImages {
                max: self.image_max,
                got: image_count,
            });
        }
        if self.video_min > 0 && !has_video {
            return Err(ValidationError::MissingReferenceVideo);
        }
        Ok(())
    }

    /// Whether the model consumes uploaded images at all.
    pub fn takes_images(&self) -> bool {
        self.image_max > 0
    }

    /// Whether the model consumes an uploaded reference video.
    pub fn takes_video(&self) -> bool {
        self.video_max > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_parse() {
        assert_eq!("veo3_fast".parse::<VideoModel>().unwrap(), VideoModel::Veo3Fast);
        assert_eq!(
            "Kling-2.6/Motion-Control".parse::<VideoModel>().unwrap(),
            VideoModel::KlingMotionControl
        );
        assert!("bogus-model".parse::<VideoModel>().is_err());
    }

    #[test]
    fn test_model_serde_uses_provider_ids() {
        let json = serde_json::to_string(&VideoModel::Sora2ImageToVideo).unwrap();
        assert_eq!(json, "\"sora-2-image-to-video\"");
    }

    #[test]
    fn test_provider_family_round_trip() {
        for family in [ProviderFamily::DirectPoll, ProviderFamily::TaskPoll] {
            assert_eq!(family.provider().family(), family);
        }
        assert_eq!("jobs".parse::<Provider>().unwrap(), Provider::Jobs);
        assert!("vimeo".parse::<Provider>().is_err());
    }

    #[test]
    fn test_check_zero_max_is_unbounded() {
        let cap = ModelCapability::new(VideoModel::Sora2TextToVideo, ProviderFamily::TaskPoll, (0, 0), (0, 0));
        assert!(cap.check(0, false).is_ok());
        assert!(cap.check(3, true).is_ok());
        assert!(!cap.takes_images());
    }
}
