//! Output framing.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Output aspect ratio supported by the render providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum AspectRatio {
    /// Standard portrait (9:16) for TikTok/Reels
    #[default]
    Portrait,
    /// Landscape (16:9)
    Landscape,
}

impl AspectRatio {
    /// `W:H` form used by the direct-poll provider.
    pub fn as_ratio(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "9:16",
            AspectRatio::Landscape => "16:9",
        }
    }

    /// Orientation word used by task-poll models.
    pub fn as_orientation(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "portrait",
            AspectRatio::Landscape => "landscape",
        }
    }
}

impl fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ratio())
    }
}

impl FromStr for AspectRatio {
    type Err = AspectRatioParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "9:16" | "portrait" => Ok(AspectRatio::Portrait),
            "16:9" | "landscape" => Ok(AspectRatio::Landscape),
            _ => Err(AspectRatioParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("Unsupported aspect ratio: {0}, expected '9:16' or '16:9'")]
pub struct AspectRatioParseError(String);
