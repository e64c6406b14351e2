//! Static model capability registry.
//!
//! Maps a model identifier to its input cardinality constraints and provider
//! family. Unknown identifiers resolve to [`DEFAULT_MODEL`] so stale client
//! configuration keeps working.

use crate::error::ValidationResult;
use crate::model::{ModelCapability, ProviderFamily, VideoModel};

/// Model used when the requested identifier is not recognised.
pub const DEFAULT_MODEL: VideoModel = VideoModel::Veo3Fast;

static CAPABILITIES: &[ModelCapability] = &[
    ModelCapability::new(VideoModel::Veo3Fast, ProviderFamily::DirectPoll, (1, 2), (0, 0)),
    ModelCapability::new(VideoModel::Veo3, ProviderFamily::DirectPoll, (1, 2), (0, 0)),
    ModelCapability::new(VideoModel::Sora2ImageToVideo, ProviderFamily::TaskPoll, (1, 1), (0, 0)),
    ModelCapability::new(VideoModel::Sora2TextToVideo, ProviderFamily::TaskPoll, (0, 0), (0, 0)),
    ModelCapability::new(VideoModel::KlingImageToVideo, ProviderFamily::TaskPoll, (1, 1), (0, 0)),
    ModelCapability::new(VideoModel::KlingMotionControl, ProviderFamily::TaskPoll, (1, 1), (1, 1)),
];

/// Read-only view over the built-in capability table.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityRegistry {
    entries: &'static [ModelCapability],
    default_model: VideoModel,
}

impl Default for CapabilityRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CapabilityRegistry {
    pub fn builtin() -> Self {
        Self {
            entries: CAPABILITIES,
            default_model: DEFAULT_MODEL,
        }
    }

    /// Exact lookup without fallback.
    pub fn get(&self, model: VideoModel) -> Option<&'static ModelCapability> {
        self.entries.iter().find(|entry| entry.model == model)
    }

    pub fn list(&self) -> impl Iterator<Item = &'static ModelCapability> {
        self.entries.iter()
    }

    /// Capability for `model_id`, or the default model's when unrecognised.
    pub fn lookup(&self, model_id: &str) -> &'static ModelCapability {
        self.resolve(model_id).0
    }

    /// Like [`Self::lookup`], also reporting whether the default was substituted.
    pub fn resolve(&self, model_id: &str) -> (&'static ModelCapability, bool) {
        match model_id.parse::<VideoModel>().ok().and_then(|m| self.get(m)) {
            Some(cap) => (cap, false),
            None => (self.default_capability(), true),
        }
    }

    /// Validate an input set for `model_id` (after default fallback).
    pub fn validate(&self, model_id: &str, image_count: u32, has_video: bool) -> ValidationResult<()> {
        self.lookup(model_id).check(image_count, has_video)
    }

    fn default_capability(&self) -> &'static ModelCapability {
        // The default model is always part of the built-in table.
        self.get(self.default_model).unwrap_or(&CAPABILITIES[0])
    }
}
