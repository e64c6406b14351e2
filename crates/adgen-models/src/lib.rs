//! Shared data models for the AdGen render pipeline.
//!
//! This crate provides Serde-serializable types for:
//! - Video models, provider families and their input constraints
//! - The static capability registry
//! - Media inputs handed to the provider gateway
//! - Render jobs, job status and rendered artifacts

pub mod error;
pub mod job;
pub mod media;
pub mod model;
pub mod registry;
pub mod style;

// Re-export common types
pub use error::{ValidationError, ValidationResult};
pub use job::{artifact_filename, JobState, JobStatus, RenderJob, RenderSpec, RenderedArtifact};
pub use media::{ImageInputs, MediaInput, MediaKind, MediaPayload};
pub use model::{ModelCapability, ModelParseError, Provider, ProviderFamily, VideoModel};
pub use registry::{CapabilityRegistry, DEFAULT_MODEL};
pub use style::{AspectRatio, AspectRatioParseError};
