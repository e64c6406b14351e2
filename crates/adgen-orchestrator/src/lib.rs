//! Render job orchestration for AI ad videos.
//!
//! This crate provides:
//! - `JobOrchestrator`: start, status, result fetch, run-to-completion and batch rendering
//! - Prompt expansion of ad concepts into rendering prompts
//! - Model-specific task construction and duration bucketing
//! - Fixed-interval polling, structured job logging and metrics
//! - Environment configuration for the library and the `adgen-render` binary

pub mod cli;
pub mod config;
pub mod error;
pub mod expander;
pub mod logging;
pub mod metrics;
pub mod orchestrator;
pub mod poll;
pub mod task_builder;

pub use cli::RenderCliConfig;
pub use config::OrchestratorConfig;
pub use error::{OrchestratorError, OrchestratorResult};
pub use expander::{PromptExpander, DEFAULT_VIDEO_PROMPT_SYSTEM};
pub use logging::JobLogger;
pub use orchestrator::JobOrchestrator;
pub use poll::{poll_until, PollPolicy, PollResult};

pub use tokio_util::sync::CancellationToken;
