//! Structured render job logging.
//!
//! Every lifecycle event carries the same `job`, `model` and `operation`
//! fields so a job can be followed across submit, polling and download.

use tracing::{error, info, warn, Span};

use adgen_models::{RenderJob, VideoModel};

/// Job logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job: String,
    model: String,
    operation: String,
}

impl JobLogger {
    /// Logger for a job that has no task id yet; keyed by batch position.
    pub fn for_spec(model: VideoModel, index: u32, operation: &str) -> Self {
        Self {
            job: format!("#{}", index.saturating_add(1)),
            model: model.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Logger for a submitted job.
    pub fn for_job(job: &RenderJob, operation: &str) -> Self {
        Self {
            job: job.task_id.clone(),
            model: job.model.to_string(),
            operation: operation.to_string(),
        }
    }

    /// Logger keyed by a bare task id.
    pub fn for_task(task_id: &str, operation: &str) -> Self {
        Self {
            job: task_id.to_string(),
            model: String::new(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            job = %self.job,
            model = %self.model,
            operation = %self.operation,
            "Job started: {}", message
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            job = %self.job,
            model = %self.model,
            operation = %self.operation,
            "Job progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            job = %self.job,
            model = %self.model,
            operation = %self.operation,
            "Job warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            job = %self.job,
            model = %self.model,
            operation = %self.operation,
            "Job error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            job = %self.job,
            model = %self.model,
            operation = %self.operation,
            "Job completed: {}", message
        );
    }

    pub fn job(&self) -> &str {
        &self.job
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

    /// Span carrying the job fields, for instrumenting a whole operation.
    pub fn create_span(&self) -> Span {
        tracing::info_span!(
            "render_job",
            job = %self.job,
            model = %self.model,
            operation = %self.operation
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use adgen_models::Provider;

    #[test]
    fn test_logger_before_submit_uses_batch_position() {
        let logger = JobLogger::for_spec(VideoModel::Veo3Fast, 0, "start_job");
        assert_eq!(logger.job(), "#1");
        assert_eq!(logger.operation(), "start_job");
    }

    #[test]
    fn test_logger_for_submitted_job() {
        let job = RenderJob {
            task_id: "task-42".into(),
            provider: Provider::Jobs,
            model: VideoModel::Sora2TextToVideo,
            created_prompt: "p".into(),
            index: 1,
        };
        let logger = JobLogger::for_job(&job, "fetch_result");
        assert_eq!(logger.job(), "task-42");
        assert_eq!(logger.operation(), "fetch_result");
    }
}
