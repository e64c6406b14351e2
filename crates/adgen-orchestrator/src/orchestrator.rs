//! Render job orchestration.
//!
//! The orchestrator keeps no job table: a [`RenderJob`] (task id + provider)
//! is all that is needed to resume status checks from any process. Every
//! status query is a fresh round trip.

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn, Instrument};

use adgen_gateway::{Gateway, GatewayError};
use adgen_models::{
    artifact_filename, CapabilityRegistry, JobState, JobStatus, MediaKind, Provider, RenderJob,
    RenderSpec, RenderedArtifact,
};

use crate::config::OrchestratorConfig;
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::expander::PromptExpander;
use crate::logging::JobLogger;
use crate::metrics;
use crate::poll::{poll_until, PollPolicy, PollResult};
use crate::task_builder::{
    build_task, effective_duration, frame_prompt, requested_duration, TaskInputs, UploadedMedia,
};

/// Provider-agnostic render job orchestrator.
#[derive(Debug, Clone)]
pub struct JobOrchestrator {
    gateway: Gateway,
    registry: CapabilityRegistry,
    expander: PromptExpander,
    config: OrchestratorConfig,
}

impl JobOrchestrator {
    pub fn new(gateway: Gateway, config: OrchestratorConfig) -> Self {
        Self {
            expander: PromptExpander::new(gateway.clone()),
            registry: CapabilityRegistry::builtin(),
            gateway,
            config,
        }
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn registry(&self) -> &CapabilityRegistry {
        &self.registry
    }

    /// Validate, expand, upload and submit one job.
    ///
    /// Not idempotent: every successful call creates a new remote task.
    /// Persist the returned handle instead of calling again.
    pub async fn start_job(
        &self,
        api_key: &str,
        spec: RenderSpec,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<RenderJob> {
        if api_key.trim().is_empty() {
            return Err(OrchestratorError::InvalidApiKey);
        }

        let (capability, fell_back) = self.registry.resolve(&spec.model);
        let model = capability.model;
        let logger = JobLogger::for_spec(model, spec.index, "start_job");
        if fell_back {
            metrics::record_model_fallback(&spec.model);
            logger.log_warning(&format!("Unknown model '{}', using {}", spec.model, model));
        }

        let images = spec.images.into_ordered();
        let has_video = spec.reference_video.is_some();
        if let Err(e) = capability.check(images.len() as u32, has_video) {
            metrics::record_job_rejected(model.as_str(), "validation");
            logger.log_warning(&e.to_string());
            return Err(e.into());
        }

        // Prompt and task must agree on the clip length.
        let requested = requested_duration(spec.duration_seconds);
        let duration = effective_duration(model, requested);
        logger.log_start(&format!("expanding concept for a {duration}s clip"));
        let prompt = self
            .expander
            .expand(
                api_key,
                &spec.concept,
                duration,
                spec.prompt_override.as_deref(),
                cancel,
            )
            .await?;

        let mut media = UploadedMedia::default();
        if capability.takes_images() {
            for (i, image) in images.iter().enumerate() {
                let url = self.gateway.upload_media(api_key, image, MediaKind::Image).await?;
                logger.log_progress(&format!("uploaded image {}/{}", i + 1, images.len()));
                media.image_urls.push(url);
            }
        }
        if capability.takes_video() {
            if let Some(video) = &spec.reference_video {
                let url = self.gateway.upload_media(api_key, video, MediaKind::Video).await?;
                logger.log_progress("uploaded reference video");
                media.video_url = Some(url);
            }
        }

        let created_prompt = if capability.takes_images() && !capability.takes_video() {
            frame_prompt(&prompt, media.image_urls.len())
        } else {
            prompt
        };

        let task = build_task(
            model,
            &TaskInputs {
                prompt: &created_prompt,
                media: &media,
                duration_seconds: requested,
                aspect_ratio: spec.aspect_ratio,
                callback_url: self.config.callback_url.as_deref(),
            },
        );

        let family = capability.provider_family;
        let task_id = self.gateway.family(family).submit(api_key, &task).await?;

        let job = RenderJob {
            task_id,
            provider: family.provider(),
            model,
            created_prompt,
            index: spec.index,
        };
        metrics::record_job_started(model.as_str(), job.provider.as_str());
        JobLogger::for_job(&job, "start_job").log_completion("task submitted");
        Ok(job)
    }

    /// One status check. Never sleeps or loops; a direct-poll success without
    /// a URL costs one extra high-resolution lookup.
    pub async fn query_job_status(
        &self,
        api_key: &str,
        task_id: &str,
        provider: Provider,
    ) -> OrchestratorResult<JobStatus> {
        let raw = self
            .gateway
            .family(provider.family())
            .query_status(api_key, task_id)
            .await?;
        metrics::record_status_query(provider.as_str(), raw.state.as_str());

        let status = match raw.state {
            JobState::Pending => JobStatus::pending(),
            JobState::Success => JobStatus::success(raw.first_url().map(str::to_string)),
            JobState::Fail => JobStatus::fail(
                raw.fail_message
                    .unwrap_or_else(|| "Video generation failed.".to_string()),
            ),
        };
        Ok(status)
    }

    /// Download the finished video as `ad_<output_index+1>.mp4`.
    pub async fn fetch_result(
        &self,
        api_key: &str,
        task_id: &str,
        provider: Provider,
        output_index: u32,
    ) -> OrchestratorResult<RenderedArtifact> {
        let cancel = CancellationToken::new();
        self.fetch_result_cancellable(api_key, task_id, provider, output_index, &cancel)
            .await
    }

    /// [`Self::fetch_result`] whose high-resolution wait stops on `cancel`.
    pub async fn fetch_result_cancellable(
        &self,
        api_key: &str,
        task_id: &str,
        provider: Provider,
        output_index: u32,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<RenderedArtifact> {
        let logger = JobLogger::for_task(task_id, "fetch_result");
        let status = self.query_job_status(api_key, task_id, provider).await?;

        let locator = match status.state {
            JobState::Pending => return Err(OrchestratorError::JobNotReady),
            JobState::Fail => {
                let message = status
                    .error_message
                    .unwrap_or_else(|| "Video generation failed.".to_string());
                logger.log_error(&message);
                return Err(OrchestratorError::JobFailed(message));
            }
            JobState::Success => match status.result_locator {
                Some(url) => url,
                None if provider == Provider::Veo => {
                    self.await_high_res(api_key, task_id, cancel).await?
                }
                None => return Err(OrchestratorError::no_result_url("No result URL in task result.")),
            },
        };

        let direct = self.gateway.resolve_download_url(api_key, &locator).await?;
        let bytes = self.gateway.fetch_bytes(&direct).await?;
        metrics::record_artifact_fetched(provider.as_str(), bytes.len());
        logger.log_completion(&format!("downloaded {} bytes", bytes.len()));

        Ok(RenderedArtifact {
            bytes,
            suggested_filename: artifact_filename(output_index),
        })
    }

    /// Start a job, poll until it settles, then fetch the artifact.
    pub async fn run_to_completion(
        &self,
        api_key: &str,
        spec: RenderSpec,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<RenderedArtifact> {
        let policy = PollPolicy::new("render_status")
            .with_max_attempts(self.config.poll_max_attempts)
            .with_interval(self.config.poll_interval);
        self.run_to_completion_with(api_key, spec, &policy, cancel).await
    }

    /// [`Self::run_to_completion`] with an explicit poll cadence.
    pub async fn run_to_completion_with(
        &self,
        api_key: &str,
        spec: RenderSpec,
        policy: &PollPolicy,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<RenderedArtifact> {
        let job = self.start_job(api_key, spec, cancel).await?;
        let logger = JobLogger::for_job(&job, "run_to_completion");

        let outcome = poll_until(policy, cancel, |attempt| {
            let job = &job;
            let logger = &logger;
            async move {
                let status = self.query_job_status(api_key, &job.task_id, job.provider).await?;
                match status.state {
                    JobState::Success => Ok(Some(())),
                    JobState::Fail => Err(OrchestratorError::job_failed(
                        status
                            .error_message
                            .unwrap_or_else(|| "Video generation failed.".to_string()),
                    )),
                    JobState::Pending => {
                        logger.log_progress(&format!("pending (check {attempt})"));
                        Ok(None)
                    }
                }
            }
        })
        .instrument(logger.create_span())
        .await;

        match outcome {
            PollResult::Ready(()) => {}
            PollResult::Failed(e) => {
                logger.log_error(&e.to_string());
                return Err(e);
            }
            PollResult::Exhausted { attempts } => {
                logger.log_error("timed out");
                return Err(OrchestratorError::Timeout { attempts });
            }
            PollResult::Cancelled => return Err(OrchestratorError::Cancelled),
        }

        self.fetch_result_cancellable(api_key, &job.task_id, job.provider, job.index, cancel)
            .await
    }

    /// Render several specs with bounded concurrency; results keep input order.
    pub async fn render_batch(
        &self,
        api_key: &str,
        specs: Vec<RenderSpec>,
        concurrency: usize,
        cancel: &CancellationToken,
    ) -> Vec<OrchestratorResult<RenderedArtifact>> {
        let concurrency = concurrency.max(1);
        info!(jobs = specs.len(), concurrency, "Starting render batch");

        stream::iter(specs)
            .map(|spec| self.run_to_completion(api_key, spec, cancel))
            .buffered(concurrency)
            .collect()
            .await
    }

    /// Check the credential against the credit endpoint; returns remaining credits.
    pub async fn verify_api_key(&self, api_key: &str) -> OrchestratorResult<f64> {
        Ok(self.gateway.check_credit(api_key).await?)
    }

    /// Bounded wait for the direct-poll high-resolution result.
    async fn await_high_res(
        &self,
        api_key: &str,
        task_id: &str,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<String> {
        let policy = PollPolicy::new("high_res_result")
            .with_max_attempts(self.config.high_res_attempts)
            .with_interval(self.config.high_res_interval);
        let direct_poll = self.gateway.direct_poll();

        let outcome = poll_until(&policy, cancel, |attempt| async move {
            match direct_poll.high_res_result(api_key, task_id).await {
                Ok(found) => {
                    metrics::record_high_res_attempt(found.is_some());
                    Ok(found)
                }
                Err(GatewayError::InvalidApiKey) => Err(OrchestratorError::InvalidApiKey),
                Err(e) => {
                    metrics::record_high_res_attempt(false);
                    warn!(task_id, attempt, error = %e, "High-resolution lookup failed");
                    Ok(None)
                }
            }
        })
        .await;

        match outcome {
            PollResult::Ready(url) => Ok(url),
            PollResult::Failed(e) => Err(e),
            PollResult::Exhausted { attempts } => Err(OrchestratorError::no_result_url(format!(
                "High-resolution video not available after {attempts} attempts."
            ))),
            PollResult::Cancelled => Err(OrchestratorError::Cancelled),
        }
    }
}
