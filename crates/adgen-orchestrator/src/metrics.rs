//! Render pipeline metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder the
//! calls are no-ops.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_STARTED_TOTAL: &str = "adgen_jobs_started_total";
    pub const JOBS_REJECTED_TOTAL: &str = "adgen_jobs_rejected_total";
    pub const STATUS_QUERIES_TOTAL: &str = "adgen_status_queries_total";
    pub const ARTIFACTS_FETCHED_TOTAL: &str = "adgen_artifacts_fetched_total";
    pub const ARTIFACT_BYTES: &str = "adgen_artifact_bytes";
    pub const HIGH_RES_ATTEMPTS_TOTAL: &str = "adgen_high_res_attempts_total";
    pub const EXPANSION_DURATION_SECONDS: &str = "adgen_expansion_duration_seconds";
    pub const MODEL_FALLBACKS_TOTAL: &str = "adgen_model_fallbacks_total";
}

/// Record a submitted job.
pub fn record_job_started(model: &str, provider: &str) {
    let labels = [("model", model.to_string()), ("provider", provider.to_string())];
    counter!(names::JOBS_STARTED_TOTAL, &labels).increment(1);
}

/// Record a job rejected before submission.
pub fn record_job_rejected(model: &str, reason: &str) {
    let labels = [("model", model.to_string()), ("reason", reason.to_string())];
    counter!(names::JOBS_REJECTED_TOTAL, &labels).increment(1);
}

/// Record one status query and the state it returned.
pub fn record_status_query(provider: &str, state: &str) {
    let labels = [("provider", provider.to_string()), ("state", state.to_string())];
    counter!(names::STATUS_QUERIES_TOTAL, &labels).increment(1);
}

/// Record a downloaded artifact.
pub fn record_artifact_fetched(provider: &str, size_bytes: usize) {
    let labels = [("provider", provider.to_string())];
    counter!(names::ARTIFACTS_FETCHED_TOTAL, &labels).increment(1);
    histogram!(names::ARTIFACT_BYTES, &labels).record(size_bytes as f64);
}

/// Record one high-resolution lookup.
pub fn record_high_res_attempt(found: bool) {
    let labels = [("found", found.to_string())];
    counter!(names::HIGH_RES_ATTEMPTS_TOTAL, &labels).increment(1);
}

/// Record prompt expansion latency.
pub fn record_expansion_duration(duration_secs: f64) {
    histogram!(names::EXPANSION_DURATION_SECONDS).record(duration_secs);
}

/// Record an unknown model id replaced by the default.
pub fn record_model_fallback(requested: &str) {
    let labels = [("requested", requested.to_string())];
    counter!(names::MODEL_FALLBACKS_TOTAL, &labels).increment(1);
}
