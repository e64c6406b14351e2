//! Idea-to-prompt expansion.
//!
//! One chat completion turns an ad concept into a rendering prompt. No retry,
//! no state; the caller's cancellation token aborts the in-flight request.

use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use adgen_gateway::{ChatMessage, Gateway};

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::metrics;

/// System instruction used unless the caller supplies an override.
pub const DEFAULT_VIDEO_PROMPT_SYSTEM: &str = "\
You are a video director generating a prompt for a short social media video.

Input:
- One ad idea containing: angle, hook, visualAction, outcome
- A product image will be provided separately
- A target video duration (already decided by the user)

Your task:
Write ONE detailed video generation prompt that expands the idea into a short UGC-style video.

Rules:
- The video must be purely visual (no audio, no voice-over, no on-screen text).
- The product must appear clearly and naturally.
- The video should feel like short-form social content (simple, realistic, engaging).
- Use a simple multi-shot structure (2-4 shots maximum).
- Describe only what is visible and happening.
- Do NOT include camera terminology (no lens types, no camera angles).
- Do NOT include tone labels, emotions as abstract words, or brand language.

Structure the prompt clearly using this order:
1. Brief overall description of the video
2. Shot-by-shot visual breakdown (short sentences)
3. How the product is used or highlighted
4. Final visual outcome

The description must be concrete enough that a video model can generate a complete video from it.

Output ONLY the video generation prompt.
No preamble.
No explanations.
No quotes.
";

/// Concept used when the caller sends a blank one.
pub const FALLBACK_CONCEPT: &str = "Short promotional video for the product.";

#[derive(Debug, Clone)]
pub struct PromptExpander {
    gateway: Gateway,
}

impl PromptExpander {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }

    /// Expand `concept` into a rendering prompt for a clip of `duration_seconds`.
    pub async fn expand(
        &self,
        api_key: &str,
        concept: &str,
        duration_seconds: u32,
        prompt_override: Option<&str>,
        cancel: &CancellationToken,
    ) -> OrchestratorResult<String> {
        let messages = build_messages(concept, duration_seconds, prompt_override);
        let started = Instant::now();

        let text = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!("Prompt expansion cancelled");
                return Err(OrchestratorError::Cancelled);
            }
            result = self.gateway.chat_completion(api_key, &messages) => result?,
        };

        metrics::record_expansion_duration(started.elapsed().as_secs_f64());

        let prompt = text.trim();
        if prompt.is_empty() {
            return Err(OrchestratorError::EmptyExpansion(
                "Try again or use a different prompt.".to_string(),
            ));
        }

        info!(
            duration_seconds,
            prompt_chars = prompt.len(),
            custom_system = prompt_override.is_some_and(|p| !p.trim().is_empty()),
            "Expanded concept into rendering prompt"
        );
        Ok(prompt.to_string())
    }
}

/// System turn (override or default) plus the concept/duration user turn.
pub fn build_messages(concept: &str, duration_seconds: u32, prompt_override: Option<&str>) -> Vec<ChatMessage> {
    let system = prompt_override
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_VIDEO_PROMPT_SYSTEM);

    let idea = match concept.trim() {
        "" => FALLBACK_CONCEPT,
        trimmed => trimmed,
    };

    vec![
        ChatMessage::system(system),
        ChatMessage::user(format!(
            "Ad idea: {idea}\nVideo duration: {duration_seconds} seconds.\nGenerate the video prompt."
        )),
    ]
}
