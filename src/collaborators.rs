//! External collaborator contracts. The engine consumes these; it never
//! implements the reasoning model, speech synthesis, or audio playback.

use anyhow::Result;
use async_trait::async_trait;

use crate::config::InterviewConfig;
use crate::metrics::MetricsSnapshot;
use crate::models::{JudgmentDraft, Message, PlanItem};

/// Synthesized speech ready for playback by the host layer.
#[derive(Debug, Clone)]
pub struct AudioBuffer {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

/// Everything the reasoning collaborator sees for one turn. The metrics here
/// are the turn's frozen snapshot, captured before this call is issued.
pub struct ReasoningInput<'a> {
    pub config: &'a InterviewConfig,
    pub transcript_tail: &'a [Message],
    pub question: &'a str,
    pub answer: &'a str,
    pub metrics: &'a MetricsSnapshot,
    pub competency: &'a str,
}

/// Remote judgment function. Both operations may fail; the orchestrator
/// substitutes documented defaults so the turn cycle always completes.
#[async_trait]
pub trait ReasoningAgent: Send + Sync {
    /// Produce the interview plan for a session. On failure the orchestrator
    /// falls back to a built-in minimal plan.
    async fn generate_plan(&self, config: &InterviewConfig) -> Result<Vec<PlanItem>>;

    /// Score one answer and choose the next routing action. The draft may be
    /// partial; the orchestrator merges it with defaults field by field.
    async fn reason(&self, input: ReasoningInput<'_>) -> Result<JudgmentDraft>;
}

/// Text-to-speech collaborator.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// `Ok(None)` means synthesis is unavailable; the turn proceeds to
    /// listening without playback.
    async fn synthesize(&self, text: &str) -> Result<Option<AudioBuffer>>;

    /// Resolves when playback of the buffer has finished.
    async fn play(&self, buffer: AudioBuffer) -> Result<()>;
}
