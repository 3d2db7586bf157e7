use serde::{Deserialize, Serialize};

use crate::metrics::MetricsSnapshot;

const DEFAULT_SCORE: f32 = 5.0;
const DEFAULT_UTTERANCE: &str = "Thanks for sharing that. Let's move on to the next question.";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum RoutingAction {
    FollowUp,
    NextQuestion,
    WrapUp,
}

impl RoutingAction {
    /// Parse the collaborator's action string. Unrecognized values resolve to
    /// `NextQuestion` so the turn cycle always advances.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "FOLLOW_UP" => RoutingAction::FollowUp,
            "WRAP_UP" => RoutingAction::WrapUp,
            _ => RoutingAction::NextQuestion,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RoutingAction::FollowUp => "FOLLOW_UP",
            RoutingAction::NextQuestion => "NEXT_QUESTION",
            RoutingAction::WrapUp => "WRAP_UP",
        }
    }
}

/// Raw reasoning-collaborator response. Every field is optional because the
/// remote side may return a malformed or partial payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JudgmentDraft {
    pub goal: Option<String>,
    pub content_score: Option<f32>,
    pub delivery_score: Option<f32>,
    pub strengths: Option<Vec<String>>,
    pub weaknesses: Option<Vec<String>>,
    pub action: Option<String>,
    pub next_utterance: Option<String>,
}

/// A complete judgment, produced by merging a draft with defaults field by
/// field. Never persisted directly; the orchestrator derives an
/// `AnalysisRecord` and a `ReasoningLogEntry` from it.
#[derive(Debug, Clone)]
pub struct Judgment {
    pub goal: String,
    pub content_score: f32,
    pub delivery_score: f32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub action: RoutingAction,
    pub next_utterance: String,
}

impl Judgment {
    pub fn from_draft(draft: JudgmentDraft) -> Self {
        Self {
            goal: draft
                .goal
                .unwrap_or_else(|| "Assess the candidate's answer".into()),
            content_score: draft.content_score.unwrap_or(DEFAULT_SCORE).clamp(0.0, 10.0),
            delivery_score: draft
                .delivery_score
                .unwrap_or(DEFAULT_SCORE)
                .clamp(0.0, 10.0),
            strengths: draft.strengths.unwrap_or_default(),
            weaknesses: draft.weaknesses.unwrap_or_default(),
            action: draft
                .action
                .as_deref()
                .map(RoutingAction::parse)
                .unwrap_or(RoutingAction::NextQuestion),
            next_utterance: draft.next_utterance.unwrap_or_else(|| DEFAULT_UTTERANCE.into()),
        }
    }

    /// Judgment used when the reasoning call itself fails.
    pub fn fallback() -> Self {
        Self::from_draft(JudgmentDraft::default())
    }
}

/// Per-turn scoring record appended to session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub question_id: String,
    pub question: String,
    pub answer: String,
    pub metrics: MetricsSnapshot,
    pub content_score: f32,
    pub delivery_score: f32,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// Diagnostic summary of one reasoning step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReasoningLogEntry {
    pub goal: String,
    pub perception: String,
    pub analysis: String,
    pub decision: String,
}

impl ReasoningLogEntry {
    pub fn from_judgment(judgment: &Judgment, metrics: &MetricsSnapshot) -> Self {
        Self {
            goal: judgment.goal.clone(),
            perception: format!(
                "confidence {:.0}, eye contact {:.0}%, pause ratio {:.0}%, {:.0} wpm",
                metrics.confidence,
                metrics.eye_contact,
                metrics.pause_ratio,
                metrics.speech_rate_wpm
            ),
            analysis: format!(
                "content {:.1}/10, delivery {:.1}/10; {} strengths, {} weaknesses",
                judgment.content_score,
                judgment.delivery_score,
                judgment.strengths.len(),
                judgment.weaknesses.len()
            ),
            decision: judgment.action.as_str().to_string(),
        }
    }
}
