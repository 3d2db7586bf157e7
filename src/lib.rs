mod collaborators;
mod config;
mod metrics;
mod models;
mod orchestrator;
mod signals;
mod utils;

pub use collaborators::{AudioBuffer, ReasoningAgent, ReasoningInput, SpeechSynthesizer};
pub use config::{DifficultyTier, InterviewConfig};
pub use metrics::{MetricsSnapshot, MetricsStore};
pub use models::{
    AnalysisRecord, Judgment, JudgmentDraft, Message, PlanItem, PlanItemStatus, ReasoningLogEntry,
    RoutingAction, SpeakerRole,
};
pub use orchestrator::{InterviewController, InterviewNode, SessionState, SubscriptionId};
pub use signals::{GazeFrame, GazeSource, LoudnessSource, SignalAggregator, SignalController};
pub use utils::logging::init_logging;
