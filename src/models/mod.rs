pub mod judgment;
pub mod message;
pub mod plan;

pub use judgment::{AnalysisRecord, Judgment, JudgmentDraft, ReasoningLogEntry, RoutingAction};
pub use message::{Message, SpeakerRole};
pub use plan::{PlanItem, PlanItemStatus};
