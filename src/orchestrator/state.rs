use serde::{Deserialize, Serialize};

use crate::config::InterviewConfig;
use crate::metrics::MetricsSnapshot;
use crate::models::{AnalysisRecord, Message, PlanItem, PlanItemStatus, ReasoningLogEntry};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum InterviewNode {
    Init,
    Ask,
    Listen,
    Analyze,
    Decide,
    WrapUp,
    Ended,
}

impl Default for InterviewNode {
    fn default() -> Self {
        InterviewNode::Init
    }
}

/// The aggregate session root. Owned exclusively by the orchestrator; every
/// mutation goes through its mutate-and-broadcast operation, and consumers
/// only ever receive clones.
///
/// Invariants: `current_index` is a valid index into `plan` whenever the plan
/// is non-empty, except in the terminal WrapUp/Ended condition; `transcript`
/// and `metrics_history` only ever grow.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub config: InterviewConfig,
    pub node: InterviewNode,
    pub plan: Vec<PlanItem>,
    pub current_index: usize,
    pub transcript: Vec<Message>,
    pub metrics_history: Vec<MetricsSnapshot>,
    pub reasoning_log: Vec<ReasoningLogEntry>,
    pub analyses: Vec<AnalysisRecord>,
    pub current_question: String,
    pub current_answer: String,
}

impl SessionState {
    pub fn new(config: InterviewConfig) -> Self {
        Self {
            config,
            node: InterviewNode::Init,
            plan: Vec::new(),
            current_index: 0,
            transcript: Vec::new(),
            metrics_history: Vec::new(),
            reasoning_log: Vec::new(),
            analyses: Vec::new(),
            current_question: String::new(),
            current_answer: String::new(),
        }
    }

    pub fn current_item(&self) -> Option<&PlanItem> {
        self.plan.get(self.current_index)
    }

    pub fn is_last_item(&self) -> bool {
        !self.plan.is_empty() && self.current_index == self.plan.len() - 1
    }

    pub fn last_analysis(&self) -> Option<&AnalysisRecord> {
        self.analyses.last()
    }

    /// Mark the current plan item Completed.
    pub fn complete_current(&mut self) {
        if let Some(item) = self.plan.get_mut(self.current_index) {
            item.status = PlanItemStatus::Completed;
        }
    }

    /// Complete the current item and activate the next one. Callers check
    /// `is_last_item` first; advancing past the end is a no-op.
    pub fn advance(&mut self) {
        if self.is_last_item() {
            return;
        }
        self.complete_current();
        self.current_index += 1;
        if let Some(item) = self.plan.get_mut(self.current_index) {
            item.status = PlanItemStatus::Active;
        }
    }
}
