use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum PlanItemStatus {
    Pending,
    Active,
    Completed,
    Skipped,
}

impl PlanItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanItemStatus::Pending => "Pending",
            PlanItemStatus::Active => "Active",
            PlanItemStatus::Completed => "Completed",
            PlanItemStatus::Skipped => "Skipped",
        }
    }
}

/// One planned interview topic. A session owns an ordered sequence of these;
/// at most one is Active at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanItem {
    pub id: String,
    pub competency: String,
    pub topic: String,
    pub status: PlanItemStatus,
}

impl PlanItem {
    pub fn new(competency: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            competency: competency.into(),
            topic: topic.into(),
            status: PlanItemStatus::Pending,
        }
    }
}
