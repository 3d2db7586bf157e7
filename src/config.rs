use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum DifficultyTier {
    Entry,
    Mid,
    Senior,
}

impl Default for DifficultyTier {
    fn default() -> Self {
        DifficultyTier::Mid
    }
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTier::Entry => "Entry",
            DifficultyTier::Mid => "Mid",
            DifficultyTier::Senior => "Senior",
        }
    }
}

/// Immutable per-session interview parameters. Set once at session creation
/// and read-only afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewConfig {
    pub role: String,
    pub industry: String,
    pub difficulty: DifficultyTier,
    pub duration_minutes: u32,
    pub job_description: Option<String>,
    pub resume: Option<String>,
}

impl Default for InterviewConfig {
    fn default() -> Self {
        Self {
            role: "Software Engineer".into(),
            industry: "Technology".into(),
            difficulty: DifficultyTier::default(),
            duration_minutes: 30,
            job_description: None,
            resume: None,
        }
    }
}
