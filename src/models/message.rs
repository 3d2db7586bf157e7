use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SpeakerRole {
    Agent,
    Candidate,
}

/// One transcript utterance. The transcript is append-only; entries are never
/// mutated in place.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub role: SpeakerRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Message {
    pub fn agent(text: impl Into<String>) -> Self {
        Self {
            role: SpeakerRole::Agent,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn candidate(text: impl Into<String>) -> Self {
        Self {
            role: SpeakerRole::Candidate,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}
