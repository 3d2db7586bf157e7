use serde::{Deserialize, Serialize};

/// The live delivery metrics derived from the rolling signal windows.
///
/// A frozen copy enters session history exactly once per turn, at the
/// LISTEN to ANALYZE transition; the live value keeps evolving afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    /// Words per minute, projected from the speech-frame ratio. Heuristic,
    /// not transcription-based.
    pub speech_rate_wpm: f32,
    /// Percentage of non-speech frames in the current window, 0-100.
    pub pause_ratio: f32,
    /// 0-10, derived from loudness variance.
    pub volume_stability: f32,
    /// Percentage of looking-at-camera frames, 0-100.
    pub eye_contact: f32,
    /// Composite score, 0-100, clamped.
    pub confidence: f32,
    /// 0-10. Static; the pipeline never recomputes it.
    pub clarity: f32,
}

impl Default for MetricsSnapshot {
    fn default() -> Self {
        Self {
            speech_rate_wpm: 0.0,
            pause_ratio: 0.0,
            volume_stability: 0.0,
            eye_contact: 0.0,
            confidence: 0.0,
            clarity: 8.0,
        }
    }
}
