//! Sensor input seams. Hardware acquisition lives outside the engine; these
//! traits consume already-captured frames.

/// One facial-landmark detection result.
#[derive(Debug, Clone, Copy)]
pub struct GazeFrame {
    /// Horizontal normalized coordinate of the reference landmark.
    /// `None` when no face was detected in the frame.
    pub reference_x: Option<f32>,
}

impl GazeFrame {
    pub fn face_at(reference_x: f32) -> Self {
        Self {
            reference_x: Some(reference_x),
        }
    }

    pub fn no_face() -> Self {
        Self { reference_x: None }
    }
}

/// Periodic frequency-domain energy samples from an audio source.
pub trait LoudnessSource: Send {
    /// Energy bins for the current tick. `None` when the audio sensor is
    /// unavailable (no permission, no device); the audio sub-pipeline then
    /// no-ops for the tick.
    fn sample(&mut self) -> Option<Vec<f32>>;
}

/// Periodic per-frame facial-landmark detection results.
pub trait GazeSource: Send {
    /// `None` when the video sensor is unavailable; the video sub-pipeline
    /// then no-ops for the tick.
    fn sample(&mut self) -> Option<GazeFrame>;
}
