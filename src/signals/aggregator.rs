use std::collections::VecDeque;

use crate::metrics::MetricsSnapshot;

use super::sources::GazeFrame;

/// Max loudness readings kept for the stability estimate.
pub(crate) const LOUDNESS_WINDOW: usize = 50;
/// Max gaze classifications kept for the eye-contact estimate.
pub(crate) const GAZE_WINDOW: usize = 30;
/// Time span of the speech/silence window.
pub(crate) const SPEECH_WINDOW_MS: i64 = 5000;

/// Readings at or below this are near-silence and excluded from the
/// stability window so they don't bias the variance toward silence.
const LOUDNESS_FLOOR: f32 = 5.0;
/// Loudness above this classifies the tick as speech.
const SPEECH_THRESHOLD: f32 = 15.0;
/// Assumed speaking pace during active speech. Coarse by design; the speech
/// rate is a projection from frame ratios, not a transcription-based count.
const WORDS_PER_ACTIVE_SECOND: f32 = 2.5;
/// Confidence lost per tick while the candidate is off-camera.
const NO_FACE_CONFIDENCE_PENALTY: f32 = 5.0;
/// Centered horizontal band in which the reference landmark counts as
/// looking at the camera.
const GAZE_BAND_LOW: f32 = 0.4;
const GAZE_BAND_HIGH: f32 = 0.6;

/// Converts loudness samples and gaze classifications into the five live
/// metrics over bounded rolling windows. Mutated only by the sampling loop;
/// never shared across tasks.
pub struct SignalAggregator {
    loudness_window: VecDeque<f32>,
    speech_frames: VecDeque<(i64, bool)>,
    gaze_window: VecDeque<bool>,
    metrics: MetricsSnapshot,
}

impl SignalAggregator {
    pub fn new() -> Self {
        Self {
            loudness_window: VecDeque::with_capacity(LOUDNESS_WINDOW),
            speech_frames: VecDeque::new(),
            gaze_window: VecDeque::with_capacity(GAZE_WINDOW),
            metrics: MetricsSnapshot::default(),
        }
    }

    /// Feed one audio tick. `now_ms` is milliseconds since the loop started
    /// and must be monotonically non-decreasing across calls.
    pub fn push_audio(&mut self, now_ms: i64, energy_bins: &[f32]) {
        let loudness = rms(energy_bins);

        if loudness > LOUDNESS_FLOOR {
            self.loudness_window.push_back(loudness);
            if self.loudness_window.len() > LOUDNESS_WINDOW {
                self.loudness_window.pop_front();
            }
        }

        self.speech_frames
            .push_back((now_ms, loudness > SPEECH_THRESHOLD));
        while let Some(&(ts, _)) = self.speech_frames.front() {
            if now_ms - ts > SPEECH_WINDOW_MS {
                self.speech_frames.pop_front();
            } else {
                break;
            }
        }

        self.recompute_audio_metrics();
    }

    /// Feed one video tick.
    pub fn push_gaze(&mut self, frame: &GazeFrame) {
        match frame.reference_x {
            Some(x) => {
                let looking = (GAZE_BAND_LOW..=GAZE_BAND_HIGH).contains(&x);
                self.gaze_window.push_back(looking);
                if self.gaze_window.len() > GAZE_WINDOW {
                    self.gaze_window.pop_front();
                }

                let looking_count = self.gaze_window.iter().filter(|&&l| l).count();
                self.metrics.eye_contact =
                    100.0 * looking_count as f32 / self.gaze_window.len() as f32;
                self.metrics.confidence = (0.6 * self.metrics.eye_contact
                    + 0.4 * self.metrics.volume_stability * 10.0)
                    .round()
                    .clamp(0.0, 100.0);
            }
            None => {
                // Off-camera: the tick still counts against the window, eye
                // contact reads zero, and trust decays instead of recomputing
                // the composite.
                self.gaze_window.push_back(false);
                if self.gaze_window.len() > GAZE_WINDOW {
                    self.gaze_window.pop_front();
                }
                self.metrics.eye_contact = 0.0;
                self.metrics.confidence =
                    (self.metrics.confidence - NO_FACE_CONFIDENCE_PENALTY).max(0.0);
            }
        }
    }

    /// Current metrics, cloned.
    pub fn snapshot(&self) -> MetricsSnapshot {
        self.metrics.clone()
    }

    fn recompute_audio_metrics(&mut self) {
        if !self.loudness_window.is_empty() {
            let sd = variance(&self.loudness_window).sqrt();
            self.metrics.volume_stability = (10.0 - sd / 5.0).clamp(0.0, 10.0);
        }

        let total = self.speech_frames.len();
        if total > 0 {
            let speech = self.speech_frames.iter().filter(|&&(_, s)| s).count();
            let speech_ratio = speech as f32 / total as f32;
            self.metrics.pause_ratio = (1.0 - speech_ratio) * 100.0;

            let window_secs = SPEECH_WINDOW_MS as f32 / 1000.0;
            let active_secs = speech_ratio * window_secs;
            self.metrics.speech_rate_wpm =
                active_secs * WORDS_PER_ACTIVE_SECOND * (60.0 / window_secs);
        }
    }
}

impl Default for SignalAggregator {
    fn default() -> Self {
        Self::new()
    }
}

fn rms(bins: &[f32]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let energy: f32 = bins.iter().map(|b| b * b).sum::<f32>() / bins.len() as f32;
    energy.sqrt()
}

fn variance(values: &VecDeque<f32>) -> f32 {
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    values.iter().map(|v| (v - mean).powi(2)).sum::<f32>() / values.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bins(level: f32) -> Vec<f32> {
        vec![level; 8]
    }

    #[test]
    fn loudness_window_stays_bounded() {
        let mut agg = SignalAggregator::new();
        for i in 0..200 {
            agg.push_audio(i * 33, &bins(30.0 + (i % 7) as f32));
        }
        assert!(agg.loudness_window.len() <= LOUDNESS_WINDOW);
    }

    #[test]
    fn speech_window_evicts_by_age() {
        let mut agg = SignalAggregator::new();
        agg.push_audio(0, &bins(30.0));
        agg.push_audio(100, &bins(30.0));
        agg.push_audio(6000, &bins(30.0));
        let span = agg.speech_frames.back().unwrap().0 - agg.speech_frames.front().unwrap().0;
        assert!(span <= SPEECH_WINDOW_MS);
        assert_eq!(agg.speech_frames.len(), 1);
    }

    #[test]
    fn gaze_window_stays_bounded() {
        let mut agg = SignalAggregator::new();
        for _ in 0..100 {
            agg.push_gaze(&GazeFrame::face_at(0.5));
        }
        assert!(agg.gaze_window.len() <= GAZE_WINDOW);
    }

    #[test]
    fn pause_and_speech_ratios_complement() {
        let mut agg = SignalAggregator::new();
        // Alternate speech and silence frames.
        for i in 0..20 {
            let level = if i % 2 == 0 { 40.0 } else { 1.0 };
            agg.push_audio(i * 100, &bins(level));
        }
        let speech = agg.speech_frames.iter().filter(|&&(_, s)| s).count() as f32;
        let speech_pct = 100.0 * speech / agg.speech_frames.len() as f32;
        let snapshot = agg.snapshot();
        assert!((snapshot.pause_ratio + speech_pct - 100.0).abs() < 1e-3);
    }

    #[test]
    fn near_silence_is_excluded_from_stability_window() {
        let mut agg = SignalAggregator::new();
        agg.push_audio(0, &bins(1.0));
        agg.push_audio(33, &bins(2.0));
        assert!(agg.loudness_window.is_empty());
        // Stability keeps its default rather than reflecting silence.
        assert_eq!(agg.snapshot().volume_stability, 0.0);
    }

    #[test]
    fn steady_loudness_scores_maximum_stability() {
        let mut agg = SignalAggregator::new();
        for i in 0..50 {
            agg.push_audio(i * 33, &bins(40.0));
        }
        let snapshot = agg.snapshot();
        assert!((snapshot.volume_stability - 10.0).abs() < 1e-3);
    }

    #[test]
    fn volume_stability_stays_in_range() {
        let mut agg = SignalAggregator::new();
        for i in 0..50 {
            // Wildly varying loudness drives the variance up.
            let level = if i % 2 == 0 { 200.0 } else { 10.0 };
            agg.push_audio(i * 33, &bins(level));
        }
        let snapshot = agg.snapshot();
        assert!(snapshot.volume_stability >= 0.0 && snapshot.volume_stability <= 10.0);
    }

    #[test]
    fn continuous_speech_projects_expected_wpm() {
        let mut agg = SignalAggregator::new();
        for i in 0..50 {
            agg.push_audio(i * 100, &bins(40.0));
        }
        // Full 5s window of speech: 5 * 2.5 words * 12 = 150 wpm.
        let snapshot = agg.snapshot();
        assert!((snapshot.speech_rate_wpm - 150.0).abs() < 1e-3);
        assert_eq!(snapshot.pause_ratio, 0.0);
    }

    #[test]
    fn centered_gaze_counts_as_eye_contact() {
        let mut agg = SignalAggregator::new();
        agg.push_gaze(&GazeFrame::face_at(0.5));
        agg.push_gaze(&GazeFrame::face_at(0.9));
        let snapshot = agg.snapshot();
        assert_eq!(snapshot.eye_contact, 50.0);
    }

    #[test]
    fn confidence_recomputes_when_face_present() {
        let mut agg = SignalAggregator::new();
        for i in 0..50 {
            agg.push_audio(i * 33, &bins(40.0));
        }
        agg.push_gaze(&GazeFrame::face_at(0.5));
        // eye contact 100, stability 10: 0.6*100 + 0.4*100 = 100.
        assert_eq!(agg.snapshot().confidence, 100.0);
    }

    #[test]
    fn missing_face_decays_confidence() {
        let mut agg = SignalAggregator::new();
        for i in 0..50 {
            agg.push_audio(i * 33, &bins(40.0));
        }
        agg.push_gaze(&GazeFrame::face_at(0.5));
        let before = agg.snapshot().confidence;

        agg.push_gaze(&GazeFrame::no_face());
        let after = agg.snapshot();
        assert_eq!(after.confidence, before - 5.0);
        assert_eq!(after.eye_contact, 0.0);

        // Decay bottoms out at zero.
        for _ in 0..40 {
            agg.push_gaze(&GazeFrame::no_face());
        }
        assert_eq!(agg.snapshot().confidence, 0.0);
    }

    #[test]
    fn eye_contact_recovers_gradually_after_off_camera_stretch() {
        let mut agg = SignalAggregator::new();
        for _ in 0..GAZE_WINDOW {
            agg.push_gaze(&GazeFrame::face_at(0.5));
        }
        assert_eq!(agg.snapshot().eye_contact, 100.0);

        for _ in 0..GAZE_WINDOW {
            agg.push_gaze(&GazeFrame::no_face());
        }
        assert_eq!(agg.snapshot().eye_contact, 0.0);
        assert!(agg.gaze_window.len() <= GAZE_WINDOW);

        // A single returning frame reflects the off-camera stretch instead
        // of snapping straight back to the pre-absence value.
        agg.push_gaze(&GazeFrame::face_at(0.5));
        let snapshot = agg.snapshot();
        assert!((snapshot.eye_contact - 100.0 / GAZE_WINDOW as f32).abs() < 1e-3);
    }

    #[test]
    fn confidence_stays_in_range() {
        let mut agg = SignalAggregator::new();
        for _ in 0..GAZE_WINDOW {
            agg.push_gaze(&GazeFrame::face_at(0.5));
        }
        let snapshot = agg.snapshot();
        assert!(snapshot.confidence >= 0.0 && snapshot.confidence <= 100.0);
        assert!(snapshot.eye_contact >= 0.0 && snapshot.eye_contact <= 100.0);
    }
}
