use anyhow::{bail, Context, Result};
use log::info;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::metrics::MetricsStore;

use super::loop_worker::sampling_loop;
use super::sources::{GazeSource, LoudnessSource};

/// Owns the sampling loop's lifecycle: one running pipeline per session,
/// started with the session and torn down with it.
pub struct SignalController {
    store: MetricsStore,
    handle: Option<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl SignalController {
    pub fn new(store: MetricsStore) -> Self {
        Self {
            store,
            handle: None,
            cancel_token: None,
        }
    }

    /// Spawn the sampling loop over the given sensor seams. Either source may
    /// be absent; its sub-pipeline then stays at default metrics.
    pub fn start(
        &mut self,
        audio: Option<Box<dyn LoudnessSource>>,
        gaze: Option<Box<dyn GazeSource>>,
    ) -> Result<()> {
        if self.handle.is_some() {
            bail!("signal pipeline already active");
        }

        info!("starting signal pipeline (audio: {}, gaze: {})", audio.is_some(), gaze.is_some());

        // Fresh snapshot for the new session.
        self.store.reset();

        let cancel_token = CancellationToken::new();
        let token_clone = cancel_token.clone();

        let handle = tokio::spawn(sampling_loop(audio, gaze, self.store.clone(), token_clone));

        self.handle = Some(handle);
        self.cancel_token = Some(cancel_token);
        Ok(())
    }

    /// Cancel the loop and wait for it to finish. Dropping the loop releases
    /// the sensor sources and all rolling buffers, so the next `start` runs
    /// from a clean state.
    pub async fn stop(&mut self) -> Result<()> {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }

        if let Some(handle) = self.handle.take() {
            handle
                .await
                .context("sampling loop task failed to join")?;
        }

        self.store.reset();
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signals::sources::GazeFrame;

    struct SteadyAudio;

    impl LoudnessSource for SteadyAudio {
        fn sample(&mut self) -> Option<Vec<f32>> {
            Some(vec![40.0; 8])
        }
    }

    struct CenteredGaze;

    impl GazeSource for CenteredGaze {
        fn sample(&mut self) -> Option<GazeFrame> {
            Some(GazeFrame::face_at(0.5))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn pipeline_publishes_and_stops_cleanly() {
        let store = MetricsStore::new();
        let mut controller = SignalController::new(store.clone());
        controller
            .start(Some(Box::new(SteadyAudio)), Some(Box::new(CenteredGaze)))
            .unwrap();
        assert!(controller.is_running());

        // Let a few ticks elapse on the paused clock.
        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
        tokio::task::yield_now().await;

        // Steady loudness and centered gaze: full eye contact and stability.
        let live = store.latest();
        assert_eq!(live.eye_contact, 100.0);
        assert_eq!(live.pause_ratio, 0.0);

        controller.stop().await.unwrap();
        assert!(!controller.is_running());
        // Buffers cleared: the store is back to defaults for the next session.
        assert_eq!(store.latest(), crate::metrics::MetricsSnapshot::default());
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let store = MetricsStore::new();
        let mut controller = SignalController::new(store);
        controller.start(None, None).unwrap();
        assert!(controller.start(None, None).is_err());
        controller.stop().await.unwrap();
    }

    #[tokio::test]
    async fn missing_sensors_do_not_crash() {
        let store = MetricsStore::new();
        let mut controller = SignalController::new(store.clone());
        controller.start(None, None).unwrap();
        tokio::time::sleep(tokio::time::Duration::from_millis(80)).await;
        controller.stop().await.unwrap();
    }
}
