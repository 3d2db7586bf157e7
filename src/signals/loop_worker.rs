use tokio::time::{Duration, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::metrics::MetricsStore;

use super::aggregator::SignalAggregator;
use super::sources::{GazeSource, LoudnessSource};

const ENABLE_LOGS: bool = true;

use crate::log_info;

/// Sampling cadence; roughly 30 ticks per second.
pub(crate) const TICK_INTERVAL_MS: u64 = 33;

/// Samples the sensor seams on a fixed cadence and publishes recomputed
/// metrics to the store after every tick. Runs until cancelled; a missing
/// source simply leaves its sub-pipeline's metrics at their last value.
pub(crate) async fn sampling_loop(
    mut audio: Option<Box<dyn LoudnessSource>>,
    mut gaze: Option<Box<dyn GazeSource>>,
    store: MetricsStore,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let started = Instant::now();
    let mut aggregator = SignalAggregator::new();

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let now_ms = started.elapsed().as_millis() as i64;

                if let Some(source) = audio.as_mut() {
                    if let Some(bins) = source.sample() {
                        aggregator.push_audio(now_ms, &bins);
                    }
                }

                if let Some(source) = gaze.as_mut() {
                    if let Some(frame) = source.sample() {
                        aggregator.push_gaze(&frame);
                    }
                }

                store.publish(aggregator.snapshot());
            }
            _ = cancel_token.cancelled() => {
                log_info!("sampling loop shutting down");
                break;
            }
        }
    }
}
