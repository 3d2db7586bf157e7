pub mod aggregator;
pub mod controller;
mod loop_worker;
pub mod sources;

pub use aggregator::SignalAggregator;
pub use controller::SignalController;
pub use sources::{GazeFrame, GazeSource, LoudnessSource};
