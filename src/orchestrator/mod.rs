pub mod controller;
pub mod state;

pub use controller::{InterviewController, SubscriptionId};
pub use state::{InterviewNode, SessionState};
