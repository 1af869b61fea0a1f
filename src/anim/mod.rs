//! Animation clock, view selection and time-based modulation.

mod clock;
mod state;
pub mod wave;

pub use clock::AnimationClock;
pub use state::{AnimationState, View};
