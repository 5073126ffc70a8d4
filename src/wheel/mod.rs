//! Selection Engine
//!
//! Uniform random choice among unread questions, rendered as a wheel spin whose motion is a
//! deterministic function of elapsed time.

pub mod driver;
pub mod easing;
pub mod engine;

pub use driver::{SpinDriver, SpinOutcome};
pub use easing::{ease_out_cubic, segment_under_pointer, SpinTrajectory, POINTER_ANGLE_DEG};
pub use engine::{PickedEvent, SpinEngine, SpinPlan, SpinSettings, SpinState, SpinStep};
