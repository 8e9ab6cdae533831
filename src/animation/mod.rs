//! Animation primitives shared by every population
//!
//! Easing curves, exponential smoothing toward a moving target, and the
//! burst / reassemble transition state.

mod easing;
mod smoothing;
mod transition;

pub use easing::{ease, ease_in_out_cubic, Easing};
pub use smoothing::{approach, approach_vec3, step_factor, POSITION_SNAP_EPSILON, SCALAR_SNAP_EPSILON};
pub use transition::{TransitionController, TransitionProgress, TransitionTarget, PROGRESS_RATE};
