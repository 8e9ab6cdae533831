//! Burst / reassemble transition state
//!
//! [`TransitionController`] holds nothing but the intent flag. Populations
//! read it every tick and keep their own interpolation state, so toggling
//! never resets anything; it only retargets.

use super::easing::{ease, Easing};
use super::smoothing::approach;

/// Rate at which scalar progress chases its target
pub const PROGRESS_RATE: f32 = 2.0;

/// Which endpoint set is active
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionTarget {
    Assembled,
    Scattered,
}

impl TransitionTarget {
    /// 0.0 for assembled, 1.0 for scattered
    pub fn as_progress(&self) -> f32 {
        match self {
            TransitionTarget::Assembled => 0.0,
            TransitionTarget::Scattered => 1.0,
        }
    }
}

/// Single authority for the exploded flag
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionController {
    exploded: bool,
}

impl TransitionController {
    pub fn new(exploded: bool) -> Self {
        Self { exploded }
    }

    /// Returns true when the flag actually changed
    pub fn set_exploded(&mut self, exploded: bool) -> bool {
        let changed = self.exploded != exploded;
        self.exploded = exploded;
        changed
    }

    pub fn toggle(&mut self) {
        self.exploded = !self.exploded;
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    pub fn target(&self) -> TransitionTarget {
        if self.exploded {
            TransitionTarget::Scattered
        } else {
            TransitionTarget::Assembled
        }
    }
}

/// Scalar progress in `[0, 1]` eased toward the active target
#[derive(Debug, Clone, Copy)]
pub struct TransitionProgress {
    value: f32,
    pub rate: f32,
    pub easing: Easing,
}

impl Default for TransitionProgress {
    fn default() -> Self {
        Self {
            value: 0.0,
            rate: PROGRESS_RATE,
            easing: Easing::EaseInOutCubic,
        }
    }
}

impl TransitionProgress {
    /// Start fully at one endpoint
    pub fn starting_at(target: TransitionTarget) -> Self {
        Self {
            value: target.as_progress(),
            ..Default::default()
        }
    }

    pub fn update(&mut self, target: TransitionTarget, dt: f32) {
        self.value = approach(self.value, target.as_progress(), self.rate, dt).clamp(0.0, 1.0);
    }

    /// Raw progress
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Progress after the easing curve; what positions are mixed with
    pub fn eased(&self) -> f32 {
        ease(self.value, self.easing)
    }

    /// True once progress sits exactly on an endpoint
    pub fn is_settled(&self) -> bool {
        self.value == 0.0 || self.value == 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_controller_toggle() {
        let mut c = TransitionController::default();
        assert_eq!(c.target(), TransitionTarget::Assembled);
        c.toggle();
        assert!(c.is_exploded());
        assert_eq!(c.target(), TransitionTarget::Scattered);
        assert!(!c.set_exploded(true));
        assert!(c.set_exploded(false));
    }

    #[test]
    fn test_progress_round_trip_returns_to_zero() {
        let mut p = TransitionProgress::default();
        for _ in 0..30 {
            p.update(TransitionTarget::Scattered, DT);
        }
        assert!(p.value() > 0.0 && p.value() < 1.0);
        assert!(!p.is_settled());

        for _ in 0..600 {
            p.update(TransitionTarget::Assembled, DT);
        }
        assert_eq!(p.value(), 0.0);
        assert_eq!(p.eased(), 0.0);
        assert!(p.is_settled());
    }

    #[test]
    fn test_progress_reaches_one() {
        let mut p = TransitionProgress::default();
        for _ in 0..600 {
            p.update(TransitionTarget::Scattered, DT);
        }
        assert_eq!(p.value(), 1.0);
        assert_eq!(p.eased(), 1.0);
    }

    #[test]
    fn test_eased_lags_raw_early() {
        let mut p = TransitionProgress::default();
        p.update(TransitionTarget::Scattered, DT);
        assert!(p.eased() < p.value());
    }

    #[test]
    fn test_starting_at_scattered() {
        let p = TransitionProgress::starting_at(TransitionTarget::Scattered);
        assert_eq!(p.value(), 1.0);
    }
}
