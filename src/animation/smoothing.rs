//! Frame-rate aware exponential smoothing toward a target
//!
//! Each step moves `rate * dt` of the remaining distance, the factor
//! clamped to `[0, 1]` so a long frame can never overshoot. Once the
//! remainder is below the snap epsilon the value lands exactly on target.

use crate::math::Vec3;

/// Remaining distance below which a scalar snaps to its target
pub const SCALAR_SNAP_EPSILON: f32 = 0.001;

/// Remaining distance below which a position snaps to its target
pub const POSITION_SNAP_EPSILON: f32 = 1e-4;

/// Interpolation factor for one step, clamped to `[0, 1]`
pub fn step_factor(rate: f32, dt: f32) -> f32 {
    (rate * dt).clamp(0.0, 1.0)
}

/// Move a scalar toward `target`
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let next = current + (target - current) * step_factor(rate, dt);
    if (target - next).abs() < SCALAR_SNAP_EPSILON {
        target
    } else {
        next
    }
}

/// Move a position toward `target`
pub fn approach_vec3(current: Vec3, target: Vec3, rate: f32, dt: f32) -> Vec3 {
    let next = current.lerp(&target, step_factor(rate, dt));
    if next.distance(&target) < POSITION_SNAP_EPSILON {
        target
    } else {
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_scalar_reaches_target_exactly() {
        let mut v = 0.0;
        for _ in 0..600 {
            v = approach(v, 1.0, 2.0, DT);
        }
        assert_eq!(v, 1.0);

        for _ in 0..600 {
            v = approach(v, 0.0, 2.0, DT);
        }
        assert_eq!(v, 0.0);
    }

    #[test]
    fn test_vec3_distance_decreases_monotonically() {
        let target = Vec3::new(10.0, -4.0, 3.0);
        let mut p = Vec3::ZERO;
        let mut last = p.distance(&target);
        for _ in 0..2000 {
            p = approach_vec3(p, target, 3.0, DT);
            let d = p.distance(&target);
            assert!(d <= last);
            last = d;
        }
        assert_eq!(p, target);
    }

    #[test]
    fn test_step_is_bounded_by_rate() {
        let start = Vec3::ZERO;
        let target = Vec3::new(20.0, 0.0, 0.0);
        let next = approach_vec3(start, target, 2.0, DT);
        let moved = next.distance(&start);
        assert!(moved <= 2.0 * DT * 20.0 + 1e-5);
    }

    #[test]
    fn test_long_frame_does_not_overshoot() {
        assert_eq!(approach(0.0, 1.0, 2.0, 5.0), 1.0);
        let p = approach_vec3(Vec3::ZERO, Vec3::ONE, 3.0, 10.0);
        assert_eq!(p, Vec3::ONE);
    }

    #[test]
    fn test_zero_dt_holds_position() {
        assert_eq!(approach(0.3, 1.0, 2.0, 0.0), 0.3);
        assert_eq!(step_factor(2.0, -1.0), 0.0);
    }
}
