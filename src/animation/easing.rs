//! Easing functions for smooth transitions

/// Easing function types
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Easing {
    /// Linear interpolation
    Linear,
    /// Quadratic ease-in-out
    EaseInOut,
    /// Cubic ease-in-out (default for the foliage burst)
    #[default]
    EaseInOutCubic,
}

/// Apply easing function to a value t in range [0, 1]
pub fn ease(t: f32, easing: Easing) -> f32 {
    let t = t.clamp(0.0, 1.0);

    match easing {
        Easing::Linear => t,
        Easing::EaseInOut => {
            if t < 0.5 {
                2.0 * t * t
            } else {
                1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
            }
        }
        Easing::EaseInOutCubic => ease_in_out_cubic(t),
    }
}

/// `4x³` below the midpoint, `1 - (-2x + 2)³ / 2` above it
pub fn ease_in_out_cubic(x: f32) -> f32 {
    if x < 0.5 {
        4.0 * x * x * x
    } else {
        1.0 - (-2.0 * x + 2.0).powi(3) / 2.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 3] = [Easing::Linear, Easing::EaseInOut, Easing::EaseInOutCubic];

    #[test]
    fn test_ease_bounds() {
        for easing in ALL {
            assert_eq!(ease(0.0, easing), 0.0, "Easing {:?} should start at 0", easing);
            assert_eq!(ease(1.0, easing), 1.0, "Easing {:?} should end at 1", easing);
        }
    }

    #[test]
    fn test_ease_monotonic() {
        for easing in ALL {
            let mut prev = 0.0;
            for i in 0..=100 {
                let v = ease(i as f32 / 100.0, easing);
                assert!(v >= prev - 0.001, "Easing {:?} should be monotonic", easing);
                prev = v;
            }
        }
    }

    #[test]
    fn test_cubic_symmetric() {
        let v1 = ease(0.25, Easing::EaseInOutCubic);
        let v2 = ease(0.75, Easing::EaseInOutCubic);
        assert!((v1 + v2 - 1.0).abs() < 0.0001);
        assert!((ease_in_out_cubic(0.5) - 0.5).abs() < 0.0001);
    }

    #[test]
    fn test_cubic_is_flat_at_both_ends() {
        // Smooth start and smooth end: the first and last steps are tiny
        let h = 0.01;
        let start_slope = ease_in_out_cubic(h) / h;
        let end_slope = (1.0 - ease_in_out_cubic(1.0 - h)) / h;
        assert!(start_slope < 0.01);
        assert!(end_slope < 0.01);
    }

    #[test]
    fn test_ease_clamps_input() {
        assert_eq!(ease(-0.5, Easing::Linear), 0.0);
        assert_eq!(ease(1.5, Easing::EaseInOutCubic), 1.0);
    }
}
