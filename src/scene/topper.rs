use crate::animation::{approach, TransitionTarget};
use crate::config::{Rgb, Theme};
use crate::math::{Mat4, Vec3};
use crate::particles::InstanceData;
use super::frame::PointLight;

pub const STAR_ASSEMBLED_Y: f32 = 4.2;
pub const STAR_EXPLODED_Y: f32 = 8.0;
/// Octahedron radius
pub const STAR_RADIUS: f32 = 0.3;
pub const STAR_RATE: f32 = 2.0;

const HALO_SCALE: f32 = 1.5;
pub const HALO_OPACITY: f32 = 0.2;
pub const STAR_COLOR: Rgb = Theme::GOLD;

// Float bob parameters
const FLOAT_SPEED: f32 = 2.0;
const FLOAT_INTENSITY: f32 = 0.5;
const ROTATION_INTENSITY: f32 = 0.5;

/// Star on top of the tree, flies up when the tree bursts
#[derive(Debug, Clone, Copy)]
pub struct StarTopper {
    height: f32,
    time: f32,
}

impl Default for StarTopper {
    fn default() -> Self {
        Self::new(TransitionTarget::Assembled)
    }
}

impl StarTopper {
    pub fn new(target: TransitionTarget) -> Self {
        Self {
            height: Self::target_y(target),
            time: 0.0,
        }
    }

    /// Resting height for a target, in tree group space
    pub fn target_y(target: TransitionTarget) -> f32 {
        match target {
            TransitionTarget::Assembled => STAR_ASSEMBLED_Y,
            TransitionTarget::Scattered => STAR_EXPLODED_Y,
        }
    }

    pub fn update(&mut self, dt: f32, time: f32, target: TransitionTarget) {
        self.time = time;
        self.height = approach(self.height, Self::target_y(target), STAR_RATE, dt);
    }

    /// Eased height without the bob
    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn position(&self) -> Vec3 {
        let t = self.phase();
        let bob = t.sin() / 10.0 * FLOAT_INTENSITY;
        Vec3::new(0.0, self.height + bob, 0.0)
    }

    /// Wobble as Euler angles
    pub fn rotation(&self) -> Vec3 {
        let t = self.phase();
        Vec3::new(
            t.cos() / 8.0 * ROTATION_INTENSITY,
            t.sin() / 8.0 * ROTATION_INTENSITY,
            t.sin() / 20.0 * ROTATION_INTENSITY,
        )
    }

    pub fn instance(&self) -> InstanceData {
        InstanceData::new(Mat4::from_trs(self.position(), self.rotation(), 1.0), STAR_COLOR)
    }

    /// Translucent glow shell around the star
    pub fn halo(&self) -> InstanceData {
        InstanceData::new(
            Mat4::from_trs(self.position(), self.rotation(), HALO_SCALE),
            Theme::CHAMPAGNE,
        )
    }

    pub fn halo_opacity(&self) -> f32 {
        HALO_OPACITY
    }

    /// Gold point light at the star, offset into world space
    pub fn light(&self, group_offset: Vec3) -> PointLight {
        PointLight {
            position: self.position() + group_offset,
            color: STAR_COLOR,
            intensity: 2.0,
            distance: 5.0,
        }
    }

    fn phase(&self) -> f32 {
        self.time / 4.0 * FLOAT_SPEED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    #[test]
    fn test_target_heights() {
        assert_eq!(StarTopper::target_y(TransitionTarget::Assembled), 4.2);
        assert_eq!(StarTopper::target_y(TransitionTarget::Scattered), 8.0);
    }

    #[test]
    fn test_star_flies_up_and_back() {
        let mut star = StarTopper::default();
        assert_eq!(star.height(), 4.2);

        for i in 0..600 {
            star.update(DT, i as f32 * DT, TransitionTarget::Scattered);
        }
        assert_eq!(star.height(), 8.0);

        for i in 600..1200 {
            star.update(DT, i as f32 * DT, TransitionTarget::Assembled);
        }
        assert_eq!(star.height(), 4.2);
    }

    #[test]
    fn test_bob_is_small() {
        let mut star = StarTopper::default();
        for i in 0..200 {
            star.update(DT, i as f32 * 0.1, TransitionTarget::Assembled);
            let p = star.position();
            assert!((p.y - 4.2).abs() <= 0.05 + 1e-6);
            let r = star.rotation();
            assert!(r.x.abs() <= 0.0625 + 1e-6);
            assert!(r.z.abs() <= 0.025 + 1e-6);
        }
    }

    #[test]
    fn test_light_follows_star() {
        let star = StarTopper::default();
        let light = star.light(Vec3::new(0.0, -1.0, 0.0));
        assert!((light.position.y - (star.position().y - 1.0)).abs() < 1e-6);
        assert_eq!(light.distance, 5.0);
    }

    #[test]
    fn test_halo_is_larger() {
        let star = StarTopper::default();
        let core = star.instance().model.data;
        let halo = star.halo().model.data;
        // Uniform scale shows up in the basis column lengths
        let len = |m: [f32; 16]| (m[0] * m[0] + m[1] * m[1] + m[2] * m[2]).sqrt();
        assert!((len(halo) / len(core) - 1.5).abs() < 1e-5);
    }
}
