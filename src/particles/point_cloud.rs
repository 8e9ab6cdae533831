use crate::animation::TransitionTarget;
use crate::distribution::EntitySeed;
use crate::math::Vec3;

/// A single point of a point-cloud population (foliage needle, fairy light)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointCloudEntity {
    pub assembled: Vec3,
    pub scattered: Vec3,
    /// Render-visible position
    pub current: Vec3,
    /// Per-point variation in `[0, 1)`
    pub seed: f32,
}

impl PointCloudEntity {
    /// New entity resting at its assembled endpoint
    pub fn from_seed(seed: &EntitySeed) -> Self {
        Self {
            assembled: seed.assembled,
            scattered: seed.scattered,
            current: seed.assembled,
            seed: seed.seed,
        }
    }

    pub fn endpoint(&self, target: TransitionTarget) -> Vec3 {
        match target {
            TransitionTarget::Assembled => self.assembled,
            TransitionTarget::Scattered => self.scattered,
        }
    }

    /// Position at mix factor `t`, exact at both ends
    pub fn mix(&self, t: f32) -> Vec3 {
        if t <= 0.0 {
            self.assembled
        } else if t >= 1.0 {
            self.scattered
        } else {
            self.assembled.lerp(&self.scattered, t)
        }
    }
}
