//! Dense foliage point cloud
//!
//! Foliage does not chase positions directly. A single scalar progress is
//! eased toward 0 or 1 and run through a cubic in-out curve, and every
//! needle is placed at that mix of its two endpoints. This gives the burst
//! a smooth start and a smooth landing. The renderer gets the same progress
//! as a uniform and mixes the static endpoint attributes on the GPU.

use crate::animation::{TransitionProgress, TransitionTarget};
use crate::config::SceneParams;
use crate::distribution::{generate, Category};
use crate::math::Vec3;
use crate::rng::RandomSource;
use super::point_cloud::PointCloudEntity;

/// Floats per point in [`FoliageSystem::attribute_data`]
/// Layout: assembled(3) + scattered(3) + seed(1)
pub const FOLIAGE_ATTRIBUTE_STRIDE: usize = 7;

/// Per-frame shader inputs
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FoliageUniforms {
    pub time: f32,
    /// Raw progress; the shader applies the cubic ease itself
    pub progress: f32,
}

/// Foliage needles driven by eased scalar progress
pub struct FoliageSystem {
    points: Vec<PointCloudEntity>,
    progress: TransitionProgress,
    time: f32,
}

impl FoliageSystem {
    pub fn new(params: &SceneParams, rng: &mut dyn RandomSource) -> Self {
        let seeds = generate(Category::FoliagePoint, params.foliage_count, params, rng);
        Self {
            points: seeds.iter().map(PointCloudEntity::from_seed).collect(),
            progress: TransitionProgress::default(),
            time: 0.0,
        }
    }

    /// Advance progress and re-place every needle
    pub fn update(&mut self, dt: f32, time: f32, target: TransitionTarget) {
        self.time = time;
        self.progress.update(target, dt);

        let t = self.progress.eased();
        for point in &mut self.points {
            point.current = point.mix(t);
        }
    }

    pub fn progress(&self) -> f32 {
        self.progress.value()
    }

    pub fn eased_progress(&self) -> f32 {
        self.progress.eased()
    }

    pub fn is_settled(&self) -> bool {
        self.progress.is_settled()
    }

    pub fn points(&self) -> &[PointCloudEntity] {
        &self.points
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.points.iter().map(|p| p.current).collect()
    }

    /// Static per-point attributes, uploaded once
    pub fn attribute_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.points.len() * FOLIAGE_ATTRIBUTE_STRIDE);

        for p in &self.points {
            data.extend_from_slice(&p.assembled.to_array());
            data.extend_from_slice(&p.scattered.to_array());
            data.push(p.seed);
        }

        data
    }

    pub fn uniforms(&self) -> FoliageUniforms {
        FoliageUniforms {
            time: self.time,
            progress: self.progress.value(),
        }
    }

    pub fn count(&self) -> usize {
        self.points.len()
    }
}

/// Screen-space point size before distance attenuation
pub fn foliage_point_size(seed: f32) -> f32 {
    20.0 * (0.8 + seed * 0.4)
}
