use crate::animation::{approach_vec3, TransitionTarget};
use crate::config::{Rgb, SceneParams};
use crate::distribution::{generate, Category};
use crate::math::Vec3;
use crate::rng::RandomSource;
use super::point_cloud::PointCloudEntity;

/// Rate at which each light chases its active endpoint
pub const FAIRY_LIGHT_RATE: f32 = 3.0;

/// Floats per light in [`FairyLightSystem::particle_data`]
pub const FAIRY_LIGHT_STRIDE: usize = 8;

const BASE_SIZE: f32 = 0.08;
const PULSE_AMPLITUDE: f32 = 0.02;
const PULSE_FREQUENCY: f32 = 2.0;
const OPACITY: f32 = 0.9;

/// Lights on a spiral around the cone
///
/// Unlike foliage, every light chases its own endpoint with plain
/// exponential smoothing, so lights lead the burst and trail on return.
pub struct FairyLightSystem {
    lights: Vec<PointCloudEntity>,
    color: Rgb,
    size: f32,
}

impl FairyLightSystem {
    pub fn new(params: &SceneParams, color: Rgb, rng: &mut dyn RandomSource) -> Self {
        let seeds = generate(Category::FairyLight, params.fairy_light_count, params, rng);
        Self {
            lights: seeds.iter().map(PointCloudEntity::from_seed).collect(),
            color,
            size: point_size(0.0),
        }
    }

    pub fn update(&mut self, dt: f32, time: f32, target: TransitionTarget) {
        self.size = point_size(time);

        for light in &mut self.lights {
            let goal = light.endpoint(target);
            light.current = approach_vec3(light.current, goal, FAIRY_LIGHT_RATE, dt);
        }
    }

    /// Recolor the whole population
    pub fn set_color(&mut self, color: Rgb) {
        self.color = color;
    }

    pub fn color(&self) -> Rgb {
        self.color
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn lights(&self) -> &[PointCloudEntity] {
        &self.lights
    }

    pub fn positions(&self) -> Vec<Vec3> {
        self.lights.iter().map(|l| l.current).collect()
    }

    /// Get particle data for GPU upload
    /// Format: position(3) + size(1) + alpha(1) + color(3) = 8 floats per particle
    pub fn particle_data(&self) -> Vec<f32> {
        let mut data = Vec::with_capacity(self.lights.len() * FAIRY_LIGHT_STRIDE);
        let color = self.color.to_array();

        for l in &self.lights {
            data.extend_from_slice(&l.current.to_array());
            data.push(self.size);
            data.push(OPACITY);
            data.extend_from_slice(&color);
        }

        data
    }

    pub fn count(&self) -> usize {
        self.lights.len()
    }
}

/// Shared point size at `time`, pulsing around 0.08
pub fn point_size(time: f32) -> f32 {
    BASE_SIZE + (time * PULSE_FREQUENCY).sin() * PULSE_AMPLITUDE
}
