//! Per-tick copy-out handed to the renderer
//!
//! Everything the renderer needs for one frame lives here, so the
//! renderer never reaches into population state.

use crate::config::{Rgb, Theme};
use crate::math::{Mat4, Vec3};
use crate::particles::{FoliageUniforms, InstanceData};

/// Offset of the whole tree group in world space
pub const TREE_GROUP_OFFSET: Vec3 = Vec3::new(0.0, -1.0, 0.0);

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
    /// Range cutoff; 0 means unbounded
    pub distance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotLight {
    pub position: Vec3,
    pub color: Rgb,
    pub intensity: f32,
    /// Cone half-angle in radians
    pub angle: f32,
    pub penumbra: f32,
}

/// Ambient, key, fill and the star's own light
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient_color: Rgb,
    pub ambient_intensity: f32,
    pub key: SpotLight,
    pub fill: PointLight,
    /// World-space star light, follows the topper
    pub star: PointLight,
}

impl Lighting {
    pub fn new(star_light: PointLight) -> Self {
        Self {
            ambient_color: Theme::MINT,
            ambient_intensity: 0.2,
            key: SpotLight {
                position: Vec3::new(10.0, 20.0, 10.0),
                color: Theme::CHAMPAGNE,
                intensity: 2.0,
                angle: 0.25,
                penumbra: 1.0,
            },
            fill: PointLight {
                position: Vec3::new(-10.0, -5.0, -10.0),
                color: Theme::EMERALD,
                intensity: 1.0,
                distance: 0.0,
            },
            star: star_light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraFrame {
    pub position: Vec3,
    pub view: Mat4,
    pub projection: Mat4,
}

/// Bloom, vignette and clear color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostProcess {
    pub background: Rgb,
    /// Luminance above which pixels bloom
    pub bloom_threshold: f32,
    pub bloom_intensity: f32,
    pub vignette_offset: f32,
    pub vignette_darkness: f32,
}

impl PostProcess {
    pub fn new(bloom_intensity: f32) -> Self {
        Self {
            background: Theme::EMERALD_DARK,
            bloom_threshold: 0.5,
            bloom_intensity,
            vignette_offset: 0.1,
            vignette_darkness: 0.6,
        }
    }
}

/// Everything drawn in one frame
#[derive(Debug, Clone, PartialEq)]
pub struct FrameSnapshot {
    pub time: f32,
    pub exploded: bool,
    /// Tree group transform applied on top of every model matrix
    pub group_transform: Mat4,
    pub foliage: FoliageUniforms,
    pub foliage_count: usize,
    /// position(3) + size(1) + alpha(1) + color(3) per light
    pub fairy_lights: Vec<f32>,
    pub baubles: Vec<InstanceData>,
    pub gifts: Vec<InstanceData>,
    pub star: InstanceData,
    pub star_halo: InstanceData,
    pub star_halo_opacity: f32,
    pub lighting: Lighting,
    pub camera: CameraFrame,
    pub post: PostProcess,
    /// Floor contact shadow opacity
    pub shadow_opacity: f32,
}

impl FrameSnapshot {
    pub fn fairy_light_count(&self) -> usize {
        self.fairy_lights.len() / crate::particles::FAIRY_LIGHT_STRIDE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_lighting_rig() {
        let star = PointLight {
            position: Vec3::new(0.0, 3.2, 0.0),
            color: Theme::GOLD,
            intensity: 2.0,
            distance: 5.0,
        };
        let lighting = Lighting::new(star);
        assert_eq!(lighting.ambient_color, Theme::MINT);
        assert_eq!(lighting.ambient_intensity, 0.2);
        assert_eq!(lighting.key.position, Vec3::new(10.0, 20.0, 10.0));
        assert_eq!(lighting.fill.color, Theme::EMERALD);
        assert_eq!(lighting.star, star);
    }

    #[test]
    fn test_post_process_defaults() {
        let post = PostProcess::new(1.5);
        assert_eq!(post.bloom_intensity, 1.5);
        assert_eq!(post.bloom_threshold, 0.5);
        assert_eq!(post.vignette_darkness, 0.6);
        assert_eq!(post.background, Theme::EMERALD_DARK);
    }
}
