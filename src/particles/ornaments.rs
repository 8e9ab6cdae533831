//! Instanced ornaments: baubles and gift boxes
//!
//! Each ornament chases its active endpoint with exponential smoothing.
//! When scattered it also floats around that endpoint, and lighter
//! ornaments float further. Scale eases up from zero so ornaments pop
//! in on first show.

use std::f32::consts::TAU;
use crate::animation::{approach, approach_vec3, TransitionTarget};
use crate::config::{Rgb, SceneParams};
use crate::distribution::{generate, pick_color, Band, Category};
use crate::math::{Mat4, Vec3};
use crate::rng::RandomSource;

/// Rate for ornament position and scale smoothing
pub const ORNAMENT_RATE: f32 = 2.0;

/// Floats per instance: model matrix(16) + color(3)
pub const INSTANCE_STRIDE: usize = 19;

/// Mesh an ornament is drawn with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrnamentKind {
    /// Bauble
    Sphere,
    /// Gift
    Box,
}

impl OrnamentKind {
    pub fn category(&self) -> Category {
        match self {
            OrnamentKind::Sphere => Category::Bauble,
            OrnamentKind::Box => Category::Gift,
        }
    }

    fn scale_band(&self) -> Band {
        match self {
            OrnamentKind::Sphere => Band::new(0.15, 0.25),
            OrnamentKind::Box => Band::new(0.2, 0.35),
        }
    }

    /// Heavier kinds sit lower in the weight range
    fn weight_band(&self) -> Band {
        match self {
            OrnamentKind::Sphere => Band::new(0.2, 0.5),
            OrnamentKind::Box => Band::new(0.8, 1.0),
        }
    }

    /// Float amplitude at weight 0
    fn float_scale(&self) -> f32 {
        match self {
            OrnamentKind::Sphere => 0.2,
            OrnamentKind::Box => 0.05,
        }
    }

    /// Continuous spin in rad/s around x, y, z
    fn spin(&self) -> Vec3 {
        match self {
            OrnamentKind::Sphere => Vec3::new(0.5, 0.5, 0.0),
            OrnamentKind::Box => Vec3::new(0.2, 0.0, 0.1),
        }
    }
}

/// Float amplitude for an ornament: lighter floats further
pub fn float_amplitude(kind: OrnamentKind, weight: f32) -> f32 {
    (1.0 - weight).max(0.0) * kind.float_scale()
}

/// Current transform of an ornament
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentTransform {
    pub position: Vec3,
    /// Euler angles in radians, applied x then y then z
    pub rotation: Vec3,
    pub scale: f32,
}

impl OrnamentTransform {
    pub fn model_matrix(&self) -> Mat4 {
        Mat4::from_trs(self.position, self.rotation, self.scale)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrnamentInstance {
    pub assembled: Vec3,
    pub scattered: Vec3,
    pub transform: OrnamentTransform,
    pub kind: OrnamentKind,
    pub base_scale: f32,
    pub color: Rgb,
    /// In `[0, 1]`, heavier floats less
    pub weight: f32,
    /// In `[0, 100)`, desynchronizes float motion
    pub phase_offset: f32,
}

impl OrnamentInstance {
    /// Float offset around the scattered endpoint at `time`
    pub fn float_offset(&self, time: f32) -> Vec3 {
        let amp = float_amplitude(self.kind, self.weight);
        let phase = self.phase_offset;

        match self.kind {
            OrnamentKind::Sphere => Vec3::new(
                (time * 0.5 + phase).cos() * amp * 0.5,
                (time + phase).sin() * amp,
                0.0,
            ),
            OrnamentKind::Box => Vec3::new(0.0, (time * 0.5 + phase).sin() * amp, 0.0),
        }
    }

    pub fn update(&mut self, dt: f32, time: f32, target: TransitionTarget) {
        let goal = match target {
            TransitionTarget::Assembled => self.assembled,
            TransitionTarget::Scattered => self.scattered + self.float_offset(time),
        };

        let t = &mut self.transform;
        t.position = approach_vec3(t.position, goal, ORNAMENT_RATE, dt);
        t.scale = approach(t.scale, self.base_scale, ORNAMENT_RATE, dt);
        t.rotation = wrap_angles(t.rotation + self.kind.spin().scale(dt));
    }

    pub fn instance_data(&self) -> InstanceData {
        InstanceData::new(self.transform.model_matrix(), self.color)
    }
}

/// Per-instance GPU payload
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InstanceData {
    pub model: Mat4,
    pub color: Rgb,
}

impl InstanceData {
    pub fn new(model: Mat4, color: Rgb) -> Self {
        Self { model, color }
    }

    pub fn write_to(&self, out: &mut Vec<f32>) {
        out.extend_from_slice(self.model.as_slice());
        out.extend_from_slice(&self.color.to_array());
    }
}

/// Flatten instances for upload, [`INSTANCE_STRIDE`] floats each
pub fn pack_instances(instances: &[InstanceData]) -> Vec<f32> {
    let mut data = Vec::with_capacity(instances.len() * INSTANCE_STRIDE);
    for instance in instances {
        instance.write_to(&mut data);
    }
    data
}

/// Both ornament populations
pub struct OrnamentSystem {
    baubles: Vec<OrnamentInstance>,
    gifts: Vec<OrnamentInstance>,
    theme: Rgb,
}

impl OrnamentSystem {
    pub fn new(params: &SceneParams, theme: Rgb, rng: &mut dyn RandomSource) -> Self {
        let baubles = spawn(OrnamentKind::Sphere, params.bauble_count, params, theme, rng);
        let gifts = spawn(OrnamentKind::Box, params.gift_count, params, theme, rng);

        Self { baubles, gifts, theme }
    }

    pub fn update(&mut self, dt: f32, time: f32, target: TransitionTarget) {
        for o in self.baubles.iter_mut().chain(self.gifts.iter_mut()) {
            o.update(dt, time, target);
        }
    }

    /// Re-roll every color against a new theme color
    ///
    /// Endpoints, weights and phases stay put.
    pub fn recolor(&mut self, theme: Rgb, rng: &mut dyn RandomSource) {
        self.theme = theme;
        for o in self.baubles.iter_mut().chain(self.gifts.iter_mut()) {
            o.color = pick_color(o.kind.category(), theme, rng.next_f32());
        }
    }

    pub fn theme(&self) -> Rgb {
        self.theme
    }

    pub fn baubles(&self) -> &[OrnamentInstance] {
        &self.baubles
    }

    pub fn gifts(&self) -> &[OrnamentInstance] {
        &self.gifts
    }

    pub fn instances(&self, kind: OrnamentKind) -> Vec<InstanceData> {
        let population = match kind {
            OrnamentKind::Sphere => &self.baubles,
            OrnamentKind::Box => &self.gifts,
        };
        population.iter().map(OrnamentInstance::instance_data).collect()
    }

    pub fn instance_data(&self, kind: OrnamentKind) -> Vec<f32> {
        pack_instances(&self.instances(kind))
    }

    pub fn count(&self) -> usize {
        self.baubles.len() + self.gifts.len()
    }
}

fn spawn(
    kind: OrnamentKind,
    count: usize,
    params: &SceneParams,
    theme: Rgb,
    rng: &mut dyn RandomSource,
) -> Vec<OrnamentInstance> {
    let category = kind.category();

    generate(category, count, params, rng)
        .into_iter()
        .map(|seed| {
            let base_scale = kind.scale_band().sample(rng);
            let color = pick_color(category, theme, rng.next_f32());
            let weight = kind.weight_band().sample(rng);

            OrnamentInstance {
                assembled: seed.assembled,
                scattered: seed.scattered,
                transform: OrnamentTransform {
                    position: seed.assembled,
                    rotation: Vec3::ZERO,
                    scale: 0.0,
                },
                kind,
                base_scale,
                color,
                weight,
                phase_offset: seed.seed,
            }
        })
        .collect()
}

/// Keep each Euler angle in `[0, 2π)`
fn wrap_angles(v: Vec3) -> Vec3 {
    Vec3::new(v.x.rem_euclid(TAU), v.y.rem_euclid(TAU), v.z.rem_euclid(TAU))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::distribution::GIFT_COLORS;
    use crate::rng::{SequenceRandom, StdRandom};

    const DT: f32 = 1.0 / 60.0;

    fn system() -> OrnamentSystem {
        let params = SceneParams {
            bauble_count: 40,
            gift_count: 15,
            ..Default::default()
        };
        OrnamentSystem::new(&params, Theme::RUBY, &mut StdRandom::seeded(5))
    }

    #[test]
    fn test_ornament_creation() {
        let s = system();
        assert_eq!(s.baubles().len(), 40);
        assert_eq!(s.gifts().len(), 15);
        assert_eq!(s.count(), 55);

        for o in s.baubles() {
            assert_eq!(o.kind, OrnamentKind::Sphere);
            assert!((0.2..=0.5).contains(&o.weight));
            assert!((0.15..=0.25).contains(&o.base_scale));
            assert!(o.color == Theme::GOLD || o.color == Theme::RUBY);
            assert!((0.0..100.0).contains(&o.phase_offset));
        }
        for o in s.gifts() {
            assert_eq!(o.kind, OrnamentKind::Box);
            assert!((0.8..=1.0).contains(&o.weight));
            assert!(GIFT_COLORS.contains(&o.color));
        }
    }

    #[test]
    fn test_ornaments_pop_in() {
        let mut s = system();
        for o in s.baubles() {
            assert_eq!(o.transform.scale, 0.0);
            assert_eq!(o.transform.position, o.assembled);
        }
        for i in 0..600 {
            s.update(DT, i as f32 * DT, TransitionTarget::Assembled);
        }
        for o in s.baubles().iter().chain(s.gifts()) {
            assert_eq!(o.transform.scale, o.base_scale);
            assert_eq!(o.transform.position, o.assembled);
        }
    }

    #[test]
    fn test_float_amplitude_ordering() {
        let light = float_amplitude(OrnamentKind::Sphere, 0.2);
        let heavy = float_amplitude(OrnamentKind::Sphere, 0.5);
        assert!(light > heavy);
        assert!((light - 0.16).abs() < 1e-6);

        // Every bauble floats at least as much as any gift
        let lightest_gift = float_amplitude(OrnamentKind::Box, 0.8);
        assert!(heavy >= lightest_gift);
        assert_eq!(float_amplitude(OrnamentKind::Box, 1.0), 0.0);
        assert_eq!(float_amplitude(OrnamentKind::Sphere, 1.5), 0.0);
    }

    #[test]
    fn test_scattered_ornaments_float_near_endpoint() {
        let mut s = system();
        for i in 0..900 {
            s.update(DT, i as f32 * DT, TransitionTarget::Scattered);
        }
        for o in s.baubles().iter().chain(s.gifts()) {
            let amp = float_amplitude(o.kind, o.weight);
            // Chasing a moving target lags a little behind it
            assert!(o.transform.position.distance(&o.scattered) <= amp * 1.2 + 1e-3);
        }
    }

    #[test]
    fn test_rotation_accumulates() {
        let mut s = system();
        for i in 0..60 {
            s.update(DT, i as f32 * DT, TransitionTarget::Assembled);
        }
        let bauble = s.baubles()[0];
        assert!((bauble.transform.rotation.x - 0.5).abs() < 1e-3);
        assert!((bauble.transform.rotation.y - 0.5).abs() < 1e-3);
        let gift = s.gifts()[0];
        assert!((gift.transform.rotation.x - 0.2).abs() < 1e-3);
        assert!((gift.transform.rotation.z - 0.1).abs() < 1e-3);
    }

    #[test]
    fn test_rotation_stays_wrapped() {
        let mut s = system();
        // Ten simulated minutes of spin
        for i in 0..36_000 {
            s.update(DT, i as f32 * DT, TransitionTarget::Assembled);
        }
        for o in s.baubles().iter().chain(s.gifts()) {
            let r = o.transform.rotation;
            for angle in [r.x, r.y, r.z] {
                assert!((0.0..TAU).contains(&angle), "angle {}", angle);
            }
        }
        // 600s at 0.5 rad/s, folded into one turn
        let expected = (0.5f32 * 600.0).rem_euclid(TAU);
        let got = s.baubles()[0].transform.rotation.x;
        assert!((got - expected).abs() < 0.05, "{} vs {}", got, expected);
    }

    #[test]
    fn test_recolor_keeps_endpoints() {
        let mut s = system();
        let before: Vec<_> = s.baubles().iter().map(|o| (o.assembled, o.scattered)).collect();

        s.recolor(Theme::SAPPHIRE, &mut SequenceRandom::constant(0.1));
        assert_eq!(s.theme(), Theme::SAPPHIRE);
        for (o, (a, sc)) in s.baubles().iter().zip(before) {
            assert_eq!(o.color, Theme::SAPPHIRE);
            assert_eq!(o.assembled, a);
            assert_eq!(o.scattered, sc);
        }
        for o in s.gifts() {
            assert_eq!(o.color, Theme::RUBY);
        }
    }

    #[test]
    fn test_instance_data_layout() {
        let s = system();
        let data = s.instance_data(OrnamentKind::Box);
        assert_eq!(data.len(), 15 * INSTANCE_STRIDE);

        let gift = s.gifts()[0];
        let expected = gift.transform.model_matrix();
        assert_eq!(&data[..16], expected.as_slice());
        assert_eq!(&data[16..19], &gift.color.to_array());
    }
}
