//! Ties every population to the shared configuration
//!
//! The host calls [`SceneComposer::tick`] once per frame. A tick reads the
//! configuration, advances every population toward the active target,
//! then copies the result into a [`FrameSnapshot`] the renderer draws.

use log::{debug, info};
use crate::animation::{approach, TransitionController, TransitionTarget};
use crate::config::{ConfigUpdate, SceneParams, ThemePreset, TreeConfig};
use crate::error::Result;
use crate::math::Mat4;
use crate::particles::{FairyLightSystem, FoliageSystem, OrnamentKind, OrnamentSystem};
use crate::rng::RandomSource;
use super::camera::OrbitCamera;
use super::frame::{CameraFrame, FrameSnapshot, Lighting, PostProcess, TREE_GROUP_OFFSET};
use super::topper::StarTopper;

pub const SHADOW_OPACITY: f32 = 0.4;
pub const SHADOW_RATE: f32 = 2.0;

/// Draws a [`FrameSnapshot`]
pub trait SceneRenderer {
    /// Upload the static foliage attributes; called once per population
    fn upload_foliage(&mut self, attributes: &[f32], count: usize) -> Result<()>;

    fn draw(&mut self, frame: &FrameSnapshot) -> Result<()>;
}

pub struct SceneComposer {
    config: TreeConfig,
    transition: TransitionController,
    foliage: FoliageSystem,
    fairy_lights: FairyLightSystem,
    ornaments: OrnamentSystem,
    star: StarTopper,
    camera: OrbitCamera,
    shadow_opacity: f32,
    rng: Box<dyn RandomSource>,
    /// Session clock; accumulated in f64 so long sessions keep frame spacing
    time: f64,
    snapshot: FrameSnapshot,
}

impl SceneComposer {
    pub fn new(config: TreeConfig, params: SceneParams, mut rng: Box<dyn RandomSource>) -> Self {
        let transition = TransitionController::new(config.is_exploded);
        let foliage = FoliageSystem::new(&params, rng.as_mut());
        let fairy_lights = FairyLightSystem::new(&params, config.light_color, rng.as_mut());
        let ornaments = OrnamentSystem::new(&params, config.ornament_color, rng.as_mut());
        let star = StarTopper::default();
        let camera = OrbitCamera::default();

        info!(
            "Scene composed: {} foliage, {} fairy lights, {} baubles, {} gifts",
            foliage.count(),
            fairy_lights.count(),
            params.bauble_count,
            params.gift_count,
        );

        let snapshot = build_snapshot(
            &config, &foliage, &fairy_lights, &ornaments, &star, &camera, SHADOW_OPACITY, 0.0,
        );

        Self {
            config,
            transition,
            foliage,
            fairy_lights,
            ornaments,
            star,
            camera,
            shadow_opacity: SHADOW_OPACITY,
            rng,
            time: 0.0,
            snapshot,
        }
    }

    /// Advance one frame by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.time += f64::from(dt);

        self.sync_config();
        let target = self.transition.target();
        let time = self.time as f32;

        self.foliage.update(dt, time, target);
        self.fairy_lights.update(dt, time, target);
        self.ornaments.update(dt, time, target);
        self.star.update(dt, time, target);
        self.camera.update(dt, self.config.rotation_speed, self.transition.is_exploded());

        let shadow_target = match target {
            TransitionTarget::Assembled => SHADOW_OPACITY,
            TransitionTarget::Scattered => 0.0,
        };
        self.shadow_opacity = approach(self.shadow_opacity, shadow_target, SHADOW_RATE, dt);

        self.snapshot = build_snapshot(
            &self.config,
            &self.foliage,
            &self.fairy_lights,
            &self.ornaments,
            &self.star,
            &self.camera,
            self.shadow_opacity,
            time,
        );
    }

    /// Submit the latest snapshot
    pub fn render_frame<R: SceneRenderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        renderer.draw(&self.snapshot)
    }

    /// Hand the foliage attributes to a renderer
    pub fn upload_static<R: SceneRenderer + ?Sized>(&self, renderer: &mut R) -> Result<()> {
        renderer.upload_foliage(&self.foliage_attributes(), self.foliage.count())
    }

    pub fn snapshot(&self) -> &FrameSnapshot {
        &self.snapshot
    }

    pub fn foliage_attributes(&self) -> Vec<f32> {
        self.foliage.attribute_data()
    }

    // === Configuration ===

    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Replace the whole configuration; applied on the next tick
    pub fn set_config(&mut self, config: TreeConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn update_config(&mut self, update: ConfigUpdate) -> Result<()> {
        self.config.merge(update)
    }

    pub fn toggle_exploded(&mut self) -> bool {
        self.config.toggle_exploded();
        self.config.is_exploded
    }

    pub fn toggle_rotation(&mut self) -> f32 {
        self.config.toggle_rotation();
        self.config.rotation_speed
    }

    pub fn apply_theme(&mut self, theme: ThemePreset) {
        self.config.apply_theme(theme);
    }

    pub fn set_bloom_intensity(&mut self, intensity: f32) -> Result<()> {
        self.config.set_bloom_intensity(intensity)
    }

    // === State ===

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Requested burst state, including changes not yet ticked
    pub fn is_exploded(&self) -> bool {
        self.config.is_exploded
    }

    /// Foliage transition progress in `[0, 1]`
    pub fn progress(&self) -> f32 {
        self.foliage.progress()
    }

    pub fn foliage(&self) -> &FoliageSystem {
        &self.foliage
    }

    pub fn fairy_lights(&self) -> &FairyLightSystem {
        &self.fairy_lights
    }

    pub fn ornaments(&self) -> &OrnamentSystem {
        &self.ornaments
    }

    pub fn star(&self) -> &StarTopper {
        &self.star
    }

    pub fn camera(&self) -> &OrbitCamera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut OrbitCamera {
        &mut self.camera
    }

    pub fn shadow_opacity(&self) -> f32 {
        self.shadow_opacity
    }

    /// Apply configuration changes made since the last tick
    fn sync_config(&mut self) {
        if self.transition.set_exploded(self.config.is_exploded) {
            debug!("Transition target: {:?}", self.transition.target());
        }

        self.fairy_lights.set_color(self.config.light_color);

        if self.ornaments.theme() != self.config.ornament_color {
            debug!("Recoloring ornaments to {}", self.config.ornament_color);
            self.ornaments.recolor(self.config.ornament_color, self.rng.as_mut());
        }
    }
}

#[allow(clippy::too_many_arguments)]
fn build_snapshot(
    config: &TreeConfig,
    foliage: &FoliageSystem,
    fairy_lights: &FairyLightSystem,
    ornaments: &OrnamentSystem,
    star: &StarTopper,
    camera: &OrbitCamera,
    shadow_opacity: f32,
    time: f32,
) -> FrameSnapshot {
    let offset = TREE_GROUP_OFFSET;

    FrameSnapshot {
        time,
        exploded: config.is_exploded,
        group_transform: Mat4::translation(offset.x, offset.y, offset.z),
        foliage: foliage.uniforms(),
        foliage_count: foliage.count(),
        fairy_lights: fairy_lights.particle_data(),
        baubles: ornaments.instances(OrnamentKind::Sphere),
        gifts: ornaments.instances(OrnamentKind::Box),
        star: star.instance(),
        star_halo: star.halo(),
        star_halo_opacity: star.halo_opacity(),
        lighting: Lighting::new(star.light(offset)),
        camera: CameraFrame {
            position: camera.position(),
            view: camera.view_matrix(),
            projection: camera.projection_matrix(),
        },
        post: PostProcess::new(config.bloom_intensity),
        shadow_opacity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;
    use crate::rng::StdRandom;
    use crate::scene::topper::{HALO_OPACITY, STAR_COLOR};

    const DT: f32 = 1.0 / 60.0;

    fn small_params() -> SceneParams {
        SceneParams {
            foliage_count: 100,
            fairy_light_count: 20,
            bauble_count: 10,
            gift_count: 5,
            tier_count: 15,
        }
    }

    fn composer() -> SceneComposer {
        SceneComposer::new(TreeConfig::default(), small_params(), Box::new(StdRandom::seeded(9)))
    }

    #[derive(Default)]
    struct RecordingRenderer {
        uploaded: usize,
        frames: Vec<f32>,
    }

    impl SceneRenderer for RecordingRenderer {
        fn upload_foliage(&mut self, attributes: &[f32], count: usize) -> Result<()> {
            assert_eq!(attributes.len(), count * 7);
            self.uploaded = count;
            Ok(())
        }

        fn draw(&mut self, frame: &FrameSnapshot) -> Result<()> {
            self.frames.push(frame.time);
            Ok(())
        }
    }

    #[test]
    fn test_snapshot_sizes() {
        let scene = composer();
        let snap = scene.snapshot();
        assert_eq!(snap.foliage_count, 100);
        assert_eq!(snap.fairy_light_count(), 20);
        assert_eq!(snap.baubles.len(), 10);
        assert_eq!(snap.gifts.len(), 5);
        assert_eq!(snap.shadow_opacity, SHADOW_OPACITY);
        assert_eq!(snap.star_halo_opacity, HALO_OPACITY);
        assert_eq!(snap.star.color, STAR_COLOR);
        assert_eq!(snap.lighting.star.color, STAR_COLOR);
    }

    #[test]
    fn test_toggle_drives_every_population() {
        let mut scene = composer();
        scene.toggle_exploded();
        for _ in 0..600 {
            scene.tick(DT);
        }
        assert!(scene.is_exploded());
        assert_eq!(scene.progress(), 1.0);
        assert_eq!(scene.star().height(), 8.0);
        assert_eq!(scene.shadow_opacity(), 0.0);

        scene.toggle_exploded();
        for _ in 0..900 {
            scene.tick(DT);
        }
        assert_eq!(scene.progress(), 0.0);
        assert_eq!(scene.star().height(), 4.2);
        assert_eq!(scene.shadow_opacity(), SHADOW_OPACITY);
        for p in scene.foliage().points() {
            assert_eq!(p.current, p.assembled);
        }
    }

    #[test]
    fn test_is_exploded_reflects_mutations_before_tick() {
        let mut scene = composer();
        assert!(scene.toggle_exploded());
        assert!(scene.is_exploded());

        scene.update_config(ConfigUpdate { is_exploded: Some(false), ..Default::default() }).unwrap();
        assert!(!scene.is_exploded());

        let config = TreeConfig { is_exploded: true, ..TreeConfig::default() };
        scene.set_config(config).unwrap();
        assert!(scene.is_exploded());
        // Nothing has moved yet
        assert_eq!(scene.progress(), 0.0);
    }

    #[test]
    fn test_clock_stays_exact_over_long_sessions() {
        let empty = SceneParams {
            foliage_count: 0,
            fairy_light_count: 0,
            bauble_count: 0,
            gift_count: 0,
            tier_count: 15,
        };
        let mut scene = SceneComposer::new(TreeConfig::default(), empty, Box::new(StdRandom::seeded(1)));

        // Half an hour at 60 fps
        let frames = 108_000;
        for _ in 0..frames {
            scene.tick(DT);
        }
        let expected = f64::from(DT) * frames as f64;
        assert!((scene.time() - expected).abs() < 1e-6, "{} vs {}", scene.time(), expected);
    }

    #[test]
    fn test_camera_holds_while_exploded() {
        let mut scene = composer();
        scene.tick(DT);
        let azimuth = scene.camera().azimuth();
        assert!(azimuth > 0.0);

        scene.toggle_exploded();
        scene.tick(DT);
        assert_eq!(scene.camera().azimuth(), azimuth);
    }

    #[test]
    fn test_theme_change_recolors_on_tick() {
        let mut scene = composer();
        scene.apply_theme(ThemePreset::Sapphire);
        scene.tick(DT);

        assert_eq!(scene.fairy_lights().color(), Theme::ICE);
        assert_eq!(scene.ornaments().theme(), Theme::SAPPHIRE);
        for o in scene.ornaments().baubles() {
            assert!(o.color == Theme::GOLD || o.color == Theme::SAPPHIRE);
        }
    }

    #[test]
    fn test_bloom_passthrough() {
        let mut scene = composer();
        scene.set_bloom_intensity(2.5).unwrap();
        scene.tick(DT);
        assert_eq!(scene.snapshot().post.bloom_intensity, 2.5);
        assert!(scene.set_bloom_intensity(-1.0).is_err());
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut scene = composer();
        scene.toggle_exploded();
        scene.tick(f32::NAN);
        scene.tick(-1.0);
        assert_eq!(scene.time(), 0.0);
        assert_eq!(scene.progress(), 0.0);
    }

    #[test]
    fn test_render_frame_submits_snapshot() {
        let mut scene = composer();
        let mut renderer = RecordingRenderer::default();
        scene.upload_static(&mut renderer).unwrap();
        assert_eq!(renderer.uploaded, 100);

        scene.tick(0.5);
        scene.render_frame(&mut renderer).unwrap();
        assert_eq!(renderer.frames, vec![0.5]);
    }
}
