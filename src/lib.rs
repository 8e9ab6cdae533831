use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod animation;
pub mod config;
pub mod distribution;
pub mod error;
pub mod math;
pub mod mesh;
pub mod particles;
pub mod render;
pub mod rng;
pub mod scene;

pub use error::{Result, TreeError};

use config::{ConfigUpdate, SceneParams, ThemePreset, TreeConfig};
use render::RenderPipeline;
use rng::StdRandom;
use scene::SceneComposer;

/// Initialize panic hook and console logging
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    // A second init (e.g. hot reload) keeps the first logger
    let _ = console_log::init_with_level(log::Level::Debug);
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct ArixTree {
    composer: SceneComposer,
    pipeline: RenderPipeline,
    width: i32,
    height: i32,
}

#[wasm_bindgen]
impl ArixTree {
    /// Create a new engine instance
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> std::result::Result<ArixTree, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let mut pipeline = RenderPipeline::new(gl, width, height)?;

        let mut composer = SceneComposer::new(
            TreeConfig::default(),
            SceneParams::default(),
            Box::new(StdRandom::from_entropy()),
        );
        composer.camera_mut().set_viewport(width, height);
        composer.upload_static(&mut pipeline)?;

        log::info!("ArixTree created ({}x{})", width, height);

        Ok(Self {
            composer,
            pipeline,
            width,
            height,
        })
    }

    /// Replace the configuration from a YAML document
    #[wasm_bindgen]
    pub fn load_config(&mut self, yaml: &str) -> std::result::Result<(), JsValue> {
        let config = TreeConfig::from_yaml(yaml)?;
        self.composer.set_config(config)?;
        log::info!("Configuration loaded");
        Ok(())
    }

    /// Merge a partial YAML document into the current configuration
    #[wasm_bindgen]
    pub fn merge_config(&mut self, yaml: &str) -> std::result::Result<(), JsValue> {
        let update = ConfigUpdate::from_yaml(yaml)?;
        self.composer.update_config(update)?;
        log::debug!("Configuration merged");
        Ok(())
    }

    /// Advance the scene by `dt` seconds and draw it
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) -> std::result::Result<(), JsValue> {
        self.composer.tick(dt);
        self.composer.render_frame(&mut self.pipeline)?;
        Ok(())
    }

    /// Resize the canvas
    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) -> std::result::Result<(), JsValue> {
        self.width = width;
        self.height = height;
        self.composer.camera_mut().set_viewport(width, height);
        self.pipeline.resize(width, height)?;
        log::info!("Resized to {}x{}", width, height);
        Ok(())
    }

    /// Orbit camera
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.composer.camera_mut().orbit(delta_x, delta_y);
    }

    /// Zoom camera
    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.composer.camera_mut().zoom(delta);
    }

    // === UI Controls ===

    /// Flip between assembled and scattered; returns the new state
    #[wasm_bindgen]
    pub fn toggle_exploded(&mut self) -> bool {
        let exploded = self.composer.toggle_exploded();
        log::info!("Tree {}", if exploded { "exploded" } else { "assembled" });
        exploded
    }

    /// Switch auto-rotation on or off; returns the new speed
    #[wasm_bindgen]
    pub fn toggle_rotation(&mut self) -> f32 {
        self.composer.toggle_rotation()
    }

    /// Apply a named theme preset ("gold", "ruby", "sapphire"/"ice")
    #[wasm_bindgen]
    pub fn apply_theme(&mut self, name: &str) -> std::result::Result<(), JsValue> {
        let theme: ThemePreset = name.parse()?;
        self.composer.apply_theme(theme);
        log::info!("Theme set to {}", theme.name());
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_bloom_intensity(&mut self, intensity: f32) -> std::result::Result<(), JsValue> {
        self.composer.set_bloom_intensity(intensity)?;
        Ok(())
    }

    #[wasm_bindgen]
    pub fn is_exploded(&self) -> bool {
        self.composer.is_exploded()
    }

    /// Get foliage transition progress (0.0 assembled to 1.0 scattered)
    #[wasm_bindgen]
    pub fn get_progress(&self) -> f32 {
        self.composer.progress()
    }

    /// Current configuration as YAML
    #[wasm_bindgen]
    pub fn config_yaml(&self) -> std::result::Result<String, JsValue> {
        Ok(self.composer.config().to_yaml()?)
    }
}
