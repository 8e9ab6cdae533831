pub mod color;
pub mod tree_config;

pub use color::{Rgb, Theme};
pub use tree_config::{ConfigUpdate, SceneParams, ThemePreset, TreeConfig, DEFAULT_ROTATION_SPEED};
