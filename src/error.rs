//! Error types for the tree engine.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Errors raised at the configuration and rendering boundaries.
#[derive(Debug, Error)]
pub enum TreeError {
    /// Failed to parse a YAML configuration document.
    #[error("YAML parse error: {0}")]
    Config(#[from] serde_yaml::Error),
    /// A color string that is not `#RGB` or `#RRGGBB`.
    #[error("invalid color '{0}', expected #RGB or #RRGGBB")]
    InvalidColor(String),
    /// A theme preset name that does not exist.
    #[error("unknown theme '{0}'")]
    UnknownTheme(String),
    /// A configuration value outside its allowed range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// WebGL resource creation, shader compilation or linking failed.
    #[error("render error: {0}")]
    Render(String),
}

pub type Result<T> = std::result::Result<T, TreeError>;

impl From<TreeError> for JsValue {
    fn from(err: TreeError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
