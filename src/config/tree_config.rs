use std::str::FromStr;
use serde::{Deserialize, Serialize};
use super::color::{Rgb, Theme};
use crate::error::{Result, TreeError};

/// Auto-rotation speed used when rotation is toggled back on
pub const DEFAULT_ROTATION_SPEED: f32 = 0.5;

/// Shared scene configuration, written by the UI and read every tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    pub light_color: Rgb,
    pub ornament_color: Rgb,
    pub rotation_speed: f32,
    pub bloom_intensity: f32,
    pub is_exploded: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            light_color: Theme::GOLD,
            ornament_color: Theme::GOLD,
            rotation_speed: DEFAULT_ROTATION_SPEED,
            bloom_intensity: 1.5,
            is_exploded: false, // start assembled
        }
    }
}

/// Partial update; `None` fields keep their current value
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ConfigUpdate {
    pub light_color: Option<Rgb>,
    pub ornament_color: Option<Rgb>,
    pub rotation_speed: Option<f32>,
    pub bloom_intensity: Option<f32>,
    pub is_exploded: Option<bool>,
}

impl ConfigUpdate {
    /// Parse a partial document; absent keys stay `None`
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl TreeConfig {
    /// Parse and validate from a YAML document
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: TreeConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.rotation_speed >= 0.0 && self.rotation_speed.is_finite()) {
            return Err(TreeError::InvalidConfig(format!(
                "rotation_speed must be a finite value >= 0, got {}",
                self.rotation_speed
            )));
        }
        if !(self.bloom_intensity >= 0.0 && self.bloom_intensity.is_finite()) {
            return Err(TreeError::InvalidConfig(format!(
                "bloom_intensity must be a finite value >= 0, got {}",
                self.bloom_intensity
            )));
        }
        Ok(())
    }

    /// Merge a partial update; the record is left untouched if the result is invalid
    pub fn merge(&mut self, update: ConfigUpdate) -> Result<()> {
        let merged = TreeConfig {
            light_color: update.light_color.unwrap_or(self.light_color),
            ornament_color: update.ornament_color.unwrap_or(self.ornament_color),
            rotation_speed: update.rotation_speed.unwrap_or(self.rotation_speed),
            bloom_intensity: update.bloom_intensity.unwrap_or(self.bloom_intensity),
            is_exploded: update.is_exploded.unwrap_or(self.is_exploded),
        };
        merged.validate()?;
        *self = merged;
        Ok(())
    }

    pub fn toggle_exploded(&mut self) {
        self.is_exploded = !self.is_exploded;
    }

    /// Switch auto-rotation between stopped and the default speed
    pub fn toggle_rotation(&mut self) {
        self.rotation_speed = if self.rotation_speed == 0.0 {
            DEFAULT_ROTATION_SPEED
        } else {
            0.0
        };
    }

    /// Assign the paired ornament / light colors of a preset
    pub fn apply_theme(&mut self, theme: ThemePreset) {
        let (ornament, light) = theme.colors();
        self.ornament_color = ornament;
        self.light_color = light;
    }

    pub fn set_bloom_intensity(&mut self, intensity: f32) -> Result<()> {
        self.merge(ConfigUpdate {
            bloom_intensity: Some(intensity),
            ..Default::default()
        })
    }

    /// Preset whose ornament color matches the current one, if any
    pub fn active_theme(&self) -> Option<ThemePreset> {
        ThemePreset::ALL
            .into_iter()
            .find(|preset| preset.colors().0 == self.ornament_color)
    }
}

/// Paired ornament / light color presets offered by the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemePreset {
    Gold,
    Ruby,
    Sapphire,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 3] = [ThemePreset::Gold, ThemePreset::Ruby, ThemePreset::Sapphire];

    /// (ornament color, light color)
    pub fn colors(&self) -> (Rgb, Rgb) {
        match self {
            ThemePreset::Gold => (Theme::GOLD, Theme::CHAMPAGNE),
            ThemePreset::Ruby => (Theme::RUBY, Theme::GOLD),
            ThemePreset::Sapphire => (Theme::SAPPHIRE, Theme::ICE),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ThemePreset::Gold => "gold",
            ThemePreset::Ruby => "ruby",
            ThemePreset::Sapphire => "sapphire",
        }
    }
}

impl FromStr for ThemePreset {
    type Err = TreeError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(ThemePreset::Gold),
            "ruby" => Ok(ThemePreset::Ruby),
            "sapphire" | "ice" => Ok(ThemePreset::Sapphire),
            _ => Err(TreeError::UnknownTheme(s.to_string())),
        }
    }
}

/// Population sizes and generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub foliage_count: usize,
    pub fairy_light_count: usize,
    pub bauble_count: usize,
    pub gift_count: usize,
    /// Tier count for the foliage density bias
    pub tier_count: u32,
}

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            foliage_count: 12_000, // dense foliage
            fairy_light_count: 300,
            bauble_count: 80,
            gift_count: 30,
            tier_count: 15,
        }
    }
}

impl SceneParams {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = TreeConfig::default();
        assert_eq!(config.ornament_color, Theme::GOLD);
        assert_eq!(config.rotation_speed, 0.5);
        assert_eq!(config.bloom_intensity, 1.5);
        assert!(!config.is_exploded);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r##"
light_color: "#A0C4FF"
ornament_color: "#0F52BA"
rotation_speed: 0.0
is_exploded: true
"##;
        let config = TreeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.light_color, Theme::ICE);
        assert_eq!(config.ornament_color, Theme::SAPPHIRE);
        assert_eq!(config.rotation_speed, 0.0);
        assert!(config.is_exploded);
        // Missing fields fall back to defaults
        assert_eq!(config.bloom_intensity, 1.5);
    }

    #[test]
    fn test_yaml_round_trip() {
        let mut config = TreeConfig::default();
        config.apply_theme(ThemePreset::Ruby);
        let yaml = config.to_yaml().unwrap();
        let back = TreeConfig::from_yaml(&yaml).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_invalid_color_rejected() {
        let result = TreeConfig::from_yaml("light_color: gold\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_negative_bloom_rejected() {
        let result = TreeConfig::from_yaml("bloom_intensity: -1.0\n");
        assert!(matches!(result, Err(TreeError::InvalidConfig(_))));
    }

    #[test]
    fn test_toggle_exploded() {
        let mut config = TreeConfig::default();
        config.toggle_exploded();
        assert!(config.is_exploded);
        config.toggle_exploded();
        assert!(!config.is_exploded);
    }

    #[test]
    fn test_toggle_rotation() {
        let mut config = TreeConfig::default();
        config.toggle_rotation();
        assert_eq!(config.rotation_speed, 0.0);
        config.toggle_rotation();
        assert_eq!(config.rotation_speed, DEFAULT_ROTATION_SPEED);
    }

    #[test]
    fn test_apply_theme_pairs() {
        let mut config = TreeConfig::default();
        config.apply_theme(ThemePreset::Sapphire);
        assert_eq!(config.ornament_color, Theme::SAPPHIRE);
        assert_eq!(config.light_color, Theme::ICE);
        assert_eq!(config.active_theme(), Some(ThemePreset::Sapphire));

        config.apply_theme(ThemePreset::Gold);
        assert_eq!(config.light_color, Theme::CHAMPAGNE);
    }

    #[test]
    fn test_merge_keeps_unset_fields() {
        let mut config = TreeConfig::default();
        config
            .merge(ConfigUpdate {
                is_exploded: Some(true),
                ..Default::default()
            })
            .unwrap();
        assert!(config.is_exploded);
        assert_eq!(config.ornament_color, Theme::GOLD);
    }

    #[test]
    fn test_merge_from_partial_yaml() {
        let mut config = TreeConfig::default();
        let update = ConfigUpdate::from_yaml("ornament_color: '#8B0000'\nrotation_speed: 0.0\n").unwrap();
        assert_eq!(update.light_color, None);
        config.merge(update).unwrap();
        assert_eq!(config.ornament_color, Theme::RUBY);
        assert_eq!(config.rotation_speed, 0.0);
        assert_eq!(config.light_color, Theme::GOLD);

        let bad = ConfigUpdate::from_yaml("bloom_intensity: -2.0\n").unwrap();
        assert!(config.merge(bad).is_err());
        assert_eq!(config.bloom_intensity, 1.5);
    }

    #[test]
    fn test_merge_rejects_invalid_without_change() {
        let mut config = TreeConfig::default();
        assert!(config.set_bloom_intensity(-0.5).is_err());
        assert_eq!(config.bloom_intensity, 1.5);

        config.set_bloom_intensity(3.0).unwrap();
        assert_eq!(config.bloom_intensity, 3.0);
    }

    #[test]
    fn test_theme_from_str() {
        assert_eq!("Ruby".parse::<ThemePreset>().unwrap(), ThemePreset::Ruby);
        assert_eq!("ice".parse::<ThemePreset>().unwrap(), ThemePreset::Sapphire);
        assert!(matches!(
            "neon".parse::<ThemePreset>(),
            Err(TreeError::UnknownTheme(_))
        ));
    }

    #[test]
    fn test_scene_params_defaults() {
        let params = SceneParams::from_yaml("fairy_light_count: 10\n").unwrap();
        assert_eq!(params.fairy_light_count, 10);
        assert_eq!(params.foliage_count, 12_000);
        assert_eq!(params.tier_count, 15);
    }
}
