use std::fmt;
use std::str::FromStr;
use serde::{Deserialize, Serialize};
use crate::error::TreeError;

/// Linear RGB color with components in `[0, 1]`
///
/// Serialized as a `#RRGGBB` hex string.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build from a packed `0xRRGGBB` value
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Packed `0xRRGGBB` value, rounding each channel
    pub fn to_hex(&self) -> u32 {
        let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u32;
        (channel(self.r) << 16) | (channel(self.g) << 8) | channel(self.b)
    }

    pub fn to_array(&self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for Rgb {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TreeError::InvalidColor(s.to_string());
        let digits = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let packed = match digits.len() {
            6 => u32::from_str_radix(digits, 16).map_err(|_| invalid())?,
            3 => {
                // #abc expands to #aabbcc
                let short = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                let (r, g, b) = ((short >> 8) & 0xf, (short >> 4) & 0xf, short & 0xf);
                (r * 0x11) << 16 | (g * 0x11) << 8 | b * 0x11
            }
            _ => return Err(invalid()),
        };

        Ok(Self::from_hex(packed))
    }
}

impl TryFrom<String> for Rgb {
    type Error = TreeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.to_hex())
    }
}

/// Named colors of the scene palette
pub struct Theme;

impl Theme {
    pub const EMERALD: Rgb = Rgb::from_hex(0x002E1E);
    pub const EMERALD_DARK: Rgb = Rgb::from_hex(0x01150E);
    pub const GOLD: Rgb = Rgb::from_hex(0xFFD700);
    pub const CHAMPAGNE: Rgb = Rgb::from_hex(0xF7E7CE);
    pub const RUBY: Rgb = Rgb::from_hex(0x8B0000);
    pub const SAPPHIRE: Rgb = Rgb::from_hex(0x0F52BA);
    pub const OBSIDIAN: Rgb = Rgb::from_hex(0x0A0A0A);
    /// Pale blue used for fairy lights with the sapphire theme
    pub const ICE: Rgb = Rgb::from_hex(0xA0C4FF);
    /// Ambient light tint
    pub const MINT: Rgb = Rgb::from_hex(0xCCFFCC);
}
