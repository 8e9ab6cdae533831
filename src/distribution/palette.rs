use crate::config::{Rgb, Theme};
use super::layout::Category;

/// Colors gifts are wrapped in
pub const GIFT_COLORS: [Rgb; 3] = [Theme::RUBY, Theme::SAPPHIRE, Theme::GOLD];

/// Pick an entity color from its category, the active theme color and a
/// uniform roll in `[0, 1)`
///
/// Baubles split evenly between gold and the theme color, gifts pick from
/// a fixed saturated palette, fairy lights take the theme color as is and
/// foliage is always emerald (gold highlights come from the shader).
pub fn pick_color(category: Category, theme: Rgb, roll: f32) -> Rgb {
    match category {
        Category::Bauble => {
            if roll > 0.5 {
                Theme::GOLD
            } else {
                theme
            }
        }
        Category::Gift => {
            let index = ((roll.clamp(0.0, 1.0) * GIFT_COLORS.len() as f32) as usize)
                .min(GIFT_COLORS.len() - 1);
            GIFT_COLORS[index]
        }
        Category::FairyLight => theme,
        Category::FoliagePoint => Theme::EMERALD,
    }
}
