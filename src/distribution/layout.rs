//! Assembled (tree) and scattered (burst) layouts for every population
//!
//! Each entity gets both endpoints in one pass so they stay paired for its
//! whole lifetime. All draws come from a [`RandomSource`].

use std::f32::consts::TAU;
use crate::config::SceneParams;
use crate::math::Vec3;
use crate::rng::RandomSource;

/// World Y of the tree base
pub const TREE_BASE_Y: f32 = -3.0;
/// Height of the tree cone
pub const TREE_HEIGHT: f32 = 7.0;
/// Cone radius at the base
pub const TREE_BASE_RADIUS: f32 = 3.0;

/// Ornaments hug the outer 20% of the cone
const ORNAMENT_SURFACE_BIAS: f32 = 0.8;

/// Uniform jitter applied to each fairy light axis
pub const FAIRY_LIGHT_JITTER: f32 = 0.1;

/// Range of ornament phase offsets
pub const PHASE_OFFSET_RANGE: f32 = 100.0;

/// Population category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    FoliagePoint,
    FairyLight,
    Bauble,
    Gift,
}

/// Inclusive-exclusive interval `[min, max)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    pub min: f32,
    pub max: f32,
}

impl Band {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn sample(&self, rng: &mut dyn RandomSource) -> f32 {
        rng.range(self.min, self.max)
    }

    pub fn contains(&self, value: f32, tolerance: f32) -> bool {
        value >= self.min - tolerance && value <= self.max + tolerance
    }
}

impl Category {
    /// Radius band of the scattered sphere shell
    pub fn scatter_band(&self) -> Band {
        match self {
            Category::FoliagePoint => Band::new(10.0, 18.0),
            Category::FairyLight => Band::new(10.0, 20.0),
            Category::Bauble | Category::Gift => Band::new(8.0, 14.0),
        }
    }

    /// Vertical band ornaments are hung in; `None` for point clouds
    pub fn height_band(&self) -> Option<Band> {
        match self {
            Category::Bauble => Some(Band::new(-2.5, 3.5)),
            Category::Gift => Some(Band::new(-2.8, 1.0)), // gifts sit lower
            Category::FoliagePoint | Category::FairyLight => None,
        }
    }
}

/// Generated endpoints for a single entity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySeed {
    pub assembled: Vec3,
    pub scattered: Vec3,
    /// `randomSeed` in `[0, 1)` for point clouds, phase offset for ornaments
    pub seed: f32,
}

/// Cone radius at a world height, zero at and above the apex
pub fn cone_radius_at(y: f32) -> f32 {
    let progress = (y - TREE_BASE_Y) / TREE_HEIGHT;
    (TREE_BASE_RADIUS * (1.0 - progress)).max(0.0)
}

/// Uniform point on a sphere shell with radius drawn from `band`
///
/// The polar angle comes from `acos(2u - 1)` so directions do not bunch at
/// the poles.
pub fn scatter_position(rng: &mut dyn RandomSource, band: Band) -> Vec3 {
    let radius = band.sample(rng);
    let theta = rng.next_f32() * TAU;
    let phi = (2.0 * rng.next_f32() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::from_spherical(radius, theta, phi)
}

/// Volumetric point inside the foliage cone
pub fn foliage_position(rng: &mut dyn RandomSource, tier_count: u32) -> Vec3 {
    // Tier draw biases density toward lower tiers; geometry only uses `h`
    let _tier = if tier_count > 0 {
        ((rng.next_f32().powf(0.9) * tier_count as f32).floor() as u32).min(tier_count - 1)
    } else {
        rng.next_f32();
        0
    };

    let h = rng.next_f32();
    let y = TREE_BASE_Y + h * TREE_HEIGHT;
    let max_radius = (TREE_BASE_RADIUS * (1.0 - h)).max(0.0);
    // sqrt keeps area density uniform across the disk
    let r = max_radius * rng.next_f32().sqrt();
    let theta = rng.next_f32() * TAU;

    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Spiral position of light `index` out of `count`, with jitter
pub fn fairy_light_position(rng: &mut dyn RandomSource, index: usize, count: usize) -> Vec3 {
    let t = if count > 0 { index as f32 / count as f32 } else { 0.0 };
    let angle = t * 25.0; // about four turns
    let height = -2.8 + t * 6.5;
    let radius = 2.0 * (1.0 - t) + 0.1;

    let mut jitter = || (rng.next_f32() - 0.5) * 2.0 * FAIRY_LIGHT_JITTER;
    let (nx, ny, nz) = (jitter(), jitter(), jitter());

    Vec3::new(angle.cos() * radius + nx, height + ny, angle.sin() * radius + nz)
}

/// Point near the cone surface within a vertical band
pub fn ornament_position(rng: &mut dyn RandomSource, band: Band) -> Vec3 {
    let y = band.sample(rng);
    let max_radius = cone_radius_at(y);
    let r = max_radius * (ORNAMENT_SURFACE_BIAS + (1.0 - ORNAMENT_SURFACE_BIAS) * rng.next_f32());
    let theta = rng.next_f32() * TAU;

    Vec3::new(r * theta.cos(), y, r * theta.sin())
}

/// Generate `count` paired endpoints for a category
pub fn generate(
    category: Category,
    count: usize,
    params: &SceneParams,
    rng: &mut dyn RandomSource,
) -> Vec<EntitySeed> {
    let mut seeds = Vec::with_capacity(count);

    for i in 0..count {
        let seed = match category {
            Category::FoliagePoint => {
                let assembled = foliage_position(rng, params.tier_count);
                let scattered = scatter_position(rng, category.scatter_band());
                EntitySeed { assembled, scattered, seed: rng.next_f32() }
            }
            Category::FairyLight => {
                let assembled = fairy_light_position(rng, i, count);
                let seed = rng.next_f32();
                let scattered = scatter_position(rng, category.scatter_band());
                EntitySeed { assembled, scattered, seed }
            }
            Category::Bauble | Category::Gift => {
                let band = category.height_band().unwrap_or(Band::new(TREE_BASE_Y, TREE_BASE_Y + TREE_HEIGHT));
                let assembled = ornament_position(rng, band);
                let scattered = scatter_position(rng, category.scatter_band());
                EntitySeed { assembled, scattered, seed: rng.next_f32() * PHASE_OFFSET_RANGE }
            }
        };
        seeds.push(seed);
    }

    seeds
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{SequenceRandom, StdRandom};

    const EPS: f32 = 1e-4;

    #[test]
    fn test_foliage_inside_cone() {
        let mut rng = StdRandom::seeded(1);
        let seeds = generate(Category::FoliagePoint, 2000, &SceneParams::default(), &mut rng);
        assert_eq!(seeds.len(), 2000);

        for s in &seeds {
            let rel_y = (s.assembled.y - TREE_BASE_Y) / TREE_HEIGHT;
            assert!((0.0..=1.0).contains(&rel_y));
            assert!(s.assembled.radial_length() <= TREE_BASE_RADIUS * (1.0 - rel_y) + EPS);
            assert!((0.0..1.0).contains(&s.seed));
        }
    }

    #[test]
    fn test_scatter_within_band() {
        let mut rng = StdRandom::seeded(2);
        for category in [Category::FoliagePoint, Category::FairyLight, Category::Bauble, Category::Gift] {
            let band = category.scatter_band();
            for s in generate(category, 300, &SceneParams::default(), &mut rng) {
                let r = s.scattered.length();
                assert!(band.contains(r, 1e-3), "{:?} radius {} outside band", category, r);
            }
        }
    }

    #[test]
    fn test_ornaments_near_surface() {
        let mut rng = StdRandom::seeded(3);
        for category in [Category::Bauble, Category::Gift] {
            let band = category.height_band().unwrap();
            for s in generate(category, 200, &SceneParams::default(), &mut rng) {
                assert!(band.contains(s.assembled.y, EPS));
                let max_r = cone_radius_at(s.assembled.y);
                let r = s.assembled.radial_length();
                assert!(r <= max_r + EPS);
                assert!(r >= max_r * 0.8 - EPS);
                assert!((0.0..PHASE_OFFSET_RANGE).contains(&s.seed));
            }
        }
    }

    #[test]
    fn test_fairy_light_spiral() {
        let mut rng = StdRandom::seeded(4);
        let count = 300;
        let seeds = generate(Category::FairyLight, count, &SceneParams::default(), &mut rng);

        for (i, s) in seeds.iter().enumerate() {
            let t = i as f32 / count as f32;
            let angle = t * 25.0;
            let radius = 2.0 * (1.0 - t) + 0.1;
            let ideal = Vec3::new(angle.cos() * radius, -2.8 + t * 6.5, angle.sin() * radius);
            let offset = s.assembled - ideal;
            assert!(offset.x.abs() <= FAIRY_LIGHT_JITTER + EPS);
            assert!(offset.y.abs() <= FAIRY_LIGHT_JITTER + EPS);
            assert!(offset.z.abs() <= FAIRY_LIGHT_JITTER + EPS);
        }
    }

    #[test]
    fn test_single_foliage_point_from_fixed_draws() {
        // tier, h, r, theta, scatter r, scatter theta, scatter phi, seed
        let mut rng = SequenceRandom::new(vec![0.5, 0.25, 0.64, 0.0, 0.5, 0.25, 0.5, 0.75]);
        let seeds = generate(Category::FoliagePoint, 1, &SceneParams::default(), &mut rng);
        let s = seeds[0];

        assert!((s.assembled.y - (-1.25)).abs() < EPS);
        // radius = 3 * 0.75 * sqrt(0.64) = 1.8, theta = 0
        assert!((s.assembled.x - 1.8).abs() < EPS);
        assert!(s.assembled.z.abs() < EPS);
        assert!((-3.0..=4.0).contains(&s.assembled.y));

        assert!((s.scattered.length() - 14.0).abs() < 1e-3);
        assert!(Category::FoliagePoint.scatter_band().contains(s.scattered.length(), 1e-3));
        assert!((s.seed - 0.75).abs() < EPS);
        assert_eq!(rng.draws(), 8);
    }

    #[test]
    fn test_apex_has_zero_radius() {
        // h just below 1 puts the point at the apex; must not be NaN
        let mut rng = SequenceRandom::new(vec![0.0, 0.999_999, 0.5, 0.5]);
        let p = foliage_position(&mut rng, 15);
        assert!(p.x.is_finite() && p.z.is_finite());
        assert!(p.radial_length() < 1e-3);

        assert_eq!(cone_radius_at(TREE_BASE_Y + TREE_HEIGHT), 0.0);
        assert_eq!(cone_radius_at(10.0), 0.0);
    }

    #[test]
    fn test_zero_tier_count() {
        let mut rng = SequenceRandom::constant(0.5);
        let p = foliage_position(&mut rng, 0);
        assert!(p.y.is_finite());
        assert_eq!(rng.draws(), 4);
    }

    #[test]
    fn test_empty_population() {
        let mut rng = StdRandom::seeded(5);
        assert!(generate(Category::FairyLight, 0, &SceneParams::default(), &mut rng).is_empty());
    }

    #[test]
    fn test_scatter_directions_cover_both_hemispheres() {
        let mut rng = StdRandom::seeded(6);
        let band = Category::Bauble.scatter_band();
        let points: Vec<Vec3> = (0..500).map(|_| scatter_position(&mut rng, band)).collect();
        let upper = points.iter().filter(|p| p.z > 0.0).count();
        assert!(upper > 150 && upper < 350);
    }
}
