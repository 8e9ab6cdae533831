//! Procedural layouts for the tree and burst configurations
//!
//! Produces paired assembled / scattered endpoints per entity and the
//! generation-time color policy.

pub mod layout;
pub mod palette;

pub use layout::{
    cone_radius_at, generate, scatter_position, Band, Category, EntitySeed, TREE_BASE_RADIUS,
    TREE_BASE_Y, TREE_HEIGHT,
};
pub use palette::{pick_color, GIFT_COLORS};
