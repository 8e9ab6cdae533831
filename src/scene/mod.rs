pub mod camera;
pub mod composer;
pub mod frame;
pub mod topper;

pub use camera::OrbitCamera;
pub use composer::{SceneComposer, SceneRenderer};
pub use frame::{CameraFrame, FrameSnapshot, Lighting, PointLight, PostProcess, SpotLight, TREE_GROUP_OFFSET};
pub use topper::{StarTopper, STAR_ASSEMBLED_Y, STAR_EXPLODED_Y};
