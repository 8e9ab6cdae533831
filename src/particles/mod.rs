pub mod point_cloud;
pub mod foliage;
pub mod fairy_lights;
pub mod ornaments;

pub use point_cloud::PointCloudEntity;
pub use foliage::{foliage_point_size, FoliageSystem, FoliageUniforms, FOLIAGE_ATTRIBUTE_STRIDE};
pub use fairy_lights::{FairyLightSystem, FAIRY_LIGHT_RATE, FAIRY_LIGHT_STRIDE};
pub use ornaments::{
    float_amplitude, pack_instances, InstanceData, OrnamentInstance, OrnamentKind, OrnamentSystem,
    OrnamentTransform, INSTANCE_STRIDE, ORNAMENT_RATE,
};
