pub mod error;
pub mod map_transform;
pub mod target_map;
pub mod tracing_support;

mod test_support;

pub use error::KeyCollision;
pub use map_transform::MapTransform;
pub use target_map::TargetMap;
