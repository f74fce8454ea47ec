pub mod heap_set;
pub mod points_to_map;

pub use heap_set::{HeapSet, HeapUniverse};
pub use points_to_map::PointsToMap;
