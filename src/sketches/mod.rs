//! The five sketches. Each one pairs a loaded dataset with the mapping and
//! drawing code for its picture and implements [`Sketch`](crate::app::Sketch).

pub mod biovis;
pub mod flower;
pub mod rainfall_chart;
pub mod rainfall_map;
pub mod spiral;

pub use biovis::BiovisSketch;
pub use flower::{Effects, FlowerSketch, Variant};
pub use rainfall_chart::RainfallChartSketch;
pub use rainfall_map::RainfallMapSketch;
pub use spiral::SpiralSketch;
