mod area;
mod point_in_polygon;
mod segments;

pub use area::*;
pub use point_in_polygon::*;
pub use segments::*;
