mod bounds2d;

pub use bounds2d::*;
