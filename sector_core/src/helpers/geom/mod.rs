mod algorithms;
mod structs;

pub use algorithms::*;
pub use structs::*;

/// Tolerance for degeneracy checks. Never used for vector identity.
pub const EPSILON: f64 = 1e-8;
