mod helpers;
mod map;

pub use helpers::MapError;
pub use map::*;
