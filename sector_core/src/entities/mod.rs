mod missile;
mod particle;
mod thing;

pub use missile::*;
pub use particle::*;
pub use thing::*;
