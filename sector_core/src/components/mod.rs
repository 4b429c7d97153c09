mod body;
mod missile;
mod particle;
mod thing;

pub use body::*;
pub use missile::*;
pub use particle::*;
pub use thing::*;
