pub mod cvars;
pub mod world;

pub mod compile;
pub mod components;
pub mod entities;
pub mod error;
pub mod events;
pub mod grid;
pub mod level;
pub mod physics;

mod sector_accel;

pub(crate) mod helpers;

pub use error::GeometryError;
pub use events::{HitTarget, WorldEvent};
pub use helpers::{ChangedField, ChangedSet, Stopwatch};
pub use sector_accel::SectorAccel;
pub use world::World;
