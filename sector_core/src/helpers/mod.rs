pub mod geom;

mod changed_field;
mod changed_set;
mod stopwatch;

pub use changed_field::ChangedField;
pub use changed_set::ChangedSet;
pub use stopwatch::Stopwatch;
