//! Per-tick integration of bodies against the level geometry and the grid.

mod projectile;
mod thing;

#[cfg(test)]
mod scene;

pub use thing::ThingStep;

use std::collections::HashSet;

use hecs::Entity;

use crate::components::CBody;
use crate::cvars::PhysicsConfig;
use crate::grid::{EntityClass, Grid};
use crate::level::{Level, Line, LineId};
use crate::sector_accel::SectorAccel;

/// Buffers reused across ticks so integration does not allocate. Owned by the
/// world and lent to the integrator.
#[derive(Debug, Default)]
pub struct TickScratch {
    pub visited: HashSet<Entity>,
    pub collided: Vec<Entity>,
    pub candidates: Vec<(Entity, CBody, bool)>,

    pub seen_lines: HashSet<LineId>,
    pub lines: Vec<LineId>,
    pub crossings: Vec<(f64, LineId)>,

    /// Lines the last integrated thing touched.
    pub touched_lines: Vec<LineId>,
    /// Non-blocking things the last integrated thing overlapped.
    pub touched_things: Vec<Entity>,

    /// Entities to visit this tick, in id order.
    pub order: Vec<Entity>,
}

/// Borrowed view of the static world used while integrating one tick.
pub struct Physics<'a> {
    pub level: &'a Level,
    pub grid: &'a mut Grid,
    pub accel: &'a SectorAccel,
    pub config: &'a PhysicsConfig,
}

impl Physics<'_> {
    /// Whether the line stops a body. Open lines let it through when it fits
    /// the passage, stepping up at most `step_height`.
    pub fn blocks(&self, line: &Line, body: &CBody) -> bool {
        if line.physical() {
            return true;
        }
        match self.level.opening(line) {
            None => true,
            Some((floor, ceiling)) => {
                floor - body.pos.y > self.config.step_height
                    || floor.max(body.pos.y) + body.height > ceiling
            }
        }
    }

    fn rebucket(&mut self, class: EntityClass, entity: Entity, body: &mut CBody) {
        let span = self.grid.span_of(body.xz(), body.radius);
        self.grid.rebucket(class, entity, body.span, span);
        body.span = span;
    }
}

#[inline]
fn manhattan(a: ultraviolet::DVec2, b: ultraviolet::DVec2) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}
