use ultraviolet::{DVec2, DVec3};

use crate::grid::CellSpan;
use crate::level::SectorId;

/// Position and motion of anything integrated against the grid.
///
/// World space: `x` and `z` are map coordinates, `y` points up and is the
/// height of the body's feet.
#[derive(Debug, Clone, Copy)]
pub struct CBody {
    pub pos: DVec3,
    pub vel: DVec3,
    /// Horizontal position before the last integration step.
    pub prev: DVec2,

    /// Half the side of the bounding box, and the collision circle radius.
    pub radius: f64,
    pub height: f64,

    /// Sector the body stands in, cached between ticks.
    pub sector: Option<SectorId>,
    pub floor: f64,
    pub ceiling: f64,

    /// Cells the body is currently registered in.
    pub span: CellSpan,

    pub grounded: bool,
    /// Whether any line was touched during the last tick.
    pub touched_lines: bool,
}

impl CBody {
    pub fn new(pos: DVec3, radius: f64, height: f64) -> Self {
        Self {
            pos,
            vel: DVec3::zero(),
            prev: DVec2::new(pos.x, pos.z),
            radius,
            height,
            sector: None,
            floor: f64::NEG_INFINITY,
            ceiling: f64::INFINITY,
            span: CellSpan::default(),
            grounded: false,
            touched_lines: false,
        }
    }

    /// Horizontal position as map coordinates.
    #[inline]
    pub fn xz(&self) -> DVec2 {
        DVec2::new(self.pos.x, self.pos.z)
    }

    #[inline]
    pub fn set_xz(&mut self, xz: DVec2) {
        self.pos.x = xz.x;
        self.pos.z = xz.y;
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.y + self.height
    }

    pub fn is_moving(&self) -> bool {
        self.vel.x != 0. || self.vel.y != 0. || self.vel.z != 0.
    }

    /// Bounding boxes overlap horizontally and the vertical extents overlap.
    pub fn overlaps(&self, other: &CBody) -> bool {
        let reach = self.radius + other.radius;
        (self.pos.x - other.pos.x).abs() < reach
            && (self.pos.z - other.pos.z).abs() < reach
            && self.pos.y < other.top()
            && other.pos.y < self.top()
    }
}
