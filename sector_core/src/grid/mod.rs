//! Fixed-cell spatial index over lines and moving entities.
//!
//! Lines are rasterized once when the grid is built. Things, missiles and
//! particles are registered into every cell their bounding box overlaps and
//! re-registered wholesale whenever that cell span changes.

mod cell;
mod raster;

pub use cell::*;
pub use raster::{supercover, touching};

use std::collections::HashSet;

use hecs::Entity;
use ultraviolet::DVec2;

use crate::level::{Level, LineId};

pub const CELL_SHIFT: u32 = 5;
pub const CELL_SIZE: f64 = (1 << CELL_SHIFT) as f64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityClass {
    Thing,
    Missile,
    Particle,
}

/// Inclusive range of cells: columns along x, rows along z.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellSpan {
    pub min_c: usize,
    pub max_c: usize,
    pub min_r: usize,
    pub max_r: usize,
}

impl CellSpan {
    /// Row-major, so iteration order is stable.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let (min_c, max_c) = (self.min_c, self.max_c);
        (self.min_r..=self.max_r).flat_map(move |r| (min_c..=max_c).map(move |c| (c, r)))
    }

    pub fn union(&self, other: &CellSpan) -> CellSpan {
        CellSpan {
            min_c: self.min_c.min(other.min_c),
            max_c: self.max_c.max(other.max_c),
            min_r: self.min_r.min(other.min_r),
            max_r: self.max_r.max(other.max_r),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Grid {
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A grid covering `[0, extent]`, at least one cell wide.
    pub fn new(extent: DVec2) -> Self {
        let cols = ((extent.x / CELL_SIZE).ceil() as usize).max(1);
        let rows = ((extent.y / CELL_SIZE).ceil() as usize).max(1);

        Self {
            cols,
            rows,
            cells: vec![Cell::default(); cols * rows],
        }
    }

    /// Builds the grid for a level and rasterizes all of its lines.
    pub fn from_level(level: &Level) -> Self {
        let mut grid = Self::new(level.extent());
        for id in level.line_ids() {
            let (a, b) = level.line_points(id);
            grid.add_line(id, a, b);
        }

        log::debug!("Grid is {}x{} cells", grid.cols, grid.rows);
        grid
    }

    fn add_line(&mut self, id: LineId, a: DVec2, b: DVec2) {
        for (c, r) in self.segment_cells(a, b) {
            let lines = &mut self.cell_mut(c, r).lines;
            if !lines.contains(&id) {
                lines.push(id);
            }
        }
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cell(&self, c: usize, r: usize) -> &Cell {
        &self.cells[r * self.cols + c]
    }

    #[inline]
    fn cell_mut(&mut self, c: usize, r: usize) -> &mut Cell {
        &mut self.cells[r * self.cols + c]
    }

    fn clamp_c(&self, c: i64) -> usize {
        c.clamp(0, self.cols as i64 - 1) as usize
    }

    fn clamp_r(&self, r: i64) -> usize {
        r.clamp(0, self.rows as i64 - 1) as usize
    }

    /// Column holding world x, clamped into the grid.
    pub fn column(&self, x: f64) -> usize {
        self.clamp_c((x / CELL_SIZE).floor() as i64)
    }

    /// Row holding world z, clamped into the grid.
    pub fn row(&self, z: f64) -> usize {
        self.clamp_r((z / CELL_SIZE).floor() as i64)
    }

    /// Cells overlapped by a square of half-size `radius` around `center`
    /// (world x, z).
    pub fn span_of(&self, center: DVec2, radius: f64) -> CellSpan {
        CellSpan {
            min_c: self.column(center.x - radius),
            max_c: self.column(center.x + radius),
            min_r: self.row(center.y - radius),
            max_r: self.row(center.y + radius),
        }
    }

    /// Cells a segment crosses or touches, in walk order and without repeats.
    /// Parts of the segment outside the grid land in the border cells.
    pub fn segment_cells(&self, a: DVec2, b: DVec2) -> Vec<(usize, usize)> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();

        supercover(a / CELL_SIZE, b / CELL_SIZE, |c, r| {
            let cell = (self.clamp_c(c), self.clamp_r(r));
            if seen.insert(cell) {
                out.push(cell);
            }
        });

        out
    }

    pub fn insert(&mut self, class: EntityClass, entity: Entity, span: CellSpan) {
        for (c, r) in span.cells() {
            self.cell_mut(c, r).entities_mut(class).push(entity);
        }
    }

    pub fn remove(&mut self, class: EntityClass, entity: Entity, span: CellSpan) {
        for (c, r) in span.cells() {
            self.cell_mut(c, r).entities_mut(class).remove(entity);
        }
    }

    /// Moves an entity from one span to another. Returns false when the span
    /// did not change and nothing was done.
    pub fn rebucket(
        &mut self,
        class: EntityClass,
        entity: Entity,
        old: CellSpan,
        new: CellSpan,
    ) -> bool {
        if old == new {
            return false;
        }
        self.remove(class, entity, old);
        self.insert(class, entity, new);
        true
    }

    /// Appends the entities of a class found in the span, skipping any already
    /// in `seen`. Order follows the cell walk, then the cell's own order.
    pub fn gather_entities(
        &self,
        class: EntityClass,
        span: CellSpan,
        seen: &mut HashSet<Entity>,
        out: &mut Vec<Entity>,
    ) {
        for (c, r) in span.cells() {
            for &entity in self.cell(c, r).entities(class).as_slice() {
                if seen.insert(entity) {
                    out.push(entity);
                }
            }
        }
    }

    /// Appends the lines registered in the span, skipping any already in
    /// `seen`.
    pub fn gather_lines(&self, span: CellSpan, seen: &mut HashSet<LineId>, out: &mut Vec<LineId>) {
        for (c, r) in span.cells() {
            for &line in &self.cell(c, r).lines {
                if seen.insert(line) {
                    out.push(line);
                }
            }
        }
    }

    /// Number of cells an entity is registered in. Mostly useful in tests.
    pub fn registrations(&self, class: EntityClass, entity: Entity) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.entities(class).contains(entity))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sector_map_format::Map;

    #[test]
    fn dimensions_round_up() {
        let grid = Grid::new(DVec2::new(100., 64.));
        assert_eq!(grid.cols(), 4);
        assert_eq!(grid.rows(), 2);

        let empty = Grid::new(DVec2::new(0., 0.));
        assert_eq!((empty.cols(), empty.rows()), (1, 1));
    }

    #[test]
    fn indices_are_clamped() {
        let grid = Grid::new(DVec2::new(64., 64.));
        assert_eq!(grid.column(-5.), 0);
        assert_eq!(grid.column(64.), 1);
        assert_eq!(grid.row(1000.), 1);

        let span = grid.span_of(DVec2::new(31.5, 40.), 1.);
        assert_eq!(
            span,
            CellSpan {
                min_c: 0,
                max_c: 1,
                min_r: 1,
                max_r: 1
            }
        );
        assert_eq!(span.cells().collect::<Vec<_>>(), vec![(0, 1), (1, 1)]);
    }

    #[test]
    fn lines_land_in_every_crossed_cell() {
        let mut map = Map::default();
        map.push_box((0., 0.), (96., 64.), 0., 8.);
        let level = Level::from_map(&map);
        let grid = Grid::from_level(&level);
        assert_eq!((grid.cols(), grid.rows()), (3, 2));

        // The bottom edge runs along z = 0 through every column.
        for c in 0..3 {
            assert!(grid.cell(c, 0).lines.contains(&LineId(0)));
        }
        // The right edge at x = 96 sits on the far border and is clamped in.
        for r in 0..2 {
            assert!(grid.cell(2, r).lines.contains(&LineId(1)));
        }
        // Nothing crosses the middle column's top cell except the top edge.
        assert_eq!(grid.cell(1, 1).lines, vec![LineId(2)]);
    }

    #[test]
    fn rebucket_moves_registration() {
        let mut world = hecs::World::new();
        let entity = world.spawn(());

        let mut grid = Grid::new(DVec2::new(128., 128.));
        let old = grid.span_of(DVec2::new(31., 10.), 2.);
        grid.insert(EntityClass::Thing, entity, old);
        assert_eq!(grid.registrations(EntityClass::Thing, entity), 2);

        let new = grid.span_of(DVec2::new(50., 10.), 2.);
        assert!(grid.rebucket(EntityClass::Thing, entity, old, new));
        assert_eq!(grid.registrations(EntityClass::Thing, entity), 1);
        assert!(grid.cell(1, 0).things.contains(entity));
        assert!(!grid.cell(0, 0).things.contains(entity));
        assert!(!grid.rebucket(EntityClass::Thing, entity, new, new));

        // Other classes are kept apart.
        assert_eq!(grid.registrations(EntityClass::Missile, entity), 0);

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        grid.gather_entities(
            EntityClass::Thing,
            grid.span_of(DVec2::new(40., 10.), 20.),
            &mut seen,
            &mut found,
        );
        assert_eq!(found, vec![entity]);
    }
}
