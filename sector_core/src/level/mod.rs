mod line;
mod sector;
mod texture;
mod triangle;

pub use line::*;
pub use sector::*;
pub use texture::*;
pub use triangle::*;

use sector_map_format::Map;
use ultraviolet::DVec2;

use crate::helpers::geom::{point_in_polygon, Bounds2d};

/// World units per texture repeat, as a multiplier for uv coordinates.
pub const TEXTURE_SCALE: f64 = 1. / 64.;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VectorId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LineId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SectorId(pub usize);

/// Dense arena holding the static geometry of one map.
///
/// Lines and sectors refer to each other through indices, so the
/// sector ↔ line ↔ sector graph has no ownership cycle. Every back-reference
/// (`plus`, `minus`, `inside`, `outside`, `neighbors`) is filled by
/// [Level::compile].
#[derive(Debug, Clone, Default)]
pub struct Level {
    pub vectors: Vec<DVec2>,
    pub lines: Vec<Line>,
    pub sectors: Vec<Sector>,
    pub textures: TextureRegistry,
}

impl Level {
    /// Builds the arena from deserialized records. The map is expected to be
    /// validated; out-of-range references are the deserializer's concern.
    pub fn from_map(map: &Map) -> Self {
        let mut textures = TextureRegistry::default();

        let vectors = map
            .vectors
            .iter()
            .map(|v| DVec2::new(v.x, v.y))
            .collect();

        let lines = map
            .lines
            .iter()
            .map(|line| {
                Line::new(
                    VectorId(line.a),
                    VectorId(line.b),
                    [
                        textures.intern_opt(line.top.as_deref()),
                        textures.intern_opt(line.middle.as_deref()),
                        textures.intern_opt(line.bottom.as_deref()),
                    ],
                    LineFlags::from_bits_truncate(line.flags),
                    line.trigger,
                )
            })
            .collect();

        let sectors = map
            .sectors
            .iter()
            .map(|sector| Sector {
                vecs: sector.vecs.iter().map(|&v| VectorId(v)).collect(),
                lines: sector.lines.iter().map(|&l| LineId(l)).collect(),
                floor: sector.floor,
                ceiling: sector.ceiling,
                bottom: sector.bottom.unwrap_or(sector.floor),
                top: sector.top.unwrap_or(sector.ceiling),
                floor_texture: textures.intern_opt(sector.floor_texture.as_deref()),
                ceiling_texture: textures.intern_opt(sector.ceiling_texture.as_deref()),
                flags: SectorFlags::from_bits_truncate(sector.flags),
                trigger: sector.trigger,
                ..Default::default()
            })
            .collect();

        Self {
            vectors,
            lines,
            sectors,
            textures,
        }
    }

    #[inline]
    pub fn vector(&self, id: VectorId) -> DVec2 {
        self.vectors[id.0]
    }

    #[inline]
    pub fn line(&self, id: LineId) -> &Line {
        &self.lines[id.0]
    }

    #[inline]
    pub fn sector(&self, id: SectorId) -> &Sector {
        &self.sectors[id.0]
    }

    pub fn sector_ids(&self) -> impl Iterator<Item = SectorId> {
        (0..self.sectors.len()).map(SectorId)
    }

    pub fn line_ids(&self) -> impl Iterator<Item = LineId> {
        (0..self.lines.len()).map(LineId)
    }

    /// Endpoints of a line in map space.
    pub fn line_points(&self, id: LineId) -> (DVec2, DVec2) {
        let line = self.line(id);
        (self.vector(line.a), self.vector(line.b))
    }

    /// Floor and ceiling of the passage through a two-sided line.
    pub fn opening(&self, line: &Line) -> Option<(f64, f64)> {
        let plus = self.sector(line.plus?);
        let minus = self.sector(line.minus?);
        Some((plus.floor.max(minus.floor), plus.ceiling.min(minus.ceiling)))
    }

    pub fn ring(&self, id: SectorId) -> Vec<DVec2> {
        self.sector(id)
            .vecs
            .iter()
            .map(|&v| self.vector(v))
            .collect()
    }

    pub fn sector_bounds(&self, id: SectorId) -> Bounds2d {
        let mut bounds = Bounds2d::empty();
        for &v in &self.sector(id).vecs {
            bounds.add_point(self.vector(v));
        }
        bounds
    }

    /// Largest coordinates in use; the grid spans [0, max].
    pub fn extent(&self) -> DVec2 {
        self.vectors.iter().fold(DVec2::new(0., 0.), |max, v| {
            DVec2::new(max.x.max(v.x), max.y.max(v.y))
        })
    }

    /// True when the point is strictly inside the sector's ring and not inside
    /// one of its holes.
    pub fn sector_has_point(&self, id: SectorId, point: DVec2) -> bool {
        if !point_in_polygon(point, &self.ring(id)) {
            return false;
        }

        !self
            .sector(id)
            .inside
            .iter()
            .any(|&hole| point_in_polygon(point, &self.ring(hole)))
    }

    /// Full point-in-polygon search over every sector.
    #[cfg(test)]
    pub fn find_sector(&self, point: DVec2) -> Option<SectorId> {
        self.sector_ids().find(|&id| self.sector_has_point(id, point))
    }
}
