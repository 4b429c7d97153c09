use bitflags::bitflags;

use crate::helpers::ChangedField;

use super::{LineId, SectorId, TextureId, Triangle, VectorId};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct SectorFlags: u32 {
        /// The trigger fires on the first entry only.
        const TriggerOnce = 0b00000001;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Floor,
    Ceiling,
}

impl Surface {
    /// Floors face up, ceilings face down.
    pub fn normal_sign(&self) -> f64 {
        match self {
            Surface::Floor => 1.,
            Surface::Ceiling => -1.,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Sector {
    /// Ring of vectors, consistently wound.
    pub vecs: Vec<VectorId>,
    /// Ring of bounding lines.
    pub lines: Vec<LineId>,

    pub floor: f64,
    pub ceiling: f64,
    pub bottom: f64,
    pub top: f64,

    pub floor_texture: Option<TextureId>,
    pub ceiling_texture: Option<TextureId>,

    /// Holes, innermost level only.
    pub inside: Vec<SectorId>,
    /// Enclosing sector when this sector is a hole.
    pub outside: Option<SectorId>,
    pub neighbors: Vec<SectorId>,

    /// Floor and ceiling triangles, told apart by `normal_sign`.
    pub triangles: ChangedField<Vec<Triangle>>,

    pub flags: SectorFlags,
    pub trigger: Option<u32>,
}

impl Sector {
    pub fn texture(&self, surface: Surface) -> Option<TextureId> {
        match surface {
            Surface::Floor => self.floor_texture,
            Surface::Ceiling => self.ceiling_texture,
        }
    }

    pub fn height(&self, surface: Surface) -> f64 {
        match surface {
            Surface::Floor => self.floor,
            Surface::Ceiling => self.ceiling,
        }
    }

    pub fn surface_triangles(&self, surface: Surface) -> impl Iterator<Item = &Triangle> {
        let sign = surface.normal_sign();
        self.triangles.iter().filter(move |tri| tri.normal_sign == sign)
    }

    pub fn has_neighbor(&self, other: SectorId) -> bool {
        self.neighbors.contains(&other)
    }
}
