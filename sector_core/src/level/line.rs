use bitflags::bitflags;
use ultraviolet::DVec2;

use super::{SectorId, TextureId, VectorId};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LineFlags: u32 {
        /// Blocks movement even when the passage between both sides is open.
        const Impassable = 0b00000001;
        /// The trigger fires for the first touch only.
        const TriggerOnce = 0b00000010;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WallLayer {
    Top,
    Middle,
    Bottom,
}

/// One textured vertical band of a line.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct WallSpan {
    pub texture: Option<TextureId>,

    pub floor: f64,
    pub ceiling: f64,

    pub u: f64,
    pub v: f64,
    pub s: f64,
    pub t: f64,

    pub offset: f64,
}

impl WallSpan {
    pub fn new(texture: Option<TextureId>) -> Self {
        Self {
            texture,
            ..Default::default()
        }
    }

    #[inline]
    pub fn in_use(&self) -> bool {
        self.texture.is_some()
    }

    /// In-use spans must satisfy `floor < ceiling`.
    pub fn is_valid(&self) -> bool {
        !self.in_use() || self.floor < self.ceiling
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub a: VectorId,
    pub b: VectorId,

    pub top: WallSpan,
    pub middle: WallSpan,
    pub bottom: WallSpan,

    /// Sector on the front side. Assigned once per compile.
    pub plus: Option<SectorId>,
    /// Sector on the back side, if any. Assigned once per compile.
    pub minus: Option<SectorId>,

    /// Unit normal pointing away from `plus`.
    pub normal: DVec2,

    pub flags: LineFlags,
    pub trigger: Option<u32>,
}

impl Line {
    pub fn new(
        a: VectorId,
        b: VectorId,
        textures: [Option<TextureId>; 3],
        flags: LineFlags,
        trigger: Option<u32>,
    ) -> Self {
        let [top, middle, bottom] = textures;
        Self {
            a,
            b,
            top: WallSpan::new(top),
            middle: WallSpan::new(middle),
            bottom: WallSpan::new(bottom),
            plus: None,
            minus: None,
            normal: DVec2::new(0., 0.),
            flags,
            trigger,
        }
    }

    pub fn span_mut(&mut self, layer: WallLayer) -> &mut WallSpan {
        match layer {
            WallLayer::Top => &mut self.top,
            WallLayer::Middle => &mut self.middle,
            WallLayer::Bottom => &mut self.bottom,
        }
    }

    /// Solid lines block everything: one-sided lines, lines with a middle
    /// wall, and lines flagged impassable. The rest are portals that only
    /// block when an actor does not fit the opening.
    pub fn physical(&self) -> bool {
        self.minus.is_none() || self.middle.in_use() || self.flags.contains(LineFlags::Impassable)
    }

    pub fn other_side(&self, sector: SectorId) -> Option<SectorId> {
        if self.plus == Some(sector) {
            self.minus
        } else if self.minus == Some(sector) {
            self.plus
        } else {
            None
        }
    }
}
