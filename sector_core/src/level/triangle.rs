use ultraviolet::DVec2;

use crate::helpers::geom::orient;

use super::{TextureId, TEXTURE_SCALE};

/// One floor or ceiling triangle, ready for the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: DVec2,
    pub b: DVec2,
    pub c: DVec2,

    pub height: f64,
    pub texture: TextureId,
    /// (u, v) for a, b and c.
    pub uv: [f64; 6],
    /// +1 for floors, -1 for ceilings.
    pub normal_sign: f64,
}

impl Triangle {
    pub fn new(
        a: DVec2,
        b: DVec2,
        c: DVec2,
        height: f64,
        texture: TextureId,
        normal_sign: f64,
    ) -> Self {
        Self {
            a,
            b,
            c,
            height,
            texture,
            uv: [
                a.x * TEXTURE_SCALE,
                a.y * TEXTURE_SCALE,
                b.x * TEXTURE_SCALE,
                b.y * TEXTURE_SCALE,
                c.x * TEXTURE_SCALE,
                c.y * TEXTURE_SCALE,
            ],
            normal_sign,
        }
    }

    pub fn area(&self) -> f64 {
        orient(self.a, self.b, self.c).abs() * 0.5
    }

    pub fn centroid(&self) -> DVec2 {
        (self.a + self.b + self.c) * (1. / 3.)
    }

    /// Vertical component of the face normal once lifted into world space,
    /// where map (x, y) becomes world (x, z) and world y points up.
    pub fn normal_y(&self) -> f64 {
        let ab = self.b - self.a;
        let ac = self.c - self.a;
        // (ab.x, 0, ab.y) × (ac.x, 0, ac.y), y component.
        ab.y * ac.x - ab.x * ac.y
    }
}
