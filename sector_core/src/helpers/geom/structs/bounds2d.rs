use ultraviolet::DVec2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2d {
    pub min: DVec2,
    pub max: DVec2,
}

impl Bounds2d {
    pub fn empty() -> Self {
        Self {
            min: DVec2::new(f64::MAX, f64::MAX),
            max: DVec2::new(f64::MIN, f64::MIN),
        }
    }

    pub fn add_point(&mut self, point: DVec2) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// False until at least one point was added.
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grows_with_points() {
        let mut bounds = Bounds2d::empty();
        assert!(!bounds.is_valid());

        bounds.add_point(DVec2::new(1., 2.));
        bounds.add_point(DVec2::new(-1., 0.));
        assert!(bounds.is_valid());
        assert_eq!(bounds.min, DVec2::new(-1., 0.));
        assert_eq!(bounds.max, DVec2::new(1., 2.));
    }
}
