use ultraviolet::DVec2;

use super::cross;

/// Shoelace formula. Positive for counter-clockwise rings.
pub fn signed_area(points: &[DVec2]) -> f64 {
    let mut sum = 0.;
    for (i, a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        sum += cross(*a, b);
    }
    sum * 0.5
}
