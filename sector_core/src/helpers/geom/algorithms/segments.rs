use ultraviolet::DVec2;

use crate::helpers::geom::EPSILON;

#[inline]
pub fn cross(a: DVec2, b: DVec2) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Twice the signed area of (a, b, c). Positive when c lies left of a→b.
#[inline]
pub fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    cross(b - a, c - a)
}

#[inline]
pub fn nearly_equal(a: DVec2, b: DVec2) -> bool {
    (a.x - b.x).abs() < EPSILON && (a.y - b.y).abs() < EPSILON
}

/// Closest point on segment a–b to p, with its parameter along the segment
/// clamped to [0, 1].
pub fn closest_point_on_segment(p: DVec2, a: DVec2, b: DVec2) -> (DVec2, f64) {
    let ab = b - a;
    let len_sq = ab.mag_sq();
    if len_sq < EPSILON {
        return (a, 0.);
    }

    let t = ((p - a).dot(ab) / len_sq).clamp(0., 1.);
    (a + ab * t, t)
}

fn on_segment(a: DVec2, b: DVec2, p: DVec2) -> bool {
    p.x >= a.x.min(b.x) - EPSILON
        && p.x <= a.x.max(b.x) + EPSILON
        && p.y >= a.y.min(b.y) - EPSILON
        && p.y <= a.y.max(b.y) + EPSILON
}

fn sign(value: f64) -> i8 {
    if value > EPSILON {
        1
    } else if value < -EPSILON {
        -1
    } else {
        0
    }
}

/// Closed segment intersection: touching and collinear overlap both count.
pub fn segments_intersect(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> bool {
    let d1 = sign(orient(q1, q2, p1));
    let d2 = sign(orient(q1, q2, p2));
    let d3 = sign(orient(p1, p2, q1));
    let d4 = sign(orient(p1, p2, q2));

    if d1 != d2 && d3 != d4 && d1 != 0 && d2 != 0 && d3 != 0 && d4 != 0 {
        return true;
    }

    (d1 == 0 && on_segment(q1, q2, p1))
        || (d2 == 0 && on_segment(q1, q2, p2))
        || (d3 == 0 && on_segment(p1, p2, q1))
        || (d4 == 0 && on_segment(p1, p2, q2))
}

/// Parameter along p1→p2 where it crosses the line through q1–q2, if the two
/// segments properly cross.
pub fn segment_crossing(p1: DVec2, p2: DVec2, q1: DVec2, q2: DVec2) -> Option<f64> {
    let r = p2 - p1;
    let s = q2 - q1;
    let denom = cross(r, s);
    if denom.abs() < EPSILON {
        return None;
    }

    let qp = q1 - p1;
    let t = cross(qp, s) / denom;
    let u = cross(qp, r) / denom;
    if (0. ..=1.).contains(&t) && (0. ..=1.).contains(&u) {
        Some(t)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_point_clamps_to_endpoints() {
        let a = DVec2::new(0., 0.);
        let b = DVec2::new(10., 0.);

        let (p, t) = closest_point_on_segment(DVec2::new(4., 3.), a, b);
        assert_eq!(p, DVec2::new(4., 0.));
        assert_eq!(t, 0.4);

        let (p, t) = closest_point_on_segment(DVec2::new(-4., 3.), a, b);
        assert_eq!(p, a);
        assert_eq!(t, 0.);
    }

    #[test]
    fn intersection_cases() {
        let o = DVec2::new(0., 0.);
        let x = DVec2::new(10., 0.);

        // Proper crossing.
        assert!(segments_intersect(o, x, DVec2::new(5., -5.), DVec2::new(5., 5.)));
        // Touching at an interior point.
        assert!(segments_intersect(o, x, DVec2::new(5., 0.), DVec2::new(5., 5.)));
        // Collinear overlap.
        assert!(segments_intersect(o, x, DVec2::new(8., 0.), DVec2::new(12., 0.)));
        // Collinear, disjoint.
        assert!(!segments_intersect(o, x, DVec2::new(11., 0.), DVec2::new(12., 0.)));
        // Parallel.
        assert!(!segments_intersect(o, x, DVec2::new(0., 1.), DVec2::new(10., 1.)));
    }

    #[test]
    fn crossing_parameter() {
        let t = segment_crossing(
            DVec2::new(0., 0.),
            DVec2::new(10., 0.),
            DVec2::new(2.5, -1.),
            DVec2::new(2.5, 1.),
        );
        assert_eq!(t, Some(0.25));
        assert_eq!(
            segment_crossing(
                DVec2::new(0., 0.),
                DVec2::new(1., 0.),
                DVec2::new(2.5, -1.),
                DVec2::new(2.5, 1.),
            ),
            None
        );
    }
}
