use ultraviolet::DVec2;

use super::orient;

/// Even-odd crossing test over a single contour. Points lying on an edge
/// count as outside.
pub fn point_in_polygon(point: DVec2, contour: &[DVec2]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut prev = contour[contour.len() - 1];
    for &curr in contour {
        if on_edge(point, prev, curr) {
            return false;
        }

        if (curr.y > point.y) != (prev.y > point.y) {
            let x = prev.x + (point.y - prev.y) * (curr.x - prev.x) / (curr.y - prev.y);
            if point.x < x {
                inside = !inside;
            }
        }
        prev = curr;
    }

    inside
}

fn on_edge(p: DVec2, a: DVec2, b: DVec2) -> bool {
    orient(a, b, p) == 0.
        && p.x >= a.x.min(b.x)
        && p.x <= a.x.max(b.x)
        && p.y >= a.y.min(b.y)
        && p.y <= a.y.max(b.y)
}
