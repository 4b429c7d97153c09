use ultraviolet::DVec2;

/// Walks every cell a segment passes through or touches, in order from `a`.
///
/// Coordinates are in cell units: cell (c, r) covers `[c, c+1) × [r, r+1)`.
/// When the segment runs exactly through a cell corner both side cells are
/// visited, and an axis-aligned segment lying on a cell boundary also visits
/// the cells on the other side of it. Endpoints on a boundary touch every
/// cell around them. Cells may be visited more than once.
pub fn supercover(a: DVec2, b: DVec2, mut visit: impl FnMut(i64, i64)) {
    touching(a, &mut visit);
    touching(b, &mut visit);

    let delta = b - a;

    let mut c = a.x.floor() as i64;
    let mut r = a.y.floor() as i64;

    let on_column_edge = delta.x == 0. && a.x == a.x.floor();
    let on_row_edge = delta.y == 0. && a.y == a.y.floor();

    let mut emit = |c: i64, r: i64| {
        visit(c, r);
        if on_column_edge {
            visit(c - 1, r);
        }
        if on_row_edge {
            visit(c, r - 1);
        }
    };

    let (step_c, mut t_max_x, t_delta_x) = axis(a.x, delta.x, c);
    let (step_r, mut t_max_y, t_delta_y) = axis(a.y, delta.y, r);

    emit(c, r);

    // Corner hits may take two steps at once, so this bounds every walk.
    let limit = (b.x.floor() as i64 - c).abs() + (b.y.floor() as i64 - r).abs() + 2;
    for _ in 0..limit {
        let t = t_max_x.min(t_max_y);
        if t > 1. {
            break;
        }

        if (t_max_x - t_max_y).abs() < 1e-12 {
            emit(c + step_c, r);
            emit(c, r + step_r);
            c += step_c;
            r += step_r;
            t_max_x += t_delta_x;
            t_max_y += t_delta_y;
        } else if t_max_x < t_max_y {
            c += step_c;
            t_max_x += t_delta_x;
        } else {
            r += step_r;
            t_max_y += t_delta_y;
        }

        emit(c, r);
    }
}

/// Every cell containing the point or sharing a boundary through it.
pub fn touching(p: DVec2, mut visit: impl FnMut(i64, i64)) {
    let (c, r) = (p.x.floor() as i64, p.y.floor() as i64);
    let cs = if p.x == p.x.floor() { c - 1 } else { c };
    let rs = if p.y == p.y.floor() { r - 1 } else { r };
    for c in cs..=c {
        for r in rs..=r {
            visit(c, r);
        }
    }
}

/// Step direction, parameter of the first boundary crossing, and parameter
/// distance between crossings along one axis.
fn axis(start: f64, delta: f64, cell: i64) -> (i64, f64, f64) {
    if delta > 0. {
        (1, ((cell + 1) as f64 - start) / delta, 1. / delta)
    } else if delta < 0. {
        (-1, (start - cell as f64) / -delta, 1. / -delta)
    } else {
        (0, f64::INFINITY, f64::INFINITY)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn cells(a: (f64, f64), b: (f64, f64)) -> HashSet<(i64, i64)> {
        let mut out = HashSet::new();
        supercover(DVec2::new(a.0, a.1), DVec2::new(b.0, b.1), |c, r| {
            out.insert((c, r));
        });
        out
    }

    #[test]
    fn shallow_segment() {
        let visited = cells((0.5, 0.5), (3.5, 1.5));
        for cell in [(0, 0), (1, 0), (1, 1), (2, 1), (3, 1)] {
            assert!(visited.contains(&cell), "missing {:?}", cell);
        }
    }

    #[test]
    fn diagonal_through_corners_visits_both_sides() {
        let visited = cells((0.5, 0.5), (2.5, 2.5));
        for cell in [(0, 0), (1, 0), (0, 1), (1, 1), (2, 1), (1, 2), (2, 2)] {
            assert!(visited.contains(&cell), "missing {:?}", cell);
        }
    }

    #[test]
    fn endpoint_on_corner_touches_all_four() {
        let visited = cells((2., 2.), (2.5, 2.7));
        for cell in [(1, 1), (2, 1), (1, 2), (2, 2)] {
            assert!(visited.contains(&cell), "missing {:?}", cell);
        }
    }

    #[test]
    fn boundary_segment_touches_both_columns() {
        let visited = cells((1., 0.2), (1., 2.8));
        for r in 0..3 {
            assert!(visited.contains(&(0, r)));
            assert!(visited.contains(&(1, r)));
        }
    }

    #[test]
    fn sampled_points_are_covered() {
        let segments = [
            ((0.3, 0.1), (7.9, 3.3)),
            ((6.2, 5.5), (0.4, 0.7)),
            ((2.0, 6.0), (5.5, 0.5)),
            ((3.0, 1.0), (3.0, 6.0)),
            ((0.1, 4.0), (7.0, 4.0)),
        ];

        for (a, b) in segments {
            let visited = cells(a, b);
            let (a, b) = (DVec2::new(a.0, a.1), DVec2::new(b.0, b.1));
            for i in 0..=1000 {
                let p = a + (b - a) * (i as f64 / 1000.);
                touching(p, |c, r| {
                    assert!(visited.contains(&(c, r)), "{:?} not covered at {:?}", (c, r), p);
                });
            }
        }
    }
}
