//! Triangulation of a polygon with holes.
//!
//! The polygon is split into y-monotone pieces by adding diagonals at merge
//! and split vertices, then each piece is clipped into triangles with the
//! usual stack walk. Internally the outer ring runs counter-clockwise and holes
//! clockwise, so the interior is always on the left of an edge.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::f64::consts::TAU;

use ultraviolet::DVec2;

use crate::error::GeometryError;
use crate::helpers::geom::{cross, nearly_equal, orient, segments_intersect, signed_area, EPSILON};

#[derive(Debug, Clone, Copy)]
struct Point {
    pos: DVec2,
    prev: usize,
    next: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexKind {
    Start,
    End,
    Split,
    Merge,
    Regular,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chain {
    Left,
    Right,
}

struct Polygon {
    points: Vec<Point>,
    /// Position of each point in sweep order.
    rank: Vec<usize>,
    /// Point indices in sweep order: top to bottom, then left to right.
    order: Vec<usize>,
    diagonals: Vec<(usize, usize)>,
}

/// Triangulates `outer` minus `holes`. Rings may have either winding.
///
/// Triangles come back clockwise in map space, which is the winding of an
/// upward-facing floor once lifted into world space.
pub fn triangulate(
    outer: &[DVec2],
    holes: &[Vec<DVec2>],
) -> Result<Vec<[DVec2; 3]>, GeometryError> {
    let mut points = Vec::new();
    push_ring(&mut points, outer, true)?;
    for hole in holes {
        push_ring(&mut points, hole, false)?;
    }

    let mut polygon = Polygon::new(points);
    polygon.check_simple()?;
    polygon.make_monotone()?;

    let mut triangles = Vec::new();
    for face in polygon.faces()? {
        polygon.triangulate_monotone(&face, &mut triangles)?;
    }

    Ok(triangles
        .into_iter()
        .map(|[a, b, c]| {
            // Monotone pieces come out counter-clockwise; flip for floors.
            if orient(a, b, c) > 0. {
                [a, c, b]
            } else {
                [a, b, c]
            }
        })
        .collect())
}

fn push_ring(points: &mut Vec<Point>, ring: &[DVec2], ccw: bool) -> Result<(), GeometryError> {
    let mut ring: Vec<DVec2> = ring.to_vec();
    ring.dedup_by(|a, b| nearly_equal(*a, *b));
    while ring.len() > 1 && nearly_equal(ring[0], ring[ring.len() - 1]) {
        ring.pop();
    }

    if ring.len() < 3 {
        return Err(GeometryError::Degenerate("ring has fewer than three points"));
    }

    let area = signed_area(&ring);
    if area.abs() < EPSILON {
        return Err(GeometryError::Degenerate("ring has no area"));
    }
    if (area > 0.) != ccw {
        ring.reverse();
    }

    let base = points.len();
    let len = ring.len();
    for (i, pos) in ring.into_iter().enumerate() {
        points.push(Point {
            pos,
            prev: base + (i + len - 1) % len,
            next: base + (i + 1) % len,
        });
    }

    Ok(())
}

impl Polygon {
    fn new(points: Vec<Point>) -> Self {
        let mut order: Vec<usize> = (0..points.len()).collect();
        order.sort_by(|&a, &b| sweep_cmp(&points, a, b));

        let mut rank = vec![0; points.len()];
        for (r, &i) in order.iter().enumerate() {
            rank[i] = r;
        }

        Self {
            points,
            rank,
            order,
            diagonals: Vec::new(),
        }
    }

    #[inline]
    fn pos(&self, i: usize) -> DVec2 {
        self.points[i].pos
    }

    /// True when `a` comes before `b` in the sweep.
    #[inline]
    fn above(&self, a: usize, b: usize) -> bool {
        self.rank[a] < self.rank[b]
    }

    fn kind(&self, v: usize) -> VertexKind {
        let Point { prev, next, pos } = self.points[v];
        let prev_below = self.above(v, prev);
        let next_below = self.above(v, next);
        let convex = orient(self.pos(prev), pos, self.pos(next)) > 0.;

        match (prev_below, next_below) {
            (true, true) if convex => VertexKind::Start,
            (true, true) => VertexKind::Split,
            (false, false) if convex => VertexKind::End,
            (false, false) => VertexKind::Merge,
            _ => VertexKind::Regular,
        }
    }

    /// Ring edges are identified by their starting point.
    fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.points.iter().enumerate().map(|(i, p)| (i, p.next))
    }

    fn check_simple(&self) -> Result<(), GeometryError> {
        let edges: Vec<(usize, usize)> = self.edges().collect();
        for (i, &(a1, a2)) in edges.iter().enumerate() {
            for &(b1, b2) in &edges[i + 1..] {
                if self.share_endpoint((a1, a2), (b1, b2)) {
                    continue;
                }
                if segments_intersect(self.pos(a1), self.pos(a2), self.pos(b1), self.pos(b2)) {
                    return Err(GeometryError::NonSimplePolygon(a1, b1));
                }
            }
        }
        Ok(())
    }

    fn share_endpoint(&self, (a1, a2): (usize, usize), (b1, b2): (usize, usize)) -> bool {
        [a1, a2].iter().any(|&a| {
            [b1, b2]
                .iter()
                .any(|&b| a == b || nearly_equal(self.pos(a), self.pos(b)))
        })
    }

    /// Whether w lies inside the interior angle at v.
    fn in_cone(&self, v: usize, w: usize) -> bool {
        let Point { prev, next, pos } = self.points[v];
        let (prev, next, target) = (self.pos(prev), self.pos(next), self.pos(w));

        if orient(prev, pos, next) >= 0. {
            orient(pos, target, prev) > 0. && orient(target, pos, next) > 0.
        } else {
            !(orient(pos, target, next) >= 0. && orient(target, pos, prev) >= 0.)
        }
    }

    fn valid_diagonal(&self, v: usize, w: usize) -> bool {
        let Point { prev, next, .. } = self.points[v];
        if v == w || w == prev || w == next || nearly_equal(self.pos(v), self.pos(w)) {
            return false;
        }
        if !self.in_cone(v, w) || !self.in_cone(w, v) {
            return false;
        }

        let (a, b) = (self.pos(v), self.pos(w));
        let blocked = self
            .edges()
            .chain(self.diagonals.iter().copied())
            .filter(|&edge| !self.share_endpoint(edge, (v, w)))
            .any(|(c, d)| segments_intersect(a, b, self.pos(c), self.pos(d)));

        !blocked
    }

    fn add_diagonal(&mut self, v: usize, w: usize) {
        let exists = self
            .diagonals
            .iter()
            .any(|&(a, b)| (a, b) == (v, w) || (a, b) == (w, v));
        if !exists {
            self.diagonals.push((v, w));
        }
    }

    /// Connects every merge vertex to the nearest visible vertex below it and
    /// every split vertex to the nearest visible vertex above it.
    fn make_monotone(&mut self) -> Result<(), GeometryError> {
        for r in 0..self.order.len() {
            let v = self.order[r];
            let candidates: Vec<usize> = match self.kind(v) {
                VertexKind::Merge => self.order[r + 1..].to_vec(),
                VertexKind::Split => self.order[..r].iter().rev().copied().collect(),
                VertexKind::Start | VertexKind::End | VertexKind::Regular => continue,
            };

            let Some(w) = candidates.into_iter().find(|&w| self.valid_diagonal(v, w)) else {
                let pos = self.pos(v);
                return Err(GeometryError::NoDiagonal { x: pos.x, y: pos.y });
            };
            self.add_diagonal(v, w);
        }
        Ok(())
    }

    /// Walks the planar subdivision formed by ring edges and diagonals. Each
    /// face is returned as point indices in counter-clockwise order.
    fn faces(&self) -> Result<Vec<Vec<usize>>, GeometryError> {
        let mut outgoing: Vec<Vec<usize>> = self.points.iter().map(|p| vec![p.next]).collect();
        for &(a, b) in &self.diagonals {
            outgoing[a].push(b);
            outgoing[b].push(a);
        }

        let directed: Vec<(usize, usize)> = self
            .edges()
            .chain(self.diagonals.iter().flat_map(|&(a, b)| [(a, b), (b, a)]))
            .collect();
        let limit = directed.len();

        let mut used = HashSet::new();
        let mut faces = Vec::new();

        for &start in &directed {
            if used.contains(&start) {
                continue;
            }

            let mut face = vec![start.0];
            let mut edge = start;
            loop {
                used.insert(edge);
                let next = (edge.1, self.turn(edge, &outgoing[edge.1]));
                if next == start {
                    break;
                }
                if used.contains(&next) || face.len() > limit {
                    return Err(GeometryError::UnclosedPolygon);
                }
                face.push(next.0);
                edge = next;
            }

            faces.push(face);
        }

        Ok(faces)
    }

    /// Picks the outgoing edge at `u → v` that makes the tightest left turn.
    fn turn(&self, (u, v): (usize, usize), outgoing: &[usize]) -> usize {
        let back = self.pos(u) - self.pos(v);
        let mut best = (f64::INFINITY, u);

        for &w in outgoing {
            if w == u && outgoing.len() > 1 {
                continue;
            }
            let out = self.pos(w) - self.pos(v);
            let mut angle = cross(out, back).atan2(out.dot(back));
            if angle <= 0. {
                angle += TAU;
            }
            if angle < best.0 {
                best = (angle, w);
            }
        }

        best.1
    }

    fn triangulate_monotone(
        &self,
        face: &[usize],
        out: &mut Vec<[DVec2; 3]>,
    ) -> Result<(), GeometryError> {
        let n = face.len();
        if n < 3 {
            return Err(GeometryError::Degenerate("face has fewer than three points"));
        }

        let face_area = signed_area(&face.iter().map(|&i| self.pos(i)).collect::<Vec<_>>()).abs();
        let start = out.len();

        let mut sorted = face.to_vec();
        sorted.sort_by_key(|&i| self.rank[i]);

        // From the top, the counter-clockwise walk runs down the left chain.
        let top = face
            .iter()
            .position(|&i| i == sorted[0])
            .unwrap_or_default();
        let bottom = sorted[n - 1];
        let mut chain = vec![Chain::Right; self.points.len()];
        let mut k = top;
        loop {
            chain[face[k]] = Chain::Left;
            k = (k + 1) % n;
            if face[k] == bottom {
                break;
            }
        }

        let mut push = |a: usize, b: usize, c: usize| {
            let tri = [self.pos(a), self.pos(b), self.pos(c)];
            if orient(tri[0], tri[1], tri[2]).abs() > EPSILON {
                out.push(tri);
            }
        };

        let mut stack = vec![sorted[0], sorted[1]];
        for &u in &sorted[2..n - 1] {
            let &last = stack.last().unwrap_or(&u);
            if chain[u] != chain[last] {
                while stack.len() > 1 {
                    let s = stack.pop().unwrap_or(u);
                    let below = stack[stack.len() - 1];
                    push(u, s, below);
                }
                stack.clear();
                stack.push(last);
                stack.push(u);
            } else {
                let mut last = stack.pop().unwrap_or(u);
                while let Some(&peak) = stack.last() {
                    let turn = orient(self.pos(peak), self.pos(u), self.pos(last));
                    let visible = match chain[u] {
                        Chain::Left => turn < -EPSILON,
                        Chain::Right => turn > EPSILON,
                    };
                    if !visible {
                        break;
                    }
                    push(u, last, peak);
                    last = peak;
                    stack.pop();
                }
                stack.push(last);
                stack.push(u);
            }
        }

        for pair in stack.windows(2) {
            push(bottom, pair[0], pair[1]);
        }

        let clipped: f64 = out[start..]
            .iter()
            .map(|t| orient(t[0], t[1], t[2]).abs() * 0.5)
            .sum();
        if (clipped - face_area).abs() > 1e-6 * face_area.max(1.) {
            out.truncate(start);
            return Err(GeometryError::NonMonotone);
        }

        Ok(())
    }
}

fn sweep_cmp(points: &[Point], a: usize, b: usize) -> Ordering {
    let (pa, pb) = (points[a].pos, points[b].pos);
    pb.y.total_cmp(&pa.y)
        .then(pa.x.total_cmp(&pb.x))
        .then(a.cmp(&b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    fn ring(points: &[(f64, f64)]) -> Vec<DVec2> {
        points.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
    }

    fn total_area(triangles: &[[DVec2; 3]]) -> f64 {
        triangles
            .iter()
            .map(|t| orient(t[0], t[1], t[2]).abs() * 0.5)
            .sum()
    }

    fn assert_floor_winding(triangles: &[[DVec2; 3]]) {
        for t in triangles {
            assert!(orient(t[0], t[1], t[2]) < 0., "{:?} is not clockwise", t);
        }
    }

    #[test]
    fn square() {
        let outer = ring(&[(0., 0.), (10., 0.), (10., 10.), (0., 10.)]);
        let triangles = triangulate(&outer, &[]).unwrap();
        assert_eq!(triangles.len(), 2);
        assert_approx_eq!(total_area(&triangles), 100.);
        assert_floor_winding(&triangles);
    }

    #[test]
    fn winding_of_input_does_not_matter() {
        let mut outer = ring(&[(0., 0.), (10., 0.), (10., 10.), (0., 10.)]);
        outer.reverse();
        let triangles = triangulate(&outer, &[]).unwrap();
        assert_approx_eq!(total_area(&triangles), 100.);
        assert_floor_winding(&triangles);
    }

    #[test]
    fn square_with_hole() {
        let outer = ring(&[(0., 0.), (20., 0.), (20., 20.), (0., 20.)]);
        let hole = ring(&[(5., 5.), (10., 5.), (10., 10.), (5., 10.)]);

        let mut polygon = Polygon::new({
            let mut points = Vec::new();
            push_ring(&mut points, &outer, true).unwrap();
            push_ring(&mut points, &hole, false).unwrap();
            points
        });
        polygon.make_monotone().unwrap();

        let diagonals: Vec<(DVec2, DVec2)> = polygon
            .diagonals
            .iter()
            .map(|&(a, b)| (polygon.pos(a), polygon.pos(b)))
            .collect();
        assert_eq!(diagonals.len(), 2);
        assert!(diagonals.contains(&(DVec2::new(5., 10.), DVec2::new(20., 20.))));
        assert!(diagonals.contains(&(DVec2::new(10., 5.), DVec2::new(0., 0.))));

        let triangles = triangulate(&outer, &[hole]).unwrap();
        assert_approx_eq!(total_area(&triangles), 375.);
        assert_floor_winding(&triangles);

        // Nothing covers the hole.
        let centre = DVec2::new(7.5, 7.5);
        for t in &triangles {
            let inside = orient(t[0], t[1], centre) < 0.
                && orient(t[1], t[2], centre) < 0.
                && orient(t[2], t[0], centre) < 0.;
            assert!(!inside);
        }
    }

    #[test]
    fn concave_comb() {
        // Two notches cut up from the bottom edge give split vertices.
        let outer = ring(&[
            (0., 0.),
            (2., 0.),
            (2., 6.),
            (4., 6.),
            (4., 0.),
            (6., 0.),
            (6., 6.),
            (8., 6.),
            (8., 0.),
            (10., 0.),
            (10., 10.),
            (0., 10.),
        ]);
        let triangles = triangulate(&outer, &[]).unwrap();
        assert_approx_eq!(total_area(&triangles), 100. - 2. * 12.);
        assert_floor_winding(&triangles);
    }

    #[test]
    fn two_holes() {
        let outer = ring(&[(0., 0.), (30., 0.), (30., 10.), (0., 10.)]);
        let a = ring(&[(5., 3.), (10., 3.), (10., 7.), (5., 7.)]);
        let b = ring(&[(20., 2.), (25., 2.), (25., 8.), (20., 8.)]);
        let triangles = triangulate(&outer, &[a, b]).unwrap();
        assert_approx_eq!(total_area(&triangles), 300. - 20. - 30.);
    }

    #[test]
    fn self_intersecting_ring_is_rejected() {
        // The third edge dips back across the first.
        let crossed = ring(&[(0., 0.), (10., 0.), (10., 10.), (4., -2.), (0., 10.)]);
        assert!(matches!(
            triangulate(&crossed, &[]),
            Err(GeometryError::NonSimplePolygon(..))
        ));
    }

    #[test]
    fn degenerate_ring_is_rejected() {
        let line = ring(&[(0., 0.), (5., 0.), (10., 0.)]);
        assert!(matches!(
            triangulate(&line, &[]),
            Err(GeometryError::Degenerate(_))
        ));
    }
}
