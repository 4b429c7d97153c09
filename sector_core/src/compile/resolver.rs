use multimap::MultiMap;
use ultraviolet::DVec2;

use crate::helpers::geom::{point_in_polygon, signed_area};
use crate::level::{Level, LineId, SectorId, WallLayer, TEXTURE_SCALE};

use super::{CompileReport, InvalidSpan};

impl Level {
    /// Finds which sectors are holes of which.
    ///
    /// A sector B is a candidate hole of A when every vector of B that A does
    /// not share lies strictly inside A's ring. Candidates nested through an
    /// intermediate sector are dropped, so `inside` only keeps the innermost
    /// level. Safe to run repeatedly.
    pub fn sector_inside_outside(&mut self) {
        for sector in &mut self.sectors {
            sector.inside.clear();
            sector.outside = None;
        }

        let rings: Vec<Vec<DVec2>> = self.sector_ids().map(|id| self.ring(id)).collect();
        let count = self.sectors.len();

        let mut candidates: Vec<Vec<SectorId>> = vec![Vec::new(); count];
        for a in 0..count {
            for b in 0..count {
                if a != b && self.encloses(SectorId(a), SectorId(b), &rings[a]) {
                    candidates[a].push(SectorId(b));
                }
            }
        }

        for a in 0..count {
            let direct: Vec<SectorId> = candidates[a]
                .iter()
                .copied()
                .filter(|&hole| {
                    !candidates[a]
                        .iter()
                        .any(|&mid| mid != hole && candidates[mid.0].contains(&hole))
                })
                .collect();

            for &hole in &direct {
                self.sectors[hole.0].outside = Some(SectorId(a));
            }
            self.sectors[a].inside = direct;
        }
    }

    fn encloses(&self, outer: SectorId, inner: SectorId, outer_ring: &[DVec2]) -> bool {
        let shared = &self.sector(outer).vecs;
        let mut inside = 0;

        for &v in &self.sector(inner).vecs {
            if shared.contains(&v) {
                continue;
            }
            if !point_in_polygon(self.vector(v), outer_ring) {
                return false;
            }
            inside += 1;
        }

        inside > 0
    }

    /// Pairs up the sectors on both sides of every line, links them as
    /// neighbors and derives the line's wall spans. Lines referenced by a
    /// single sector face that sector's `outside`, if any.
    pub fn sector_line_neighbors(&mut self, report: &mut CompileReport) {
        for sector in &mut self.sectors {
            sector.neighbors.clear();
        }
        for line in &mut self.lines {
            line.plus = None;
            line.minus = None;
        }

        let mut sectors_by_line: MultiMap<LineId, SectorId> = MultiMap::new();
        for id in self.sector_ids() {
            for &line in &self.sector(id).lines {
                let listed = sectors_by_line
                    .get_vec(&line)
                    .is_some_and(|sectors| sectors.contains(&id));
                if !listed {
                    sectors_by_line.insert(line, id);
                }
            }
        }

        for line in self.line_ids() {
            let (plus, minus) = match sectors_by_line.get_vec(&line).map(Vec::as_slice) {
                None | Some([]) => {
                    log::warn!("Line {} does not bound any sector", line.0);
                    report.unmatched_lines.push(line);
                    continue;
                }
                Some(&[only]) => (only, self.sector(only).outside),
                Some(&[plus, minus]) => (plus, Some(minus)),
                Some(&[plus, minus, ..]) => {
                    log::warn!(
                        "Line {} is shared by more than two sectors, pairing {} and {}",
                        line.0,
                        plus.0,
                        minus.0
                    );
                    (plus, Some(minus))
                }
            };

            if let Some(minus) = minus {
                self.link_neighbors(plus, minus);
            }
            self.update_line_sectors(line, plus, minus, report);
        }
    }

    fn link_neighbors(&mut self, a: SectorId, b: SectorId) {
        if a == b {
            return;
        }
        if !self.sectors[a.0].neighbors.contains(&b) {
            self.sectors[a.0].neighbors.push(b);
        }
        if !self.sectors[b.0].neighbors.contains(&a) {
            self.sectors[b.0].neighbors.push(a);
        }
    }

    fn update_line_sectors(
        &mut self,
        id: LineId,
        plus: SectorId,
        minus: Option<SectorId>,
        report: &mut CompileReport,
    ) {
        let (a, b) = self.line_points(id);
        let normal = self.outward_normal(id, plus);

        let front = self.sector(plus);
        let back = minus.map_or(front, |m| self.sector(m));

        let bands = [
            (
                WallLayer::Top,
                front.ceiling.max(back.ceiling),
                front.top.max(back.top),
            ),
            (
                WallLayer::Middle,
                front.floor.max(back.floor),
                front.ceiling.min(back.ceiling),
            ),
            (
                WallLayer::Bottom,
                front.bottom.min(back.bottom),
                front.floor.min(back.floor),
            ),
        ];

        let length = (b - a).mag();
        let line = &mut self.lines[id.0];
        line.plus = Some(plus);
        line.minus = minus;
        line.normal = normal;

        for (layer, floor, ceiling) in bands {
            let span = line.span_mut(layer);
            span.floor = floor;
            span.ceiling = ceiling;
            span.u = span.offset * TEXTURE_SCALE;
            span.v = floor * TEXTURE_SCALE;
            span.s = length * TEXTURE_SCALE;
            span.t = ceiling * TEXTURE_SCALE;

            if !span.is_valid() {
                log::warn!(
                    "Line {} {:?} wall spans {}..{}, which is empty or inverted",
                    id.0,
                    layer,
                    floor,
                    ceiling
                );
                report.invalid_spans.push(InvalidSpan {
                    line: id,
                    layer,
                    floor,
                    ceiling,
                });
            }
        }
    }

    /// Unit normal of the line pointing out of `sector`.
    fn outward_normal(&self, id: LineId, sector: SectorId) -> DVec2 {
        let line = self.line(id);
        let (a, b) = self.line_points(id);
        let dir = b - a;
        let len = dir.mag();
        if len == 0. {
            return DVec2::new(0., 0.);
        }

        let left = DVec2::new(-dir.y, dir.x) / len;
        let ring = &self.sector(sector).vecs;
        let ring_len = ring.len();

        // The winding of the ring tells which side the interior is on.
        let forward = (0..ring_len).find_map(|i| {
            let (p, q) = (ring[i], ring[(i + 1) % ring_len]);
            if (p, q) == (line.a, line.b) {
                Some(true)
            } else if (p, q) == (line.b, line.a) {
                Some(false)
            } else {
                None
            }
        });

        let interior_left = match forward {
            Some(forward) => forward == (signed_area(&self.ring(sector)) > 0.),
            None => {
                let probe = (a + b) * 0.5 + left * (len * 1e-3).min(1e-2);
                self.sector_has_point(sector, probe)
            }
        };

        if interior_left {
            -left
        } else {
            left
        }
    }
}
