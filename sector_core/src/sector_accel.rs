use bvh_arena::{volumes::Aabb, Bvh};
use ultraviolet::DVec2;

use crate::level::{Level, SectorId};

/// Bounding-volume hierarchy over sector bounds, so a point lookup only runs
/// the polygon test on sectors whose box contains the point.
pub struct SectorAccel {
    bvh: Bvh<SectorId, Aabb<2>>,
}

impl SectorAccel {
    pub fn new(level: &Level) -> Self {
        let mut bvh = Bvh::default();
        for id in level.sector_ids() {
            let bbox = level.sector_bounds(id);
            if !bbox.is_valid() {
                log::warn!("Sector {} has invalid bounding box", id.0);
            } else {
                let aabb = Aabb::from_min_max(
                    [bbox.min.x as f32, bbox.min.y as f32],
                    [bbox.max.x as f32, bbox.max.y as f32],
                );
                bvh.insert(id, aabb);
            }
        }
        Self { bvh }
    }

    /// Sector containing the map point, holes excluded. When several match
    /// (overlapping sectors) the lowest id wins.
    pub fn query(&self, level: &Level, point: DVec2) -> Option<SectorId> {
        let probe = [point.x as f32, point.y as f32];

        let mut found_sector: Option<SectorId> = None;
        self.bvh
            .for_each_overlaps(&Aabb::from_min_max(probe, probe), |&sector| {
                if found_sector.is_some_and(|found| found < sector) {
                    return;
                }
                if level.sector_has_point(sector, point) {
                    found_sector = Some(sector);
                }
            });

        found_sector
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sector_map_format::Map;

    #[test]
    fn query_skips_holes() {
        let mut map = Map::default();
        map.push_box((0., 0.), (20., 20.), 0., 8.);
        map.push_box((5., 5.), (10., 10.), 2., 6.);

        let mut level = Level::from_map(&map);
        level.compile();
        let accel = SectorAccel::new(&level);

        assert_eq!(accel.query(&level, DVec2::new(2., 2.)), Some(SectorId(0)));
        assert_eq!(accel.query(&level, DVec2::new(7., 7.)), Some(SectorId(1)));
        assert_eq!(accel.query(&level, DVec2::new(30., 7.)), None);
        assert_eq!(
            accel.query(&level, DVec2::new(7., 7.)),
            level.find_sector(DVec2::new(7., 7.))
        );
    }
}
