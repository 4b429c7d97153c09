//! Turns a freshly loaded [Level] into render- and physics-ready geometry.
//!
//! The passes run in a fixed order: containment (holes), line wiring with wall
//! spans, then floor and ceiling triangulation. Problems are logged and
//! collected in a [CompileReport]; they never abort compilation.

mod resolver;
mod triangulate;

pub use triangulate::triangulate;

use rayon::prelude::*;
use ultraviolet::DVec2;

use crate::error::GeometryError;
use crate::level::{Level, LineId, SectorId, Surface, Triangle, WallLayer};
use crate::Stopwatch;

#[derive(Debug, Clone, PartialEq)]
pub struct InvalidSpan {
    pub line: LineId,
    pub layer: WallLayer,
    pub floor: f64,
    pub ceiling: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TriangulationFailure {
    pub sector: SectorId,
    pub surface: Surface,
    pub error: GeometryError,
}

#[derive(Debug, Clone, Default)]
pub struct CompileReport {
    pub invalid_spans: Vec<InvalidSpan>,
    pub failed_triangulations: Vec<TriangulationFailure>,
    /// Lines no sector refers to. They keep no sides and no spans.
    pub unmatched_lines: Vec<LineId>,
}

impl CompileReport {
    pub fn is_clean(&self) -> bool {
        self.invalid_spans.is_empty()
            && self.failed_triangulations.is_empty()
            && self.unmatched_lines.is_empty()
    }

    fn record_failure(&mut self, failure: TriangulationFailure) {
        log::warn!(
            "Sector {} {:?} could not be triangulated: {}",
            failure.sector.0,
            failure.surface,
            failure.error
        );
        self.failed_triangulations.push(failure);
    }
}

impl Level {
    pub fn compile(&mut self) -> CompileReport {
        let mut report = CompileReport::default();
        let mut stopwatch = Stopwatch::new();

        self.sector_inside_outside();
        self.sector_line_neighbors(&mut report);
        let wiring_time = stopwatch.lap();

        self.sector_triangulate(&mut report);
        let triangulate_time = stopwatch.lap();

        log::info!(
            "Compiled {} sectors and {} lines (wiring {:?}, triangulation {:?})",
            self.sectors.len(),
            self.lines.len(),
            wiring_time,
            triangulate_time
        );
        if !report.is_clean() {
            log::warn!(
                "Compile finished with {} invalid spans, {} failed triangulations, {} unmatched lines",
                report.invalid_spans.len(),
                report.failed_triangulations.len(),
                report.unmatched_lines.len()
            );
        }

        report
    }

    /// Triangulates every sector. Sectors are independent, so they are
    /// processed in parallel; a failing side is left without triangles.
    pub fn sector_triangulate(&mut self, report: &mut CompileReport) {
        let results: Vec<(Vec<Triangle>, Vec<TriangulationFailure>)> = (0..self.sectors.len())
            .into_par_iter()
            .map(|i| self.triangulate_sector(SectorId(i)))
            .collect();

        for (sector, (triangles, failures)) in self.sectors.iter_mut().zip(results) {
            sector.triangles.set(triangles);
            for failure in failures {
                report.record_failure(failure);
            }
        }
    }

    fn triangulate_sector(&self, id: SectorId) -> (Vec<Triangle>, Vec<TriangulationFailure>) {
        let sector = self.sector(id);
        let surfaces: Vec<Surface> = [Surface::Floor, Surface::Ceiling]
            .into_iter()
            .filter(|&surface| sector.texture(surface).is_some())
            .collect();

        if surfaces.is_empty() {
            return (Vec::new(), Vec::new());
        }

        match self.sector_polygons(id) {
            Ok(polygons) => {
                let triangles = surfaces
                    .iter()
                    .flat_map(|&surface| self.stamp_triangles(id, surface, &polygons))
                    .collect();
                (triangles, Vec::new())
            }
            Err(error) => {
                let failures = surfaces
                    .into_iter()
                    .map(|surface| TriangulationFailure {
                        sector: id,
                        surface,
                        error: error.clone(),
                    })
                    .collect();
                (Vec::new(), failures)
            }
        }
    }

    /// Triangulates one side of a sector on its own, for a side that gains a
    /// texture after compilation. A failure is recorded and the side stays
    /// empty, as in a full compile.
    pub fn triangulate_surface(
        &self,
        id: SectorId,
        surface: Surface,
        report: &mut CompileReport,
    ) -> Vec<Triangle> {
        match self.sector_polygons(id) {
            Ok(polygons) => self.stamp_triangles(id, surface, &polygons),
            Err(error) => {
                report.record_failure(TriangulationFailure {
                    sector: id,
                    surface,
                    error,
                });
                Vec::new()
            }
        }
    }

    /// Floor-wound triangles covering the sector minus its holes.
    fn sector_polygons(&self, id: SectorId) -> Result<Vec<[DVec2; 3]>, GeometryError> {
        let holes: Vec<_> = self
            .sector(id)
            .inside
            .iter()
            .map(|&hole| self.ring(hole))
            .collect();
        triangulate(&self.ring(id), &holes)
    }

    fn stamp_triangles(
        &self,
        id: SectorId,
        surface: Surface,
        polygons: &[[DVec2; 3]],
    ) -> Vec<Triangle> {
        let sector = self.sector(id);
        let Some(texture) = sector.texture(surface) else {
            return Vec::new();
        };
        let height = sector.height(surface);
        let sign = surface.normal_sign();

        polygons
            .iter()
            .map(|&[a, b, c]| match surface {
                Surface::Floor => Triangle::new(a, b, c, height, texture, sign),
                Surface::Ceiling => Triangle::new(c, b, a, height, texture, sign),
            })
            .collect()
    }
}
