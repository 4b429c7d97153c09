use serde::{Deserialize, Serialize};

use crate::MapError;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Line {
    /// Index of the start vector.
    pub a: usize,
    /// Index of the end vector.
    pub b: usize,

    #[serde(default)]
    pub top: Option<String>,
    #[serde(default)]
    pub middle: Option<String>,
    #[serde(default)]
    pub bottom: Option<String>,

    /// Flags are engine dependent.
    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub trigger: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sector {
    pub floor: f64,
    pub ceiling: f64,

    /// Lower extent of the bottom wall band. Defaults to `floor`.
    #[serde(default)]
    pub bottom: Option<f64>,
    /// Upper extent of the top wall band. Defaults to `ceiling`.
    #[serde(default)]
    pub top: Option<f64>,

    #[serde(default)]
    pub floor_texture: Option<String>,
    #[serde(default)]
    pub ceiling_texture: Option<String>,

    /// Ring of vector indices, consistently wound.
    pub vecs: Vec<usize>,
    /// Ring of line indices bounding the sector.
    pub lines: Vec<usize>,

    #[serde(default)]
    pub flags: u32,
    #[serde(default)]
    pub trigger: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thing {
    pub x: f64,
    pub y: f64,
    /// In degrees. Counter-clockwise from east.
    #[serde(default)]
    pub angle: f64,

    pub thing_type: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Map {
    #[serde(default)]
    pub name: String,

    /// Vectors are just points in X,Y space, shared by lines and sectors.
    pub vectors: Vec<Vector>,
    /// Lines connect two vectors and carry up to three wall textures.
    pub lines: Vec<Line>,
    /// Sectors are rings of vectors and lines, with floor/ceiling heights.
    pub sectors: Vec<Sector>,
    /// "Things" indicate heroes, monsters, items, etc.
    #[serde(default)]
    pub things: Vec<Thing>,
}

impl Map {
    pub fn from_json(json: &str) -> Result<Self, MapError> {
        let map: Map = serde_json::from_str(json)?;
        map.validate()?;
        Ok(map)
    }

    /// Checks every index reference. Geometry problems (winding, overlaps) are
    /// left to the compiler, which logs them instead of rejecting the map.
    pub fn validate(&self) -> Result<(), MapError> {
        let num_vectors = self.vectors.len();

        for (i, line) in self.lines.iter().enumerate() {
            for vector in [line.a, line.b] {
                if vector >= num_vectors {
                    return Err(MapError::LineVectorOutOfRange { line: i, vector });
                }
            }
            if line.a == line.b {
                return Err(MapError::DegenerateLine(i));
            }
        }

        for (i, sector) in self.sectors.iter().enumerate() {
            if sector.vecs.len() < 3 {
                return Err(MapError::SectorTooSmall(i));
            }
            if sector.vecs.len() != sector.lines.len() {
                return Err(MapError::SectorRingMismatch {
                    sector: i,
                    vecs: sector.vecs.len(),
                    lines: sector.lines.len(),
                });
            }
            if let Some(&vector) = sector.vecs.iter().find(|&&v| v >= num_vectors) {
                return Err(MapError::SectorVectorOutOfRange { sector: i, vector });
            }
            if let Some(&line) = sector.lines.iter().find(|&&l| l >= self.lines.len()) {
                return Err(MapError::SectorLineOutOfRange { sector: i, line });
            }
        }

        Ok(())
    }
}

impl Vector {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Line {
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            a,
            b,
            ..Default::default()
        }
    }

    pub fn with_middle(mut self, texture: &str) -> Self {
        self.middle = Some(texture.to_string());
        self
    }
}

impl Sector {
    pub fn new(floor: f64, ceiling: f64, vecs: Vec<usize>, lines: Vec<usize>) -> Self {
        Self {
            floor,
            ceiling,
            vecs,
            lines,
            ..Default::default()
        }
    }

    pub fn with_textures(mut self, floor: &str, ceiling: &str) -> Self {
        self.floor_texture = Some(floor.to_string());
        self.ceiling_texture = Some(ceiling.to_string());
        self
    }
}

impl Map {
    /// Appends an axis-aligned box sector with its own four vectors and lines,
    /// wound counter-clockwise. Returns the sector index.
    pub fn push_box(
        &mut self,
        min: (f64, f64),
        max: (f64, f64),
        floor: f64,
        ceiling: f64,
    ) -> usize {
        let first_vector = self.vectors.len();
        self.vectors.extend([
            Vector::new(min.0, min.1),
            Vector::new(max.0, min.1),
            Vector::new(max.0, max.1),
            Vector::new(min.0, max.1),
        ]);

        let first_line = self.lines.len();
        for i in 0..4 {
            self.lines.push(
                Line::new(first_vector + i, first_vector + (i + 1) % 4).with_middle("WALL"),
            );
        }

        self.sectors.push(
            Sector::new(
                floor,
                ceiling,
                (first_vector..first_vector + 4).collect(),
                (first_line..first_line + 4).collect(),
            )
            .with_textures("FLOOR", "CEIL"),
        );

        self.sectors.len() - 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_minimal_map() {
        let json = r#"{
            "vectors": [{"x": 0, "y": 0}, {"x": 10, "y": 0}, {"x": 10, "y": 10}],
            "lines": [{"a": 0, "b": 1, "middle": "STONE"}, {"a": 1, "b": 2}, {"a": 2, "b": 0}],
            "sectors": [{"floor": 0, "ceiling": 8, "vecs": [0, 1, 2], "lines": [0, 1, 2]}],
            "things": [{"x": 2, "y": 2, "thing_type": 1}]
        }"#;

        let map = Map::from_json(json).unwrap();
        assert_eq!(map.vectors.len(), 3);
        assert_eq!(map.lines[0].middle.as_deref(), Some("STONE"));
        assert_eq!(map.lines[1].middle, None);
        assert_eq!(map.sectors[0].bottom, None);
        assert_eq!(map.things[0].thing_type, 1);
    }

    #[test]
    fn rejects_out_of_range_vector() {
        let mut map = Map::default();
        map.push_box((0., 0.), (10., 10.), 0., 8.);
        map.lines[2].b = 99;

        assert!(matches!(
            map.validate(),
            Err(MapError::LineVectorOutOfRange { line: 2, vector: 99 })
        ));
    }

    #[test]
    fn rejects_ring_mismatch() {
        let mut map = Map::default();
        map.push_box((0., 0.), (10., 10.), 0., 8.);
        map.sectors[0].lines.pop();

        assert!(matches!(
            map.validate(),
            Err(MapError::SectorRingMismatch { sector: 0, vecs: 4, lines: 3 })
        ));
    }

    #[test]
    fn push_box_is_valid() {
        let mut map = Map::default();
        let a = map.push_box((0., 0.), (10., 10.), 0., 8.);
        let b = map.push_box((20., 0.), (30., 10.), 0., 8.);

        assert_eq!((a, b), (0, 1));
        assert_eq!(map.sectors[1].vecs, vec![4, 5, 6, 7]);
        assert!(map.validate().is_ok());
    }
}
