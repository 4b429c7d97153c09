use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("Polygon is not simple: edges {0} and {1} intersect")]
    NonSimplePolygon(usize, usize),
    #[error("No safe diagonal from vertex at ({x}, {y})")]
    NoDiagonal { x: f64, y: f64 },
    #[error("Degenerate polygon: {0}")]
    Degenerate(&'static str),
    #[error("Polygon boundary does not close")]
    UnclosedPolygon,
    #[error("Sub-polygon is not monotone")]
    NonMonotone,
}
