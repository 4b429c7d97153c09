use thiserror::Error;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("Map is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Line {line} references missing vector {vector}")]
    LineVectorOutOfRange { line: usize, vector: usize },
    #[error("Line {0} starts and ends on the same vector")]
    DegenerateLine(usize),

    #[error("Sector {sector} references missing vector {vector}")]
    SectorVectorOutOfRange { sector: usize, vector: usize },
    #[error("Sector {sector} references missing line {line}")]
    SectorLineOutOfRange { sector: usize, line: usize },
    #[error("Sector {0} has fewer than 3 vectors")]
    SectorTooSmall(usize),
    #[error("Sector {sector} has {vecs} vectors but {lines} lines")]
    SectorRingMismatch {
        sector: usize,
        vecs: usize,
        lines: usize,
    },
}
