/// Pipeline stage that ran out of boundary polygons.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    OuterBoundary,
    InnerBoundary,
    Cells,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Stage::OuterBoundary => "outer boundary",
            Stage::InnerBoundary => "inner boundary",
            Stage::Cells => "cells",
        })
    }
}

/// Errors returned while locating and segmenting the board.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SegmentError {
    #[error("insufficient contours at {stage} stage (found {found})")]
    InsufficientContours { stage: Stage, found: usize },
}
