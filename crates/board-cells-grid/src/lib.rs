//! Board localisation and cell segmentation on top of `board-cells-core`.
//!
//! ## Quickstart
//!
//! ```
//! use board_cells_core::GrayImage;
//! use board_cells_grid::{CellGrid, GridOrdering};
//!
//! let frame = GrayImage::new(64, 64);
//! let grid = CellGrid::new(GridOrdering::default());
//! // A blank frame has no board in it.
//! assert!(grid.detect(&frame.view()).is_err());
//! ```
//!
//! Algorithm:
//! 1. Extract all boundary polygons from the binary frame.
//! 2. Keep the largest one (outer board boundary) and render it alone,
//!    dropping everything else in the frame.
//! 3. Re-extract; the second largest polygon is the inner playing area.
//! 4. Render the inner area and re-extract; every polygon except the largest
//!    is a candidate cell.
//! 5. Order the candidates row-major with an [`OrderingStrategy`].

mod detector;
mod error;
mod locate;
mod ordering;
mod segment;

pub use detector::{CellGrid, GridDetection};
pub use error::{SegmentError, Stage};
pub use locate::{locate_inner_boundary, rank_by_area, AreaRanking, InnerBoundary};
pub use ordering::{GridOrdering, OrderingStrategy, RowBucketOrdering, ScanOrderHeuristic};
pub use segment::{segment_cells, CellCandidate};

#[cfg(test)]
pub(crate) mod test_support {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use board_cells_core::{ContourNode, GeometryProvider, GrayImage, GrayImageView};

    /// Provider that replays canned extractions and records render calls.
    pub struct ScriptedGeometry {
        extractions: RefCell<VecDeque<Vec<ContourNode>>>,
        rendered: RefCell<Vec<usize>>,
    }

    impl ScriptedGeometry {
        pub fn new(extractions: Vec<Vec<ContourNode>>) -> Self {
            Self {
                extractions: RefCell::new(extractions.into()),
                rendered: RefCell::new(Vec::new()),
            }
        }

        pub fn rendered(&self) -> Vec<usize> {
            self.rendered.borrow().clone()
        }
    }

    impl GeometryProvider for ScriptedGeometry {
        fn find_contours(&self, _image: &GrayImageView<'_>) -> Vec<ContourNode> {
            self.extractions.borrow_mut().pop_front().unwrap_or_default()
        }

        fn render_filled(&self, _canvas: &mut GrayImage, _contours: &[ContourNode], index: usize) {
            self.rendered.borrow_mut().push(index);
        }
    }
}
