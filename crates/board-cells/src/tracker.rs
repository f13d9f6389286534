//! Frame-to-frame board tracking.
//!
//! [`BoardTracker`] owns the [`Board`] for one physical game board and keeps
//! it aligned with the camera: the first good frame populates it, later frames
//! refresh the cell polygons in place, and colour observations drive the cell
//! states.

use board_cells_core::{GeometryProvider, GrayImageView, ImageprocGeometry, RgbImage, RgbImageView};
use board_cells_grid::{CellGrid, GridOrdering, InnerBoundary, SegmentError};
use board_cells_state::{Board, BoardError, BoardMsg, Cell, CellState, Evidence, BOARD_SLOTS};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors that drop a frame. The tracked board is never partially updated.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    #[error(transparent)]
    Segment(#[from] SegmentError),

    #[error("frame shows {found} cells but the board tracks {expected}")]
    CellCountChanged { expected: usize, found: usize },

    #[error("colour frame is {got:?} but the board was located in a {expected:?} frame")]
    FrameSize {
        expected: (usize, usize),
        got: (usize, usize),
    },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Tracker configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    pub ordering: GridOrdering,
    /// Slot count of the external board message.
    pub schema_slots: usize,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            ordering: GridOrdering::default(),
            schema_slots: BOARD_SLOTS,
        }
    }
}

/// Colour collaborator: counts the two piece colours in a masked cell region.
///
/// The region is the full colour frame with everything outside the cell set
/// to black.
pub trait ColorEvidence {
    fn count(&self, region: &RgbImage) -> Evidence;
}

impl<F> ColorEvidence for F
where
    F: Fn(&RgbImage) -> Evidence,
{
    fn count(&self, region: &RgbImage) -> Evidence {
        self(region)
    }
}

/// Per-cell view of the tracked board.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellSnapshot {
    pub state: CellState,
    pub evidence: Evidence,
    pub centroid: [f32; 2],
    pub area: f64,
}

/// The tracked board after a frame or an evidence update, cells in row-major order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub cells: Vec<CellSnapshot>,
    pub full: bool,
    pub empty: bool,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        let cells = board
            .cells()
            .iter()
            .map(|cell| {
                let c = cell.centroid();
                CellSnapshot {
                    state: cell.state(),
                    evidence: cell.evidence(),
                    centroid: [c.x, c.y],
                    area: cell.area(),
                }
            })
            .collect();
        Self {
            cells,
            full: board.is_full(),
            empty: board.is_empty(),
        }
    }

    pub fn states(&self) -> Vec<CellState> {
        self.cells.iter().map(|c| c.state).collect()
    }
}

/// Keeps one [`Board`] in sync with a stream of binary frames.
pub struct BoardTracker<G = ImageprocGeometry> {
    grid: CellGrid<G>,
    params: TrackerParams,
    board: Board,
    inner: Option<InnerBoundary>,
    redetect: bool,
}

impl BoardTracker<ImageprocGeometry> {
    pub fn new(params: TrackerParams) -> Self {
        Self::with_provider(ImageprocGeometry, params)
    }
}

impl<G: GeometryProvider> BoardTracker<G> {
    pub fn with_provider(provider: G, params: TrackerParams) -> Self {
        Self {
            grid: CellGrid::with_provider(provider, params.ordering),
            params,
            board: Board::new(),
            inner: None,
            redetect: false,
        }
    }

    #[inline]
    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    #[inline]
    pub fn grid(&self) -> &CellGrid<G> {
        &self.grid
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Inner boundary of the last successfully processed frame.
    #[inline]
    pub fn inner_boundary(&self) -> Option<&InnerBoundary> {
        self.inner.as_ref()
    }

    /// Rebuild the board from the next good frame, discarding cell states.
    pub fn request_redetection(&mut self) {
        self.redetect = true;
    }

    /// Forget the board and the last inner boundary.
    pub fn reset(&mut self) {
        self.board.reset_board();
        self.inner = None;
        self.redetect = false;
    }

    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::from_board(&self.board)
    }

    /// Fixed-length external message using the configured slot count.
    pub fn to_external(&self) -> BoardMsg {
        self.board.to_external_with_slots(self.params.schema_slots)
    }

    /// Run one binary frame through locate, segment and order.
    ///
    /// On an empty board (or after [`BoardTracker::request_redetection`]) the
    /// cells populate it. Otherwise the polygons of the existing cells are
    /// refreshed in order, which requires the cell count to be unchanged.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn process_frame(&mut self, image: &GrayImageView<'_>) -> Result<BoardSnapshot, FrameError> {
        self.try_process(image)
            .inspect_err(|err| warn!("frame dropped: {err}"))
    }

    fn try_process(&mut self, image: &GrayImageView<'_>) -> Result<BoardSnapshot, FrameError> {
        let detection = self.grid.detect(image)?;
        let found = detection.cells.len();

        if self.board.num_cells() == 0 || self.redetect {
            self.board = detection
                .cells
                .into_iter()
                .map(|c| Cell::new(c.contour))
                .collect();
            self.redetect = false;
            info!("board populated with {found} cells");
        } else if found != self.board.num_cells() {
            return Err(FrameError::CellCountChanged {
                expected: self.board.num_cells(),
                found,
            });
        } else {
            for (cell, candidate) in self.board.iter_mut().zip(detection.cells) {
                cell.set_contour(candidate.contour);
            }
            debug!("refreshed {found} cell polygons");
        }

        self.inner = Some(detection.inner);
        Ok(self.snapshot())
    }

    /// Store one evidence pair per cell and re-derive every state.
    pub fn apply_evidence(&mut self, evidence: &[Evidence]) -> Result<BoardSnapshot, FrameError> {
        self.board
            .apply_evidence(evidence)
            .inspect_err(|err| warn!("evidence rejected: {err}"))?;
        Ok(self.snapshot())
    }

    /// Count colours inside every cell of `frame` and apply the result.
    ///
    /// `frame` must have the size of the binary frame the board was located in.
    #[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
    pub fn observe_colors<C: ColorEvidence + ?Sized>(
        &mut self,
        frame: &RgbImageView<'_>,
        colors: &C,
    ) -> Result<BoardSnapshot, FrameError> {
        if self.board.num_cells() == 0 {
            warn!("colour frame ignored: no board located yet");
            return Err(BoardError::NoCells.into());
        }
        if let Some(inner) = &self.inner {
            let expected = (inner.width, inner.height);
            let got = (frame.width, frame.height);
            if expected != got {
                warn!("colour frame ignored: size {got:?}, expected {expected:?}");
                return Err(FrameError::FrameSize { expected, got });
            }
        }
        let evidence: Vec<Evidence> = self
            .board
            .cells()
            .iter()
            .map(|cell| colors.count(&cell.masked_region(frame)))
            .collect();
        self.apply_evidence(&evidence)
    }
}
