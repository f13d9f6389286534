//! High-level facade crate for the `board-cells-*` workspace.
//!
//! This crate provides:
//! - re-exports of the geometry, segmentation and state crates
//! - [`BoardTracker`], the frame-to-frame loop that keeps a [`state::Board`]
//!   aligned with what the camera sees
//! - JSON config and report types used by the `board-cells` binary
//! - (feature-gated) helpers that load and binarize frames with `image`.
//!
//! ## Quickstart
//!
//! ```no_run
//! use board_cells::{detect, BoardTracker, TrackerParams};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = detect::load_frame("board.png", 150)?;
//! let mut tracker = BoardTracker::new(TrackerParams::default());
//! let snapshot = tracker.process_frame(&frame.binary.view())?;
//! println!("{} cells, full: {}", snapshot.cells.len(), snapshot.full);
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `board_cells::core`: image buffers, polygons and the geometry provider.
//! - `board_cells::grid`: board localisation, cell segmentation and ordering.
//! - `board_cells::state`: cells, board state and the external message.
//! - `board_cells::detect` (feature `image`): frame loading and binarization.

pub use board_cells_core as core;
pub use board_cells_grid as grid;
pub use board_cells_state as state;

pub use board_cells_grid::{GridOrdering, SegmentError, Stage};
pub use board_cells_state::{Board, BoardMsg, Cell, CellState, Evidence};

mod io;
mod tracker;

pub use io::{BoardCellsConfig, FrameReport, IoError};
pub use tracker::{
    BoardSnapshot, BoardTracker, CellSnapshot, ColorEvidence, FrameError, TrackerParams,
};

#[cfg(feature = "image")]
pub mod detect;
