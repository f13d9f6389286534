//! Symbolic board state derived from accumulated colour evidence.
//!
//! A [`Cell`] pairs a polygon with a state (`EMPTY`, `A` or `B`) and the
//! pixel counts of both colours inside it. A [`Board`] is the ordered list of
//! cells and bridges to the fixed-length external [`BoardMsg`].
//!
//! ```
//! use board_cells_state::{Board, CellState, Evidence};
//!
//! let mut board = Board::with_cells(9);
//! let mut evidence = vec![Evidence::NONE; 9];
//! evidence[4] = Evidence::new(320, 12);
//! board.apply_evidence(&evidence).unwrap();
//! assert_eq!(board.cell_state(4), Some(CellState::A));
//! assert_eq!(board.to_external().cells[4].state, "A");
//! ```

mod board;
mod cell;
mod schema;
mod state;

pub use board::{Board, BoardError};
pub use cell::{Cell, Evidence};
pub use schema::{BoardMsg, CellMsg, BOARD_SLOTS};
pub use state::{CellState, StateError};
