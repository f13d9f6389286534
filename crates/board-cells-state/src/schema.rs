//! Fixed-length board message exchanged with the robot-control side.

use serde::{Deserialize, Serialize};

use crate::CellState;

/// Slot count of the default schema (3x3 game board).
pub const BOARD_SLOTS: usize = 9;

/// One slot of the external message. The token is kept as text because the
/// sender is not trusted to use valid tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellMsg {
    pub state: String,
}

impl CellMsg {
    pub fn new(state: CellState) -> Self {
        Self {
            state: state.token().to_string(),
        }
    }
}

impl Default for CellMsg {
    fn default() -> Self {
        Self::new(CellState::Empty)
    }
}

/// Ordered board state as seen by the consumer, one slot per cell.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardMsg {
    pub cells: Vec<CellMsg>,
}

impl BoardMsg {
    /// All-`EMPTY` message with `slots` entries.
    pub fn empty(slots: usize) -> Self {
        Self {
            cells: vec![CellMsg::default(); slots],
        }
    }

    pub fn from_states(states: &[CellState]) -> Self {
        Self {
            cells: states.iter().copied().map(CellMsg::new).collect(),
        }
    }

    #[inline]
    pub fn slots(&self) -> usize {
        self.cells.len()
    }
}

impl Default for BoardMsg {
    fn default() -> Self {
        Self::empty(BOARD_SLOTS)
    }
}
