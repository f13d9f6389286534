use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Symbolic occupancy of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellState {
    #[default]
    #[serde(rename = "EMPTY")]
    Empty,
    A,
    B,
}

impl CellState {
    pub const ALL: [CellState; 3] = [CellState::Empty, CellState::A, CellState::B];

    /// Token used by the external board schema.
    pub fn token(self) -> &'static str {
        match self {
            CellState::Empty => "EMPTY",
            CellState::A => "A",
            CellState::B => "B",
        }
    }

    #[inline]
    pub fn is_occupied(self) -> bool {
        self != CellState::Empty
    }
}

impl fmt::Display for CellState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// Errors from the state model.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    #[error("cell state token {0:?} not allowed")]
    InvalidToken(String),
}

impl FromStr for CellState {
    type Err = StateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CellState::ALL
            .into_iter()
            .find(|state| state.token() == s)
            .ok_or_else(|| StateError::InvalidToken(s.to_string()))
    }
}
