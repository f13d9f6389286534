use std::fmt;

use board_cells_core::{Contour, GrayImage, RgbImage, RgbImageView};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::{BoardMsg, Cell, CellState, Evidence, BOARD_SLOTS};

/// Errors returned by board-level operations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board has no cells")]
    NoCells,
    #[error("cell index {index} out of range for {len} cells")]
    IndexOutOfRange { index: usize, len: usize },
    #[error("evidence for {got} cells supplied to a board of {expected}")]
    EvidenceLength { expected: usize, got: usize },
}

/// Cells in reading order (row-major, top-left first).
///
/// Two boards are equal when they hold the same sequence of cell states.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Cell>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Board of `n` geometry-less empty cells.
    pub fn with_cells(n: usize) -> Self {
        Self {
            cells: vec![Cell::default(); n],
        }
    }

    pub fn add_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    #[inline]
    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Result<&mut Cell, BoardError> {
        let len = self.cells.len();
        self.cells
            .get_mut(index)
            .ok_or(BoardError::IndexOutOfRange { index, len })
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Cell> {
        self.cells.iter_mut()
    }

    #[inline]
    pub fn cell_state(&self, index: usize) -> Option<CellState> {
        self.cells.get(index).map(Cell::state)
    }

    pub fn states(&self) -> Vec<CellState> {
        self.cells.iter().map(Cell::state).collect()
    }

    pub fn set_cell_state(&mut self, index: usize, state: CellState) -> Result<(), BoardError> {
        self.cell_mut(index)?.set_state(state);
        Ok(())
    }

    pub fn set_cell(&mut self, index: usize, cell: Cell) -> Result<(), BoardError> {
        *self.cell_mut(index)? = cell;
        Ok(())
    }

    fn ensure_cells(&self) -> Result<(), BoardError> {
        if self.cells.is_empty() {
            Err(BoardError::NoCells)
        } else {
            Ok(())
        }
    }

    /// Reset state and evidence of every cell, keeping geometry.
    pub fn reset_cell_states(&mut self) -> Result<(), BoardError> {
        self.ensure_cells()?;
        self.cells.iter_mut().for_each(Cell::reset_state);
        Ok(())
    }

    /// Reset every cell including its geometry.
    pub fn reset_cells(&mut self) -> Result<(), BoardError> {
        self.ensure_cells()?;
        self.cells.iter_mut().for_each(Cell::reset_cell);
        Ok(())
    }

    /// Drop all cells.
    pub fn reset_board(&mut self) {
        self.cells.clear();
    }

    /// Re-derive every cell's state from its evidence.
    pub fn compute_state(&mut self) -> Result<(), BoardError> {
        self.ensure_cells()?;
        for cell in &mut self.cells {
            cell.compute_state();
        }
        Ok(())
    }

    /// Set the evidence of every cell, in order, then re-derive the states.
    ///
    /// Nothing is changed when the lengths disagree.
    pub fn apply_evidence(&mut self, evidence: &[Evidence]) -> Result<(), BoardError> {
        self.ensure_cells()?;
        if evidence.len() != self.cells.len() {
            return Err(BoardError::EvidenceLength {
                expected: self.cells.len(),
                got: evidence.len(),
            });
        }
        for (cell, &ev) in self.cells.iter_mut().zip(evidence) {
            cell.set_evidence(ev);
        }
        self.compute_state()
    }

    /// No cell is `Empty`. Vacuously `true` for a board without cells.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| c.state() != CellState::Empty)
    }

    /// No cell holds a piece. Vacuously `true` for a board without cells.
    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|c| !c.state().is_occupied())
    }

    pub fn contours(&self) -> Vec<Contour> {
        self.cells.iter().map(|c| c.contour().clone()).collect()
    }

    /// `frame` restricted to the union of all cell regions.
    pub fn mask_image(&self, frame: &RgbImageView<'_>) -> RgbImage {
        let mut mask = GrayImage::new(frame.width, frame.height);
        for cell in &self.cells {
            let m = cell.contour().fill_mask(frame.width, frame.height);
            for (dst, src) in mask.data.iter_mut().zip(m.data) {
                *dst |= src;
            }
        }

        let mut out = RgbImage::new(frame.width, frame.height);
        let pixels = out.data.chunks_exact_mut(3).zip(frame.data.chunks_exact(3));
        for ((dst, px), &m) in pixels.zip(&mask.data) {
            if m != 0 {
                dst.copy_from_slice(px);
            }
        }
        out
    }

    /// Replace the board with the cells described by `msg`.
    ///
    /// Invalid tokens are logged and skipped, so the board can end up with
    /// fewer cells than the message has slots.
    pub fn from_external(&mut self, msg: &BoardMsg) {
        self.reset_board();
        for (i, slot) in msg.cells.iter().enumerate() {
            match slot.state.parse::<CellState>() {
                Ok(state) => self.add_cell(Cell::with_state(state, Evidence::NONE)),
                Err(err) => warn!("board message slot {i}: {err}"),
            }
        }
    }

    /// Export into the default 9-slot schema.
    pub fn to_external(&self) -> BoardMsg {
        self.to_external_with_slots(BOARD_SLOTS)
    }

    /// Export into a schema with `slots` entries.
    ///
    /// When the cell count does not match, every slot is `EMPTY`.
    pub fn to_external_with_slots(&self, slots: usize) -> BoardMsg {
        if self.cells.len() != slots {
            warn!(
                "number of cells in board [{}] different from those in board message [{}]",
                self.cells.len(),
                slots
            );
            return BoardMsg::empty(slots);
        }
        BoardMsg::from_states(&self.states())
    }
}

impl FromIterator<Cell> for Board {
    fn from_iter<I: IntoIterator<Item = Cell>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, cell) in self.cells.iter().enumerate() {
            if i > 0 {
                f.write_str("\t")?;
            }
            write!(f, "{}", cell.state())?;
        }
        Ok(())
    }
}
