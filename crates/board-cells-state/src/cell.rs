use std::fmt;

use board_cells_core::{Contour, RgbImage, RgbImageView};
use log::warn;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{CellState, StateError};

/// Pixel counts of the two piece colours inside one cell region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    pub a: u32,
    pub b: u32,
}

impl Evidence {
    pub const NONE: Evidence = Evidence { a: 0, b: 0 };

    #[inline]
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    /// Dominant colour, ties going to `A`; `None` when both counts are zero.
    pub fn dominant(self) -> Option<CellState> {
        match (self.a, self.b) {
            (0, 0) => None,
            (a, b) if a >= b => Some(CellState::A),
            _ => Some(CellState::B),
        }
    }
}

/// One board square: its polygon, symbolic state and colour evidence.
///
/// Invariants kept by every state transition:
/// - `A` implies `evidence.a >= evidence.b`,
/// - `B` implies `evidence.b >= evidence.a`,
/// - `Empty` implies both counts are zero.
///
/// Equality compares the state only; geometry and evidence are ignored.
/// Deserialized cells go through [`Cell::set_state`], so stored evidence that
/// contradicts the stored state is bumped the same way.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(from = "CellRecord")]
pub struct Cell {
    contour: Contour,
    state: CellState,
    evidence: Evidence,
}

impl Cell {
    pub fn new(contour: Contour) -> Self {
        Self {
            contour,
            ..Self::default()
        }
    }

    /// Geometry-less cell with the given state; evidence is adjusted so the
    /// state invariants hold.
    pub fn with_state(state: CellState, evidence: Evidence) -> Self {
        let mut cell = Self {
            evidence,
            ..Self::default()
        };
        cell.set_state(state);
        cell
    }

    #[inline]
    pub fn contour(&self) -> &Contour {
        &self.contour
    }

    pub fn set_contour(&mut self, contour: Contour) {
        self.contour = contour;
    }

    #[inline]
    pub fn state(&self) -> CellState {
        self.state
    }

    #[inline]
    pub fn evidence(&self) -> Evidence {
        self.evidence
    }

    /// Store fresh colour evidence. The state is only re-derived by
    /// [`Cell::compute_state`].
    pub fn set_evidence(&mut self, evidence: Evidence) {
        self.evidence = evidence;
    }

    pub fn set_evidence_a(&mut self, a: u32) {
        self.evidence.a = a;
    }

    pub fn set_evidence_b(&mut self, b: u32) {
        self.evidence.b = b;
    }

    /// Back to `Empty` with zero evidence; geometry is kept.
    pub fn reset_state(&mut self) {
        self.state = CellState::Empty;
        self.evidence = Evidence::NONE;
    }

    /// [`Cell::reset_state`] plus dropping the polygon.
    pub fn reset_cell(&mut self) {
        self.reset_state();
        self.contour.clear();
    }

    /// Declare a state, bumping the evidence so the declared colour strictly
    /// dominates. `Empty` clears the evidence.
    pub fn set_state(&mut self, state: CellState) {
        match state {
            CellState::Empty => self.reset_state(),
            CellState::A => {
                if self.evidence.a <= self.evidence.b {
                    self.evidence.a = self.evidence.b.saturating_add(1);
                }
                self.state = state;
            }
            CellState::B => {
                if self.evidence.b <= self.evidence.a {
                    self.evidence.b = self.evidence.a.saturating_add(1);
                }
                self.state = state;
            }
        }
    }

    /// Parse and declare a state token; invalid tokens leave the cell untouched.
    pub fn set_state_token(&mut self, token: &str) -> Result<CellState, StateError> {
        let state = token.parse::<CellState>().inspect_err(|err| warn!("{err}"))?;
        self.set_state(state);
        Ok(state)
    }

    /// Derive the state from the current evidence alone.
    ///
    /// Returns `false` (and sets `Empty`) when there is no evidence at all.
    /// Ties between the two colours resolve to `A`.
    pub fn compute_state(&mut self) -> bool {
        match self.evidence.dominant() {
            Some(state) => {
                self.state = state;
                true
            }
            None => {
                self.reset_state();
                false
            }
        }
    }

    #[inline]
    pub fn centroid(&self) -> Point2<f32> {
        self.contour.centroid()
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.contour.area()
    }

    /// The part of `frame` covered by this cell; everything else is black.
    pub fn masked_region(&self, frame: &RgbImageView<'_>) -> RgbImage {
        self.contour.mask_rgb(frame)
    }
}

/// Serialized shape of a [`Cell`], trusted only after [`Cell::set_state`].
#[derive(Deserialize)]
struct CellRecord {
    #[serde(default)]
    contour: Contour,
    #[serde(default)]
    state: CellState,
    #[serde(default)]
    evidence: Evidence,
}

impl From<CellRecord> for Cell {
    fn from(record: CellRecord) -> Self {
        let mut cell = Cell::with_state(record.state, record.evidence);
        cell.contour = record.contour;
        cell
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.state == other.state
    }
}

impl Eq for Cell {}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "state: {}\tevidence A: {}\tevidence B: {}\t",
            self.state, self.evidence.a, self.evidence.b
        )?;
        if self.contour.is_empty() {
            return f.write_str("points: NONE;");
        }
        f.write_str("points:")?;
        for p in self.contour.points() {
            write!(f, "\t[{} {}]", p.x, p.y)?;
        }
        Ok(())
    }
}
