//! Reading order for the unordered cell candidates.
//!
//! The geometry provider returns candidates in its own scan order. An
//! [`OrderingStrategy`] turns them into a row-major sequence so that index
//! `i` of the board maps to the same physical cell on every frame.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::CellCandidate;

/// Pluggable cell ordering.
pub trait OrderingStrategy {
    fn name(&self) -> &'static str;

    /// Reorder `candidates` into row-major reading order (top-left first).
    fn order(&self, candidates: Vec<CellCandidate>) -> Vec<CellCandidate>;
}

/// Scan-position heuristic for providers that emit rows bottom-up.
///
/// `highest` is taken as the *last* candidate in scan order rather than the
/// one with the smallest y. That only holds while the provider's scan order
/// ends on the top row (bottom-up raster order, left to right within a row).
/// A top-down provider gets its rows reversed. Prefer [`RowBucketOrdering`]
/// unless the provider's order is known.
///
/// Two regimes:
/// - wide boards, `rightmost.x - highest.x > highest.x - leftmost.x`: plain
///   reverse scan order;
/// - square boards: with `side = floor(sqrt(n + 1))`, emit raw index
///   `row * side - col` for `row` and `col` both counting down from `side` to 1.
#[derive(Clone, Copy, Debug, Default)]
pub struct ScanOrderHeuristic;

impl OrderingStrategy for ScanOrderHeuristic {
    fn name(&self) -> &'static str {
        "scan_order"
    }

    fn order(&self, candidates: Vec<CellCandidate>) -> Vec<CellCandidate> {
        let Some(last) = candidates.last() else {
            return candidates;
        };
        let highest = last.centroid;
        let mut leftmost = candidates[0].centroid;
        let mut rightmost = candidates[0].centroid;
        for c in &candidates {
            if c.centroid.x < leftmost.x {
                leftmost = c.centroid;
            }
            if c.centroid.x > rightmost.x {
                rightmost = c.centroid;
            }
        }

        let n = candidates.len();
        if rightmost.x - highest.x > highest.x - leftmost.x {
            let mut out = candidates;
            out.reverse();
            return out;
        }

        let side = ((n + 1) as f64).sqrt().floor() as usize;
        let mut slots: Vec<Option<CellCandidate>> = candidates.into_iter().map(Some).collect();
        let mut out = Vec::with_capacity(n);
        for row in (1..=side).rev() {
            for col in (1..=side).rev() {
                let idx = row * side - col;
                match slots.get_mut(idx).and_then(Option::take) {
                    Some(c) => out.push(c),
                    None => warn!("scan order index {idx} outside {n} candidates, skipped"),
                }
            }
        }
        if out.len() != n {
            warn!(
                "scan order heuristic emitted {} of {} candidates (side {side})",
                out.len(),
                n
            );
        }
        out
    }
}

/// Bucket candidates into rows by centroid y, then sort each row by x.
///
/// A candidate opens a new row when its centroid lies more than
/// `row_tolerance * typical_side` below the current row's topmost centroid,
/// where `typical_side` is the square root of the median candidate area.
#[derive(Clone, Copy, Debug)]
pub struct RowBucketOrdering {
    pub row_tolerance: f32,
}

impl Default for RowBucketOrdering {
    fn default() -> Self {
        Self {
            row_tolerance: default_row_tolerance(),
        }
    }
}

impl OrderingStrategy for RowBucketOrdering {
    fn name(&self) -> &'static str {
        "row_buckets"
    }

    fn order(&self, mut candidates: Vec<CellCandidate>) -> Vec<CellCandidate> {
        let tol = self.row_tolerance * typical_side(&candidates);
        candidates.sort_by(|a, b| a.centroid.y.total_cmp(&b.centroid.y));

        let mut rows: Vec<Vec<CellCandidate>> = Vec::new();
        for c in candidates {
            match rows.last_mut() {
                Some(row) if c.centroid.y - row[0].centroid.y <= tol => row.push(c),
                _ => rows.push(vec![c]),
            }
        }

        rows.into_iter()
            .flat_map(|mut row| {
                row.sort_by(|a, b| a.centroid.x.total_cmp(&b.centroid.x));
                row
            })
            .collect()
    }
}

fn typical_side(candidates: &[CellCandidate]) -> f32 {
    let mut areas: Vec<f64> = candidates.iter().map(|c| c.area).collect();
    if areas.is_empty() {
        return 1.0;
    }
    areas.sort_by(f64::total_cmp);
    (areas[areas.len() / 2].sqrt() as f32).max(1.0)
}

fn default_row_tolerance() -> f32 {
    0.5
}

/// Serializable choice of [`OrderingStrategy`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GridOrdering {
    ScanOrder,
    RowBuckets {
        #[serde(default = "default_row_tolerance")]
        row_tolerance: f32,
    },
}

impl Default for GridOrdering {
    fn default() -> Self {
        GridOrdering::RowBuckets {
            row_tolerance: default_row_tolerance(),
        }
    }
}

impl GridOrdering {
    pub fn build(&self) -> Box<dyn OrderingStrategy + Send + Sync> {
        match *self {
            GridOrdering::ScanOrder => Box::new(ScanOrderHeuristic),
            GridOrdering::RowBuckets { row_tolerance } => {
                Box::new(RowBucketOrdering { row_tolerance })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_cells_core::Contour;

    fn cell_at(x: i32, y: i32) -> CellCandidate {
        CellCandidate::new(Contour::rect(x - 40, y - 40, x + 40, y + 40))
    }

    fn centers(cells: &[CellCandidate]) -> Vec<(i32, i32)> {
        cells
            .iter()
            .map(|c| (c.centroid.x.round() as i32, c.centroid.y.round() as i32))
            .collect()
    }

    fn row_major() -> Vec<(i32, i32)> {
        (0..3)
            .flat_map(|r| (0..3).map(move |c| (c * 100, r * 100)))
            .collect()
    }

    /// 3x3 grid delivered rows top-down, left to right.
    fn top_down_scan() -> Vec<CellCandidate> {
        row_major().into_iter().map(|(x, y)| cell_at(x, y)).collect()
    }

    /// 3x3 grid delivered rows bottom-up, left to right.
    fn bottom_up_scan() -> Vec<CellCandidate> {
        (0..3)
            .rev()
            .flat_map(|r| (0..3).map(move |c| cell_at(c * 100, r * 100)))
            .collect()
    }

    #[test]
    fn row_buckets_orders_raster_grid() {
        let out = RowBucketOrdering::default().order(top_down_scan());
        assert_eq!(centers(&out), row_major());
    }

    #[test]
    fn row_buckets_ignores_input_order() {
        let mut shuffled = top_down_scan();
        shuffled.swap(0, 8);
        shuffled.swap(2, 4);
        shuffled.reverse();
        let out = RowBucketOrdering::default().order(shuffled);
        assert_eq!(centers(&out), row_major());
    }

    #[test]
    fn row_buckets_tolerates_jitter() {
        let cells = vec![
            cell_at(205, 3),
            cell_at(0, 10),
            cell_at(98, -6),
            cell_at(100, 104),
            cell_at(3, 96),
        ];
        let out = RowBucketOrdering::default().order(cells);
        assert_eq!(
            centers(&out),
            vec![(0, 10), (98, -6), (205, 3), (3, 96), (100, 104)]
        );
    }

    #[test]
    fn scan_order_heuristic_orders_bottom_up_scan() {
        let out = ScanOrderHeuristic.order(bottom_up_scan());
        assert_eq!(centers(&out), row_major());
    }

    #[test]
    fn scan_order_heuristic_reverses_rows_for_top_down_scan() {
        let out = ScanOrderHeuristic.order(top_down_scan());
        let expected: Vec<(i32, i32)> = (0..3)
            .rev()
            .flat_map(|r| (0..3).map(move |c| (c * 100, r * 100)))
            .collect();
        assert_eq!(centers(&out), expected);
    }

    #[test]
    fn scan_order_heuristic_wide_board_reverses() {
        let cells = vec![cell_at(200, 0), cell_at(100, 0), cell_at(0, 0)];
        let out = ScanOrderHeuristic.order(cells);
        assert_eq!(centers(&out), vec![(0, 0), (100, 0), (200, 0)]);
    }

    #[test]
    fn scan_order_heuristic_skips_out_of_range_slots() {
        // n = 8 gives side 3, whose last raw index (8) does not exist.
        let cells: Vec<CellCandidate> = bottom_up_scan().into_iter().take(8).collect();
        let out = ScanOrderHeuristic.order(cells);
        assert_eq!(out.len(), 8);
    }

    #[test]
    fn scan_order_heuristic_drops_candidates_beyond_square() {
        // n = 10 still gives side 3, so one candidate has no slot.
        let mut cells = bottom_up_scan();
        cells.insert(0, cell_at(100, 300));
        let out = ScanOrderHeuristic.order(cells);
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn empty_input_is_passed_through() {
        assert!(ScanOrderHeuristic.order(Vec::new()).is_empty());
        assert!(RowBucketOrdering::default().order(Vec::new()).is_empty());
    }

    #[test]
    fn grid_ordering_config_round_trips_names() {
        let cfg: GridOrdering = serde_json::from_str(r#"{"kind":"scan_order"}"#).expect("json");
        assert_eq!(cfg.build().name(), "scan_order");
        let cfg: GridOrdering = serde_json::from_str(r#"{"kind":"row_buckets"}"#).expect("json");
        assert_eq!(cfg, GridOrdering::default());
        assert_eq!(cfg.build().name(), "row_buckets");
    }
}
