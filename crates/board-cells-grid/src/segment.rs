//! Extraction of candidate cell polygons inside the inner playing area.

use board_cells_core::{Contour, GeometryProvider, GrayImage};
use log::debug;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::locate::{rank_by_area, InnerBoundary};
use crate::{SegmentError, Stage};

/// One candidate cell polygon with its cached moments.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CellCandidate {
    pub contour: Contour,
    pub centroid: Point2<f32>,
    pub area: f64,
}

impl CellCandidate {
    pub fn new(contour: Contour) -> Self {
        let centroid = contour.centroid();
        let area = contour.area();
        Self {
            contour,
            centroid,
            area,
        }
    }
}

/// Render the inner area and return every polygon found in it except the
/// largest one, which reproduces the inner boundary itself.
///
/// Candidates keep the provider's scan order.
#[cfg_attr(feature = "tracing", instrument(level = "debug", skip_all))]
pub fn segment_cells<G: GeometryProvider + ?Sized>(
    provider: &G,
    inner: &InnerBoundary,
) -> Result<Vec<CellCandidate>, SegmentError> {
    let mut canvas = GrayImage::new(inner.width, inner.height);
    provider.render_filled(&mut canvas, &inner.contours, inner.index);

    let mut contours = provider.find_contours(&canvas.view());
    let Some(ranking) = rank_by_area(&contours) else {
        return Err(SegmentError::InsufficientContours {
            stage: Stage::Cells,
            found: 0,
        });
    };
    contours.remove(ranking.largest);

    if contours.is_empty() {
        return Err(SegmentError::InsufficientContours {
            stage: Stage::Cells,
            found: 0,
        });
    }
    debug!("segmented {} candidate cells", contours.len());

    Ok(contours
        .into_iter()
        .map(|node| CellCandidate::new(node.contour))
        .collect())
}
