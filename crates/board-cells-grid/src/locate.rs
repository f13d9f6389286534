//! Two-stage isolation of the board's inner playing area.

use board_cells_core::{Contour, ContourNode, GeometryProvider, GrayImage, GrayImageView};
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{SegmentError, Stage};

/// Indices of the largest and second-largest polygons by area.
///
/// The largest is the first polygon of maximal area. The second largest is
/// the largest area strictly below it, so equal-area duplicates of the
/// largest never qualify.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AreaRanking {
    pub largest: usize,
    pub next_largest: Option<usize>,
}

pub fn rank_by_area(contours: &[ContourNode]) -> Option<AreaRanking> {
    let areas: Vec<f64> = contours.iter().map(ContourNode::area).collect();
    let mut largest: Option<usize> = None;
    for (i, &a) in areas.iter().enumerate() {
        if largest.is_none_or(|l| a > areas[l]) {
            largest = Some(i);
        }
    }
    let largest = largest?;

    let mut next_largest: Option<usize> = None;
    for (i, &a) in areas.iter().enumerate() {
        if a < areas[largest] && next_largest.is_none_or(|n| a > areas[n]) {
            next_largest = Some(i);
        }
    }

    Some(AreaRanking {
        largest,
        next_largest,
    })
}

/// The inner playing-area boundary together with the extraction it came from.
///
/// The surrounding contour set is kept so the segmenter can render the inner
/// area with everything nested inside it.
#[derive(Clone, Debug, PartialEq)]
pub struct InnerBoundary {
    pub contours: Vec<ContourNode>,
    pub index: usize,
    pub width: usize,
    pub height: usize,
}

impl InnerBoundary {
    #[inline]
    pub fn contour(&self) -> &Contour {
        &self.contours[self.index].contour
    }
}

/// Locate the outer board boundary, then the inner playing area inside it.
///
/// Stage 1 keeps only the largest polygon (everything else in the frame is
/// treated as clutter) and renders it on a blank canvas. Stage 2 re-extracts
/// from that canvas; the largest polygon is the rendered shape itself, so the
/// second largest is the inner boundary.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(provider, image), fields(width = image.width, height = image.height))
)]
pub fn locate_inner_boundary<G: GeometryProvider + ?Sized>(
    provider: &G,
    image: &GrayImageView<'_>,
) -> Result<InnerBoundary, SegmentError> {
    let raw = provider.find_contours(image);
    if raw.len() < 2 {
        return Err(SegmentError::InsufficientContours {
            stage: Stage::OuterBoundary,
            found: raw.len(),
        });
    }
    let outer = rank_by_area(&raw)
        .map(|r| r.largest)
        .ok_or(SegmentError::InsufficientContours {
            stage: Stage::OuterBoundary,
            found: raw.len(),
        })?;
    debug!(
        "outer boundary: contour {} of {} (area {:.1})",
        outer,
        raw.len(),
        raw[outer].area()
    );

    let mut canvas = GrayImage::new(image.width, image.height);
    provider.render_filled(&mut canvas, &raw, outer);

    let isolated = provider.find_contours(&canvas.view());
    let found = isolated.len();
    let inner = (found >= 2)
        .then(|| rank_by_area(&isolated))
        .flatten()
        .and_then(|r| r.next_largest)
        .ok_or(SegmentError::InsufficientContours {
            stage: Stage::InnerBoundary,
            found,
        })?;
    debug!(
        "inner boundary: contour {} of {} (area {:.1})",
        inner,
        found,
        isolated[inner].area()
    );

    Ok(InnerBoundary {
        contours: isolated,
        index: inner,
        width: image.width,
        height: image.height,
    })
}
