use board_cells_core::{GeometryProvider, GrayImageView, ImageprocGeometry};
use log::debug;

#[cfg(feature = "tracing")]
use tracing::instrument;

use crate::{
    locate_inner_boundary, segment_cells, CellCandidate, GridOrdering, InnerBoundary,
    OrderingStrategy, SegmentError,
};

/// Output of one segmentation run: the inner boundary and the ordered cells.
#[derive(Clone, Debug)]
pub struct GridDetection {
    pub inner: InnerBoundary,
    pub cells: Vec<CellCandidate>,
}

/// Locate → segment → order, over a pluggable geometry provider.
pub struct CellGrid<G = ImageprocGeometry> {
    provider: G,
    ordering: Box<dyn OrderingStrategy + Send + Sync>,
}

impl CellGrid<ImageprocGeometry> {
    pub fn new(ordering: GridOrdering) -> Self {
        Self::with_provider(ImageprocGeometry, ordering)
    }
}

impl<G: GeometryProvider> CellGrid<G> {
    pub fn with_provider(provider: G, ordering: GridOrdering) -> Self {
        Self {
            provider,
            ordering: ordering.build(),
        }
    }

    /// Replace the ordering strategy with a custom implementation.
    pub fn with_strategy(mut self, ordering: Box<dyn OrderingStrategy + Send + Sync>) -> Self {
        self.ordering = ordering;
        self
    }

    #[inline]
    pub fn provider(&self) -> &G {
        &self.provider
    }

    #[inline]
    pub fn ordering(&self) -> &dyn OrderingStrategy {
        self.ordering.as_ref()
    }

    /// Locate the inner playing area in a binary frame.
    pub fn locate(&self, image: &GrayImageView<'_>) -> Result<InnerBoundary, SegmentError> {
        locate_inner_boundary(&self.provider, image)
    }

    /// Segment and order the cells inside an already located inner area.
    pub fn cells(&self, inner: &InnerBoundary) -> Result<Vec<CellCandidate>, SegmentError> {
        let raw = segment_cells(&self.provider, inner)?;
        let ordered = self.ordering.order(raw);
        debug!(
            "ordered {} cells with {}",
            ordered.len(),
            self.ordering.name()
        );
        Ok(ordered)
    }

    /// Full run on one binary frame.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, image), fields(width = image.width, height = image.height))
    )]
    pub fn detect(&self, image: &GrayImageView<'_>) -> Result<GridDetection, SegmentError> {
        let inner = self.locate(image)?;
        let cells = self.cells(&inner)?;
        Ok(GridDetection { inner, cells })
    }
}
