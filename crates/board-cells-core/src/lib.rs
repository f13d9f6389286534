//! Core types and utilities for board cell detection.
//!
//! This crate holds the lightweight image buffers used across the workspace,
//! the polygon (`Contour`) type with its area moments, and the
//! [`GeometryProvider`] seam that extracts nested boundary polygons from a
//! binary image. The default provider is backed by `imageproc`.

mod contour;
mod image;
mod logger;
mod provider;

pub use contour::{Contour, Moments};
pub use image::{threshold_binary, GrayImage, GrayImageView, RgbImage, RgbImageView};
pub use provider::{BorderKind, ContourNode, GeometryProvider, ImageprocGeometry};

#[cfg(feature = "tracing")]
pub use logger::{init_tracing, DEFAULT_TRACE_FILTER};

pub use logger::{init_with_level, level_from_verbosity};
