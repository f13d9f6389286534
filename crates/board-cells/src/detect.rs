//! Frame loading and binarization on top of the `image` crate.

use std::path::Path;

use ::image::{DynamicImage, ImageReader};

use crate::core::{threshold_binary, GrayImage, GrayImageView, RgbImageView};
use crate::{BoardCellsConfig, BoardSnapshot, BoardTracker, ColorEvidence, FrameError};

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the image-level helpers.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Image(#[from] ::image::ImageError),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

/// Convert an `image::GrayImage` into the lightweight core view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Convert an `image::RgbImage` into the lightweight core view type.
pub fn rgb_view(img: &::image::RgbImage) -> RgbImageView<'_> {
    RgbImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// One camera frame: the binary board mask and the colour image it came from.
#[derive(Clone, Debug)]
pub struct Frame {
    pub binary: GrayImage,
    pub color: ::image::RgbImage,
}

impl Frame {
    /// Binarize a decoded image; luma values above `threshold` are foreground.
    pub fn from_image(img: &DynamicImage, threshold: u8) -> Self {
        let luma = img.to_luma8();
        Self {
            binary: threshold_binary(&gray_view(&luma), threshold),
            color: img.to_rgb8(),
        }
    }

    #[inline]
    pub fn color_view(&self) -> RgbImageView<'_> {
        rgb_view(&self.color)
    }
}

/// Decode an image file into a [`Frame`].
pub fn load_frame(path: impl AsRef<Path>, threshold: u8) -> Result<Frame, DetectError> {
    let img = ImageReader::open(path)?.with_guessed_format()?.decode()?;
    Ok(Frame::from_image(&img, threshold))
}

/// Run a fresh tracker over one decoded image using `cfg`.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "info", skip(img, cfg), fields(width = img.width(), height = img.height()))
)]
pub fn detect_board(
    img: &DynamicImage,
    cfg: &BoardCellsConfig,
) -> Result<(BoardTracker, BoardSnapshot), DetectError> {
    let frame = Frame::from_image(img, cfg.threshold);
    let mut tracker = BoardTracker::new(cfg.tracker_params());
    let snapshot = tracker.process_frame(&frame.binary.view())?;
    Ok((tracker, snapshot))
}

/// Segment `frame` and count colours in every cell in one step.
///
/// The board geometry is committed before the colour pass, so a colour
/// failure still leaves the refreshed polygons in place.
pub fn observe_frame<C: ColorEvidence + ?Sized>(
    tracker: &mut BoardTracker,
    frame: &Frame,
    colors: &C,
) -> Result<BoardSnapshot, DetectError> {
    tracker.process_frame(&frame.binary.view())?;
    Ok(tracker.observe_colors(&frame.color_view(), colors)?)
}
