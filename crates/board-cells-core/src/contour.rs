//! Closed polygon type and its area moments.

use ::image::Luma;
use imageproc::drawing::{draw_line_segment_mut, draw_polygon_mut};
use imageproc::point::Point;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::{GrayImage, RgbImage, RgbImageView};

/// Zeroth and first order area moments of a closed polygon.
///
/// Moments are normalized so that `m00 >= 0` regardless of the winding
/// direction of the polygon.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Moments {
    pub m00: f64,
    pub m10: f64,
    pub m01: f64,
}

impl Moments {
    /// `true` when the enclosed area is too small to divide by.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.m00.abs() < f64::EPSILON
    }
}

/// Ordered boundary points of a closed, non-self-intersecting region.
///
/// An empty contour stands for "no detection".
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Contour {
    points: Vec<Point2<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point2<i32>>) -> Self {
        Self { points }
    }

    /// Axis-aligned rectangle with corners `(x0, y0)` and `(x1, y1)`.
    pub fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self::new(vec![
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
    }

    #[inline]
    pub fn points(&self) -> &[Point2<i32>] {
        &self.points
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Area moments via Green's theorem over the closed polygon.
    pub fn moments(&self) -> Moments {
        let n = self.points.len();
        if n < 3 {
            return Moments::default();
        }

        let (mut a00, mut a10, mut a01) = (0f64, 0f64, 0f64);
        let mut prev = self.points[n - 1];
        for &p in &self.points {
            let (x0, y0) = (prev.x as f64, prev.y as f64);
            let (x1, y1) = (p.x as f64, p.y as f64);
            let cross = x0 * y1 - x1 * y0;
            a00 += cross;
            a10 += cross * (x0 + x1);
            a01 += cross * (y0 + y1);
            prev = p;
        }

        let sign = if a00 < 0.0 { -1.0 } else { 1.0 };
        Moments {
            m00: sign * a00 / 2.0,
            m10: sign * a10 / 6.0,
            m01: sign * a01 / 6.0,
        }
    }

    /// Enclosed area; `0.0` for empty or degenerate polygons.
    pub fn area(&self) -> f64 {
        let m = self.moments();
        if m.is_degenerate() {
            0.0
        } else {
            m.m00
        }
    }

    /// Centroid as `m10 / m00, m01 / m00`; `(0, 0)` when the area is zero.
    pub fn centroid(&self) -> Point2<f32> {
        let m = self.moments();
        if m.is_degenerate() {
            return Point2::origin();
        }
        Point2::new((m.m10 / m.m00) as f32, (m.m01 / m.m00) as f32)
    }

    /// Render this polygon filled with 255 onto a blank `width x height` mask.
    pub fn fill_mask(&self, width: usize, height: usize) -> GrayImage {
        let mut canvas = ::image::GrayImage::new(width as u32, height as u32);
        fill_polygon(&mut canvas, self, 255);
        GrayImage::from_luma(canvas)
    }

    /// Copy of `src` with every pixel outside this polygon set to black.
    pub fn mask_rgb(&self, src: &RgbImageView<'_>) -> RgbImage {
        let mask = self.fill_mask(src.width, src.height);
        let mut out = RgbImage::new(src.width, src.height);
        let pixels = out.data.chunks_exact_mut(3).zip(src.data.chunks_exact(3));
        for ((dst, px), &m) in pixels.zip(&mask.data) {
            if m != 0 {
                dst.copy_from_slice(px);
            }
        }
        out
    }
}

impl From<Vec<Point2<i32>>> for Contour {
    fn from(points: Vec<Point2<i32>>) -> Self {
        Self::new(points)
    }
}

/// Distinct vertices with repeated and closing points dropped.
fn drawable_vertices(contour: &Contour) -> Vec<Point<i32>> {
    let mut pts: Vec<Point<i32>> = contour
        .points()
        .iter()
        .map(|p| Point::new(p.x, p.y))
        .collect();
    pts.dedup();
    while pts.len() > 1 && pts[0] == pts[pts.len() - 1] {
        pts.pop();
    }
    pts
}

pub(crate) fn fill_polygon(canvas: &mut ::image::GrayImage, contour: &Contour, value: u8) {
    let pts = drawable_vertices(contour);
    if pts.len() >= 3 {
        draw_polygon_mut(canvas, &pts, Luma([value]));
    }
    stroke_vertices(canvas, &pts, value);
}

pub(crate) fn stroke_polygon(canvas: &mut ::image::GrayImage, contour: &Contour, value: u8) {
    let pts = drawable_vertices(contour);
    stroke_vertices(canvas, &pts, value);
}

fn stroke_vertices(canvas: &mut ::image::GrayImage, pts: &[Point<i32>], value: u8) {
    match pts {
        [] => {}
        [p] => {
            if p.x >= 0 && p.y >= 0 && (p.x as u32) < canvas.width() && (p.y as u32) < canvas.height()
            {
                canvas.put_pixel(p.x as u32, p.y as u32, Luma([value]));
            }
        }
        _ => {
            for (i, a) in pts.iter().enumerate() {
                let b = pts[(i + 1) % pts.len()];
                draw_line_segment_mut(
                    canvas,
                    (a.x as f32, a.y as f32),
                    (b.x as f32, b.y as f32),
                    Luma([value]),
                );
            }
        }
    }
}
