//! Boundary polygon extraction with nesting information.

use imageproc::contours::{find_contours, BorderType};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::contour::{fill_polygon, stroke_polygon};
use crate::{Contour, GrayImage, GrayImageView};

/// Whether a boundary encloses a foreground component or a hole inside one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderKind {
    Outer,
    Hole,
}

/// A boundary polygon together with its position in the containment tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ContourNode {
    pub contour: Contour,
    /// Index of the directly enclosing boundary in the same extraction.
    pub parent: Option<usize>,
    pub kind: BorderKind,
}

impl ContourNode {
    pub fn outer(contour: Contour, parent: Option<usize>) -> Self {
        Self {
            contour,
            parent,
            kind: BorderKind::Outer,
        }
    }

    pub fn hole(contour: Contour, parent: Option<usize>) -> Self {
        Self {
            contour,
            parent,
            kind: BorderKind::Hole,
        }
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.contour.area()
    }
}

/// Image-geometry capability consumed by the board locator and segmenter.
///
/// Implementations return every boundary in `image` (non-zero pixels are
/// foreground) in their own scan order, and can render one of those
/// boundaries back onto a canvas.
pub trait GeometryProvider {
    fn find_contours(&self, image: &GrayImageView<'_>) -> Vec<ContourNode>;

    /// Paint `contours[index]` filled onto `canvas`, keeping its nested
    /// structure: descendants at odd depth are cleared (their boundary kept),
    /// descendants at even depth are filled again.
    fn render_filled(&self, canvas: &mut GrayImage, contours: &[ContourNode], index: usize);
}

impl<G: GeometryProvider + ?Sized> GeometryProvider for &G {
    fn find_contours(&self, image: &GrayImageView<'_>) -> Vec<ContourNode> {
        (**self).find_contours(image)
    }

    fn render_filled(&self, canvas: &mut GrayImage, contours: &[ContourNode], index: usize) {
        (**self).render_filled(canvas, contours, index)
    }
}

/// [`GeometryProvider`] backed by `imageproc` border following.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageprocGeometry;

impl GeometryProvider for ImageprocGeometry {
    fn find_contours(&self, image: &GrayImageView<'_>) -> Vec<ContourNode> {
        let luma = image.to_luma();
        find_contours::<i32>(&luma)
            .into_iter()
            .map(|c| ContourNode {
                contour: Contour::new(c.points.iter().map(|p| Point2::new(p.x, p.y)).collect()),
                parent: c.parent,
                kind: match c.border_type {
                    BorderType::Outer => BorderKind::Outer,
                    BorderType::Hole => BorderKind::Hole,
                },
            })
            .collect()
    }

    fn render_filled(&self, canvas: &mut GrayImage, contours: &[ContourNode], index: usize) {
        if index >= contours.len() {
            return;
        }
        let mut luma = std::mem::replace(canvas, GrayImage::new(0, 0)).into_luma();
        for (i, depth) in subtree_by_depth(contours, index) {
            let contour = &contours[i].contour;
            if depth % 2 == 0 {
                fill_polygon(&mut luma, contour, 255);
            } else {
                fill_polygon(&mut luma, contour, 0);
                stroke_polygon(&mut luma, contour, 255);
            }
        }
        *canvas = GrayImage::from_luma(luma);
    }
}

/// `root` and all its descendants, breadth-first, with depth relative to `root`.
///
/// Each node is visited once, so malformed parent links cannot loop.
fn subtree_by_depth(contours: &[ContourNode], root: usize) -> Vec<(usize, usize)> {
    let mut seen = vec![false; contours.len()];
    seen[root] = true;
    let mut out = vec![(root, 0usize)];
    let mut head = 0;
    while head < out.len() {
        let (parent, depth) = out[head];
        head += 1;
        for (i, node) in contours.iter().enumerate() {
            if node.parent == Some(parent) && !seen[i] {
                seen[i] = true;
                out.push((i, depth + 1));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// White square `[10, 29]` with a black hole `[15, 24]` on a 40x40 canvas.
    fn ring() -> GrayImage {
        let mut img = GrayImage::new(40, 40);
        for y in 10..30 {
            for x in 10..30 {
                let in_hole = (15..25).contains(&x) && (15..25).contains(&y);
                img.data[y * 40 + x] = if in_hole { 0 } else { 255 };
            }
        }
        img
    }

    #[test]
    fn finds_outer_and_hole_with_parent() {
        let nodes = ImageprocGeometry.find_contours(&ring().view());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].kind, BorderKind::Outer);
        assert_eq!(nodes[0].parent, None);
        assert_eq!(nodes[1].kind, BorderKind::Hole);
        assert_eq!(nodes[1].parent, Some(0));
        assert!(nodes[0].area() > nodes[1].area());
    }

    #[test]
    fn render_keeps_holes_open() {
        let src = ring();
        let nodes = ImageprocGeometry.find_contours(&src.view());
        let mut canvas = GrayImage::new(40, 40);
        ImageprocGeometry.render_filled(&mut canvas, &nodes, 0);
        assert_eq!(canvas.get(12, 12), Some(255));
        assert_eq!(canvas.get(20, 20), Some(0));
        assert_eq!(canvas.get(2, 2), Some(0));
    }

    #[test]
    fn render_hole_as_root_fills_it() {
        let src = ring();
        let nodes = ImageprocGeometry.find_contours(&src.view());
        let mut canvas = GrayImage::new(40, 40);
        ImageprocGeometry.render_filled(&mut canvas, &nodes, 1);
        assert_eq!(canvas.get(20, 20), Some(255));
        assert_eq!(canvas.get(11, 11), Some(0));
    }

    #[test]
    fn subtree_walks_all_levels() {
        let c = Contour::rect(0, 0, 1, 1);
        let nodes = vec![
            ContourNode::outer(c.clone(), None),
            ContourNode::hole(c.clone(), Some(0)),
            ContourNode::outer(c.clone(), Some(1)),
            ContourNode::outer(c, None),
        ];
        assert_eq!(subtree_by_depth(&nodes, 0), vec![(0, 0), (1, 1), (2, 2)]);
        assert_eq!(subtree_by_depth(&nodes, 3), vec![(3, 0)]);

        let looped = vec![
            ContourNode::outer(Contour::rect(0, 0, 1, 1), Some(1)),
            ContourNode::hole(Contour::rect(0, 0, 1, 1), Some(0)),
        ];
        assert_eq!(subtree_by_depth(&looped, 0), vec![(0, 0), (1, 1)]);
    }
}
