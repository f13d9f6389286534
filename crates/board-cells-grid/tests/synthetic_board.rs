use approx::assert_abs_diff_eq;
use board_cells_core::{GrayImage, ImageprocGeometry};
use board_cells_grid::{locate_inner_boundary, CellGrid, GridOrdering, SegmentError, Stage};

fn fill(img: &mut GrayImage, x0: usize, y0: usize, x1: usize, y1: usize, v: u8) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.data[y * img.width + x] = v;
        }
    }
}

/// 200x200 frame: white frame ring `[20, 179]` around a black playing area
/// `[40, 159]` holding a 3x3 grid of 32 px white cells, plus a speck of noise.
fn board_frame() -> GrayImage {
    let mut img = GrayImage::new(200, 200);
    fill(&mut img, 20, 20, 179, 179, 255);
    fill(&mut img, 40, 40, 159, 159, 0);
    for r in 0..3 {
        for c in 0..3 {
            let x0 = 44 + 40 * c;
            let y0 = 44 + 40 * r;
            fill(&mut img, x0, y0, x0 + 31, y0 + 31, 255);
        }
    }
    fill(&mut img, 2, 2, 6, 6, 255);
    img
}

#[test]
fn locates_inner_area_inside_frame_ring() {
    let frame = board_frame();
    let inner = locate_inner_boundary(&ImageprocGeometry, &frame.view()).expect("inner");
    let c = inner.contour().centroid();
    assert_abs_diff_eq!(c.x, 99.5, epsilon = 1.0);
    assert_abs_diff_eq!(c.y, 99.5, epsilon = 1.0);
    let area = inner.contour().area();
    assert!(area > 100.0 * 100.0 && area < 125.0 * 125.0, "area {area}");
}

#[test]
fn segments_nine_cells_in_reading_order() {
    let frame = board_frame();
    let grid = CellGrid::new(GridOrdering::default());
    let det = grid.detect(&frame.view()).expect("grid");
    assert_eq!(det.cells.len(), 9);

    for (i, cell) in det.cells.iter().enumerate() {
        let (r, c) = (i / 3, i % 3);
        let expected_x = 44.0 + 40.0 * c as f32 + 15.5;
        let expected_y = 44.0 + 40.0 * r as f32 + 15.5;
        assert_abs_diff_eq!(cell.centroid.x, expected_x, epsilon = 1.5);
        assert_abs_diff_eq!(cell.centroid.y, expected_y, epsilon = 1.5);
        assert!(cell.area > 20.0 * 20.0);
    }
}

#[test]
fn blank_and_ringless_frames_are_rejected() {
    let grid = CellGrid::new(GridOrdering::default());
    let blank = GrayImage::new(64, 64);
    assert!(matches!(
        grid.detect(&blank.view()),
        Err(SegmentError::InsufficientContours {
            stage: Stage::OuterBoundary,
            ..
        })
    ));

    // Two solid squares: the larger one has no hole once isolated.
    let mut solid = GrayImage::new(64, 64);
    fill(&mut solid, 10, 10, 40, 40, 255);
    fill(&mut solid, 50, 50, 55, 55, 255);
    assert!(matches!(
        grid.detect(&solid.view()),
        Err(SegmentError::InsufficientContours {
            stage: Stage::InnerBoundary,
            ..
        })
    ));
}
