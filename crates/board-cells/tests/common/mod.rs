#![allow(dead_code)]

use image::{Rgb, RgbImage};

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
/// Piece colours, both bright enough to stay foreground after thresholding.
pub const AMBER: Rgb<u8> = Rgb([255, 200, 0]);
pub const CYAN: Rgb<u8> = Rgb([0, 200, 255]);

pub fn fill(img: &mut RgbImage, x0: u32, y0: u32, x1: u32, y1: u32, px: Rgb<u8>) {
    for y in y0..=y1 {
        for x in x0..=x1 {
            img.put_pixel(x, y, px);
        }
    }
}

/// Top-left corner of cell `i` (row-major) on a board drawn at `offset`.
pub fn cell_origin(i: u32, offset: u32) -> (u32, u32) {
    (offset + 44 + 40 * (i % 3), offset + 44 + 40 * (i / 3))
}

/// 220x220 frame: white ring around a black playing area holding a 3x3 grid
/// of 32 px white cells, shifted right and down by `offset`.
pub fn board_image(offset: u32) -> RgbImage {
    let mut img = RgbImage::from_pixel(220, 220, BLACK);
    fill(&mut img, offset + 20, offset + 20, offset + 179, offset + 179, WHITE);
    fill(&mut img, offset + 40, offset + 40, offset + 159, offset + 159, BLACK);
    for i in 0..9 {
        let (x0, y0) = cell_origin(i, offset);
        fill(&mut img, x0, y0, x0 + 31, y0 + 31, WHITE);
    }
    img
}

/// Draw a piece in the middle of cell `i`.
pub fn place(img: &mut RgbImage, i: u32, offset: u32, px: Rgb<u8>) {
    let (x0, y0) = cell_origin(i, offset);
    fill(img, x0 + 8, y0 + 8, x0 + 23, y0 + 23, px);
}
