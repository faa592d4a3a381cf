//! Synthetic marker scenes for the integration tests.

use aruco_detect::{BitGrid, Dictionary, GrayImage};
use nalgebra::Point2;

/// Full cell pattern of a marker: dark border ring around the codeword bits.
pub fn full_cells(dict: &Dictionary, id: usize, border_bits: usize) -> BitGrid {
    let inner = dict.grid(id).expect("codeword id in range");
    let n = inner.size() + 2 * border_bits;
    let mut cells = BitGrid::new(n);
    for y in 0..inner.size() {
        for x in 0..inner.size() {
            cells.set(x + border_bits, y + border_bits, inner.get(x, y));
        }
    }
    cells
}

/// Paint a cell pattern onto a bright canvas with a uniform margin.
/// Set cells are white, clear cells black.
pub fn paint_cells(cells: &BitGrid, cell_px: usize, margin: usize) -> GrayImage {
    let n = cells.size();
    let side = n * cell_px;
    let canvas = side + 2 * margin;
    let mut img = GrayImage::zeros(canvas, canvas);
    img.data.fill(255);

    for cy in 0..n {
        for cx in 0..n {
            let value = if cells.get(cx, cy) { 255 } else { 0 };
            for yy in 0..cell_px {
                let y = margin + cy * cell_px + yy;
                for xx in 0..cell_px {
                    let x = margin + cx * cell_px + xx;
                    img.data[y * canvas + x] = value;
                }
            }
        }
    }
    img
}

/// Image-space corners of the painted marker square, top-left first.
pub fn marker_corners(cells: usize, cell_px: usize, margin: usize) -> [Point2<f32>; 4] {
    let a = margin as f32;
    let b = (margin + cells * cell_px - 1) as f32;
    [
        Point2::new(a, a),
        Point2::new(b, a),
        Point2::new(b, b),
        Point2::new(a, b),
    ]
}

/// Render dictionary entry `id` on a bright canvas; returns the image and
/// the marker's corner quad.
pub fn render_marker(
    dict: &Dictionary,
    id: usize,
    border_bits: usize,
    cell_px: usize,
    margin: usize,
) -> (GrayImage, [Point2<f32>; 4]) {
    let cells = full_cells(dict, id, border_bits);
    let img = paint_cells(&cells, cell_px, margin);
    let corners = marker_corners(cells.size(), cell_px, margin);
    (img, corners)
}

/// Rotate an image a quarter turn clockwise.
pub fn rotate_cw(img: &GrayImage) -> GrayImage {
    let (w, h) = (img.width, img.height);
    let mut out = GrayImage::zeros(h, w);
    for y in 0..h {
        for x in 0..w {
            let xo = h - 1 - y;
            let yo = x;
            out.data[yo * h + xo] = img.data[y * w + x];
        }
    }
    out
}

/// Where a pixel of a `size`-wide square image lands after [`rotate_cw`].
pub fn rotate_point_cw(p: Point2<f32>, size: usize) -> Point2<f32> {
    Point2::new(size as f32 - 1.0 - p.y, p.x)
}
