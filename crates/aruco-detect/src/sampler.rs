//! Perspective rectification of quad candidates into bit grids.

use crate::contour::Quad;
use crate::threshold::otsu_threshold;
use aruco_detect_core::{homography_from_quad, warp_quad_to_square, GrayImageView};
use aruco_detect_dict::BitGrid;
use nalgebra::Point2;

/// Why a candidate was dropped during sampling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum SampleRejection {
    /// The corner geometry admits no perspective transform.
    Degenerate,
    /// A cell in the border ring came out bright.
    BrightBorder,
}

/// Rectify one candidate and read its inner bit grid.
///
/// The quad's first corner lands on the sample square's top-left; the warp
/// reads the grayscale image (not the mask) and the patch is re-binarized
/// globally with Otsu before cells are counted. A cell is set when more than
/// half of its pixels are bright. Any set cell inside the `border_bits` ring
/// rejects the candidate.
pub(crate) fn sample_candidate(
    gray: &GrayImageView<'_>,
    quad: &Quad,
    marker_size: usize,
    border_bits: usize,
    cell_size: usize,
) -> Result<BitGrid, SampleRejection> {
    let cells = marker_size + 2 * border_bits;
    let side = cells * cell_size;
    let extent = (side - 1) as f32;
    let square: Quad = [
        Point2::new(0.0, 0.0),
        Point2::new(extent, 0.0),
        Point2::new(extent, extent),
        Point2::new(0.0, extent),
    ];

    let h = homography_from_quad(&square, quad).ok_or(SampleRejection::Degenerate)?;
    let warped = warp_quad_to_square(gray, &h, side);
    let threshold = otsu_threshold(&warped.data);

    let mut grid = BitGrid::new(cells);
    let majority = cell_size * cell_size / 2;
    for cy in 0..cells {
        for cx in 0..cells {
            let mut bright = 0usize;
            for yy in 0..cell_size {
                let row = (cy * cell_size + yy) * side + cx * cell_size;
                for &v in &warped.data[row..row + cell_size] {
                    if v > threshold {
                        bright += 1;
                    }
                }
            }
            grid.set(cx, cy, bright > majority);
        }
    }

    for cy in 0..cells {
        for cx in 0..cells {
            let in_border = cx < border_bits
                || cy < border_bits
                || cx >= cells - border_bits
                || cy >= cells - border_bits;
            if in_border && grid.get(cx, cy) {
                return Err(SampleRejection::BrightBorder);
            }
        }
    }

    let mut inner = BitGrid::new(marker_size);
    for y in 0..marker_size {
        for x in 0..marker_size {
            inner.set(x, y, grid.get(x + border_bits, y + border_bits));
        }
    }
    Ok(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aruco_detect_core::GrayImage;

    /// Paint a full cell pattern (border included) at `cell_px` pixels per
    /// cell, marker at `(origin, origin)` on a bright canvas.
    fn paint_cells(cells: &BitGrid, cell_px: usize, origin: usize, canvas: usize) -> GrayImage {
        let mut img = GrayImage::zeros(canvas, canvas);
        img.data.fill(255);
        let n = cells.size();
        for cy in 0..n {
            for cx in 0..n {
                let value = if cells.get(cx, cy) { 255 } else { 0 };
                for yy in 0..cell_px {
                    let y = origin + cy * cell_px + yy;
                    for xx in 0..cell_px {
                        let x = origin + cx * cell_px + xx;
                        img.data[y * canvas + x] = value;
                    }
                }
            }
        }
        img
    }

    fn marker_quad(origin: usize, side_px: usize) -> Quad {
        let a = origin as f32;
        let b = (origin + side_px - 1) as f32;
        [
            Point2::new(a, a),
            Point2::new(b, a),
            Point2::new(b, b),
            Point2::new(a, b),
        ]
    }

    fn diagonal_cells(marker_size: usize, border: usize) -> BitGrid {
        let n = marker_size + 2 * border;
        let mut cells = BitGrid::new(n);
        for i in 0..marker_size {
            cells.set(border + i, border + i, true);
            cells.set(border + marker_size - 1 - i, border + i, true);
        }
        cells
    }

    #[test]
    fn recovers_painted_bits_exactly() {
        let cells = diagonal_cells(6, 1);
        let img = paint_cells(&cells, 10, 20, 120);
        let quad = marker_quad(20, 80);

        let grid = sample_candidate(&img.as_view(), &quad, 6, 1, 10).expect("sampled");
        for y in 0..6 {
            for x in 0..6 {
                assert_eq!(grid.get(x, y), cells.get(x + 1, y + 1), "cell ({x},{y})");
            }
        }
    }

    #[test]
    fn bright_border_cell_rejects_candidate() {
        let mut cells = diagonal_cells(6, 1);
        cells.set(3, 0, true); // one bright cell on the top border row
        let img = paint_cells(&cells, 10, 20, 120);
        let quad = marker_quad(20, 80);

        let err = sample_candidate(&img.as_view(), &quad, 6, 1, 10).unwrap_err();
        assert_eq!(err, SampleRejection::BrightBorder);
    }

    #[test]
    fn degenerate_quad_is_reported() {
        // A fully collapsed quad admits no perspective transform.
        let img = GrayImage::zeros(32, 32);
        let quad: Quad = [Point2::new(5.0, 5.0); 4];
        let err = sample_candidate(&img.as_view(), &quad, 4, 1, 4).unwrap_err();
        assert_eq!(err, SampleRejection::Degenerate);
    }
}
