//! Plane-to-plane projective transforms for marker rectification.

use crate::{sample_bilinear_u8, GrayImage, GrayImageView};
use nalgebra::{Matrix3, Point2, SMatrix, SVector, Vector3};

/// A 3x3 projective transform between two planes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Homography {
    pub h: Matrix3<f64>,
}

impl Homography {
    pub fn new(h: Matrix3<f64>) -> Self {
        Self { h }
    }

    /// Apply the transform to a point.
    #[inline]
    pub fn apply(&self, p: Point2<f32>) -> Point2<f32> {
        let v = self.h * Vector3::new(p.x as f64, p.y as f64, 1.0);
        let w = v[2];
        Point2::new((v[0] / w) as f32, (v[1] / w) as f32)
    }

    pub fn inverse(&self) -> Option<Self> {
        self.h.try_inverse().map(Self::new)
    }
}

/// Hartley conditioning transform: translate the centroid to the origin and
/// scale so the mean distance from it becomes sqrt(2).
fn conditioning_transform(pts: &[Point2<f32>; 4]) -> Matrix3<f64> {
    let n = pts.len() as f64;
    let mut cx = 0.0;
    let mut cy = 0.0;
    for p in pts {
        cx += p.x as f64;
        cy += p.y as f64;
    }
    cx /= n;
    cy /= n;

    let mut mean_dist = 0.0;
    for p in pts {
        let dx = p.x as f64 - cx;
        let dy = p.y as f64 - cy;
        mean_dist += (dx * dx + dy * dy).sqrt();
    }
    mean_dist /= n;

    let s = if mean_dist > 1e-12 {
        (2.0_f64).sqrt() / mean_dist
    } else {
        1.0
    };

    Matrix3::new(s, 0.0, -s * cx, 0.0, s, -s * cy, 0.0, 0.0, 1.0)
}

fn apply_conditioning(t: &Matrix3<f64>, pts: &[Point2<f32>; 4]) -> [Point2<f64>; 4] {
    let mut out = [Point2::new(0.0_f64, 0.0_f64); 4];
    for (o, p) in out.iter_mut().zip(pts.iter()) {
        let v = t * Vector3::new(p.x as f64, p.y as f64, 1.0);
        *o = Point2::new(v[0], v[1]);
    }
    out
}

/// Compute H such that `dst ~ H * src` from 4 point correspondences.
///
/// Corner order must be consistent between `src` and `dst`. Returns `None`
/// for degenerate configurations (three collinear points, repeated points).
pub fn homography_from_quad(
    src: &[Point2<f32>; 4],
    dst: &[Point2<f32>; 4],
) -> Option<Homography> {
    // Unknowns: [h11 h12 h13 h21 h22 h23 h31 h32], with h33 = 1.
    // For each correspondence (x,y) -> (u,v):
    //   h11 x + h12 y + h13 - u h31 x - u h32 y = u
    //   h21 x + h22 y + h23 - v h31 x - v h32 y = v
    let t_src = conditioning_transform(src);
    let t_dst = conditioning_transform(dst);
    let src_n = apply_conditioning(&t_src, src);
    let dst_n = apply_conditioning(&t_dst, dst);

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();

    for k in 0..4 {
        let x = src_n[k].x;
        let y = src_n[k].y;
        let u = dst_n[k].x;
        let v = dst_n[k].y;

        let r0 = 2 * k;
        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        let r1 = 2 * k + 1;
        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let x = a.lu().solve(&b)?;

    let hn = Matrix3::new(
        x[0], x[1], x[2], //
        x[3], x[4], x[5], //
        x[6], x[7], 1.0,
    );

    // Undo conditioning: H = T_dst^{-1} * Hn * T_src, scaled so h33 = 1.
    let h = t_dst.try_inverse()? * hn * t_src;
    let s = h[(2, 2)];
    if s.abs() < 1e-12 {
        return None;
    }
    Some(Homography::new(h / s))
}

/// Resample a quadrilateral image region into an axis-aligned square.
///
/// `h_img_from_square` must map square coordinates `(0..side-1)^2` into the
/// source image; each destination pixel is looked up through the transform
/// with bilinear interpolation.
pub fn warp_quad_to_square(
    src: &GrayImageView<'_>,
    h_img_from_square: &Homography,
    side: usize,
) -> GrayImage {
    let mut out = GrayImage::zeros(side, side);
    for y in 0..side {
        for x in 0..side {
            let p = h_img_from_square.apply(Point2::new(x as f32, y as f32));
            out.data[y * side + x] = sample_bilinear_u8(src, p.x, p.y);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Point2<f32>, b: Point2<f32>, tol: f32) {
        let dx = (a.x - b.x).abs();
        let dy = (a.y - b.y).abs();
        assert!(
            dx < tol && dy < tol,
            "expected ({:.4},{:.4}) ~ ({:.4},{:.4}) within {}",
            a.x,
            a.y,
            b.x,
            b.y,
            tol
        );
    }

    #[test]
    fn recovers_known_projective_map() {
        let truth = Homography::new(Matrix3::new(
            0.9, 0.04, 60.0, //
            -0.03, 1.2, 40.0, //
            0.0008, -0.0005, 1.0,
        ));

        let square = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(79.0_f32, 0.0),
            Point2::new(79.0_f32, 79.0),
            Point2::new(0.0_f32, 79.0),
        ];
        let quad = square.map(|p| truth.apply(p));

        let h = homography_from_quad(&square, &quad).expect("solvable");
        for p in [
            Point2::new(0.0_f32, 0.0),
            Point2::new(40.0, 20.0),
            Point2::new(79.0, 79.0),
        ] {
            assert_close(h.apply(p), truth.apply(p), 1e-2);
        }
    }

    #[test]
    fn inverse_round_trips_points() {
        let h = Homography::new(Matrix3::new(
            1.1, 0.2, 4.0, //
            -0.1, 0.95, 2.0, //
            0.0005, 0.0002, 1.0,
        ));
        let inv = h.inverse().expect("invertible");
        for p in [
            Point2::new(0.0_f32, 0.0),
            Point2::new(33.0_f32, -12.0),
            Point2::new(210.0_f32, 145.0),
        ] {
            assert_close(inv.apply(h.apply(p)), p, 1e-3);
        }
    }

    #[test]
    fn degenerate_quad_is_rejected() {
        // A repeated correspondence makes the system rank-deficient.
        let src = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(0.0_f32, 0.0),
            Point2::new(2.0_f32, 2.0),
            Point2::new(0.0_f32, 2.0),
        ];
        let dst = [
            Point2::new(5.0_f32, 5.0),
            Point2::new(5.0_f32, 5.0),
            Point2::new(10.0_f32, 10.0),
            Point2::new(5.0_f32, 10.0),
        ];
        assert!(homography_from_quad(&src, &dst).is_none());
    }

    #[test]
    fn warp_extracts_axis_aligned_region() {
        // 8x8 source, bright 4x4 block at (2,2)..(5,5).
        let mut img = GrayImage::zeros(8, 8);
        for y in 2..6 {
            for x in 2..6 {
                img.data[y * 8 + x] = 200;
            }
        }
        let square = [
            Point2::new(0.0_f32, 0.0),
            Point2::new(3.0_f32, 0.0),
            Point2::new(3.0_f32, 3.0),
            Point2::new(0.0_f32, 3.0),
        ];
        let quad = [
            Point2::new(2.0_f32, 2.0),
            Point2::new(5.0_f32, 2.0),
            Point2::new(5.0_f32, 5.0),
            Point2::new(2.0_f32, 5.0),
        ];
        let h = homography_from_quad(&square, &quad).expect("solvable");
        let warped = warp_quad_to_square(&img.as_view(), &h, 4);
        assert!(warped.data.iter().all(|&v| v == 200));
    }
}
