//! Thresholding: local-adaptive binarization and global Otsu.

use aruco_detect_core::{GrayImage, GrayImageView};

/// Normalized 1-D Gaussian kernel for a given odd window size.
///
/// Sigma follows the usual window-derived rule
/// `0.3 * ((W - 1) * 0.5 - 1) + 0.8`, so window size alone fixes the kernel.
fn gaussian_kernel(window_size: usize) -> Vec<f32> {
    let sigma = 0.3 * ((window_size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    let half = (window_size / 2) as f32;
    let denom = 2.0 * sigma * sigma;

    let mut kernel: Vec<f32> = (0..window_size)
        .map(|i| {
            let d = i as f32 - half;
            (-d * d / denom).exp()
        })
        .collect();
    let sum: f32 = kernel.iter().sum();
    for k in &mut kernel {
        *k /= sum;
    }
    kernel
}

/// Gaussian-weighted adaptive threshold.
///
/// Each output pixel is `max_value` when the source pixel exceeds the
/// Gaussian-weighted mean of its `window_size` neighborhood minus `bias`,
/// otherwise 0. Borders are handled by replicating edge pixels. The window
/// size must already be validated (odd, >= 3) by the caller.
pub(crate) fn adaptive_threshold(
    src: &GrayImageView<'_>,
    window_size: usize,
    bias: f32,
    max_value: u8,
) -> GrayImage {
    let (w, h) = (src.width, src.height);
    let kernel = gaussian_kernel(window_size);
    let half = (window_size / 2) as i32;

    // Separable filter: horizontal pass into f32, then vertical pass fused
    // with the comparison.
    let mut horiz = vec![0f32; w * h];
    for y in 0..h {
        let row = &mut horiz[y * w..(y + 1) * w];
        for (x, out) in row.iter_mut().enumerate() {
            let mut acc = 0f32;
            for (k, &kv) in kernel.iter().enumerate() {
                let sx = x as i32 + k as i32 - half;
                acc += kv * f32::from(src.get_clamped(sx, y as i32));
            }
            *out = acc;
        }
    }

    let mut out = GrayImage::zeros(w, h);
    for y in 0..h {
        for x in 0..w {
            let mut mean = 0f32;
            for (k, &kv) in kernel.iter().enumerate() {
                let sy = (y as i32 + k as i32 - half).clamp(0, h as i32 - 1);
                mean += kv * horiz[sy as usize * w + x];
            }
            let bright = f32::from(src.data[y * w + x]) > mean - bias;
            out.data[y * w + x] = if bright { max_value } else { 0 };
        }
    }
    out
}

/// Otsu's threshold over a set of intensity samples.
///
/// Picks the split maximizing between-class variance. Degenerate inputs
/// (uniform, or fewer than three occupied bins) fall back to midpoints.
pub(crate) fn otsu_threshold(samples: &[u8]) -> u8 {
    if samples.is_empty() {
        return 127;
    }

    let mut min_v = 255u8;
    let mut max_v = 0u8;
    for &v in samples {
        min_v = min_v.min(v);
        max_v = max_v.max(v);
    }
    if min_v == max_v {
        return min_v;
    }

    let mut hist = [0u32; 256];
    for &v in samples {
        hist[v as usize] += 1;
    }
    let occupied = hist.iter().filter(|&&h| h > 0).count();
    if occupied <= 2 {
        return ((u16::from(min_v) + u16::from(max_v)) / 2) as u8;
    }

    let total = samples.len() as f64;
    let mut sum_total = 0f64;
    for (i, &h) in hist.iter().enumerate() {
        sum_total += (i as f64) * f64::from(h);
    }

    let mut sum_b = 0f64;
    let mut w_b = 0f64;
    let mut best_var = -1f64;
    let mut best_t = 127u8;

    for (t, &h) in hist.iter().enumerate() {
        w_b += f64::from(h);
        if w_b < 1.0 {
            continue;
        }
        let w_f = total - w_b;
        if w_f < 1.0 {
            break;
        }

        sum_b += (t as f64) * f64::from(h);
        let m_b = sum_b / w_b;
        let m_f = (sum_total - sum_b) / w_f;

        let var_between = w_b * w_f * (m_b - m_f) * (m_b - m_f);
        if var_between > best_var {
            best_var = var_between;
            best_t = t as u8;
        }
    }

    best_t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        for w in [3usize, 7, 77] {
            let k = gaussian_kernel(w);
            assert_eq!(k.len(), w);
            let sum: f32 = k.iter().sum();
            assert!((sum - 1.0).abs() < 1e-5);
            for i in 0..w / 2 {
                assert!((k[i] - k[w - 1 - i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn dark_square_on_bright_background_separates() {
        let w = 48;
        let mut data = vec![220u8; w * w];
        for y in 16..32 {
            for x in 16..32 {
                data[y * w + x] = 30;
            }
        }
        let src = GrayImageView::new(w, w, &data).expect("valid buffer");
        let mask = adaptive_threshold(&src, 31, 8.0, 255);

        assert_eq!(mask.data[24 * w + 24], 0);
        assert_eq!(mask.data[4 * w + 4], 255);
        assert!(mask.data.iter().all(|&v| v == 0 || v == 255));
    }

    #[test]
    fn uniform_image_binarizes_bright() {
        // With a positive bias every pixel exceeds mean - bias.
        let data = vec![0u8; 64];
        let src = GrayImageView::new(8, 8, &data).expect("valid buffer");
        let mask = adaptive_threshold(&src, 3, 8.0, 255);
        assert!(mask.data.iter().all(|&v| v == 255));
    }

    #[test]
    fn otsu_splits_bimodal_samples() {
        let mut samples = vec![10u8; 100];
        samples.extend(std::iter::repeat(200u8).take(100));
        let t = otsu_threshold(&samples);
        assert!(t >= 10 && t < 200, "threshold {t} outside the modes");
    }

    #[test]
    fn otsu_handles_degenerate_inputs() {
        assert_eq!(otsu_threshold(&[]), 127);
        assert_eq!(otsu_threshold(&[42; 16]), 42);
        // Two occupied bins: midpoint.
        let samples = [0u8, 0, 0, 100, 100];
        assert_eq!(otsu_threshold(&samples), 50);
    }
}
