/// Errors returned by the marker detector.
///
/// Per-candidate rejections are not errors: they only show up in
/// [`DetectStats`](super::DetectStats). These variants cover configuration
/// mistakes (caught before any processing) and unusable input images.
#[derive(thiserror::Error, Debug)]
pub enum DetectError {
    #[error("adaptive threshold window must be odd and at least 3 (got {0})")]
    InvalidWindowSize(usize),

    #[error("cell size must be at least 1 pixel (got {0})")]
    InvalidCellSize(usize),

    #[error("marker border must be at least 1 cell thick (got {0})")]
    InvalidBorderBits(usize),

    #[error("polygon approximation accuracy rate must be finite and positive (got {0})")]
    InvalidAccuracyRate(f32),

    #[error("error correction rate must lie in [0, 1] (got {0})")]
    InvalidErrorCorrectionRate(f32),

    #[error("input image is empty ({width}x{height})")]
    EmptyImage { width: usize, height: usize },
}
