use super::DetectError;
use serde::{Deserialize, Serialize};

/// Immutable per-run detector configuration.
///
/// The dictionary itself is not part of the configuration: it is passed to
/// [`MarkerDetector::new`](super::MarkerDetector::new) as an explicit value
/// so tests can run against small synthetic codebooks.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DetectorParams {
    /// Marker border thickness in cells.
    pub border_bits: usize,
    /// Side length of one cell in the rectified sample, in pixels.
    pub cell_size: usize,
    /// Adaptive threshold window size; must be odd and at least 3.
    pub window_size: usize,
    /// Constant subtracted from the local Gaussian mean before comparing.
    pub threshold_bias: f32,
    /// Value assigned to bright mask pixels.
    pub max_pixel_value: u8,
    /// Douglas-Peucker tolerance as a fraction of the contour perimeter.
    pub accuracy_rate: f32,
    /// Fraction of the dictionary's `max_correction_bits` to accept.
    pub error_correction_rate: f32,
}

impl Default for DetectorParams {
    fn default() -> Self {
        Self {
            border_bits: 1,
            cell_size: 10,
            window_size: 77,
            threshold_bias: 8.0,
            max_pixel_value: 255,
            accuracy_rate: 0.05,
            error_correction_rate: 1.0,
        }
    }
}

impl DetectorParams {
    /// Check the configuration before any processing happens.
    pub(crate) fn validate(&self) -> Result<(), DetectError> {
        if self.window_size < 3 || self.window_size % 2 == 0 {
            return Err(DetectError::InvalidWindowSize(self.window_size));
        }
        if self.cell_size == 0 {
            return Err(DetectError::InvalidCellSize(self.cell_size));
        }
        if self.border_bits == 0 {
            return Err(DetectError::InvalidBorderBits(self.border_bits));
        }
        if !self.accuracy_rate.is_finite() || self.accuracy_rate <= 0.0 {
            return Err(DetectError::InvalidAccuracyRate(self.accuracy_rate));
        }
        if !self.error_correction_rate.is_finite()
            || !(0.0..=1.0).contains(&self.error_correction_rate)
        {
            return Err(DetectError::InvalidErrorCorrectionRate(
                self.error_correction_rate,
            ));
        }
        Ok(())
    }
}
