use super::{DetectError, DetectStats, DetectorParams, MarkerInfo};
use crate::contour::{find_quad_candidates, Quad};
use crate::sampler::{sample_candidate, SampleRejection};
use crate::threshold::adaptive_threshold;
use aruco_detect_core::GrayImageView;
use aruco_detect_dict::{Dictionary, Matcher};
use nalgebra::Point2;

/// Square-marker detector for one dictionary.
///
/// The detector is immutable once built; every [`detect`](Self::detect) call
/// is independent and returns a fresh result list.
pub struct MarkerDetector {
    params: DetectorParams,
    matcher: Matcher,
}

impl MarkerDetector {
    /// Build a detector, validating the configuration up front.
    pub fn new(dictionary: Dictionary, params: DetectorParams) -> Result<Self, DetectError> {
        params.validate()?;
        let matcher = Matcher::new(dictionary, params.error_correction_rate);
        Ok(Self { params, matcher })
    }

    /// Detector configuration.
    #[inline]
    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    /// Dictionary the detector identifies against.
    #[inline]
    pub fn dictionary(&self) -> &Dictionary {
        self.matcher.dictionary()
    }

    /// Detect markers in a grayscale image.
    ///
    /// Finding no markers is an `Ok` empty list; only an empty input image
    /// is an error.
    pub fn detect(&self, image: &GrayImageView<'_>) -> Result<Vec<MarkerInfo>, DetectError> {
        self.detect_with_stats(image).map(|(markers, _)| markers)
    }

    /// Detect markers and report the per-stage candidate funnel.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            level = "info",
            skip(self, image),
            fields(width = image.width, height = image.height)
        )
    )]
    pub fn detect_with_stats(
        &self,
        image: &GrayImageView<'_>,
    ) -> Result<(Vec<MarkerInfo>, DetectStats), DetectError> {
        if image.is_empty() || image.data.len() != image.width * image.height {
            return Err(DetectError::EmptyImage {
                width: image.width,
                height: image.height,
            });
        }

        let mask = adaptive_threshold(
            image,
            self.params.window_size,
            self.params.threshold_bias,
            self.params.max_pixel_value,
        );

        let scan = find_quad_candidates(&mask.as_view(), self.params.accuracy_rate);
        let mut stats = DetectStats {
            contours: scan.contours,
            quad_candidates: scan.quads.len(),
            ..DetectStats::default()
        };

        let marker_size = self.matcher.dictionary().marker_size();
        let mut markers = Vec::new();
        for quad in &scan.quads {
            let grid = match sample_candidate(
                image,
                quad,
                marker_size,
                self.params.border_bits,
                self.params.cell_size,
            ) {
                Ok(grid) => grid,
                Err(SampleRejection::Degenerate) => {
                    stats.rejected_degenerate += 1;
                    continue;
                }
                Err(SampleRejection::BrightBorder) => {
                    stats.rejected_border += 1;
                    log::trace!("candidate dropped: bright cell in the border ring");
                    continue;
                }
            };

            match self.matcher.identify(&grid) {
                Some(m) => {
                    let corners = reorder_corners(quad, m.rotation);
                    log::debug!(
                        "marker {} at rotation {} (distance {})",
                        m.id,
                        m.rotation,
                        m.distance
                    );
                    markers.push(MarkerInfo { id: m.id, corners });
                    stats.accepted += 1;
                }
                None => {
                    stats.rejected_distance += 1;
                    log::debug!("candidate dropped: no codeword within the correction budget");
                }
            }
        }

        log::debug!(
            "detection: {} contours, {} quads, {} markers",
            stats.contours,
            stats.quad_candidates,
            stats.accepted
        );
        Ok((markers, stats))
    }
}

/// Cycle the corner list left by `(4 - rotation) mod 4` so canonical corner 0
/// lands on the same physical printed corner at any imaged orientation.
fn reorder_corners(quad: &Quad, rotation: u8) -> [Point2<f32>; 4] {
    let shift = (4 - rotation as usize) % 4;
    std::array::from_fn(|i| quad[(i + shift) % 4])
}
