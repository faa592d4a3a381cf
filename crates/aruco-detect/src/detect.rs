//! End-to-end helpers for `image` crate buffers.
//!
//! Enabled with the `image` feature. These are thin adapters: decoding files
//! and converting to grayscale stay the caller's (or the `image` crate's)
//! job, the detector itself only ever sees a [`GrayImageView`].

use crate::{DetectError, DetectStats, DetectorParams, MarkerDetector, MarkerInfo};
use aruco_detect_core::GrayImageView;
use aruco_detect_dict::Dictionary;

/// Borrow an `image::GrayImage` as the core view type.
pub fn gray_view(img: &::image::GrayImage) -> GrayImageView<'_> {
    GrayImageView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Run the full pipeline on an `image::GrayImage`.
pub fn detect_markers(
    img: &::image::GrayImage,
    dictionary: &Dictionary,
    params: DetectorParams,
) -> Result<Vec<MarkerInfo>, DetectError> {
    let detector = MarkerDetector::new(dictionary.clone(), params)?;
    detector.detect(&gray_view(img))
}

/// Like [`detect_markers`], also reporting the candidate funnel.
pub fn detect_markers_with_stats(
    img: &::image::GrayImage,
    dictionary: &Dictionary,
    params: DetectorParams,
) -> Result<(Vec<MarkerInfo>, DetectStats), DetectError> {
    let detector = MarkerDetector::new(dictionary.clone(), params)?;
    detector.detect_with_stats(&gray_view(img))
}
