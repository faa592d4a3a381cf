use nalgebra::Point2;
use serde::{Deserialize, Serialize};

/// One detected marker.
///
/// Corners are counter-clockwise in image coordinates, and corner 0 always
/// names the same physical printed corner regardless of how the marker was
/// oriented in the image — the contract pose estimation downstream relies
/// on. A detection run returns a fresh list every call.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MarkerInfo {
    /// Codeword id in the dictionary the detector was built with.
    pub id: u32,
    /// Marker corners in image pixels.
    pub corners: [Point2<f32>; 4],
}

/// Per-stage counters for one detection run.
///
/// Candidate rejections are expected and non-fatal; these counters make the
/// funnel observable without any console output from the pipeline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DetectStats {
    /// Closed contours traced from the binary mask.
    pub contours: usize,
    /// Contours that simplified to convex quadrilaterals.
    pub quad_candidates: usize,
    /// Candidates whose corner geometry admitted no perspective transform.
    pub rejected_degenerate: usize,
    /// Candidates with at least one bright cell in the border ring.
    pub rejected_border: usize,
    /// Candidates with no codeword within the error-correction budget.
    pub rejected_distance: usize,
    /// Markers accepted into the result list.
    pub accepted: usize,
}
