//! The marker detection pipeline.
//!
//! This module wires together binarization, contour extraction, candidate
//! sampling, dictionary identification and canonical corner reordering.

mod error;
mod params;
mod pipeline;
mod result;

pub use error::DetectError;
pub use params::DetectorParams;
pub use pipeline::MarkerDetector;
pub use result::{DetectStats, MarkerInfo};
