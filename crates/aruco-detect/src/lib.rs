//! ArUco-style square-marker detection.
//!
//! The pipeline runs strictly in sequence over one grayscale image:
//!
//! 1. **Binarization** — Gaussian-weighted local-adaptive threshold.
//! 2. **Contour extraction** — connected regions, border following, and
//!    Douglas-Peucker simplification down to convex quadrilaterals.
//! 3. **Candidate sampling** — perspective rectification of each quad onto a
//!    fixed cell grid, Otsu re-binarization, and the all-dark border test.
//! 4. **Identification** — rotation-aware Hamming matching against an
//!    immutable dictionary, with an error-correction budget.
//! 5. **Corner reordering** — the accepted quad is cycled so corner 0 always
//!    names the same physical printed corner.
//!
//! The detector consumes a decoded grayscale image and a dictionary value; it
//! knows nothing about cameras, pose estimation, or display. Zero detections
//! is an ordinary outcome, not an error.
//!
//! # Example
//!
//! ```
//! use aruco_detect::{builtins, DetectorParams, MarkerDetector};
//! use aruco_detect::GrayImageView;
//!
//! let dict = builtins::builtin_dictionary("DICT_6X6_250").expect("builtin dict");
//! let detector = MarkerDetector::new(dict.clone(), DetectorParams::default())?;
//!
//! let pixels = vec![255u8; 160 * 160];
//! let image = GrayImageView::new(160, 160, &pixels).expect("valid buffer");
//! let markers = detector.detect(&image)?;
//! assert!(markers.is_empty());
//! # Ok::<(), aruco_detect::DetectError>(())
//! ```

pub use aruco_detect_core as core;
pub use aruco_detect_dict as dict;

mod contour;
mod detector;
mod sampler;
mod threshold;

#[cfg(feature = "image")]
pub mod detect;

pub use aruco_detect_core::{GrayImage, GrayImageView};
pub use aruco_detect_dict::{builtins, BitGrid, Dictionary, DictionaryError, Match, Matcher};
pub use detector::{DetectError, DetectStats, DetectorParams, MarkerDetector, MarkerInfo};
