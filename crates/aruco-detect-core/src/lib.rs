//! Core types and utilities for square-marker detection.
//!
//! This crate is intentionally small: grayscale image buffers and views,
//! bilinear sampling, and the 4-point homography used to rectify marker
//! candidates. It knows nothing about dictionaries or the detection
//! pipeline itself.

mod homography;
mod image;
mod logger;

pub use homography::{homography_from_quad, warp_quad_to_square, Homography};
pub use image::{sample_bilinear, sample_bilinear_u8, GrayImage, GrayImageView};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::init_with_level;
