//! Marker dictionaries and candidate identification.
//!
//! This crate owns everything bit-level in the detection pipeline:
//! - [`BitGrid`], the square single-bit grid read off a rectified candidate,
//! - the canonical byte packing shared by candidates and codewords,
//! - [`Dictionary`], an immutable codebook with four pre-rotated byte
//!   encodings per codeword, serializable to/from JSON,
//! - [`Matcher`], the deterministic rotation-aware Hamming search with an
//!   error-correction budget,
//! - [`builtins`], the embedded dictionary families addressed by the ids the
//!   original command-line tool exposed (`DICT_4X4_50` = 0 ... = 16).
//!
//! It does **not** perform any image processing. Candidates arrive as bit
//! grids produced by the sampling stage of `aruco-detect`.

pub mod builtins;
mod bits;
mod dictionary;
mod matcher;

pub use bits::BitGrid;
pub use dictionary::{Dictionary, DictionaryError};
pub use matcher::{Match, Matcher};
