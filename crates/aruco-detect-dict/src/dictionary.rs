//! Dictionary codebooks with pre-rotated byte encodings.

use crate::BitGrid;
use serde::{Deserialize, Serialize};

/// Errors raised while building or loading a dictionary.
#[derive(thiserror::Error, Debug)]
pub enum DictionaryError {
    #[error("codeword {index} has side {got}, dictionary expects {expected}")]
    CodewordShape {
        index: usize,
        expected: usize,
        got: usize,
    },
    #[error("codeword {index} is {got} bytes, expected {expected}")]
    CodewordLength {
        index: usize,
        expected: usize,
        got: usize,
    },
    #[error("marker size {0} is not supported (must be >= 2)")]
    MarkerSize(usize),
    #[error("unknown dictionary name {0:?}")]
    UnknownName(String),
    #[error("unknown dictionary id {0}")]
    UnknownId(u32),
    #[error(transparent)]
    Parse(#[from] serde_json::Error),
}

/// One reference codeword, stored in all four rotations.
#[derive(Clone, Debug)]
struct Codeword {
    /// `rotations[r]` is the byte packing of the codeword rotated by `r`
    /// counter-clockwise quarter turns.
    rotations: [Vec<u8>; 4],
}

impl Codeword {
    fn from_grid(grid: &BitGrid) -> Self {
        Self {
            rotations: [
                grid.pack(),
                grid.rotated(1).pack(),
                grid.rotated(2).pack(),
                grid.rotated(3).pack(),
            ],
        }
    }
}

/// An immutable marker codebook.
///
/// Codeword ids are indices into the table. The codebook is loaded once and
/// read-only for the lifetime of a detection run; cloning is cheap enough for
/// handing a copy to a detector.
#[derive(Clone, Debug)]
pub struct Dictionary {
    name: String,
    marker_size: usize,
    max_correction_bits: u32,
    codes: Vec<Codeword>,
}

/// JSON wire form: codewords as their rotation-0 byte packing.
#[derive(Serialize, Deserialize)]
struct DictionaryData {
    name: String,
    marker_size: usize,
    max_correction_bits: u32,
    codes: Vec<Vec<u8>>,
}

impl Dictionary {
    /// Build a dictionary from rotation-0 codeword grids.
    pub fn new(
        name: impl Into<String>,
        marker_size: usize,
        max_correction_bits: u32,
        grids: &[BitGrid],
    ) -> Result<Self, DictionaryError> {
        if marker_size < 2 {
            return Err(DictionaryError::MarkerSize(marker_size));
        }
        let mut codes = Vec::with_capacity(grids.len());
        for (index, grid) in grids.iter().enumerate() {
            if grid.size() != marker_size {
                return Err(DictionaryError::CodewordShape {
                    index,
                    expected: marker_size,
                    got: grid.size(),
                });
            }
            codes.push(Codeword::from_grid(grid));
        }
        Ok(Self {
            name: name.into(),
            marker_size,
            max_correction_bits,
            codes,
        })
    }

    /// Human-readable name, used in logs.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Side length of a codeword in bits.
    #[inline]
    pub fn marker_size(&self) -> usize {
        self.marker_size
    }

    /// Total bits per codeword.
    #[inline]
    pub fn bit_count(&self) -> usize {
        self.marker_size * self.marker_size
    }

    /// Bytes per packed codeword encoding.
    #[inline]
    pub fn bytes_per_code(&self) -> usize {
        BitGrid::packed_len(self.marker_size)
    }

    /// Maximum Hamming distance the codebook can correct by design.
    #[inline]
    pub fn max_correction_bits(&self) -> u32 {
        self.max_correction_bits
    }

    /// Number of codewords.
    #[inline]
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Byte encoding of codeword `id` at rotation `rot` (0..=3).
    #[inline]
    pub fn rotation_bytes(&self, id: usize, rot: u8) -> &[u8] {
        &self.codes[id].rotations[(rot & 3) as usize]
    }

    /// Rotation-0 bit grid of codeword `id`, for rendering and fixtures.
    pub fn grid(&self, id: usize) -> Option<BitGrid> {
        let code = self.codes.get(id)?;
        BitGrid::unpack(self.marker_size, &code.rotations[0])
    }

    /// Serialize the codebook (rotation-0 encodings) to JSON.
    pub fn to_json(&self) -> Result<String, DictionaryError> {
        let data = DictionaryData {
            name: self.name.clone(),
            marker_size: self.marker_size,
            max_correction_bits: self.max_correction_bits,
            codes: self
                .codes
                .iter()
                .map(|c| c.rotations[0].clone())
                .collect(),
        };
        Ok(serde_json::to_string(&data)?)
    }

    /// Load a codebook from its JSON wire form, recomputing rotations.
    pub fn from_json(json: &str) -> Result<Self, DictionaryError> {
        let data: DictionaryData = serde_json::from_str(json)?;
        if data.marker_size < 2 {
            return Err(DictionaryError::MarkerSize(data.marker_size));
        }
        let expected = BitGrid::packed_len(data.marker_size);
        let mut grids = Vec::with_capacity(data.codes.len());
        for (index, bytes) in data.codes.iter().enumerate() {
            let grid = BitGrid::unpack(data.marker_size, bytes).ok_or(
                DictionaryError::CodewordLength {
                    index,
                    expected,
                    got: bytes.len(),
                },
            )?;
            grids.push(grid);
        }
        Self::new(data.name, data.marker_size, data.max_correction_bits, &grids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn l_shape(n: usize) -> BitGrid {
        // Top row and left column set; rotation-asymmetric for n >= 3.
        let mut g = BitGrid::new(n);
        for i in 0..n {
            g.set(i, 0, true);
            g.set(0, i, true);
        }
        g.set(1, 1, true);
        g
    }

    #[test]
    fn rotations_are_precomputed_consistently() {
        let g = l_shape(5);
        let dict = Dictionary::new("test", 5, 1, &[g.clone()]).expect("valid dict");
        for rot in 0u8..4 {
            assert_eq!(dict.rotation_bytes(0, rot), g.rotated(rot).pack());
        }
    }

    #[test]
    fn mismatched_grid_size_is_rejected() {
        let g = BitGrid::new(4);
        let err = Dictionary::new("test", 5, 1, &[g]).unwrap_err();
        assert!(matches!(err, DictionaryError::CodewordShape { .. }));
    }

    #[test]
    fn json_round_trip_preserves_codes() {
        let grids = [l_shape(6), l_shape(6).rotated(2)];
        let dict = Dictionary::new("roundtrip", 6, 2, &grids).expect("valid dict");
        let json = dict.to_json().expect("serialize");
        let back = Dictionary::from_json(&json).expect("parse");

        assert_eq!(back.name(), "roundtrip");
        assert_eq!(back.marker_size(), 6);
        assert_eq!(back.max_correction_bits(), 2);
        assert_eq!(back.len(), 2);
        for id in 0..2 {
            for rot in 0u8..4 {
                assert_eq!(back.rotation_bytes(id, rot), dict.rotation_bytes(id, rot));
            }
        }
    }
}
