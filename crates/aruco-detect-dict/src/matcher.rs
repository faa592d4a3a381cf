//! Rotation-aware codeword matching.

use crate::{BitGrid, Dictionary};

/// A dictionary match for an observed candidate grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Match {
    /// Codeword id in the dictionary.
    pub id: u32,
    /// Rotation `0..=3` such that the observed grid equals the codeword
    /// rotated by `rotation` counter-clockwise quarter turns (up to the
    /// corrected bits).
    pub rotation: u8,
    /// Bit mismatch count between the observed grid and the matched
    /// rotation encoding.
    pub distance: u32,
}

/// Matcher for a fixed dictionary with an error-correction budget.
///
/// Implementation note: brute-force scan over all codewords and rotations.
/// For the dictionary sizes in use (<= 1024 codewords) this is fast enough
/// and keeps the scan order fully deterministic.
#[derive(Clone, Debug)]
pub struct Matcher {
    dict: Dictionary,
    budget: u32,
}

impl Matcher {
    /// Build a matcher. `error_correction_rate` is the fraction of the
    /// dictionary's `max_correction_bits` to accept, truncated to a whole
    /// bit count.
    pub fn new(dict: Dictionary, error_correction_rate: f32) -> Self {
        let rate = error_correction_rate.clamp(0.0, 1.0);
        let budget = (rate * dict.max_correction_bits() as f32).floor() as u32;
        Self { dict, budget }
    }

    /// Dictionary used by this matcher.
    #[inline]
    pub fn dictionary(&self) -> &Dictionary {
        &self.dict
    }

    /// Maximum Hamming distance accepted for a match.
    #[inline]
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Identify a candidate grid against the dictionary.
    ///
    /// The scan order is fixed: codewords in table order, rotations 0..=3
    /// inner; the first strict minimum wins ties. A codeword loop exits early
    /// only once the running minimum is already zero, which no later
    /// comparison can beat. Returns `None` when the best distance exceeds
    /// the error-correction budget.
    pub fn identify(&self, grid: &BitGrid) -> Option<Match> {
        if grid.size() != self.dict.marker_size() {
            return None;
        }
        let observed = grid.pack();

        let mut best: Option<Match> = None;
        for id in 0..self.dict.len() {
            for rot in 0u8..4 {
                let d = hamming(&observed, self.dict.rotation_bytes(id, rot));
                if best.map_or(true, |b| d < b.distance) {
                    best = Some(Match {
                        id: id as u32,
                        rotation: rot,
                        distance: d,
                    });
                }
            }
            if best.is_some_and(|b| b.distance == 0) {
                break;
            }
        }

        best.filter(|b| b.distance <= self.budget)
    }
}

/// Bit mismatch count between two equal-length byte strings.
fn hamming(a: &[u8], b: &[u8]) -> u32 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x ^ y).count_ones())
        .sum()
}
