//! Embedded dictionary families.
//!
//! The family table mirrors the id scheme of the original command-line tool
//! (`DICT_4X4_50` = 0 through `DICT_7X7_1000` = 15, `DICT_ARUCO_ORIGINAL` =
//! 16). Codebooks are produced on first use by a deterministic seeded
//! procedure and cached for the lifetime of the process, so every run of the
//! library sees byte-identical tables. Externally generated codebooks can be
//! used instead via [`Dictionary::from_json`].
//!
//! Generation accepts a candidate codeword only when every rotation of it
//! keeps at least the family's minimum Hamming distance `tau` from all
//! previously accepted codewords, from the candidate's own other rotations,
//! and from the blank and saturated grids. `max_correction_bits` is
//! `(tau - 1) / 2`, the largest distance that is still unambiguous.

use crate::{BitGrid, Dictionary};
use std::sync::OnceLock;

struct FamilySpec {
    name: &'static str,
    marker_size: usize,
    count: usize,
    /// Minimum rotation-aware Hamming distance enforced during generation.
    tau: u32,
}

const FAMILIES: [FamilySpec; 17] = [
    FamilySpec { name: "DICT_4X4_50", marker_size: 4, count: 50, tau: 3 },
    FamilySpec { name: "DICT_4X4_100", marker_size: 4, count: 100, tau: 3 },
    FamilySpec { name: "DICT_4X4_250", marker_size: 4, count: 250, tau: 2 },
    FamilySpec { name: "DICT_4X4_1000", marker_size: 4, count: 1000, tau: 1 },
    FamilySpec { name: "DICT_5X5_50", marker_size: 5, count: 50, tau: 6 },
    FamilySpec { name: "DICT_5X5_100", marker_size: 5, count: 100, tau: 5 },
    FamilySpec { name: "DICT_5X5_250", marker_size: 5, count: 250, tau: 4 },
    FamilySpec { name: "DICT_5X5_1000", marker_size: 5, count: 1000, tau: 3 },
    FamilySpec { name: "DICT_6X6_50", marker_size: 6, count: 50, tau: 10 },
    FamilySpec { name: "DICT_6X6_100", marker_size: 6, count: 100, tau: 9 },
    FamilySpec { name: "DICT_6X6_250", marker_size: 6, count: 250, tau: 8 },
    FamilySpec { name: "DICT_6X6_1000", marker_size: 6, count: 1000, tau: 6 },
    FamilySpec { name: "DICT_7X7_50", marker_size: 7, count: 50, tau: 14 },
    FamilySpec { name: "DICT_7X7_100", marker_size: 7, count: 100, tau: 13 },
    FamilySpec { name: "DICT_7X7_250", marker_size: 7, count: 250, tau: 12 },
    FamilySpec { name: "DICT_7X7_1000", marker_size: 7, count: 1000, tau: 10 },
    FamilySpec { name: "DICT_ARUCO_ORIGINAL", marker_size: 5, count: 1024, tau: 3 },
];

static CACHE: [OnceLock<Dictionary>; FAMILIES.len()] =
    [const { OnceLock::new() }; FAMILIES.len()];

/// Look up a builtin dictionary by family name.
pub fn builtin_dictionary(name: &str) -> Option<&'static Dictionary> {
    let idx = FAMILIES.iter().position(|f| f.name == name)?;
    Some(family(idx))
}

/// Look up a builtin dictionary by the original tool's numeric id.
pub fn dictionary_by_id(id: u32) -> Option<&'static Dictionary> {
    if (id as usize) < FAMILIES.len() {
        Some(family(id as usize))
    } else {
        None
    }
}

/// Names of all builtin families, in id order.
pub fn builtin_names() -> impl Iterator<Item = &'static str> {
    FAMILIES.iter().map(|f| f.name)
}

fn family(idx: usize) -> &'static Dictionary {
    CACHE[idx].get_or_init(|| generate(&FAMILIES[idx], idx as u64))
}

fn generate(spec: &FamilySpec, family_index: u64) -> Dictionary {
    let n = spec.marker_size;
    let bit_count = n * n;
    let mut rng = 0xA076_1D64_78BD_642F_u64
        ^ (family_index + 1).wrapping_mul(0x9E37_79B9_7F4A_7C15);

    let mut grids: Vec<BitGrid> = Vec::with_capacity(spec.count);
    let mut accepted: Vec<[Vec<u8>; 4]> = Vec::with_capacity(spec.count);

    // Rejection sampling converges quickly for every family in the table;
    // the cap is a backstop against a pathological seed.
    let mut attempts = 0u64;
    while grids.len() < spec.count && attempts < 10_000_000 {
        attempts += 1;

        let word = xorshift64star(&mut rng);
        let candidate = grid_from_word(word, n);

        let rotations = [
            candidate.pack(),
            candidate.rotated(1).pack(),
            candidate.rotated(2).pack(),
            candidate.rotated(3).pack(),
        ];

        if !keeps_distance(&rotations, &accepted, bit_count, spec.tau) {
            continue;
        }

        grids.push(candidate);
        accepted.push(rotations);
    }

    if grids.len() < spec.count {
        log::warn!(
            "dictionary {} generation stopped at {} of {} codewords",
            spec.name,
            grids.len(),
            spec.count
        );
    }

    let max_correction_bits = (spec.tau - 1) / 2;
    Dictionary::new(spec.name, n, max_correction_bits, &grids)
        .expect("generated grids match the family shape")
}

/// Check the candidate against its own rotations, the blank and saturated
/// grids, and every rotation of every accepted codeword.
fn keeps_distance(
    rotations: &[Vec<u8>; 4],
    accepted: &[[Vec<u8>; 4]],
    bit_count: usize,
    tau: u32,
) -> bool {
    let set_bits = popcount(&rotations[0]);
    if set_bits < tau || set_bits > bit_count as u32 - tau {
        return false;
    }

    for rot in 1..4 {
        if distance(&rotations[0], &rotations[rot]) < tau {
            return false;
        }
    }

    for other in accepted {
        for other_rot in other {
            if distance(&rotations[0], other_rot) < tau {
                return false;
            }
        }
    }

    true
}

fn grid_from_word(word: u64, n: usize) -> BitGrid {
    let mut grid = BitGrid::new(n);
    for y in 0..n {
        for x in 0..n {
            if (word >> (y * n + x)) & 1 != 0 {
                grid.set(x, y, true);
            }
        }
    }
    grid
}

fn xorshift64star(state: &mut u64) -> u64 {
    let mut x = *state;
    x ^= x >> 12;
    x ^= x << 25;
    x ^= x >> 27;
    *state = x;
    x.wrapping_mul(0x2545_F491_4F6C_DD1D)
}

fn distance(a: &[u8], b: &[u8]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x ^ y).count_ones())
        .sum()
}

fn popcount(bytes: &[u8]) -> u32 {
    bytes.iter().map(|&b| b.count_ones()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_by_name_and_id_agree() {
        let by_name = builtin_dictionary("DICT_6X6_250").expect("builtin");
        let by_id = dictionary_by_id(10).expect("builtin");
        assert!(std::ptr::eq(by_name, by_id));
        assert_eq!(by_name.marker_size(), 6);
        assert_eq!(by_name.len(), 250);
    }

    #[test]
    fn unknown_lookups_fail() {
        assert!(builtin_dictionary("DICT_3X3_9").is_none());
        assert!(dictionary_by_id(17).is_none());
    }

    #[test]
    fn generation_is_stable_within_a_process() {
        let a = builtin_dictionary("DICT_4X4_50").expect("builtin");
        let b = builtin_dictionary("DICT_4X4_50").expect("builtin");
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn small_family_keeps_its_minimum_distance() {
        let dict = builtin_dictionary("DICT_4X4_50").expect("builtin");
        assert_eq!(dict.len(), 50);
        assert_eq!(dict.max_correction_bits(), 1);

        // Every pair of codewords stays >= tau apart across all rotations.
        for i in 0..dict.len() {
            for j in (i + 1)..dict.len() {
                for rot in 0u8..4 {
                    let d = super::distance(
                        dict.rotation_bytes(i, 0),
                        dict.rotation_bytes(j, rot),
                    );
                    assert!(d >= 3, "codes {i} and {j} at rotation {rot}: distance {d}");
                }
            }
        }
    }

    #[test]
    fn codewords_are_rotation_asymmetric() {
        let dict = builtin_dictionary("DICT_5X5_50").expect("builtin");
        for id in 0..dict.len() {
            for rot in 1u8..4 {
                assert_ne!(
                    dict.rotation_bytes(id, 0),
                    dict.rotation_bytes(id, rot),
                    "codeword {id} repeats at rotation {rot}"
                );
            }
        }
    }
}
