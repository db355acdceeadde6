//! Before/after statistics for a compression run.
//!
//! Pure arithmetic with no fallible paths.

use serde::{Deserialize, Serialize};

/// Size comparison between a source and its re-encoded output.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    /// Source size in bytes.
    pub original_bytes: u64,
    /// Encoded size in bytes.
    pub compressed_bytes: u64,
    /// Size reduction as a percentage, rounded to one decimal place.
    /// Negative when the output is larger than the source.
    pub compression_ratio_percent: f64,
    /// `original_bytes - compressed_bytes`, never floored at zero.
    pub bytes_saved: i64,
}

/// Compute statistics from the two byte sizes.
///
/// `original_bytes` is never zero in practice: empty sources are rejected
/// when they are loaded. A zero original evaluates to a ratio of 0.
pub fn compute_statistics(original_bytes: u64, compressed_bytes: u64) -> Stats {
    debug_assert!(original_bytes > 0, "empty sources are rejected on load");

    let bytes_saved = original_bytes as i64 - compressed_bytes as i64;
    let compression_ratio_percent = if original_bytes == 0 {
        0.0
    } else {
        round1(bytes_saved as f64 / original_bytes as f64 * 100.0)
    };

    Stats {
        original_bytes,
        compressed_bytes,
        compression_ratio_percent,
        bytes_saved,
    }
}

/// Round to one decimal place, halves away from zero.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: bytes saved is exact integer subtraction.
        #[test]
        fn prop_bytes_saved_exact(original in 1u64..=u32::MAX as u64, compressed in 0u64..=u32::MAX as u64) {
            let stats = compute_statistics(original, compressed);
            prop_assert_eq!(stats.bytes_saved, original as i64 - compressed as i64);
            prop_assert_eq!(stats.original_bytes, original);
            prop_assert_eq!(stats.compressed_bytes, compressed);
        }

        /// Property: the ratio is the one-decimal rounding of the exact ratio.
        #[test]
        fn prop_ratio_matches_formula(original in 1u64..=100_000_000, compressed in 0u64..=100_000_000) {
            let stats = compute_statistics(original, compressed);
            let exact = (original as f64 - compressed as f64) / original as f64 * 100.0;
            prop_assert!((stats.compression_ratio_percent - exact).abs() <= 0.05 + 1e-9);
            prop_assert_eq!(stats.compression_ratio_percent, round1(exact));
        }

        /// Property: a smaller output never reports a negative ratio.
        #[test]
        fn prop_ratio_sign(original in 1u64..=1_000_000, compressed in 0u64..=1_000_000) {
            let stats = compute_statistics(original, compressed);
            if compressed <= original {
                prop_assert!(stats.compression_ratio_percent >= 0.0);
            } else {
                prop_assert!(stats.compression_ratio_percent <= 0.0);
            }
        }
    }
}
