//! Seeded label volumes for the benchmarks.

use ndarray::ArrayD;
use segmetrics_test_support::fixtures::generate_segmentation;

/// Seed used for every generated volume.
pub const SEED: u64 = 42;

/// Labels are drawn from `0..=LABEL_RANGE`, so `0` (background) is included.
pub const LABEL_RANGE: u32 = 255;

/// Longest run of identical labels in row-major order.
pub const MAX_RUN_LEN: usize = 64;

/// A reference segmentation and a candidate to score against it.
#[derive(Clone, Debug)]
pub struct VolumePair {
    /// Reference labels.
    pub truth: ArrayD<u32>,
    /// Labels under evaluation, with shorter runs than the reference.
    pub candidate: ArrayD<u32>,
}

/// Generates a deterministic pair of volumes of `shape`.
#[must_use]
pub fn volume_pair(shape: &[usize]) -> VolumePair {
    VolumePair {
        truth: generate_segmentation(shape, LABEL_RANGE, MAX_RUN_LEN, SEED),
        candidate: generate_segmentation(
            shape,
            LABEL_RANGE,
            MAX_RUN_LEN >> 2,
            SEED.wrapping_add(1),
        ),
    }
}
