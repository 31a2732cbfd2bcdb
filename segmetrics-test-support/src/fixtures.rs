//! Seeded random segmentations.

use ndarray::{ArrayD, IxDyn};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Fills a volume of `shape` in row-major order with runs of constant labels.
///
/// Each run draws a label uniformly from `0..=label_range` and a length
/// uniformly from `1..=max_run_len`; the last run is cut at the end of the
/// volume. Label `0` is the background, so generated volumes usually contain
/// some. The same seed always yields the same volume.
///
/// # Panics
/// Panics if `max_run_len` is zero.
///
/// # Examples
/// ```
/// use segmetrics_test_support::fixtures::generate_segmentation;
///
/// let volume = generate_segmentation(&[4, 5], 3, 6, 7);
/// assert_eq!(volume.shape(), &[4, 5]);
/// assert!(volume.iter().all(|&label| label <= 3));
/// assert_eq!(volume, generate_segmentation(&[4, 5], 3, 6, 7));
/// ```
#[must_use]
pub fn generate_segmentation(
    shape: &[usize],
    label_range: u32,
    max_run_len: usize,
    seed: u64,
) -> ArrayD<u32> {
    assert!(max_run_len > 0, "runs need a positive maximum length");
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut volume = ArrayD::<u32>::zeros(IxDyn(shape));
    let mut cells = volume.iter_mut().peekable();
    while cells.peek().is_some() {
        let run = rng.gen_range(1..=max_run_len);
        let label = rng.gen_range(0..=label_range);
        for cell in cells.by_ref().take(run) {
            *cell = label;
        }
    }
    volume
}

/// Generates a flat label sequence of `len` elements; see
/// [`generate_segmentation`].
#[must_use]
pub fn generate_sequence(len: usize, label_range: u32, max_run_len: usize, seed: u64) -> Vec<u32> {
    generate_segmentation(&[len], label_range, max_run_len, seed)
        .iter()
        .copied()
        .collect()
}

/// Applies a bijective relabeling that keeps `0` as the background.
///
/// Every foreground label `l` becomes `l * stride + offset` with `offset`
/// non-zero, so the partition is unchanged up to label names.
///
/// # Examples
/// ```
/// use segmetrics_test_support::fixtures::relabel;
///
/// assert_eq!(relabel(&[0, 1, 2, 1], 3, 5), vec![0, 8, 11, 8]);
/// ```
#[must_use]
pub fn relabel(labels: &[u32], stride: u32, offset: u32) -> Vec<u32> {
    labels
        .iter()
        .map(|&label| {
            if label == 0 {
                0
            } else {
                label * stride + offset
            }
        })
        .collect()
}
