//! Quadratic pair-counting reference for the Rand family.
//!
//! Walks every unordered pair of elements, so it is only suitable for small
//! inputs. The background is the label type's `Default` value.

/// Result of a brute-force pair count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairAgreement {
    /// Unordered pairs on which both partitions agree.
    pub matching_pairs: u64,
    /// Elements taking part in the comparison.
    pub elements: u64,
}

impl PairAgreement {
    /// Total number of unordered pairs, `N·(N - 1) / 2`.
    #[must_use]
    pub fn total_pairs(&self) -> u64 {
        self.elements * self.elements.saturating_sub(1) / 2
    }
}

/// Counts the unordered pairs that both partitions place together or both
/// place apart.
///
/// With `ignore_background`, elements carrying the background in either
/// partition are left out of every pair and of the element count.
///
/// # Panics
/// Panics if the partitions differ in length.
///
/// # Examples
/// ```
/// use segmetrics_test_support::oracle::matching_pairs_brute_force;
///
/// let agreement = matching_pairs_brute_force(&[1, 1, 2, 2], &[1, 1, 1, 2], false);
/// assert_eq!(agreement.matching_pairs, 3);
/// assert_eq!(agreement.elements, 4);
/// ```
#[must_use]
pub fn matching_pairs_brute_force<A, B>(a: &[A], b: &[B], ignore_background: bool) -> PairAgreement
where
    A: PartialEq + Default,
    B: PartialEq + Default,
{
    assert_eq!(a.len(), b.len(), "partitions must have equal length");
    let (background_a, background_b) = (A::default(), B::default());
    let kept: Vec<(&A, &B)> = a
        .iter()
        .zip(b)
        .filter(|(left, right)| {
            !ignore_background || (**left != background_a && **right != background_b)
        })
        .collect();

    let mut matching_pairs = 0;
    for (index, (first_a, first_b)) in kept.iter().enumerate() {
        for (second_a, second_b) in &kept[index + 1..] {
            if (first_a == second_a) == (first_b == second_b) {
                matching_pairs += 1;
            }
        }
    }
    PairAgreement {
        matching_pairs,
        elements: kept.len() as u64,
    }
}

/// Pair-counting Rand index `matching / (N·(N - 1) / 2)`.
///
/// Returns `None` when fewer than two elements take part.
///
/// # Panics
/// Panics if the partitions differ in length.
///
/// # Examples
/// ```
/// use segmetrics_test_support::oracle::rand_index_brute_force;
///
/// assert_eq!(rand_index_brute_force(&[1, 1, 2, 2], &[1, 1, 1, 2], false), Some(0.5));
/// assert_eq!(rand_index_brute_force(&[0, 1], &[1, 1], true), None);
/// ```
#[must_use]
#[expect(
    clippy::cast_precision_loss,
    clippy::float_arithmetic,
    reason = "ratio of pair counts"
)]
pub fn rand_index_brute_force<A, B>(a: &[A], b: &[B], ignore_background: bool) -> Option<f64>
where
    A: PartialEq + Default,
    B: PartialEq + Default,
{
    let agreement = matching_pairs_brute_force(a, b, ignore_background);
    let total = agreement.total_pairs();
    (total > 0).then(|| agreement.matching_pairs as f64 / total as f64)
}
