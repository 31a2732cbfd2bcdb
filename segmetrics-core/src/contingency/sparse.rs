//! Sparse contingency tables over label sequences of equal length.
//!
//! Only label pairs that actually occur are stored. Ordered maps keep the
//! iteration order, and therefore every floating-point reduction over the
//! table, deterministic.

use std::collections::BTreeMap;

use tracing::{Span, debug, field, instrument, warn};

use crate::{Result, engine::RandConvention, error::MetricsError, label::BackgroundLabel};

use super::{ContingencyTable, record_table_built};

/// Map-backed contingency table keyed by `(label_a, label_b)`.
///
/// With background ignoring enabled, an element whose label is the
/// background in either partition is dropped entirely: it reaches neither
/// the joint counts, the marginals, nor `N`.
///
/// Labels need only be ordered keys. The integer types implement
/// [`BackgroundLabel`] already; callers with their own key types, such as
/// interned ids or tuples, implement it for them and name the sentinel.
///
/// # Examples
/// ```
/// use segmetrics_core::{ContingencyTable, SparseContingency};
///
/// let table = SparseContingency::from_labels(&[0_u32, 1, 1, 2], &[0_u32, 1, 2, 2], true)?;
/// assert_eq!(table.element_count(), 3);
/// assert_eq!(table.cell(&1, &2), 1);
/// assert_eq!(table.cell(&0, &0), 0);
/// # Ok::<(), segmetrics_core::MetricsError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseContingency<A, B> {
    joint: BTreeMap<(A, B), u64>,
    rows: BTreeMap<A, u64>,
    columns: BTreeMap<B, u64>,
    element_count: u64,
    ignore_background: bool,
}

impl<A, B> SparseContingency<A, B>
where
    A: BackgroundLabel,
    B: BackgroundLabel,
{
    /// Builds the table from two label slices.
    ///
    /// # Errors
    /// See [`Self::from_iters`].
    pub fn from_labels(a: &[A], b: &[B], ignore_background: bool) -> Result<Self> {
        Self::from_iters(a.iter().copied(), b.iter().copied(), ignore_background)
    }

    /// Builds the table in a single lockstep pass over both sequences.
    ///
    /// # Errors
    /// Returns [`MetricsError::LengthMismatch`] when the sequences differ in
    /// length and [`MetricsError::EmptyComparison`] when no element is
    /// counted, e.g. every element carries the background in one partition.
    #[instrument(
        name = "metrics.sparse_table",
        err,
        skip(a, b),
        fields(ignore_background = ignore_background, elements = field::Empty),
    )]
    pub fn from_iters<I, J>(a: I, b: J, ignore_background: bool) -> Result<Self>
    where
        I: IntoIterator<Item = A>,
        I::IntoIter: ExactSizeIterator,
        J: IntoIterator<Item = B>,
        J::IntoIter: ExactSizeIterator,
    {
        let (a, b) = (a.into_iter(), b.into_iter());
        if a.len() != b.len() {
            return Err(MetricsError::LengthMismatch {
                left: a.len(),
                right: b.len(),
            });
        }

        let mut table = Self {
            joint: BTreeMap::new(),
            rows: BTreeMap::new(),
            columns: BTreeMap::new(),
            element_count: 0,
            ignore_background,
        };
        for (left, right) in a.zip(b) {
            if ignore_background && (left.is_background() || right.is_background()) {
                continue;
            }
            *table.joint.entry((left, right)).or_insert(0) += 1;
            *table.rows.entry(left).or_insert(0) += 1;
            *table.columns.entry(right).or_insert(0) += 1;
            table.element_count += 1;
        }

        Span::current().record("elements", table.element_count);
        if table.element_count == 0 {
            warn!("no element is labeled in both partitions");
            return Err(MetricsError::EmptyComparison);
        }
        debug!(
            elements = table.element_count,
            pairs = table.joint.len(),
            rows = table.rows.len(),
            columns = table.columns.len(),
            "sparse contingency table ready"
        );
        record_table_built("sparse", table.element_count);
        Ok(table)
    }

    /// Returns the joint count of `(a, b)`, or `0` if the pair never occurs.
    #[must_use]
    pub fn cell(&self, a: &A, b: &B) -> u64 {
        self.joint.get(&(*a, *b)).copied().unwrap_or(0)
    }

    /// Returns the row marginal of label `a`.
    #[must_use]
    pub fn row_marginal(&self, a: &A) -> u64 {
        self.rows.get(a).copied().unwrap_or(0)
    }

    /// Returns the column marginal of label `b`.
    #[must_use]
    pub fn column_marginal(&self, b: &B) -> u64 {
        self.columns.get(b).copied().unwrap_or(0)
    }

    /// Iterates the occurring label pairs and their counts in label order.
    pub fn iter(&self) -> impl Iterator<Item = (&(A, B), &u64)> + '_ {
        self.joint.iter()
    }

    /// Returns whether background elements were excluded at construction.
    #[must_use]
    pub fn ignores_background(&self) -> bool {
        self.ignore_background
    }
}

impl<A, B> ContingencyTable for SparseContingency<A, B> {
    fn element_count(&self) -> u64 {
        self.element_count
    }

    fn row_marginals(&self) -> impl Iterator<Item = u64> + '_ {
        self.rows.values().copied()
    }

    fn column_marginals(&self) -> impl Iterator<Item = u64> + '_ {
        self.columns.values().copied()
    }

    fn joint_counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.joint.values().copied()
    }

    fn background_mass(&self) -> u64 {
        0
    }

    fn rand_convention(&self) -> RandConvention {
        RandConvention::PairwiseSparse
    }
}
