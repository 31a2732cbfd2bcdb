//! Contingency tables: joint label histograms of two partitions.
//!
//! Two representations share one capability, [`ContingencyTable`]: a dense
//! array-indexed table for small contiguous integer labels and a sparse
//! map-keyed table for arbitrary labels. The metrics engine is written once
//! against the capability.

mod dense;
mod sparse;

pub use self::{
    dense::{DenseContingency, max_label, parallel_max_label},
    sparse::SparseContingency,
};

use crate::engine::RandConvention;

/// Read access to a finished contingency table and its marginals.
///
/// Iterators yield only the entries that take part in the comparison; for
/// the dense representation that excludes the background row and column.
pub trait ContingencyTable {
    /// Number of elements `N` the ratios are normalised by.
    fn element_count(&self) -> u64;

    /// Row marginals `r[i]`.
    fn row_marginals(&self) -> impl Iterator<Item = u64> + '_;

    /// Column marginals `c[j]`.
    fn column_marginals(&self) -> impl Iterator<Item = u64> + '_;

    /// Joint counts `C[i][j]`.
    fn joint_counts(&self) -> impl Iterator<Item = u64> + '_;

    /// Elements with a real first label paired with a background second label.
    ///
    /// Folded back into the Rand primitives and, as singleton clusters, into
    /// the VI primitives.
    fn background_mass(&self) -> u64;

    /// Population the VI probabilities are normalised by.
    ///
    /// The background mass counts toward it as one singleton cluster per
    /// element on the second side.
    fn vi_population(&self) -> u64 {
        self.element_count()
    }

    /// Rand index normalisation native to this representation.
    fn rand_convention(&self) -> RandConvention;
}

#[cfg(feature = "metrics")]
#[expect(
    clippy::cast_precision_loss,
    reason = "histogram samples are approximate by nature"
)]
fn record_table_built(representation: &'static str, elements: u64) {
    metrics::counter!("segmetrics_tables_built", "representation" => representation).increment(1);
    metrics::histogram!("segmetrics_table_elements").record(elements as f64);
}

#[cfg(not(feature = "metrics"))]
const fn record_table_built(_representation: &'static str, _elements: u64) {}
