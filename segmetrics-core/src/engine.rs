//! Metrics engine: derives the Rand and VI families from one contingency
//! table.
//!
//! The engine moves through an explicit state machine. It starts
//! [`TableState::Uninitialized`]; installing a table makes it ready, and each
//! primitive bundle is computed on first use and memoised for the lifetime
//! of the engine. An engine serves exactly one comparison.

use ndarray::{ArrayView, Dimension};
use once_cell::sync::OnceCell;
use tracing::{debug, instrument};

use crate::{
    Result, ThreadPool, TraversalOrder,
    contingency::{ContingencyTable, DenseContingency, SparseContingency},
    error::MetricsError,
    label::{BackgroundLabel, DenseLabel},
};

/// Normalisation used for the Rand index.
///
/// The two conventions stem from different derivations and are not
/// interchangeable; pick one per call site.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum RandConvention {
    /// `1 - (A + B - 2·AB) / N²`, with the dense background correction folded
    /// into `B` and `AB`. Native to [`DenseContingency`].
    ArrayBased,
    /// `(A + B) / (N·(N - 1))` over the table as built. Native to
    /// [`SparseContingency`]. Defined as `1.0` when `N < 2`.
    PairwiseSparse,
}

/// Quadratic sums behind the Rand family.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RandPrimitives {
    /// `A = Σ r[i]²`.
    pub row_square_sum: f64,
    /// `B = Σ c[j]²`, plus `background_mass / N`.
    pub column_square_sum: f64,
    /// `AB = Σ C[i][j]²`, plus `background_mass / N`.
    pub joint_square_sum: f64,
}

/// Entropy terms behind the variation-of-information family.
///
/// Each term is `Σ p·ln(p)` over the non-zero cells, i.e. a negated entropy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViPrimitives {
    /// Row term `Σ (r[i]/N)·ln(r[i]/N)`.
    pub row_term: f64,
    /// Column term `Σ (c[j]/N)·ln(c[j]/N)`.
    pub column_term: f64,
    /// Joint term `Σ (C[i][j]/N)·ln(C[i][j]/N)`.
    pub joint_term: f64,
}

/// All eight metrics of one comparison.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetricScores {
    /// Rand index under the table's native convention.
    pub rand_index: f64,
    /// Rand precision `AB / B`.
    pub rand_precision: f64,
    /// Rand recall `AB / A`.
    pub rand_recall: f64,
    /// Harmonic mean of Rand precision and recall.
    pub rand_score: f64,
    /// Variation of information.
    pub variation_of_information: f64,
    /// VI precision.
    pub vi_precision: f64,
    /// VI recall.
    pub vi_recall: f64,
    /// Harmonic mean of VI precision and recall.
    pub vi_score: f64,
}

#[derive(Debug)]
enum TableState<T> {
    Uninitialized,
    Ready {
        table: T,
        rand: OnceCell<RandPrimitives>,
        vi: OnceCell<ViPrimitives>,
    },
}

/// Computes clustering-comparison metrics from a contingency table.
///
/// # Examples
/// ```
/// use segmetrics_core::{MetricsEngine, MetricsError, SparseContingency};
///
/// let mut engine = MetricsEngine::<SparseContingency<u32, u32>>::new();
/// assert_eq!(engine.rand_index(), Err(MetricsError::TableNotReady));
///
/// engine.compute_contingency_table(&[1_u32, 1, 2, 2], &[5_u32, 5, 6, 6], true)?;
/// assert_eq!(engine.variation_of_information()?, 0.0);
/// assert_eq!(engine.rand_precision()?, 1.0);
/// # Ok::<(), MetricsError>(())
/// ```
#[derive(Debug)]
pub struct MetricsEngine<T> {
    state: TableState<T>,
}

impl<T> Default for MetricsEngine<T> {
    fn default() -> Self {
        Self {
            state: TableState::Uninitialized,
        }
    }
}

impl<T: ContingencyTable> MetricsEngine<T> {
    /// Creates an engine without a table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine that is ready to answer queries for `table`.
    #[must_use]
    pub fn from_table(table: T) -> Self {
        Self {
            state: TableState::Ready {
                table,
                rand: OnceCell::new(),
                vi: OnceCell::new(),
            },
        }
    }

    /// Installs the table for this comparison.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableAlreadyComputed`] if the engine already
    /// holds a table; create a new engine for a new comparison.
    pub fn install_table(&mut self, table: T) -> Result<()> {
        self.ensure_uninitialized()?;
        *self = Self::from_table(table);
        Ok(())
    }

    /// Returns `true` once a table has been installed.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, TableState::Ready { .. })
    }

    /// Returns the installed table.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn table(&self) -> Result<&T> {
        match &self.state {
            TableState::Ready { table, .. } => Ok(table),
            TableState::Uninitialized => Err(MetricsError::TableNotReady),
        }
    }

    /// Returns the Rand primitives, computing them on first use.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn rand_primitives(&self) -> Result<&RandPrimitives> {
        match &self.state {
            TableState::Ready { table, rand, .. } => {
                Ok(rand.get_or_init(|| compute_rand_primitives(table)))
            }
            TableState::Uninitialized => Err(MetricsError::TableNotReady),
        }
    }

    /// Returns the VI primitives, computing them on first use.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn vi_primitives(&self) -> Result<&ViPrimitives> {
        match &self.state {
            TableState::Ready { table, vi, .. } => {
                Ok(vi.get_or_init(|| compute_vi_primitives(table)))
            }
            TableState::Uninitialized => Err(MetricsError::TableNotReady),
        }
    }

    /// Rand index under the table's native [`RandConvention`].
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn rand_index(&self) -> Result<f64> {
        let convention = self.table()?.rand_convention();
        self.rand_index_with(convention)
    }

    /// Rand index under an explicitly chosen convention.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "Rand index normalisation requires floating-point arithmetic."
    )]
    pub fn rand_index_with(&self, convention: RandConvention) -> Result<f64> {
        let primitives = self.rand_primitives()?;
        let n = self.table()?.element_count() as f64;
        let RandPrimitives {
            row_square_sum: a,
            column_square_sum: b,
            joint_square_sum: ab,
        } = *primitives;
        Ok(match convention {
            RandConvention::ArrayBased => 1.0 - (a + b - 2.0 * ab) / (n * n),
            RandConvention::PairwiseSparse if n < 2.0 => 1.0,
            RandConvention::PairwiseSparse => (a + b) / (n * (n - 1.0)),
        })
    }

    /// Rand precision `AB / B`; `0.0` when `B` is zero.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn rand_precision(&self) -> Result<f64> {
        let primitives = self.rand_primitives()?;
        Ok(guarded_ratio(
            primitives.joint_square_sum,
            primitives.column_square_sum,
        ))
    }

    /// Rand recall `AB / A`; `0.0` when `A` is zero.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn rand_recall(&self) -> Result<f64> {
        let primitives = self.rand_primitives()?;
        Ok(guarded_ratio(
            primitives.joint_square_sum,
            primitives.row_square_sum,
        ))
    }

    /// Rand F-score, the harmonic mean of precision and recall.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn rand_score(&self) -> Result<f64> {
        Ok(f_score(self.rand_precision()?, self.rand_recall()?))
    }

    /// Variation of information `viA + viB - 2·viAB`.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    #[expect(
        clippy::float_arithmetic,
        reason = "VI definition requires floating-point arithmetic."
    )]
    pub fn variation_of_information(&self) -> Result<f64> {
        let vi = self.vi_primitives()?;
        Ok(vi.row_term + vi.column_term - 2.0 * vi.joint_term)
    }

    /// VI precision: `0.0` for a single-cluster first partition, `1.0` for a
    /// single-cluster second partition, else `(viA + viB - viAB) / viA`.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    #[expect(
        clippy::float_arithmetic,
        clippy::float_cmp,
        reason = "VI precision compares exact zero entropy terms."
    )]
    pub fn vi_precision(&self) -> Result<f64> {
        let vi = self.vi_primitives()?;
        Ok(if vi.row_term == 0.0 {
            0.0
        } else if vi.column_term == 0.0 {
            1.0
        } else {
            (vi.row_term + vi.column_term - vi.joint_term) / vi.row_term
        })
    }

    /// VI recall: `1.0` for a single-cluster first partition, `0.0` for a
    /// single-cluster second partition, else `(viA + viB - viAB) / viB`.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    #[expect(
        clippy::float_arithmetic,
        clippy::float_cmp,
        reason = "VI recall compares exact zero entropy terms."
    )]
    pub fn vi_recall(&self) -> Result<f64> {
        let vi = self.vi_primitives()?;
        Ok(if vi.row_term == 0.0 {
            1.0
        } else if vi.column_term == 0.0 {
            0.0
        } else {
            (vi.row_term + vi.column_term - vi.joint_term) / vi.column_term
        })
    }

    /// VI F-score, the harmonic mean of precision and recall.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn vi_score(&self) -> Result<f64> {
        Ok(f_score(self.vi_precision()?, self.vi_recall()?))
    }

    /// Computes all eight metrics.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableNotReady`] before a table is installed.
    pub fn scores(&self) -> Result<MetricScores> {
        Ok(MetricScores {
            rand_index: self.rand_index()?,
            rand_precision: self.rand_precision()?,
            rand_recall: self.rand_recall()?,
            rand_score: self.rand_score()?,
            variation_of_information: self.variation_of_information()?,
            vi_precision: self.vi_precision()?,
            vi_recall: self.vi_recall()?,
            vi_score: self.vi_score()?,
        })
    }

    fn ensure_uninitialized(&self) -> Result<()> {
        if self.is_ready() {
            return Err(MetricsError::TableAlreadyComputed);
        }
        Ok(())
    }
}

impl MetricsEngine<DenseContingency> {
    /// Builds and installs a dense table with a serial pass.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableAlreadyComputed`] on a second call and the
    /// errors of [`DenseContingency::from_volumes`].
    pub fn compute_contingency_table<L, D>(
        &mut self,
        a: ArrayView<'_, L, D>,
        b: ArrayView<'_, L, D>,
        order: TraversalOrder,
    ) -> Result<()>
    where
        L: DenseLabel,
        D: Dimension,
    {
        self.ensure_uninitialized()?;
        self.install_table(DenseContingency::from_volumes(a, b, order)?)
    }

    /// Builds and installs a dense table on `pool`.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableAlreadyComputed`] on a second call and the
    /// errors of [`DenseContingency::from_volumes_parallel`].
    pub fn compute_contingency_table_parallel<L, D>(
        &mut self,
        a: ArrayView<'_, L, D>,
        b: ArrayView<'_, L, D>,
        order: TraversalOrder,
        pool: &ThreadPool,
    ) -> Result<()>
    where
        L: DenseLabel,
        D: Dimension,
    {
        self.ensure_uninitialized()?;
        self.install_table(DenseContingency::from_volumes_parallel(a, b, order, pool)?)
    }
}

impl<A, B> MetricsEngine<SparseContingency<A, B>>
where
    A: BackgroundLabel,
    B: BackgroundLabel,
{
    /// Builds and installs a sparse table from two label sequences.
    ///
    /// # Errors
    /// Returns [`MetricsError::TableAlreadyComputed`] on a second call and the
    /// errors of [`SparseContingency::from_labels`].
    pub fn compute_contingency_table(
        &mut self,
        a: &[A],
        b: &[B],
        ignore_background: bool,
    ) -> Result<()> {
        self.ensure_uninitialized()?;
        self.install_table(SparseContingency::from_labels(a, b, ignore_background)?)
    }
}

#[instrument(
    name = "metrics.rand_primitives",
    level = "debug",
    skip(table),
    fields(elements = table.element_count())
)]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "Rand primitives are accumulated in floating point."
)]
fn compute_rand_primitives<T: ContingencyTable>(table: &T) -> RandPrimitives {
    let correction = table.background_mass() as f64 / table.element_count() as f64;
    let primitives = RandPrimitives {
        row_square_sum: square_sum(table.row_marginals()),
        column_square_sum: square_sum(table.column_marginals()) + correction,
        joint_square_sum: square_sum(table.joint_counts()) + correction,
    };
    debug!(?primitives, "rand primitives computed");
    primitives
}

#[instrument(
    name = "metrics.vi_primitives",
    level = "debug",
    skip(table),
    fields(elements = table.element_count())
)]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "VI primitives are accumulated in floating point."
)]
fn compute_vi_primitives<T: ContingencyTable>(table: &T) -> ViPrimitives {
    let n = table.vi_population() as f64;
    let singletons = singleton_plogp(table.background_mass(), n);
    let primitives = ViPrimitives {
        row_term: plogp_sum(table.row_marginals(), n),
        column_term: plogp_sum(table.column_marginals(), n) + singletons,
        joint_term: plogp_sum(table.joint_counts(), n) + singletons,
    };
    debug!(?primitives, "vi primitives computed");
    primitives
}

#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "quadratic sums are accumulated in floating point."
)]
fn square_sum(counts: impl Iterator<Item = u64>) -> f64 {
    counts
        .map(|count| {
            let count = count as f64;
            count * count
        })
        .sum()
}

/// Sums `p·ln(p)` over the non-zero counts; zero counts never reach `ln`.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "entropy computation requires floating-point arithmetic."
)]
fn plogp_sum(counts: impl Iterator<Item = u64>, n: f64) -> f64 {
    counts
        .filter(|&count| count != 0)
        .map(|count| {
            let probability = count as f64 / n;
            probability * probability.ln()
        })
        .sum()
}

/// `p·ln(p)` over `count` singleton clusters of probability `1/n` each.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "entropy computation requires floating-point arithmetic."
)]
fn singleton_plogp(count: u64, n: f64) -> f64 {
    if count == 0 {
        return 0.0;
    }
    let probability = n.recip();
    count as f64 * probability * probability.ln()
}

#[expect(
    clippy::float_arithmetic,
    reason = "ratio of floating-point primitives."
)]
fn guarded_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

#[expect(
    clippy::float_arithmetic,
    reason = "harmonic mean requires floating-point arithmetic."
)]
fn f_score(precision: f64, recall: f64) -> f64 {
    let sum = precision + recall;
    if sum == 0.0 {
        0.0
    } else {
        2.0 * precision * recall / sum
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use ndarray::array;
    use rstest::rstest;

    const TOLERANCE: f64 = 1e-12;

    fn sparse(a: &[u32], b: &[u32]) -> MetricsEngine<SparseContingency<u32, u32>> {
        let mut engine = MetricsEngine::<SparseContingency<u32, u32>>::new();
        engine
            .compute_contingency_table(a, b, true)
            .expect("table must build");
        engine
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn metrics_require_a_table() {
        let engine = MetricsEngine::<DenseContingency>::new();
        assert!(!engine.is_ready());
        assert_eq!(engine.rand_index(), Err(MetricsError::TableNotReady));
        assert_eq!(engine.rand_score(), Err(MetricsError::TableNotReady));
        assert_eq!(engine.vi_precision(), Err(MetricsError::TableNotReady));
        assert_eq!(engine.scores(), Err(MetricsError::TableNotReady));
        assert!(matches!(engine.table(), Err(MetricsError::TableNotReady)));
    }

    #[test]
    fn table_cannot_be_computed_twice() {
        let mut engine = sparse(&[1, 2], &[1, 2]);
        let err = engine
            .compute_contingency_table(&[1, 2], &[1, 2], true)
            .expect_err("second table is rejected");
        assert_eq!(err, MetricsError::TableAlreadyComputed);
    }

    #[test]
    fn primitives_are_memoised() {
        let engine = sparse(&[1, 1, 2, 2], &[1, 1, 1, 2]);
        let first = engine.rand_primitives().expect("ready");
        let second = engine.rand_primitives().expect("ready");
        assert!(std::ptr::eq(first, second));
        let first = engine.vi_primitives().expect("ready");
        let second = engine.vi_primitives().expect("ready");
        assert!(std::ptr::eq(first, second));
    }

    #[test]
    fn sparse_metrics_match_hand_computation() {
        let engine = sparse(&[1, 1, 2, 2], &[1, 1, 1, 2]);
        let rand = *engine.rand_primitives().expect("ready");
        assert_eq!(
            rand,
            RandPrimitives {
                row_square_sum: 8.0,
                column_square_sum: 10.0,
                joint_square_sum: 6.0,
            }
        );

        assert_close(engine.rand_index().expect("ready"), 18.0 / 12.0);
        assert_close(
            engine.rand_index_with(RandConvention::ArrayBased).expect("ready"),
            1.0 - 6.0 / 16.0,
        );
        assert_close(engine.rand_precision().expect("ready"), 0.6);
        assert_close(engine.rand_recall().expect("ready"), 0.75);
        assert_close(engine.rand_score().expect("ready"), 0.9 / 1.35);

        let vi_a = 0.5_f64.ln();
        let vi_b = 0.75 * 0.75_f64.ln() + 0.25 * 0.25_f64.ln();
        let vi_ab = 0.5 * 0.5_f64.ln() + 0.5 * 0.25_f64.ln();
        assert_close(
            engine.variation_of_information().expect("ready"),
            vi_a + vi_b - 2.0 * vi_ab,
        );
        assert_close(
            engine.vi_precision().expect("ready"),
            (vi_a + vi_b - vi_ab) / vi_a,
        );
        assert_close(
            engine.vi_recall().expect("ready"),
            (vi_a + vi_b - vi_ab) / vi_b,
        );
    }

    #[test]
    fn dense_background_mass_is_folded_into_rand_primitives() {
        let a = array![1_u32, 1, 2, 2, 0, 3];
        let b = array![1_u32, 2, 2, 2, 1, 0];
        let mut engine = MetricsEngine::<DenseContingency>::new();
        engine
            .compute_contingency_table(a.view(), b.view(), TraversalOrder::RowMajor)
            .expect("table must build");

        let correction = 1.0 / 6.0;
        let rand = *engine.rand_primitives().expect("ready");
        assert_close(rand.row_square_sum, 9.0);
        assert_close(rand.column_square_sum, 10.0 + correction);
        assert_close(rand.joint_square_sum, 6.0 + correction);
        assert_close(
            engine.rand_index().expect("ready"),
            1.0 - (9.0 + 10.0 + correction - 2.0 * (6.0 + correction)) / 36.0,
        );
    }

    #[test]
    fn dense_background_mass_counts_as_singletons_in_vi() {
        let a = array![1_u32, 1, 2, 2, 0, 3];
        let b = array![1_u32, 2, 2, 2, 1, 0];
        let mut engine = MetricsEngine::<DenseContingency>::new();
        engine
            .compute_contingency_table(a.view(), b.view(), TraversalOrder::RowMajor)
            .expect("table must build");

        let plogp = |p: f64| p * p.ln();
        let vi_a = 2.0 * plogp(0.4) + plogp(0.2);
        let vi_b = plogp(0.2) + plogp(0.6) + plogp(0.2);
        let vi_ab = plogp(0.2) + plogp(0.2) + plogp(0.4) + plogp(0.2);
        let vi = *engine.vi_primitives().expect("ready");
        assert_close(vi.row_term, vi_a);
        assert_close(vi.column_term, vi_b);
        assert_close(vi.joint_term, vi_ab);
        assert_close(
            engine.variation_of_information().expect("ready"),
            vi_a + vi_b - 2.0 * vi_ab,
        );
    }

    #[test]
    fn dense_background_column_keeps_vi_in_range() {
        let a = array![1_u32, 2];
        let b = array![0_u32, 1];
        let mut engine = MetricsEngine::<DenseContingency>::new();
        engine
            .compute_contingency_table(a.view(), b.view(), TraversalOrder::RowMajor)
            .expect("table must build");

        assert_close(engine.variation_of_information().expect("ready"), 0.0);
        assert_close(engine.vi_precision().expect("ready"), 1.0);
        assert_close(engine.vi_recall().expect("ready"), 1.0);
        assert_close(engine.vi_score().expect("ready"), 1.0);
    }

    #[test]
    fn dense_all_background_first_partition_hits_the_vi_guards() {
        let a = array![0_u32, 0, 0];
        let b = array![1_u32, 2, 2];
        let mut engine = MetricsEngine::<DenseContingency>::new();
        engine
            .compute_contingency_table(a.view(), b.view(), TraversalOrder::RowMajor)
            .expect("table must build");

        assert_eq!(engine.variation_of_information().expect("ready"), 0.0);
        assert_eq!(engine.vi_precision().expect("ready"), 0.0);
        assert_eq!(engine.vi_recall().expect("ready"), 1.0);
    }

    #[rstest]
    #[case(0, 4.0, 0.0)]
    #[case(1, 1.0, 0.0)]
    #[case(2, 4.0, 0.5 * 0.25_f64.ln())]
    fn singletons_contribute_one_term_each(
        #[case] count: u64,
        #[case] n: f64,
        #[case] expected: f64,
    ) {
        assert_close(singleton_plogp(count, n), expected);
    }

    #[test]
    fn pairwise_convention_is_one_for_a_single_element() {
        let engine = sparse(&[4], &[9]);
        assert_eq!(engine.rand_index().expect("ready"), 1.0);
    }

    #[rstest]
    #[case(&[3, 3, 3, 3], &[1, 2, 1, 2], 0.0, 1.0)]
    #[case(&[1, 2, 1, 2], &[3, 3, 3, 3], 1.0, 0.0)]
    #[case(&[3, 3, 3], &[5, 5, 5], 0.0, 1.0)]
    fn vi_zero_guards(
        #[case] a: &[u32],
        #[case] b: &[u32],
        #[case] precision: f64,
        #[case] recall: f64,
    ) {
        let engine = sparse(a, b);
        assert_eq!(engine.vi_precision().expect("ready"), precision);
        assert_eq!(engine.vi_recall().expect("ready"), recall);
    }

    #[rstest]
    #[case(0.0, 0.0, 0.0)]
    #[case(1.0, 0.0, 0.0)]
    #[case(0.5, 0.5, 0.5)]
    #[case(1.0, 1.0, 1.0)]
    fn f_score_is_the_harmonic_mean(
        #[case] precision: f64,
        #[case] recall: f64,
        #[case] expected: f64,
    ) {
        assert_close(f_score(precision, recall), expected);
    }

    #[test]
    fn guarded_ratio_avoids_division_by_zero() {
        assert_eq!(guarded_ratio(0.0, 0.0), 0.0);
        assert_eq!(guarded_ratio(3.0, 4.0), 0.75);
    }

    #[test]
    fn plogp_skips_zero_counts() {
        let total = plogp_sum([0_u64, 4, 0].into_iter(), 4.0);
        assert_eq!(total, 0.0);
    }
}
