//! Dense contingency tables over label volumes of identical shape.
//!
//! Row and column `0` hold the background label. They stay in the table but
//! are left out of the marginals: a row marginal `r[i]` (for `i >= 1`) sums
//! the whole row including column `0`, while a column marginal `c[j]` (for
//! `j >= 1`) sums only the foreground rows. The background column's
//! foreground mass is reported separately through
//! [`ContingencyTable::background_mass`].

use ndarray::{Array2, ArrayView, ArrayView2, ArrayViewD, Dimension, s};
use tracing::{Span, debug, field, instrument};

use crate::{
    Result, ThreadPool, TraversalOrder,
    coordinates::{check_coordinate, parallel_fold_coordinates, try_for_each_coordinate},
    engine::RandConvention,
    error::MetricsError,
    label::{DenseLabel, dense_index},
};

use super::{ContingencyTable, record_table_built};

/// Array-backed contingency table indexed by `(label_a, label_b)`.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use segmetrics_core::{ContingencyTable, DenseContingency, TraversalOrder};
///
/// let a = array![[1_u32, 1], [2, 0]];
/// let b = array![[1_u32, 2], [2, 2]];
/// let table = DenseContingency::from_volumes(a.view(), b.view(), TraversalOrder::RowMajor)?;
/// assert_eq!(table.shape(), (3, 3));
/// assert_eq!(table.cell(1, 2), 1);
/// assert_eq!(table.element_count(), 4);
/// assert_eq!(table.row_marginal(0), 0);
/// # Ok::<(), segmetrics_core::MetricsError>(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DenseContingency {
    table: Array2<u64>,
    row_marginals: Vec<u64>,
    column_marginals: Vec<u64>,
    element_count: u64,
}

impl DenseContingency {
    /// Builds the table with a single serial pass over every coordinate.
    ///
    /// # Errors
    /// Returns [`MetricsError::ShapeMismatch`] when the volumes differ in
    /// shape, [`MetricsError::EmptyComparison`] when they contain no
    /// elements, and [`MetricsError::LabelOutOfRange`] or
    /// [`MetricsError::TableTooLarge`] when the labels cannot address a
    /// dense table.
    #[instrument(
        name = "metrics.dense_table",
        err,
        skip(a, b),
        fields(shape = ?a.shape(), order = ?order, rows = field::Empty, columns = field::Empty),
    )]
    pub fn from_volumes<L, D>(
        a: ArrayView<'_, L, D>,
        b: ArrayView<'_, L, D>,
        order: TraversalOrder,
    ) -> Result<Self>
    where
        L: DenseLabel,
        D: Dimension,
    {
        let (a, b) = (a.into_dyn(), b.into_dyn());
        let shape = validate_shapes(&a, &b)?;
        let (rows, columns) = table_extents(max_label(&a)?, max_label(&b)?, 1)?;
        record_extents(rows, columns);

        let mut table = Array2::<u64>::zeros((rows, columns));
        try_for_each_coordinate(&shape, order, |coordinate| {
            tally(&mut table, &a, &b, coordinate)
        })?;
        Ok(Self::finish(table, "dense"))
    }

    /// Builds the table on `pool`, one private table per worker slot, and sums
    /// the private tables once every worker has joined.
    ///
    /// The result is identical to [`Self::from_volumes`] for any pool size.
    ///
    /// # Errors
    /// Returns the errors of [`Self::from_volumes`], plus
    /// [`MetricsError::UnsupportedDimensionality`] for volumes with more than
    /// five axes and [`MetricsError::CoordinateOutOfBounds`] if a worker
    /// observes a coordinate outside the volume.
    #[instrument(
        name = "metrics.dense_table_parallel",
        err,
        skip(a, b, pool),
        fields(
            shape = ?a.shape(),
            order = ?order,
            threads = pool.size(),
            rows = field::Empty,
            columns = field::Empty,
        ),
    )]
    pub fn from_volumes_parallel<L, D>(
        a: ArrayView<'_, L, D>,
        b: ArrayView<'_, L, D>,
        order: TraversalOrder,
        pool: &ThreadPool,
    ) -> Result<Self>
    where
        L: DenseLabel,
        D: Dimension,
    {
        let (a, b) = (a.into_dyn(), b.into_dyn());
        let shape = validate_shapes(&a, &b)?;
        let (rows, columns) = table_extents(
            parallel_max_label(&a, order, pool)?,
            parallel_max_label(&b, order, pool)?,
            pool.size(),
        )?;
        record_extents(rows, columns);

        let table = parallel_fold_coordinates(
            pool,
            &shape,
            order,
            || Array2::<u64>::zeros((rows, columns)),
            |partial, coordinate| {
                check_coordinate(coordinate, &shape)?;
                tally(partial, &a, &b, coordinate)
            },
            |merged, partial| *merged += &partial,
        )?;
        Ok(Self::finish(table, "dense_parallel"))
    }

    fn finish(table: Array2<u64>, representation: &'static str) -> Self {
        let mut row_marginals = vec![0; table.nrows()];
        let mut column_marginals = vec![0; table.ncols()];
        for ((row, column), &count) in table.indexed_iter() {
            if row == 0 {
                continue;
            }
            if let Some(total) = row_marginals.get_mut(row) {
                *total += count;
            }
            if column != 0
                && let Some(total) = column_marginals.get_mut(column)
            {
                *total += count;
            }
        }
        let element_count = table.sum();
        debug!(
            elements = element_count,
            rows = table.nrows(),
            columns = table.ncols(),
            "dense contingency table ready"
        );
        record_table_built(representation, element_count);
        Self {
            table,
            row_marginals,
            column_marginals,
            element_count,
        }
    }

    /// Returns `(rows, columns)`, i.e. `(max_a + 1, max_b + 1)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        self.table.dim()
    }

    /// Returns `C[row][column]`, or `0` outside the table.
    #[must_use]
    pub fn cell(&self, row: usize, column: usize) -> u64 {
        self.table.get((row, column)).copied().unwrap_or(0)
    }

    /// Returns the row marginal for label `row` (`0` for the background).
    #[must_use]
    pub fn row_marginal(&self, row: usize) -> u64 {
        self.row_marginals.get(row).copied().unwrap_or(0)
    }

    /// Returns the column marginal for label `column` (`0` for the background).
    #[must_use]
    pub fn column_marginal(&self, column: usize) -> u64 {
        self.column_marginals.get(column).copied().unwrap_or(0)
    }

    /// Returns a read-only view of the full table, background included.
    #[must_use]
    pub fn table(&self) -> ArrayView2<'_, u64> {
        self.table.view()
    }
}

impl ContingencyTable for DenseContingency {
    fn element_count(&self) -> u64 {
        self.element_count
    }

    fn row_marginals(&self) -> impl Iterator<Item = u64> + '_ {
        self.row_marginals.iter().copied()
    }

    fn column_marginals(&self) -> impl Iterator<Item = u64> + '_ {
        self.column_marginals.iter().copied()
    }

    fn joint_counts(&self) -> impl Iterator<Item = u64> + '_ {
        self.table.slice(s![1.., 1..]).into_iter().copied()
    }

    fn background_mass(&self) -> u64 {
        self.table.column(0).iter().skip(1).sum()
    }

    fn vi_population(&self) -> u64 {
        self.row_marginals.iter().sum()
    }

    fn rand_convention(&self) -> RandConvention {
        RandConvention::ArrayBased
    }
}

/// Returns the largest label in `volume` with a serial scan.
///
/// # Errors
/// Returns [`MetricsError::EmptyComparison`] for a volume without elements.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use segmetrics_core::max_label;
///
/// let volume = array![[3_u16, 9], [0, 4]].into_dyn();
/// assert_eq!(max_label(&volume.view())?, 9);
/// # Ok::<(), segmetrics_core::MetricsError>(())
/// ```
pub fn max_label<L: DenseLabel>(volume: &ArrayViewD<'_, L>) -> Result<L> {
    volume
        .iter()
        .copied()
        .max()
        .ok_or(MetricsError::EmptyComparison)
}

/// Returns the largest label in `volume`, reducing per-worker maxima
/// sequentially after a parallel scan.
///
/// # Errors
/// Returns [`MetricsError::EmptyComparison`] for a volume without elements
/// and [`MetricsError::UnsupportedDimensionality`] for more than five axes.
pub fn parallel_max_label<L: DenseLabel>(
    volume: &ArrayViewD<'_, L>,
    order: TraversalOrder,
    pool: &ThreadPool,
) -> Result<L> {
    let shape = volume.shape();
    parallel_fold_coordinates(
        pool,
        shape,
        order,
        || None,
        |running: &mut Option<L>, coordinate| {
            check_coordinate(coordinate, shape)?;
            if let Some(&label) = volume.get(coordinate) {
                *running = Some(running.map_or(label, |current| current.max(label)));
            }
            Ok(())
        },
        |merged, partial| {
            *merged = match (*merged, partial) {
                (Some(left), Some(right)) => Some(left.max(right)),
                (left, right) => left.or(right),
            };
        },
    )?
    .ok_or(MetricsError::EmptyComparison)
}

fn validate_shapes<L>(a: &ArrayViewD<'_, L>, b: &ArrayViewD<'_, L>) -> Result<Vec<usize>> {
    if a.shape() != b.shape() {
        return Err(MetricsError::ShapeMismatch {
            left: a.shape().to_vec(),
            right: b.shape().to_vec(),
        });
    }
    if a.is_empty() {
        return Err(MetricsError::EmptyComparison);
    }
    Ok(a.shape().to_vec())
}

/// Table extents for labels up to `max_a` and `max_b`, with `slots` tables
/// alive at once.
///
/// The combined allocation must stay addressable: at most `isize::MAX` bytes.
fn table_extents<L: DenseLabel>(max_a: L, max_b: L, slots: usize) -> Result<(usize, usize)> {
    let too_large = || MetricsError::TableTooLarge {
        rows: usize::MAX,
        columns: usize::MAX,
    };
    let rows = dense_index(max_a)?.checked_add(1).ok_or_else(too_large)?;
    let columns = dense_index(max_b)?.checked_add(1).ok_or_else(too_large)?;
    let bytes = rows
        .checked_mul(columns)
        .and_then(|cells| cells.checked_mul(size_of::<u64>()))
        .and_then(|table| table.checked_mul(slots.max(1)));
    match bytes {
        Some(bytes) if isize::try_from(bytes).is_ok() => Ok((rows, columns)),
        _ => Err(MetricsError::TableTooLarge { rows, columns }),
    }
}

fn record_extents(rows: usize, columns: usize) {
    let span = Span::current();
    span.record("rows", rows);
    span.record("columns", columns);
}

fn tally<L: DenseLabel>(
    table: &mut Array2<u64>,
    a: &ArrayViewD<'_, L>,
    b: &ArrayViewD<'_, L>,
    coordinate: &[usize],
) -> Result<()> {
    let (Some(&left), Some(&right)) = (a.get(coordinate), b.get(coordinate)) else {
        check_coordinate(coordinate, a.shape())?;
        return Err(MetricsError::ShapeMismatch {
            left: coordinate.to_vec(),
            right: a.shape().to_vec(),
        });
    };
    let (row, column) = (dense_index(left)?, dense_index(right)?);
    let cell = table
        .get_mut((row, column))
        .ok_or_else(|| MetricsError::TableTooLarge { rows: row, columns: column })?;
    *cell += 1;
    Ok(())
}
