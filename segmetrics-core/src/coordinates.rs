//! Multi-index enumeration over n-dimensional shapes.
//!
//! The serial walkers accept any number of axes. The parallel walkers split
//! the slowest-varying axis ("pool axis") into independent units of work and
//! sweep the remaining axes serially inside each unit, so every coordinate
//! sharing a pool-axis value is visited by the same worker.

use crate::{Result, ThreadPool, error::MetricsError};

/// Maximum number of axes accepted by the parallel walkers.
pub const MAX_PARALLEL_DIMENSIONS: usize = 5;

/// Order in which coordinates are produced.
///
/// Only cache locality depends on the order; every coordinate is visited
/// exactly once either way.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum TraversalOrder {
    /// The first axis varies slowest (C order).
    #[default]
    RowMajor,
    /// The first axis varies fastest (Fortran order).
    ColumnMajor,
}

impl TraversalOrder {
    const fn pool_axis(self, dimensions: usize) -> Option<usize> {
        if dimensions == 0 {
            return None;
        }
        match self {
            Self::RowMajor => Some(0),
            Self::ColumnMajor => Some(dimensions - 1),
        }
    }
}

/// Calls `visit` with every coordinate of `shape` in the requested order.
///
/// # Examples
/// ```
/// use segmetrics_core::{TraversalOrder, for_each_coordinate};
///
/// let mut seen = Vec::new();
/// for_each_coordinate(&[2, 2], TraversalOrder::ColumnMajor, |coord| seen.push(coord.to_vec()));
/// assert_eq!(seen, [[0, 0], [1, 0], [0, 1], [1, 1]]);
/// ```
pub fn for_each_coordinate<F>(shape: &[usize], order: TraversalOrder, mut visit: F)
where
    F: FnMut(&[usize]),
{
    let infallible = try_for_each_coordinate(shape, order, |coordinate| {
        visit(coordinate);
        Ok(())
    });
    debug_assert!(infallible.is_ok());
}

/// Serial walk whose visitor may fail; stops at the first error.
pub(crate) fn try_for_each_coordinate<F>(
    shape: &[usize],
    order: TraversalOrder,
    visit: F,
) -> Result<()>
where
    F: FnMut(&[usize]) -> Result<()>,
{
    sweep(shape, order, None, visit)
}

/// Calls `visit(thread_id, coordinate)` for every coordinate of `shape`,
/// distributing pool-axis slices across `pool`.
///
/// # Errors
/// Returns [`MetricsError::UnsupportedDimensionality`] for shapes with more
/// than [`MAX_PARALLEL_DIMENSIONS`] axes and propagates the first error
/// returned by `visit`.
pub fn parallel_for_each_coordinate<F>(
    pool: &ThreadPool,
    shape: &[usize],
    order: TraversalOrder,
    visit: F,
) -> Result<()>
where
    F: Fn(usize, &[usize]) -> Result<()> + Sync,
{
    let (axis, units) = partition(shape, order)?;
    pool.parallel_for(units, |thread_id, unit| {
        sweep(shape, order, axis.map(|axis| (axis, unit)), |coordinate| {
            visit(thread_id, coordinate)
        })
    })
}

/// Folds every coordinate of `shape` into per-worker accumulators and merges
/// them sequentially once all workers have joined.
///
/// This is the fan-out/fan-in primitive behind parallel table construction
/// and the parallel label maximum.
///
/// # Errors
/// Returns [`MetricsError::UnsupportedDimensionality`] for shapes with more
/// than [`MAX_PARALLEL_DIMENSIONS`] axes and propagates the first error
/// returned by `visit`.
///
/// # Examples
/// ```
/// use segmetrics_core::{ThreadCount, ThreadPool, TraversalOrder, parallel_fold_coordinates};
///
/// let pool = ThreadPool::new(ThreadCount::from_requested(3))?;
/// let visited = parallel_fold_coordinates(
///     &pool,
///     &[4, 5, 6],
///     TraversalOrder::RowMajor,
///     || 0_usize,
///     |count, _coord| {
///         *count += 1;
///         Ok(())
///     },
///     |total, partial| *total += partial,
/// )?;
/// assert_eq!(visited, 120);
/// # Ok::<(), segmetrics_core::MetricsError>(())
/// ```
pub fn parallel_fold_coordinates<A, I, V, M>(
    pool: &ThreadPool,
    shape: &[usize],
    order: TraversalOrder,
    init: I,
    visit: V,
    merge: M,
) -> Result<A>
where
    A: Send,
    I: Fn() -> A + Sync,
    V: Fn(&mut A, &[usize]) -> Result<()> + Sync,
    M: FnMut(&mut A, A),
{
    let (axis, units) = partition(shape, order)?;
    pool.fan_out_fan_in(
        units,
        init,
        |accumulator, unit| {
            sweep(shape, order, axis.map(|axis| (axis, unit)), |coordinate| {
                visit(accumulator, coordinate)
            })
        },
        merge,
    )
}

/// Verifies that `coordinate` lies inside `shape`.
///
/// # Errors
/// Returns [`MetricsError::CoordinateOutOfBounds`] naming the first axis
/// that is out of range, or [`MetricsError::ShapeMismatch`] when the
/// coordinate and the shape disagree on dimensionality.
///
/// # Examples
/// ```
/// use segmetrics_core::{MetricsError, check_coordinate};
///
/// assert!(check_coordinate(&[1, 2], &[2, 3]).is_ok());
/// assert_eq!(
///     check_coordinate(&[1, 3], &[2, 3]),
///     Err(MetricsError::CoordinateOutOfBounds { axis: 1, coordinate: 3, extent: 3 }),
/// );
/// ```
pub fn check_coordinate(coordinate: &[usize], shape: &[usize]) -> Result<()> {
    if coordinate.len() != shape.len() {
        return Err(MetricsError::ShapeMismatch {
            left: coordinate.to_vec(),
            right: shape.to_vec(),
        });
    }
    for (axis, (&value, &extent)) in coordinate.iter().zip(shape).enumerate() {
        if value >= extent {
            return Err(MetricsError::CoordinateOutOfBounds {
                axis,
                coordinate: value,
                extent,
            });
        }
    }
    Ok(())
}

fn partition(shape: &[usize], order: TraversalOrder) -> Result<(Option<usize>, usize)> {
    if shape.len() > MAX_PARALLEL_DIMENSIONS {
        return Err(MetricsError::UnsupportedDimensionality {
            dimensions: shape.len(),
            max: MAX_PARALLEL_DIMENSIONS,
        });
    }
    let axis = order.pool_axis(shape.len());
    let units = axis
        .and_then(|axis| shape.get(axis).copied())
        .unwrap_or(1);
    Ok((axis, units))
}

/// Walks `shape`, optionally holding one axis at a fixed value.
fn sweep<F>(
    shape: &[usize],
    order: TraversalOrder,
    pinned: Option<(usize, usize)>,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(&[usize]) -> Result<()>,
{
    if shape.contains(&0) {
        return Ok(());
    }
    let mut coordinate = vec![0; shape.len()];
    let pinned_axis = pinned.map(|(axis, value)| {
        if let Some(slot) = coordinate.get_mut(axis) {
            *slot = value;
        }
        axis
    });
    loop {
        visit(&coordinate)?;
        if !advance(&mut coordinate, shape, order, pinned_axis) {
            return Ok(());
        }
    }
}

fn advance(
    coordinate: &mut [usize],
    shape: &[usize],
    order: TraversalOrder,
    pinned: Option<usize>,
) -> bool {
    let axes = coordinate.iter_mut().zip(shape).enumerate();
    match order {
        TraversalOrder::RowMajor => step(axes.rev(), pinned),
        TraversalOrder::ColumnMajor => step(axes, pinned),
    }
}

fn step<'a, I>(axes: I, pinned: Option<usize>) -> bool
where
    I: Iterator<Item = (usize, (&'a mut usize, &'a usize))>,
{
    for (axis, (value, &extent)) in axes {
        if pinned == Some(axis) {
            continue;
        }
        *value += 1;
        if *value < extent {
            return true;
        }
        *value = 0;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::{num::NonZeroUsize, sync::Mutex};

    use rstest::rstest;

    use crate::ThreadCount;

    fn collect(shape: &[usize], order: TraversalOrder) -> Vec<Vec<usize>> {
        let mut seen = Vec::new();
        for_each_coordinate(shape, order, |coordinate| seen.push(coordinate.to_vec()));
        seen
    }

    fn pool(threads: usize) -> ThreadPool {
        let count = NonZeroUsize::new(threads).expect("tests request at least one thread");
        ThreadPool::new(ThreadCount::Fixed(count)).expect("pool must build")
    }

    #[test]
    fn row_major_varies_last_axis_fastest() {
        assert_eq!(
            collect(&[2, 3], TraversalOrder::RowMajor),
            [[0, 0], [0, 1], [0, 2], [1, 0], [1, 1], [1, 2]]
        );
    }

    #[test]
    fn column_major_varies_first_axis_fastest() {
        assert_eq!(
            collect(&[2, 3], TraversalOrder::ColumnMajor),
            [[0, 0], [1, 0], [0, 1], [1, 1], [0, 2], [1, 2]]
        );
    }

    #[test]
    fn zero_dimensional_shape_has_one_coordinate() {
        assert_eq!(collect(&[], TraversalOrder::RowMajor), [Vec::<usize>::new()]);
    }

    #[rstest]
    #[case(&[0])]
    #[case(&[3, 0, 2])]
    fn empty_extents_yield_nothing(#[case] shape: &[usize]) {
        assert!(collect(shape, TraversalOrder::RowMajor).is_empty());
    }

    #[test]
    fn serial_walk_accepts_many_axes() {
        let seen = collect(&[2, 1, 2, 1, 2, 1, 2], TraversalOrder::RowMajor);
        assert_eq!(seen.len(), 16);
    }

    #[rstest]
    #[case(TraversalOrder::RowMajor, 1)]
    #[case(TraversalOrder::RowMajor, 4)]
    #[case(TraversalOrder::ColumnMajor, 1)]
    #[case(TraversalOrder::ColumnMajor, 4)]
    fn parallel_walk_visits_every_coordinate_once(
        #[case] order: TraversalOrder,
        #[case] threads: usize,
    ) {
        let shape = [3, 4, 2, 2, 3];
        let seen = Mutex::new(Vec::new());
        parallel_for_each_coordinate(&pool(threads), &shape, order, |thread_id, coordinate| {
            assert!(thread_id < threads);
            seen.lock().expect("lock poisoned").push(coordinate.to_vec());
            Ok(())
        })
        .expect("walk must succeed");

        let mut seen = seen.into_inner().expect("lock poisoned");
        seen.sort_unstable();
        let mut expected = collect(&shape, order);
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }

    #[test]
    fn parallel_walk_keeps_a_pool_slice_on_one_worker() {
        let shape = [6, 5, 4];
        let owners = Mutex::new(vec![Vec::new(); 6]);
        parallel_for_each_coordinate(
            &pool(3),
            &shape,
            TraversalOrder::RowMajor,
            |thread_id, coordinate| {
                let slice = coordinate.first().copied().expect("three axes");
                owners.lock().expect("lock poisoned")[slice].push(thread_id);
                Ok(())
            },
        )
        .expect("walk must succeed");
        for workers in owners.into_inner().expect("lock poisoned") {
            assert_eq!(workers.len(), 20);
            assert!(workers.windows(2).all(|pair| pair[0] == pair[1]));
        }
    }

    #[test]
    fn parallel_walk_rejects_six_axes() {
        let err = parallel_for_each_coordinate(
            &pool(2),
            &[1, 1, 1, 1, 1, 1],
            TraversalOrder::RowMajor,
            |_, _| Ok(()),
        )
        .expect_err("six axes are unsupported");
        assert_eq!(
            err,
            MetricsError::UnsupportedDimensionality {
                dimensions: 6,
                max: MAX_PARALLEL_DIMENSIONS,
            }
        );
    }

    #[test]
    fn parallel_fold_stops_on_visitor_error() {
        let err = parallel_fold_coordinates(
            &pool(2),
            &[4, 4],
            TraversalOrder::RowMajor,
            || (),
            |_, coordinate| check_coordinate(coordinate, &[4, 3]),
            |_, _| {},
        )
        .expect_err("column 3 is out of bounds");
        assert!(matches!(
            err,
            MetricsError::CoordinateOutOfBounds {
                axis: 1,
                coordinate: 3,
                extent: 3,
            }
        ));
    }

    #[test]
    fn check_coordinate_rejects_dimensionality_mismatch() {
        let err = check_coordinate(&[0], &[1, 1]).expect_err("dimensions differ");
        assert_eq!(err.code(), crate::MetricsErrorCode::ShapeMismatch);
    }
}
