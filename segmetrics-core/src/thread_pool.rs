//! Fixed-size worker pool used for parallel table construction.
//!
//! Wraps a dedicated Rayon pool and exposes the two dispatch shapes the
//! builders need: a blocking `parallel_for` that hands each iteration its
//! worker id, and a fan-out/fan-in reduction over private accumulators.

use std::{num::NonZeroUsize, sync::Arc};

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::{Result, error::MetricsError};

/// Requested number of worker threads.
///
/// # Examples
/// ```
/// use std::num::NonZeroUsize;
/// use segmetrics_core::ThreadCount;
///
/// assert_eq!(ThreadCount::from_requested(-1), ThreadCount::Available);
/// assert_eq!(ThreadCount::from_requested(0), ThreadCount::Available);
/// assert_eq!(
///     ThreadCount::from_requested(4),
///     ThreadCount::Fixed(NonZeroUsize::new(4).expect("non-zero")),
/// );
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ThreadCount {
    /// Use every hardware thread the host reports.
    #[default]
    Available,
    /// Use exactly this many workers.
    Fixed(NonZeroUsize),
}

impl ThreadCount {
    /// Interprets a signed request where zero or negative means "all".
    #[must_use]
    pub fn from_requested(requested: isize) -> Self {
        usize::try_from(requested)
            .ok()
            .and_then(NonZeroUsize::new)
            .map_or(Self::Available, Self::Fixed)
    }

    const fn as_rayon(self) -> usize {
        match self {
            Self::Available => 0,
            Self::Fixed(count) => count.get(),
        }
    }
}

/// A fixed-size pool of worker threads.
///
/// # Examples
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use segmetrics_core::{ThreadCount, ThreadPool};
///
/// let pool = ThreadPool::new(ThreadCount::from_requested(2))?;
/// assert_eq!(pool.size(), 2);
///
/// let visited = AtomicUsize::new(0);
/// pool.parallel_for(10, |thread_id, _index| {
///     assert!(thread_id < 2);
///     visited.fetch_add(1, Ordering::Relaxed);
///     Ok(())
/// })?;
/// assert_eq!(visited.load(Ordering::Relaxed), 10);
/// # Ok::<(), segmetrics_core::MetricsError>(())
/// ```
#[derive(Debug)]
pub struct ThreadPool {
    inner: rayon::ThreadPool,
}

impl ThreadPool {
    /// Starts a pool with the requested number of workers.
    ///
    /// # Errors
    /// Returns [`MetricsError::ThreadPoolBuild`] when the operating system
    /// refuses to spawn the workers.
    #[instrument(name = "metrics.thread_pool", err, fields(requested = ?threads))]
    pub fn new(threads: ThreadCount) -> Result<Self> {
        let inner = rayon::ThreadPoolBuilder::new()
            .num_threads(threads.as_rayon())
            .thread_name(|index| format!("segmetrics-worker-{index}"))
            .build()
            .map_err(|error| MetricsError::ThreadPoolBuild {
                message: Arc::from(error.to_string()),
            })?;
        debug!(size = inner.current_num_threads(), "thread pool ready");
        Ok(Self { inner })
    }

    /// Returns the number of workers.
    #[must_use]
    pub fn size(&self) -> usize {
        self.inner.current_num_threads()
    }

    /// Invokes `body(thread_id, index)` for every `index` in `0..n`.
    ///
    /// `thread_id` lies in `0..self.size()`. The call blocks until every
    /// dispatched iteration has returned. The first error stops further
    /// iterations from being scheduled and is returned once the in-flight
    /// ones have joined; a panic in `body` resumes on the caller.
    ///
    /// # Errors
    /// Propagates the first error returned by `body`, or
    /// [`MetricsError::ThreadIndexUnavailable`] if an iteration runs outside
    /// this pool.
    pub fn parallel_for<F>(&self, n: usize, body: F) -> Result<()>
    where
        F: Fn(usize, usize) -> Result<()> + Sync,
    {
        self.inner.install(|| {
            (0..n).into_par_iter().try_for_each(|index| {
                let thread_id =
                    rayon::current_thread_index().ok_or(MetricsError::ThreadIndexUnavailable)?;
                body(thread_id, index)
            })
        })
    }

    /// Folds `0..n` into one private accumulator per worker slot, then merges
    /// the partial accumulators sequentially in slot order.
    ///
    /// The range is cut into at most `self.size()` contiguous blocks. Each
    /// block owns its accumulator outright, so workers never share mutable
    /// state and no locking is needed. Integer-valued reductions therefore
    /// produce identical results for every pool size.
    ///
    /// # Errors
    /// Propagates the first error returned by `work`.
    pub fn fan_out_fan_in<A, I, W, M>(&self, n: usize, init: I, work: W, mut merge: M) -> Result<A>
    where
        A: Send,
        I: Fn() -> A + Sync,
        W: Fn(&mut A, usize) -> Result<()> + Sync,
        M: FnMut(&mut A, A),
    {
        let slots = self.size().clamp(1, n.max(1));
        let span = n.div_ceil(slots).max(1);
        let partials = self.inner.install(|| {
            (0..slots)
                .into_par_iter()
                .map(|slot| {
                    let start = slot.saturating_mul(span).min(n);
                    let end = start.saturating_add(span).min(n);
                    let mut accumulator = init();
                    for index in start..end {
                        work(&mut accumulator, index)?;
                    }
                    Ok(accumulator)
                })
                .collect::<Result<Vec<A>>>()
        })?;

        let mut merged = init();
        for partial in partials {
            merge(&mut merged, partial);
        }
        Ok(merged)
    }
}
