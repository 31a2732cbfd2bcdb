//! Builder utilities for configuring comparisons.
//!
//! Exposes the execution strategy selection surface and the validation that
//! runs before a [`Comparison`] is constructed.

use ndarray::{ArrayView, Dimension};
use tracing::{debug, instrument};

use crate::{
    MAX_PARALLEL_DIMENSIONS, Result, ThreadCount, ThreadPool, TraversalOrder,
    contingency::{DenseContingency, SparseContingency},
    engine::MetricsEngine,
    label::{BackgroundLabel, DenseLabel},
};

/// Indicates how [`Comparison::compare_volumes`] builds dense tables.
///
/// `Auto` uses the pool whenever it has more than one worker and the volumes
/// have at most [`MAX_PARALLEL_DIMENSIONS`] axes, and falls back to a serial
/// pass otherwise. Both paths produce identical tables.
///
/// # Examples
/// ```
/// use segmetrics_core::ExecutionStrategy;
///
/// let strategy = ExecutionStrategy::default();
/// assert!(matches!(strategy, ExecutionStrategy::Auto));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStrategy {
    /// Let the comparison decide per call.
    #[default]
    Auto,
    /// Always build on the calling thread; no pool is started.
    Serial,
    /// Always build on the pool.
    Parallel,
}

/// Configures and constructs [`Comparison`] instances.
///
/// # Examples
/// ```
/// use segmetrics_core::{ComparisonBuilder, ExecutionStrategy, ThreadCount};
///
/// let comparison = ComparisonBuilder::new()
///     .with_threads(ThreadCount::from_requested(2))
///     .with_execution_strategy(ExecutionStrategy::Parallel)
///     .build()
///     .expect("builder configuration is valid");
/// assert_eq!(comparison.threads(), 2);
/// assert_eq!(comparison.execution_strategy(), ExecutionStrategy::Parallel);
/// ```
#[derive(Debug, Clone)]
pub struct ComparisonBuilder {
    threads: ThreadCount,
    execution_strategy: ExecutionStrategy,
    traversal_order: TraversalOrder,
    ignore_background: bool,
}

impl Default for ComparisonBuilder {
    fn default() -> Self {
        Self {
            threads: ThreadCount::Available,
            execution_strategy: ExecutionStrategy::Auto,
            traversal_order: TraversalOrder::RowMajor,
            ignore_background: true,
        }
    }
}

impl ComparisonBuilder {
    /// Creates a builder populated with default parameters.
    ///
    /// # Examples
    /// ```
    /// use segmetrics_core::{ComparisonBuilder, ExecutionStrategy, ThreadCount, TraversalOrder};
    ///
    /// let builder = ComparisonBuilder::new();
    /// assert_eq!(builder.threads(), ThreadCount::Available);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Auto);
    /// assert_eq!(builder.traversal_order(), TraversalOrder::RowMajor);
    /// assert!(builder.ignore_background());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of pool workers.
    #[must_use]
    pub fn with_threads(mut self, threads: ThreadCount) -> Self {
        self.threads = threads;
        self
    }

    /// Returns the requested number of pool workers.
    #[must_use]
    pub fn threads(&self) -> ThreadCount {
        self.threads
    }

    /// Sets the execution strategy for dense comparisons.
    ///
    /// # Examples
    /// ```
    /// use segmetrics_core::{ComparisonBuilder, ExecutionStrategy};
    ///
    /// let builder = ComparisonBuilder::new().with_execution_strategy(ExecutionStrategy::Serial);
    /// assert_eq!(builder.execution_strategy(), ExecutionStrategy::Serial);
    /// ```
    #[must_use]
    pub fn with_execution_strategy(mut self, strategy: ExecutionStrategy) -> Self {
        self.execution_strategy = strategy;
        self
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Sets the coordinate traversal order for dense comparisons.
    #[must_use]
    pub fn with_traversal_order(mut self, order: TraversalOrder) -> Self {
        self.traversal_order = order;
        self
    }

    /// Returns the configured traversal order.
    #[must_use]
    pub fn traversal_order(&self) -> TraversalOrder {
        self.traversal_order
    }

    /// Chooses whether sparse comparisons drop background elements.
    ///
    /// # Examples
    /// ```
    /// use segmetrics_core::ComparisonBuilder;
    ///
    /// let builder = ComparisonBuilder::new().with_ignore_background(false);
    /// assert!(!builder.ignore_background());
    /// ```
    #[must_use]
    pub fn with_ignore_background(mut self, ignore: bool) -> Self {
        self.ignore_background = ignore;
        self
    }

    /// Returns whether sparse comparisons drop background elements.
    #[must_use]
    pub fn ignore_background(&self) -> bool {
        self.ignore_background
    }

    /// Starts the worker pool if the strategy needs one and constructs a
    /// [`Comparison`].
    ///
    /// # Errors
    /// Returns [`crate::MetricsError::ThreadPoolBuild`] when the pool cannot be
    /// started.
    ///
    /// # Examples
    /// ```
    /// use segmetrics_core::{ComparisonBuilder, ExecutionStrategy};
    ///
    /// let comparison = ComparisonBuilder::new()
    ///     .with_execution_strategy(ExecutionStrategy::Serial)
    ///     .build()
    ///     .expect("configuration is valid");
    /// assert_eq!(comparison.threads(), 1);
    /// ```
    #[instrument(
        name = "metrics.comparison",
        err,
        skip(self),
        fields(strategy = ?self.execution_strategy)
    )]
    pub fn build(self) -> Result<Comparison> {
        let pool = match self.execution_strategy {
            ExecutionStrategy::Serial => None,
            ExecutionStrategy::Auto | ExecutionStrategy::Parallel => {
                Some(ThreadPool::new(self.threads)?)
            }
        };
        Ok(Comparison {
            pool,
            execution_strategy: self.execution_strategy,
            traversal_order: self.traversal_order,
            ignore_background: self.ignore_background,
        })
    }
}

/// A configured comparison; each call yields a fresh, ready [`MetricsEngine`].
///
/// The worker pool, when present, is shared by every call.
///
/// # Examples
/// ```
/// use ndarray::array;
/// use segmetrics_core::ComparisonBuilder;
///
/// let comparison = ComparisonBuilder::new().build()?;
/// let truth = array![[1_u32, 1, 2], [1, 2, 2]];
/// let engine = comparison.compare_volumes(truth.view(), truth.view())?;
/// assert_eq!(engine.rand_index()?, 1.0);
/// assert_eq!(engine.variation_of_information()?, 0.0);
/// # Ok::<(), segmetrics_core::MetricsError>(())
/// ```
#[derive(Debug)]
pub struct Comparison {
    pool: Option<ThreadPool>,
    execution_strategy: ExecutionStrategy,
    traversal_order: TraversalOrder,
    ignore_background: bool,
}

impl Comparison {
    /// Returns the number of workers available to dense comparisons.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.as_ref().map_or(1, ThreadPool::size)
    }

    /// Returns the configured execution strategy.
    #[must_use]
    pub fn execution_strategy(&self) -> ExecutionStrategy {
        self.execution_strategy
    }

    /// Returns the configured traversal order.
    #[must_use]
    pub fn traversal_order(&self) -> TraversalOrder {
        self.traversal_order
    }

    /// Returns whether sparse comparisons drop background elements.
    #[must_use]
    pub fn ignore_background(&self) -> bool {
        self.ignore_background
    }

    /// Compares two labeled volumes of equal shape through a dense table.
    ///
    /// # Errors
    /// Returns the errors of [`DenseContingency::from_volumes`] and, on the
    /// parallel path, [`DenseContingency::from_volumes_parallel`].
    pub fn compare_volumes<L, D>(
        &self,
        a: ArrayView<'_, L, D>,
        b: ArrayView<'_, L, D>,
    ) -> Result<MetricsEngine<DenseContingency>>
    where
        L: DenseLabel,
        D: Dimension,
    {
        let mut engine = MetricsEngine::<DenseContingency>::new();
        match self.parallel_pool(a.ndim()) {
            Some(pool) => {
                engine.compute_contingency_table_parallel(a, b, self.traversal_order, pool)?;
            }
            None => engine.compute_contingency_table(a, b, self.traversal_order)?,
        }
        Ok(engine)
    }

    /// Compares two label sequences of equal length through a sparse table.
    ///
    /// # Errors
    /// Returns the errors of [`SparseContingency::from_labels`].
    pub fn compare_sequences<A, B>(
        &self,
        a: &[A],
        b: &[B],
    ) -> Result<MetricsEngine<SparseContingency<A, B>>>
    where
        A: BackgroundLabel,
        B: BackgroundLabel,
    {
        let mut engine = MetricsEngine::<SparseContingency<A, B>>::new();
        engine.compute_contingency_table(a, b, self.ignore_background)?;
        Ok(engine)
    }

    fn parallel_pool(&self, dimensions: usize) -> Option<&ThreadPool> {
        let pool = self.pool.as_ref()?;
        let parallel = match self.execution_strategy {
            ExecutionStrategy::Serial => false,
            ExecutionStrategy::Parallel => true,
            ExecutionStrategy::Auto => pool.size() > 1 && dimensions <= MAX_PARALLEL_DIMENSIONS,
        };
        debug!(parallel, dimensions, threads = pool.size(), "dense execution path selected");
        parallel.then_some(pool)
    }
}
