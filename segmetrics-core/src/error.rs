//! Error types for the segmetrics core library.
//!
//! Defines the error enum exposed by the public API, its stable error codes,
//! and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Broad classes of failure a comparison can hit.
///
/// None of these are transient: retrying the same call with the same inputs
/// fails the same way.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum ErrorCategory {
    /// The inputs cannot describe a valid comparison.
    Precondition,
    /// A metric was requested out of order.
    Sequencing,
    /// A coordinate fell outside the declared array shape.
    Bounds,
    /// The execution environment failed (thread pool, worker bookkeeping).
    Runtime,
}

/// Error type produced while building contingency tables or reading metrics.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetricsError {
    /// The two label volumes have different shapes.
    #[error("segmentation shapes do not match: left={left:?}, right={right:?}")]
    ShapeMismatch {
        /// Shape of the first partition.
        left: Vec<usize>,
        /// Shape of the second partition.
        right: Vec<usize>,
    },
    /// The two label sequences have different lengths.
    #[error("segmentation sizes do not match: left={left}, right={right}")]
    LengthMismatch {
        /// Length of the first partition.
        left: usize,
        /// Length of the second partition.
        right: usize,
    },
    /// No element survived into the table, so every ratio is undefined.
    #[error("no element is labeled in both partitions")]
    EmptyComparison,
    /// A label cannot be used as a dense table index on this host.
    #[error("label {label} cannot address a dense contingency table")]
    LabelOutOfRange {
        /// Debug rendering of the offending label.
        label: Arc<str>,
    },
    /// The dense table dimensions overflow the host address space.
    #[error("dense contingency table of {rows}x{columns} cells is too large")]
    TableTooLarge {
        /// Requested number of rows.
        rows: usize,
        /// Requested number of columns.
        columns: usize,
    },
    /// Parallel coordinate iteration supports a bounded number of axes.
    #[error("parallel iteration supports at most {max} dimensions (got {dimensions})")]
    UnsupportedDimensionality {
        /// Number of axes in the offending shape.
        dimensions: usize,
        /// Maximum number of axes supported.
        max: usize,
    },
    /// A coordinate was observed outside the declared array shape.
    #[error("coordinate {coordinate} on axis {axis} is out of range for extent {extent}")]
    CoordinateOutOfBounds {
        /// Axis on which the violation occurred.
        axis: usize,
        /// The offending coordinate value.
        coordinate: usize,
        /// Extent of the axis.
        extent: usize,
    },
    /// A metric was requested before a contingency table was computed.
    #[error("must compute contingency table first")]
    TableNotReady,
    /// A contingency table was installed into an engine that already has one.
    #[error("contingency table has already been computed for this comparison")]
    TableAlreadyComputed,
    /// The worker pool could not be created.
    #[error("failed to build thread pool: {message}")]
    ThreadPoolBuild {
        /// Message reported by the pool builder.
        message: Arc<str>,
    },
    /// A task ran outside the worker pool that dispatched it.
    #[error("task executed without a worker thread index")]
    ThreadIndexUnavailable,
}

define_error_codes! {
    /// Stable codes describing [`MetricsError`] variants.
    enum MetricsErrorCode for MetricsError {
        /// The two label volumes have different shapes.
        ShapeMismatch => ShapeMismatch { .. } => "SEGMETRICS_SHAPE_MISMATCH",
        /// The two label sequences have different lengths.
        LengthMismatch => LengthMismatch { .. } => "SEGMETRICS_LENGTH_MISMATCH",
        /// No element survived into the table.
        EmptyComparison => EmptyComparison => "SEGMETRICS_EMPTY_COMPARISON",
        /// A label cannot be used as a dense table index.
        LabelOutOfRange => LabelOutOfRange { .. } => "SEGMETRICS_LABEL_OUT_OF_RANGE",
        /// The dense table dimensions overflow the host address space.
        TableTooLarge => TableTooLarge { .. } => "SEGMETRICS_TABLE_TOO_LARGE",
        /// Parallel coordinate iteration supports a bounded number of axes.
        UnsupportedDimensionality => UnsupportedDimensionality { .. }
            => "SEGMETRICS_UNSUPPORTED_DIMENSIONALITY",
        /// A coordinate was observed outside the declared array shape.
        CoordinateOutOfBounds => CoordinateOutOfBounds { .. }
            => "SEGMETRICS_COORDINATE_OUT_OF_BOUNDS",
        /// A metric was requested before a contingency table was computed.
        TableNotReady => TableNotReady => "SEGMETRICS_TABLE_NOT_READY",
        /// A second contingency table was installed.
        TableAlreadyComputed => TableAlreadyComputed => "SEGMETRICS_TABLE_ALREADY_COMPUTED",
        /// The worker pool could not be created.
        ThreadPoolBuild => ThreadPoolBuild { .. } => "SEGMETRICS_THREAD_POOL_BUILD",
        /// A task ran outside the worker pool that dispatched it.
        ThreadIndexUnavailable => ThreadIndexUnavailable => "SEGMETRICS_THREAD_INDEX_UNAVAILABLE",
    }
}

impl MetricsError {
    /// Classifies the error so callers can tell misuse from bad input.
    ///
    /// # Examples
    /// ```
    /// use segmetrics_core::{ErrorCategory, MetricsError};
    ///
    /// assert_eq!(MetricsError::TableNotReady.category(), ErrorCategory::Sequencing);
    /// assert_eq!(MetricsError::EmptyComparison.category(), ErrorCategory::Precondition);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::ShapeMismatch { .. }
            | Self::LengthMismatch { .. }
            | Self::EmptyComparison
            | Self::LabelOutOfRange { .. }
            | Self::TableTooLarge { .. }
            | Self::UnsupportedDimensionality { .. } => ErrorCategory::Precondition,
            Self::TableNotReady | Self::TableAlreadyComputed => ErrorCategory::Sequencing,
            Self::CoordinateOutOfBounds { .. } => ErrorCategory::Bounds,
            Self::ThreadPoolBuild { .. } | Self::ThreadIndexUnavailable => ErrorCategory::Runtime,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, MetricsError>;
