//! Segmetrics core library.
//!
//! Scores one partition of a finite element set against another with the
//! Rand family (index, precision, recall, F-score) and the variation of
//! information family (VI, precision, recall, F-score). Both families are
//! derived from a single contingency table that is built once, either dense
//! (array-indexed, optionally in parallel) or sparse (map-keyed by label
//! pairs).
//!
//! # Background label
//!
//! Label `0` of every integer label type is the background sentinel
//! ([`BackgroundLabel::BACKGROUND`]). The dense path excludes it
//! structurally by leaving row and column `0` out of the marginals; the
//! sparse path drops every element carrying it when background ignoring is
//! enabled.
//!
//! # Metrics
//!
//! When the `metrics` feature is enabled table construction emits:
//!
//! - `segmetrics_tables_built` (counter, label `representation`)
//! - `segmetrics_table_elements` (histogram)
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod contingency;
mod coordinates;
mod engine;
mod error;
mod label;
mod thread_pool;

pub use crate::{
    builder::{Comparison, ComparisonBuilder, ExecutionStrategy},
    contingency::{
        ContingencyTable, DenseContingency, SparseContingency, max_label, parallel_max_label,
    },
    coordinates::{
        MAX_PARALLEL_DIMENSIONS, TraversalOrder, check_coordinate, for_each_coordinate,
        parallel_fold_coordinates, parallel_for_each_coordinate,
    },
    engine::{MetricScores, MetricsEngine, RandConvention, RandPrimitives, ViPrimitives},
    error::{ErrorCategory, MetricsError, MetricsErrorCode, Result},
    label::{BackgroundLabel, DenseLabel},
    thread_pool::{ThreadCount, ThreadPool},
};
