//! Benchmark support crate for segmetrics.
//!
//! Provides parameter types and seeded label volumes shared by the Criterion
//! benchmarks for dense table construction and metric evaluation.

pub mod params;
pub mod volumes;
