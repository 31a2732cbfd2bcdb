use segmetrics_core::{DenseContingency, MetricsEngine, SparseContingency, TraversalOrder};

use ndarray::ArrayViewD;

pub const TOLERANCE: f64 = 1e-9;

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() <= TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

#[must_use]
pub fn sparse_engine(a: &[u32], b: &[u32]) -> MetricsEngine<SparseContingency<u32, u32>> {
    let mut engine = MetricsEngine::<SparseContingency<u32, u32>>::new();
    engine
        .compute_contingency_table(a, b, true)
        .expect("sparse table must build");
    engine
}

#[must_use]
pub fn dense_engine(
    a: ArrayViewD<'_, u32>,
    b: ArrayViewD<'_, u32>,
) -> MetricsEngine<DenseContingency> {
    let mut engine = MetricsEngine::<DenseContingency>::new();
    engine
        .compute_contingency_table(a, b, TraversalOrder::RowMajor)
        .expect("dense table must build");
    engine
}
