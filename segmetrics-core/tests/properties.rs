//! Property suite for table construction and the derived metrics.
//!
//! Case counts follow `PROGTEST_CASES`; forking follows `SEGMETRICS_PBT_FORK`.

mod common;

use ndarray::{Array2, ArrayD, IxDyn};
use proptest::{collection::vec, prelude::*, test_runner::Config as ProptestConfig};
use test_strategy::Arbitrary;

use segmetrics_core::{
    ContingencyTable, DenseContingency, MetricsError, RandConvention, SparseContingency,
    ThreadCount, ThreadPool, TraversalOrder,
};
use segmetrics_test_support::{
    ci::property_test_profile::ProptestRunProfile, fixtures::relabel,
    oracle::matching_pairs_brute_force,
};

use common::{TOLERANCE, dense_engine, sparse_engine};

fn suite_config() -> ProptestConfig {
    let profile = ProptestRunProfile::load(64, false);
    ProptestConfig {
        cases: profile.cases(),
        fork: profile.fork(),
        ..ProptestConfig::default()
    }
}

#[derive(Clone, Copy, Debug, Arbitrary)]
enum OrderChoice {
    RowMajor,
    ColumnMajor,
}

impl From<OrderChoice> for TraversalOrder {
    fn from(choice: OrderChoice) -> Self {
        match choice {
            OrderChoice::RowMajor => Self::RowMajor,
            OrderChoice::ColumnMajor => Self::ColumnMajor,
        }
    }
}

/// Two label sequences of equal length drawn from `labels`.
fn paired_sequences(
    labels: std::ops::Range<u32>,
    max_len: usize,
) -> impl Strategy<Value = (Vec<u32>, Vec<u32>)> {
    (1..=max_len).prop_flat_map(move |len| (vec(labels.clone(), len), vec(labels.clone(), len)))
}

/// Two label grids of equal shape drawn from `labels`.
fn paired_grids(labels: std::ops::Range<u32>) -> impl Strategy<Value = (Array2<u32>, Array2<u32>)> {
    (1_usize..7, 1_usize..7).prop_flat_map(move |(rows, columns)| {
        let cells = rows * columns;
        (vec(labels.clone(), cells), vec(labels.clone(), cells)).prop_map(move |(a, b)| {
            (
                Array2::from_shape_vec((rows, columns), a).expect("cell count matches shape"),
                Array2::from_shape_vec((rows, columns), b).expect("cell count matches shape"),
            )
        })
    })
}

fn flat(labels: &[u32]) -> ArrayD<u32> {
    ArrayD::from_shape_vec(IxDyn(&[labels.len()]), labels.to_vec()).expect("length matches shape")
}

fn in_unit_interval(value: f64) -> bool {
    (-TOLERANCE..=1.0 + TOLERANCE).contains(&value)
}

proptest! {
    #![proptest_config(suite_config())]

    #[test]
    fn sparse_marginals_sum_to_element_count(
        (a, b) in paired_sequences(0..5, 48),
        ignore_background in any::<bool>(),
    ) {
        match SparseContingency::from_labels(&a, &b, ignore_background) {
            Ok(table) => {
                let n = table.element_count();
                prop_assert_eq!(table.joint_counts().sum::<u64>(), n);
                prop_assert_eq!(table.row_marginals().sum::<u64>(), n);
                prop_assert_eq!(table.column_marginals().sum::<u64>(), n);
                let expected = a
                    .iter()
                    .zip(&b)
                    .filter(|&(&x, &y)| !ignore_background || (x != 0 && y != 0))
                    .count() as u64;
                prop_assert_eq!(n, expected);
            }
            Err(error) => {
                prop_assert_eq!(error, MetricsError::EmptyComparison);
                prop_assert!(ignore_background);
                prop_assert!(a.iter().zip(&b).all(|(&x, &y)| x == 0 || y == 0));
            }
        }
    }

    #[test]
    fn dense_marginals_sum_to_element_count_without_background((a, b) in paired_grids(1..6)) {
        let table = DenseContingency::from_volumes(a.view(), b.view(), TraversalOrder::RowMajor)
            .expect("table must build");
        let n = table.element_count();
        prop_assert_eq!(n, a.len() as u64);
        prop_assert_eq!(table.table().sum(), n);
        prop_assert_eq!(table.row_marginals().sum::<u64>(), n);
        prop_assert_eq!(table.column_marginals().sum::<u64>(), n);
        prop_assert_eq!(table.background_mass(), 0);
    }

    #[test]
    fn dense_scores_stay_in_unit_interval((a, b) in paired_grids(0..5)) {
        let engine = dense_engine(a.view().into_dyn(), b.view().into_dyn());
        let scores = engine.scores().expect("ready");
        prop_assert!(in_unit_interval(scores.rand_index), "rand index {}", scores.rand_index);
        prop_assert!(in_unit_interval(scores.rand_precision));
        prop_assert!(in_unit_interval(scores.rand_recall));
        prop_assert!(in_unit_interval(scores.rand_score));
        prop_assert!(in_unit_interval(scores.vi_precision), "vi precision {}", scores.vi_precision);
        prop_assert!(in_unit_interval(scores.vi_recall), "vi recall {}", scores.vi_recall);
        prop_assert!(in_unit_interval(scores.vi_score), "vi score {}", scores.vi_score);
        prop_assert!(
            scores.variation_of_information >= -TOLERANCE,
            "variation of information {}",
            scores.variation_of_information
        );
    }

    #[test]
    fn sparse_scores_stay_in_unit_interval((a, b) in paired_sequences(1..6, 48)) {
        let engine = sparse_engine(&a, &b);
        let scores = engine.scores().expect("ready");
        let array_based = engine
            .rand_index_with(RandConvention::ArrayBased)
            .expect("ready");
        prop_assert!(in_unit_interval(array_based));
        prop_assert!(in_unit_interval(scores.rand_precision));
        prop_assert!(in_unit_interval(scores.rand_recall));
        prop_assert!(in_unit_interval(scores.rand_score));
        prop_assert!(in_unit_interval(scores.vi_precision), "vi precision {}", scores.vi_precision);
        prop_assert!(in_unit_interval(scores.vi_recall), "vi recall {}", scores.vi_recall);
        prop_assert!(in_unit_interval(scores.vi_score));
        prop_assert!(scores.variation_of_information >= -TOLERANCE);
    }

    #[test]
    fn identical_partitions_score_perfectly(labels in vec(1_u32..8, 1..64)) {
        let engine = dense_engine(flat(&labels).view(), flat(&labels).view());
        prop_assert_eq!(engine.rand_index().expect("ready"), 1.0);
        prop_assert_eq!(engine.rand_precision().expect("ready"), 1.0);
        prop_assert_eq!(engine.rand_recall().expect("ready"), 1.0);
        prop_assert!(engine.variation_of_information().expect("ready").abs() <= TOLERANCE);

        let engine = sparse_engine(&labels, &labels);
        prop_assert_eq!(engine.rand_index_with(RandConvention::ArrayBased).expect("ready"), 1.0);
        prop_assert_eq!(engine.rand_precision().expect("ready"), 1.0);
        prop_assert_eq!(engine.rand_recall().expect("ready"), 1.0);
        prop_assert!(engine.variation_of_information().expect("ready").abs() <= TOLERANCE);
    }

    #[test]
    fn single_cluster_partitions_follow_the_guards(
        cluster in 1_u32..100,
        other in vec(1_u32..6, 2..32),
    ) {
        let constant = vec![cluster; other.len()];

        let engine = sparse_engine(&constant, &other);
        prop_assert_eq!(engine.vi_precision().expect("ready"), 0.0);
        prop_assert_eq!(engine.vi_recall().expect("ready"), 1.0);

        prop_assume!(other.iter().any(|&label| label != other[0]));
        let engine = sparse_engine(&other, &constant);
        prop_assert_eq!(engine.vi_precision().expect("ready"), 1.0);
        prop_assert_eq!(engine.vi_recall().expect("ready"), 0.0);
    }

    #[test]
    fn order_preserving_relabeling_changes_nothing(
        (a, b) in paired_sequences(0..6, 48),
        stride in 1_u32..5,
        offset in 1_u32..1000,
    ) {
        prop_assume!(a.iter().zip(&b).any(|(&x, &y)| x != 0 && y != 0));
        let original = sparse_engine(&a, &b).scores().expect("ready");
        let (a, b) = (relabel(&a, stride, offset), relabel(&b, stride + 1, offset));
        let relabeled = sparse_engine(&a, &b).scores().expect("ready");
        prop_assert_eq!(original, relabeled);
    }

    #[test]
    fn rand_index_agrees_with_pair_counting((a, b) in paired_sequences(1..5, 40)) {
        let agreement = matching_pairs_brute_force(&a, &b, false);
        let n = agreement.elements as f64;
        let expected = 1.0 - (n * (n - 1.0) - 2.0 * agreement.matching_pairs as f64) / (n * n);

        let engine = dense_engine(flat(&a).view(), flat(&b).view());
        prop_assert!((engine.rand_index().expect("ready") - expected).abs() <= TOLERANCE);
    }

    #[test]
    fn parallel_construction_matches_serial(
        (a, b) in paired_grids(0..9),
        threads in 1_isize..5,
        order in any::<OrderChoice>(),
    ) {
        let pool = ThreadPool::new(ThreadCount::from_requested(threads)).expect("pool must start");
        let serial = DenseContingency::from_volumes(a.view(), b.view(), TraversalOrder::RowMajor)
            .expect("serial table must build");
        let parallel =
            DenseContingency::from_volumes_parallel(a.view(), b.view(), order.into(), &pool)
                .expect("parallel table must build");
        prop_assert_eq!(parallel, serial);
    }
}
