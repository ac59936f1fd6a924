//! Property tests: the unrolled fixed-width computers must agree with the
//! byte-wise computers, and the scan must not depend on its blocking.

use bitknn::distance_measures::*;
use bitknn::prelude::*;
use proptest::prelude::*;

const FAMILIES: [BinaryMetric; 3] = [
    BinaryMetric::Jaccard,
    BinaryMetric::Substructure,
    BinaryMetric::Superstructure,
];

fn specialized(metric: BinaryMetric, a: &[u8], b: &[u8]) -> f32 {
    let n = a.len();
    match (metric, n) {
        (BinaryMetric::Jaccard, 16) => JaccardComputer16::new(a, n).compute(b),
        (BinaryMetric::Jaccard, 32) => JaccardComputer32::new(a, n).compute(b),
        (BinaryMetric::Jaccard, 64) => JaccardComputer64::new(a, n).compute(b),
        (BinaryMetric::Jaccard, 128) => JaccardComputer128::new(a, n).compute(b),
        (BinaryMetric::Substructure, 16) => SubstructureComputer16::new(a, n).compute(b),
        (BinaryMetric::Substructure, 32) => SubstructureComputer32::new(a, n).compute(b),
        (BinaryMetric::Substructure, 64) => SubstructureComputer64::new(a, n).compute(b),
        (BinaryMetric::Substructure, 128) => SubstructureComputer128::new(a, n).compute(b),
        (BinaryMetric::Superstructure, 16) => SuperstructureComputer16::new(a, n).compute(b),
        (BinaryMetric::Superstructure, 32) => SuperstructureComputer32::new(a, n).compute(b),
        (BinaryMetric::Superstructure, 64) => SuperstructureComputer64::new(a, n).compute(b),
        (BinaryMetric::Superstructure, 128) => SuperstructureComputer128::new(a, n).compute(b),
        _ => panic!("no specialized computer for {} bytes", n),
    }
}

fn generic(metric: BinaryMetric, a: &[u8], b: &[u8]) -> f32 {
    let n = a.len();
    match metric {
        BinaryMetric::Jaccard => JaccardComputerDefault::new(a, n).compute(b),
        BinaryMetric::Substructure => SubstructureComputerDefault::new(a, n).compute(b),
        BinaryMetric::Superstructure => SuperstructureComputerDefault::new(a, n).compute(b),
    }
}

/// A pair of codes of the same specialized width.
fn code_pair() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    prop_oneof![Just(16usize), Just(32), Just(64), Just(128)].prop_flat_map(|n| {
        (
            prop::collection::vec(any::<u8>(), n),
            prop::collection::vec(any::<u8>(), n),
        )
    })
}

/// A pair of codes of any width.
fn any_width_pair() -> impl Strategy<Value = (Vec<u8>, Vec<u8>)> {
    (1usize..200).prop_flat_map(|n| {
        (
            prop::collection::vec(any::<u8>(), n),
            prop::collection::vec(any::<u8>(), n),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_specialized_matches_generic((a, b) in code_pair()) {
        for metric in FAMILIES {
            prop_assert_eq!(specialized(metric, &a, &b), generic(metric, &a, &b));
        }
    }

    #[test]
    fn prop_distance_in_unit_range((a, b) in any_width_pair()) {
        for metric in FAMILIES {
            let d = generic(metric, &a, &b);
            prop_assert!((0.0..=1.0).contains(&d), "{:?} gave {}", metric, d);
        }
    }

    #[test]
    fn prop_disjoint_codes_are_farthest((a, _b) in any_width_pair()) {
        let complement: Vec<u8> = a.iter().map(|byte| !byte).collect();
        prop_assert_eq!(generic(BinaryMetric::Substructure, &a, &complement), 1.0);
        prop_assert_eq!(generic(BinaryMetric::Superstructure, &a, &complement), 1.0);
        if a.iter().any(|&byte| byte != 0) {
            prop_assert_eq!(generic(BinaryMetric::Jaccard, &a, &complement), 1.0);
        }
    }

    #[test]
    fn prop_jaccard_symmetric((a, b) in any_width_pair()) {
        prop_assert_eq!(
            generic(BinaryMetric::Jaccard, &a, &b),
            generic(BinaryMetric::Jaccard, &b, &a)
        );
    }

    #[test]
    fn prop_superstructure_is_transposed_substructure((a, b) in code_pair()) {
        prop_assert_eq!(
            specialized(BinaryMetric::Superstructure, &a, &b),
            specialized(BinaryMetric::Substructure, &b, &a)
        );
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_blocking_invariance(
        code_size in prop_oneof![Just(16usize), Just(24)],
        nb in 1usize..60,
        nq in 1usize..5,
        k in 1usize..8,
        block_size in 1usize..70,
        seed in any::<u64>(),
    ) {
        use rand::prelude::*;
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let mut random_codes = |n: usize| {
            let bytes: Vec<u8> = (0..n * code_size).map(|_| rng.gen::<u8>() & rng.gen::<u8>()).collect();
            BinaryDataset::from_bytes(bytes, code_size).unwrap()
        };
        let database = random_codes(nb);
        let queries = random_codes(nq);

        for metric in [MetricType::Jaccard, MetricType::Substructure, MetricType::Superstructure] {
            let single = binary_knn(
                metric,
                queries.as_codes(),
                database.as_codes(),
                k,
                &ScanConfig::default(),
                None,
            )
            .unwrap();
            let blocked = binary_knn(
                metric,
                queries.as_codes(),
                database.as_codes(),
                k,
                &ScanConfig::new().with_block_size(block_size).with_parallel(false),
                None,
            )
            .unwrap();
            prop_assert_eq!(single.all_results(), blocked.all_results());
        }
    }

    #[test]
    fn prop_order_flag_same_set(
        nb in 1usize..50,
        k in 1usize..10,
        seed in any::<u64>(),
    ) {
        use rand::prelude::*;
        let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
        let bytes: Vec<u8> = (0..(nb + 1) * 32).map(|_| rng.gen::<u8>()).collect();
        let all = BinaryDataset::from_bytes(bytes, 32).unwrap();
        let codes = all.as_codes();
        let (queries, database) = (codes.range(0, 1), codes.range(1, nb + 1));

        let ordered = binary_knn(MetricType::Jaccard, queries, database, k, &ScanConfig::default(), None)
            .unwrap();
        let unordered = binary_knn(
            MetricType::Jaccard,
            queries,
            database,
            k,
            &ScanConfig::new().with_order_results(false),
            None,
        )
        .unwrap();

        let mut a = ordered.results(0);
        let mut b = unordered.results(0);
        a.sort_by(|x, y| x.partial_cmp(y).unwrap());
        b.sort_by(|x, y| x.partial_cmp(y).unwrap());
        prop_assert_eq!(a, b);
        prop_assert_eq!(ordered.results(0).len(), k.min(nb));
    }
}
