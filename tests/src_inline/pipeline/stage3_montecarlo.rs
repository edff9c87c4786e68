use super::*;
use crate::model::error::AffinityError;
use crate::model::matrix::IdentityMatrix;
use crate::model::report::StrategyKind;
use crate::pipeline::stage1_aggregate::run_stage1;
use crate::pipeline::stage3_rank::{RankingStrategy, run_stage3, steps_to_partner};
use ndarray::{Array2, array};

fn matrix() -> AugmentedMatrix {
    let identity = IdentityMatrix::new(array![
        [0.1, 0.12, 0.08],
        [0.9, 0.88, 0.93],
        [0.15, 0.1, 0.14],
        [0.85, 0.9, 0.8],
        [0.5, 0.45, 0.55],
        [0.52, 0.5, 0.6],
    ]);
    run_stage1(&identity).unwrap()
}

fn real_couples() -> Vec<CoupleIndex> {
    vec![
        CoupleIndex::new(0, 2),
        CoupleIndex::new(1, 3),
        CoupleIndex::new(4, 5),
    ]
}

fn params(seed: u64) -> MonteCarloParams {
    MonteCarloParams {
        random_sets: 200,
        seed,
    }
}

#[test]
fn test_same_seed_is_deterministic() {
    let m = matrix();
    let a = run_stage3(&m, &real_couples(), RankingStrategy::MonteCarlo(params(7))).unwrap();
    let b = run_stage3(&m, &real_couples(), RankingStrategy::MonteCarlo(params(7))).unwrap();
    assert_eq!(a, b);
    assert_eq!(a.strategy, StrategyKind::MonteCarlo);
}

#[test]
fn test_couple_steps_match_exact_ranking() {
    let m = matrix();
    let exact = run_stage3(&m, &real_couples(), RankingStrategy::Exact).unwrap();
    let sampled = run_stage3(&m, &real_couples(), RankingStrategy::MonteCarlo(params(1))).unwrap();
    assert_eq!(exact.all_distances, sampled.all_distances);
    assert_eq!(exact.user_steps, sampled.user_steps);
    assert_eq!(exact.user_values, sampled.user_values);
    assert_eq!(exact.median_distances, sampled.median_distances);
}

#[test]
fn test_close_couples_beat_random_baseline() {
    let m = matrix();
    let report = run_stage3(&m, &real_couples(), RankingStrategy::MonteCarlo(params(45))).unwrap();
    let baseline = report.random_baseline.as_ref().unwrap();
    assert_eq!(baseline.random_sets, 200);
    assert!(baseline.absolute_distance_delta > 0.0);
    assert!(baseline.relative_distance_delta > 1.0);
    assert!(baseline.absolute_steps_delta > 0.0);
    assert!(baseline.relative_steps_delta > 1.0);
    for &avg in &report.average_multipliers {
        assert!(avg > 1.0);
    }
}

#[test]
fn test_multipliers_positive() {
    let m = matrix();
    let mismatched = vec![CoupleIndex::new(0, 1), CoupleIndex::new(2, 3)];
    let report = run_stage3(&m, &mismatched, RankingStrategy::MonteCarlo(params(3))).unwrap();
    for (first, second) in &report.user_multipliers {
        assert!(first.iter().chain(second).all(|&v| v > 0.0 && v.is_finite()));
    }
    let baseline = report.random_baseline.unwrap();
    assert!(baseline.absolute_distance_delta < 0.0);
}

#[test]
fn test_overlapping_population_samples_independent_pairs() {
    let mut rng = StdRng::seed_from_u64(9);
    let set = random_couple_set(&mut rng, 3, 2);
    assert_eq!(set.len(), 2);
    for (a, b) in set {
        assert_ne!(a, b);
        assert!(a < 3 && b < 3);
    }
}

#[test]
fn test_disjoint_pairs_when_population_allows() {
    let mut rng = StdRng::seed_from_u64(9);
    let set = random_couple_set(&mut rng, 6, 3);
    let mut seen = set.iter().flat_map(|&(a, b)| [a, b]).collect::<Vec<_>>();
    seen.sort_unstable();
    assert_eq!(seen, vec![0, 1, 2, 3, 4, 5]);
}

#[test]
fn test_zero_random_sets_rejected() {
    let m = matrix();
    let strategy = RankingStrategy::MonteCarlo(MonteCarloParams {
        random_sets: 0,
        seed: 1,
    });
    assert!(matches!(
        run_stage3(&m, &real_couples(), strategy),
        Err(AffinityError::InvalidInput { .. })
    ));
}

fn row_steps_by_scan(m: &AugmentedMatrix, side: usize, column: usize, couple_dist: f64) -> f64 {
    let dists = (0..m.num_users()).map(|k| (m.get(side, column) - m.get(k, column)).abs());
    steps_to_partner(dists, side, couple_dist)
}

#[test]
fn test_sorted_steps_match_full_scan() {
    // repeated values force ties at zero and nonzero distances
    let identity = IdentityMatrix::new(array![
        [0.1, 0.5],
        [0.3, 0.5],
        [0.1, 0.2],
        [0.5, 0.8],
        [0.3, 0.2],
        [0.7, 0.5],
        [0.9, 0.0],
        [0.15, 1.0],
        [0.85, 0.35],
    ]);
    let m = run_stage1(&identity).unwrap();
    let sorted = SortedColumns::new(&m);
    for c in 0..m.num_columns() {
        for side in 0..m.num_users() {
            for partner in 0..m.num_users() {
                if partner == side {
                    continue;
                }
                let d = (m.get(side, c) - m.get(partner, c)).abs();
                assert_eq!(
                    sorted.steps(c, m.get(side, c), d),
                    row_steps_by_scan(&m, side, c, d),
                    "side {side} partner {partner} column {c}"
                );
            }
        }
    }
}

#[test]
fn test_sorted_steps_with_float_rounding_distances() {
    let values = (0..60).map(|i| ((i * 7) % 23) as f64 * 0.043).collect::<Vec<_>>();
    let identity = IdentityMatrix::new(Array2::from_shape_vec((60, 1), values).unwrap());
    let m = run_stage1(&identity).unwrap();
    let sorted = SortedColumns::new(&m);
    for side in 0..60 {
        for partner in (0..60).filter(|&p| p != side) {
            let d = (m.get(side, 2) - m.get(partner, 2)).abs();
            assert_eq!(
                sorted.steps(2, m.get(side, 2), d),
                row_steps_by_scan(&m, side, 2, d)
            );
        }
    }
}
