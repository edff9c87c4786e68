use super::*;
use crate::model::matrix::IdentityMatrix;
use crate::pipeline::stage1_aggregate::run_stage1;
use ndarray::array;

fn augmented() -> AugmentedMatrix {
    let identity = IdentityMatrix::new(array![
        [0.1, 0.3, 0.2],
        [0.9, 0.7, 0.8],
        [0.15, 0.2, 0.1],
        [0.85, 1.0, 0.9],
        [0.5, 0.0, 0.5],
    ]);
    run_stage1(&identity).unwrap()
}

#[test]
fn test_shape() {
    let tensor = run_stage2(&augmented());
    assert_eq!(tensor.values().dim(), (5, 5, 5));
    assert_eq!(tensor.num_users(), 5);
    assert_eq!(tensor.num_columns(), 5);
}

#[test]
fn test_symmetric_with_zero_diagonal() {
    let tensor = run_stage2(&augmented());
    for a in 0..5 {
        for c in 0..5 {
            assert_eq!(tensor.get(a, a, c), 0.0);
            for b in 0..5 {
                assert_eq!(tensor.get(a, b, c), tensor.get(b, a, c));
                let v = tensor.get(a, b, c);
                assert!((0.0..=1.0).contains(&v));
            }
        }
    }
}

#[test]
fn test_matches_pairwise_difference() {
    let matrix = augmented();
    let tensor = run_stage2(&matrix);
    for a in 0..5 {
        for b in 0..5 {
            for c in 0..5 {
                let expected = (matrix.get(a, c) - matrix.get(b, c)).abs();
                assert_eq!(tensor.get(a, b, c), expected);
            }
        }
    }
}

#[test]
fn test_lane_reads_one_user_one_column() {
    let matrix = augmented();
    let tensor = run_stage2(&matrix);
    let lane = tensor.lane(0, 2);
    assert_eq!(lane.len(), 5);
    for k in 0..5 {
        assert_eq!(lane[k], tensor.get(0, k, 2));
    }
}
