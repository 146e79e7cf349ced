//! Structural properties of generated designs and screening results
//!
//! These tests verify:
//! - Every step of a trajectory changes exactly one group
//! - Levels stay inside their grids
//! - Grouped parameters share their level history
//! - Each distinct block of length k contributes k - 1 effects
//! - Result rows have the declared output width

use rand::SeedableRng;
use rand::rngs::SmallRng;

use crate::model::{GroupId, OutputShape, ParameterSpace};
use crate::screening::{
    FnOracle, Oracle, ScreeningConfig, collect_effects, evaluate_design, generate_trajectory,
    screen, select_trajectories,
};

fn mixed_space() -> ParameterSpace {
    ParameterSpace::from_arrays(
        &[(0.0, 1.0), (-2.0, 2.0), (5.0, 6.0), (0.0, 10.0), (1.0, 3.0)],
        &[2, 4, 2, 6, 4],
        &[GroupId(0), GroupId(1), GroupId(0), GroupId(2), GroupId(1)],
    )
    .unwrap()
}

fn changed_groups(space: &ParameterSpace, a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut groups: Vec<usize> = (0..a.len())
        .filter(|&k| a[k] != b[k])
        .map(|k| space.group_position_of(k))
        .collect();
    groups.sort_unstable();
    groups.dedup();
    groups
}

#[test]
fn test_trajectory_levels_stay_in_range() {
    let space = mixed_space();
    let mut rng = SmallRng::seed_from_u64(3);
    for _ in 0..50 {
        let trajectory = generate_trajectory(&space, 12, &mut rng);
        assert_eq!(trajectory.len(), 12);
        for levels in trajectory.levels() {
            for (k, &level) in levels.iter().enumerate() {
                assert!(level < space.levels(k));
            }
        }
    }
}

#[test]
fn test_each_step_changes_at_most_one_group() {
    let space = mixed_space();
    let mut rng = SmallRng::seed_from_u64(11);
    for _ in 0..50 {
        let trajectory = generate_trajectory(&space, 15, &mut rng);
        for pair in trajectory.levels().windows(2) {
            // Zero when a follower move was discarded
            assert!(changed_groups(&space, &pair[0], &pair[1]).len() <= 1);
        }
        for pair in trajectory.dedup().levels().windows(2) {
            assert_eq!(changed_groups(&space, &pair[0], &pair[1]).len(), 1);
        }
    }
}

#[test]
fn test_group_members_share_levels() {
    let space = mixed_space();
    let mut rng = SmallRng::seed_from_u64(5);
    let trajectory = generate_trajectory(&space, 20, &mut rng);
    for levels in trajectory.levels() {
        assert_eq!(levels[0], levels[2]);
        assert_eq!(levels[1], levels[4]);
    }
}

#[test]
fn test_distinct_blocks_yield_k_minus_one_effects() {
    let space = mixed_space();
    let config = ScreeningConfig {
        num_trajectory: 6,
        total_num_trajectory: 20,
        len_design_mat: 9,
        seed: None,
    };
    let design = select_trajectories(&space, &config, &mut SmallRng::seed_from_u64(8)).unwrap();
    let mut oracle = FnOracle::scalar(|x| x.iter().map(|v| v * v).sum());
    let evaluation = evaluate_design(&design, &mut oracle, None).unwrap();

    let effects = collect_effects(&space, &evaluation).unwrap();
    let expected: usize = evaluation.distinct_lengths().iter().map(|k| k - 1).sum();
    assert_eq!(effects.total(), expected);
    assert!(evaluation.distinct_lengths().iter().all(|k| (1..=9).contains(k)));
}

#[test]
fn test_result_rows_match_output_shape() {
    let space = mixed_space();
    let config = ScreeningConfig {
        num_trajectory: 4,
        total_num_trajectory: 10,
        len_design_mat: 6,
        seed: Some(99),
    };
    let mut oracle = FnOracle::vector(3, |x| vec![x[0], x[1] * x[3], -x[4]]);
    assert_eq!(oracle.output_shape(), OutputShape::Vector(3));

    let result = screen(&space, &config, &mut oracle, None).unwrap();

    assert_eq!(result.groups.len(), 3);
    for r in 0..result.groups.len() {
        assert_eq!(result.means[r].len(), 3);
        assert_eq!(result.means_star[r].len(), 3);
        assert_eq!(result.variances[r].len(), 3);
        assert!(result.effects[r].iter().all(|e| e.len() == 3));
        assert!(result.variances[r].iter().all(|v| *v >= 0.0));
    }
    assert_eq!(result.distinct_lengths.len(), 4);
    assert_eq!(
        result.oracle_calls,
        result.distinct_lengths.iter().sum::<usize>()
    );
}

#[test]
fn test_mean_star_bounds_signed_mean() {
    let space = mixed_space();
    let config = ScreeningConfig {
        num_trajectory: 8,
        total_num_trajectory: 24,
        len_design_mat: 8,
        seed: Some(4),
    };
    let mut oracle = FnOracle::scalar(|x| (x[1] * x[3]).sin() + x[0] * x[4]);
    let result = screen(&space, &config, &mut oracle, None).unwrap();

    for summary in result.summaries() {
        assert!(summary.mean_star[0] + 1e-12 >= summary.mean[0].abs());
        assert_eq!(summary.sigma[0], summary.variance[0].sqrt());
    }
}
