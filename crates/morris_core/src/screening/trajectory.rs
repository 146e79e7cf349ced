//! One-at-a-time trajectory generation.
//!
//! A trajectory starts from a uniformly random level vector. Each following
//! point moves one randomly chosen parameter by one level up or down,
//! reflecting off the ends of its grid. Groups are reconciled afterwards:
//! every member of a group is overwritten with the level history of the
//! group's first member, so grouped parameters always move together.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::ParameterSpace;

/// An ordered chain of design points together with their level indices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    /// Level index vector of each point (0-based)
    levels: Vec<Vec<usize>>,
    /// Numeric design point for each level vector
    points: Vec<Vec<f64>>,
}

impl Trajectory {
    pub(crate) fn from_levels(space: &ParameterSpace, levels: Vec<Vec<usize>>) -> Self {
        let points = levels.iter().map(|l| space.point_at(l)).collect();
        Self { levels, points }
    }

    #[must_use]
    pub fn levels(&self) -> &[Vec<usize>] {
        &self.levels
    }

    #[must_use]
    pub fn points(&self) -> &[Vec<f64>] {
        &self.points
    }

    /// Number of design points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sum of Euclidean distances between consecutive points.
    #[must_use]
    pub fn spread(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| {
                pair[0]
                    .iter()
                    .zip(&pair[1])
                    .map(|(a, b)| (b - a) * (b - a))
                    .sum::<f64>()
                    .sqrt()
            })
            .sum()
    }

    /// Collapse runs of identical consecutive points, keeping the last of each run.
    ///
    /// Identical neighbours appear when the perturbed parameter was a
    /// non-leading group member whose move the group reconciliation discarded.
    #[must_use]
    pub fn dedup(&self) -> Trajectory {
        let n = self.levels.len();
        let keep: Vec<usize> = (0..n)
            .filter(|&i| i + 1 == n || self.levels[i] != self.levels[i + 1])
            .collect();
        Trajectory {
            levels: keep.iter().map(|&i| self.levels[i].clone()).collect(),
            points: keep.iter().map(|&i| self.points[i].clone()).collect(),
        }
    }
}

/// Move a level index one step, reflecting off the ends of `[0, levels)`.
///
/// A step that would leave the grid is replaced by a step of the same size in
/// the opposite direction, so the result is always in range when `levels >= 2`.
pub(crate) fn step_level(level: usize, up: bool, levels: usize) -> usize {
    if up {
        if level + 1 < levels { level + 1 } else { level - 1 }
    } else if level > 0 {
        level - 1
    } else {
        level + 1
    }
}

/// Overwrite every group member's history with its group's first member.
fn reconcile_groups(space: &ParameterSpace, history: &mut [Vec<usize>]) {
    for position in 0..space.num_groups() {
        let members = space.members_at(position);
        let Some((&leader, followers)) = members.split_first() else {
            continue;
        };
        for levels in history.iter_mut() {
            let value = levels[leader];
            for &k in followers {
                levels[k] = value;
            }
        }
    }
}

/// Generate one trajectory of `len_design_mat` points.
///
/// Draws one level per parameter for the starting point, then a parameter
/// index and a direction for every further point. No other side effects.
pub fn generate_trajectory<R: Rng>(
    space: &ParameterSpace,
    len_design_mat: usize,
    rng: &mut R,
) -> Trajectory {
    let num_parameters = space.len();
    let mut current: Vec<usize> = (0..num_parameters)
        .map(|i| rng.random_range(0..space.levels(i)))
        .collect();

    let mut history = Vec::with_capacity(len_design_mat);
    if len_design_mat > 0 {
        history.push(current.clone());
    }
    for _ in 1..len_design_mat {
        let j = rng.random_range(0..num_parameters);
        let up = rng.random_bool(0.5);
        current[j] = step_level(current[j], up, space.levels(j));
        history.push(current.clone());
    }

    reconcile_groups(space, &mut history);
    Trajectory::from_levels(space, history)
}
