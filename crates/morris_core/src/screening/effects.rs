//! Elementary effect aggregation.
//!
//! Every adjacent pair of distinct points in a block yields one elementary
//! effect, attributed to the single group whose levels changed. The effects
//! are gathered by folding over (trajectory, step) pairs into a collection
//! keyed by group position.

use crate::error::ConsistencyError;
use crate::model::ParameterSpace;

use super::Evaluation;

/// Append-only elementary effects per group, in group order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupEffects {
    effects: Vec<Vec<Vec<f64>>>,
}

impl GroupEffects {
    #[must_use]
    pub fn new(num_groups: usize) -> Self {
        Self {
            effects: vec![Vec::new(); num_groups],
        }
    }

    #[must_use]
    pub fn with_effect(mut self, position: usize, effect: Vec<f64>) -> Self {
        self.effects[position].push(effect);
        self
    }

    /// Effects of the group at `position`
    #[must_use]
    pub fn get(&self, position: usize) -> &[Vec<f64>] {
        &self.effects[position]
    }

    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.effects.len()
    }

    /// Total number of effects across all groups
    #[must_use]
    pub fn total(&self) -> usize {
        self.effects.iter().map(Vec::len).sum()
    }

    #[must_use]
    pub fn into_inner(self) -> Vec<Vec<Vec<f64>>> {
        self.effects
    }
}

/// Group position whose coordinates differ between two level vectors.
fn changed_group(
    space: &ParameterSpace,
    before: &[usize],
    after: &[usize],
    trajectory: usize,
    step: usize,
) -> Result<usize, ConsistencyError> {
    let mut changed: Vec<usize> = before
        .iter()
        .zip(after)
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(k, _)| space.group_position_of(k))
        .collect();
    changed.sort_unstable();
    changed.dedup();

    match changed.as_slice() {
        [] => Err(ConsistencyError::NoChange { trajectory, step }),
        [position] => Ok(*position),
        positions => Err(ConsistencyError::MultipleGroupsChanged {
            trajectory,
            step,
            groups: positions.iter().map(|&p| space.groups()[p]).collect(),
        }),
    }
}

/// Output change per unit signed input change, element by element.
///
/// The input change is the sum of the coordinate deltas; only the changed
/// group's coordinates are nonzero and they all move in the same direction.
/// `None` when the points coincide in value space.
fn elementary_effect(x0: &[f64], x1: &[f64], y0: &[f64], y1: &[f64]) -> Option<Vec<f64>> {
    let step: f64 = x1.iter().zip(x0).map(|(b, a)| b - a).sum();
    if step == 0.0 {
        return None;
    }
    Some(y1.iter().zip(y0).map(|(b, a)| (b - a) / step).collect())
}

/// Compute and attribute the elementary effects of every evaluated block.
///
/// A block of `k` distinct points contributes exactly `k - 1` effects.
pub fn collect_effects(
    space: &ParameterSpace,
    evaluation: &Evaluation,
) -> Result<GroupEffects, ConsistencyError> {
    evaluation
        .blocks()
        .iter()
        .zip(evaluation.outputs())
        .enumerate()
        .flat_map(|(trajectory, (block, outputs))| {
            (1..block.len()).map(move |step| (trajectory, block, outputs, step))
        })
        .try_fold(
            GroupEffects::new(space.num_groups()),
            |acc, (trajectory, block, outputs, step)| {
                let levels = block.levels();
                let points = block.points();
                let position =
                    changed_group(space, &levels[step - 1], &levels[step], trajectory, step)?;
                let effect = elementary_effect(
                    &points[step - 1],
                    &points[step],
                    &outputs[step - 1],
                    &outputs[step],
                )
                .ok_or(ConsistencyError::NoChange { trajectory, step })?;
                Ok(acc.with_effect(position, effect))
            },
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::GroupId;

    fn space() -> ParameterSpace {
        ParameterSpace::from_arrays(
            &[(0.0, 1.0), (0.0, 2.0), (0.0, 1.0)],
            &[3, 3, 3],
            &[GroupId(0), GroupId(1), GroupId(0)],
        )
        .unwrap()
    }

    #[test]
    fn test_changed_group_identifies_single_group() {
        let space = space();
        assert_eq!(changed_group(&space, &[0, 0, 0], &[1, 0, 1], 0, 1), Ok(0));
        assert_eq!(changed_group(&space, &[0, 0, 0], &[0, 2, 0], 0, 1), Ok(1));
    }

    #[test]
    fn test_changed_group_rejects_inconsistent_steps() {
        let space = space();
        assert_eq!(
            changed_group(&space, &[0, 0, 0], &[0, 0, 0], 2, 4),
            Err(ConsistencyError::NoChange {
                trajectory: 2,
                step: 4
            })
        );
        assert_eq!(
            changed_group(&space, &[0, 0, 0], &[1, 1, 1], 0, 1),
            Err(ConsistencyError::MultipleGroupsChanged {
                trajectory: 0,
                step: 1,
                groups: vec![GroupId(0), GroupId(1)]
            })
        );
    }

    #[test]
    fn test_elementary_effect_uses_signed_step() {
        let effect = elementary_effect(&[0.5, 1.0], &[0.0, 1.0], &[3.0, 1.0], &[2.0, 1.0]);
        assert_eq!(effect, Some(vec![2.0, 0.0]));
    }

    #[test]
    fn test_elementary_effect_needs_value_change() {
        // A level change that lands on the same value has no finite effect
        assert_eq!(
            elementary_effect(&[1.0, 0.5], &[1.0, 0.5], &[3.0], &[3.0]),
            None
        );
    }

    #[test]
    fn test_group_effects_accumulate() {
        let effects = GroupEffects::new(2)
            .with_effect(1, vec![1.0])
            .with_effect(1, vec![3.0]);
        assert_eq!(effects.get(0).len(), 0);
        assert_eq!(effects.get(1), &[vec![1.0], vec![3.0]]);
        assert_eq!(effects.total(), 2);
    }
}
