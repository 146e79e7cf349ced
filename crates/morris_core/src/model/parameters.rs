//! Parameter space model
//!
//! Each uncertain input is reduced to a grid of equally spaced levels over its
//! range. Parameters are partitioned into groups; a group is screened as one
//! effective input.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

use super::GroupId;

/// One uncertain input of the oracle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    /// Display name used in summaries and reports
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    /// Number of grid levels spanning `[lower, upper]`
    pub levels: usize,
    pub group: GroupId,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        levels: usize,
        group: GroupId,
    ) -> Self {
        Self {
            name: name.into(),
            lower,
            upper,
            levels,
            group,
        }
    }

    /// Equally spaced grid values, both bounds included.
    #[must_use]
    pub fn grid(&self) -> Vec<f64> {
        if self.levels < 2 {
            return vec![self.lower];
        }
        let step = (self.upper - self.lower) / (self.levels - 1) as f64;
        let mut grid: Vec<f64> = (0..self.levels)
            .map(|k| self.lower + step * k as f64)
            .collect();
        // Pin the last level so rounding never moves it off the bound
        grid[self.levels - 1] = self.upper;
        grid
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if !(self.lower.is_finite() && self.upper.is_finite() && self.lower <= self.upper) {
            return Err(ConfigError::InvalidRange {
                index,
                lower: self.lower,
                upper: self.upper,
            });
        }
        if self.levels < 2 {
            return Err(ConfigError::TooFewLevels {
                index,
                levels: self.levels,
            });
        }
        // Every step must move the design point, or its effect divides by zero
        if self.grid().windows(2).any(|pair| pair[0] >= pair[1]) {
            return Err(ConfigError::DegenerateGrid {
                index,
                lower: self.lower,
                upper: self.upper,
                levels: self.levels,
            });
        }
        Ok(())
    }
}

/// Validated parameter grids plus group membership, immutable for a run.
///
/// Groups are ordered by the first appearance of their id in the parameter
/// list; that order is the row order of every aggregate statistic.
#[derive(Debug, Clone)]
pub struct ParameterSpace {
    parameters: Vec<Parameter>,
    grids: Vec<Vec<f64>>,
    groups: Vec<GroupId>,
    /// Member parameter indices per group position, in declaration order
    members: Vec<Vec<usize>>,
    /// Group position of each parameter
    group_of: Vec<usize>,
    positions: FxHashMap<GroupId, usize>,
}

impl ParameterSpace {
    /// Validate the parameters and build their grids and group lookup.
    pub fn new(parameters: Vec<Parameter>) -> Result<Self, ConfigError> {
        if parameters.is_empty() {
            return Err(ConfigError::EmptyParameterSpace);
        }
        for (index, parameter) in parameters.iter().enumerate() {
            parameter.validate(index)?;
        }

        let grids = parameters.iter().map(Parameter::grid).collect();

        let mut groups = Vec::new();
        let mut members: Vec<Vec<usize>> = Vec::new();
        let mut positions = FxHashMap::default();
        let mut group_of = Vec::with_capacity(parameters.len());
        for (index, parameter) in parameters.iter().enumerate() {
            let position = *positions.entry(parameter.group).or_insert_with(|| {
                groups.push(parameter.group);
                members.push(Vec::new());
                groups.len() - 1
            });
            members[position].push(index);
            group_of.push(position);
        }

        for (position, group_members) in members.iter().enumerate() {
            let expected = parameters[group_members[0]].levels;
            if let Some(&index) = group_members
                .iter()
                .find(|&&i| parameters[i].levels != expected)
            {
                return Err(ConfigError::GroupLevelMismatch {
                    group: groups[position],
                    index,
                    levels: parameters[index].levels,
                    expected,
                });
            }
        }

        Ok(Self {
            parameters,
            grids,
            groups,
            members,
            group_of,
            positions,
        })
    }

    /// Build a space from parallel arrays of ranges, level counts and group ids.
    ///
    /// Parameters are named `x0`, `x1`, ... in order.
    pub fn from_arrays(
        ranges: &[(f64, f64)],
        levels: &[usize],
        groups: &[GroupId],
    ) -> Result<Self, ConfigError> {
        if levels.len() != ranges.len() {
            return Err(ConfigError::LengthMismatch {
                what: "level counts",
                expected: ranges.len(),
                actual: levels.len(),
            });
        }
        if groups.len() != ranges.len() {
            return Err(ConfigError::LengthMismatch {
                what: "group ids",
                expected: ranges.len(),
                actual: groups.len(),
            });
        }
        let parameters = ranges
            .iter()
            .zip(levels)
            .zip(groups)
            .enumerate()
            .map(|(i, ((&(lower, upper), &levels), &group))| {
                Parameter::new(format!("x{i}"), lower, upper, levels, group)
            })
            .collect();
        Self::new(parameters)
    }

    /// Every parameter in its own group (`GroupId(i)` for parameter `i`).
    pub fn ungrouped(ranges: &[(f64, f64)], levels: &[usize]) -> Result<Self, ConfigError> {
        let groups: Vec<GroupId> = (0..ranges.len() as u32).map(GroupId).collect();
        Self::from_arrays(ranges, levels, &groups)
    }

    /// Number of parameters
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    #[must_use]
    pub fn grid(&self, index: usize) -> &[f64] {
        &self.grids[index]
    }

    #[must_use]
    pub fn levels(&self, index: usize) -> usize {
        self.grids[index].len()
    }

    /// Map a level-index vector to its numeric design point.
    #[must_use]
    pub fn point_at(&self, levels: &[usize]) -> Vec<f64> {
        levels
            .iter()
            .zip(&self.grids)
            .map(|(&level, grid)| grid[level])
            .collect()
    }

    /// Distinct group ids in first-appearance order
    #[must_use]
    pub fn groups(&self) -> &[GroupId] {
        &self.groups
    }

    #[must_use]
    pub fn num_groups(&self) -> usize {
        self.groups.len()
    }

    /// Row position of a group in aggregate statistics
    #[must_use]
    pub fn group_position(&self, group: GroupId) -> Option<usize> {
        self.positions.get(&group).copied()
    }

    /// Member parameter indices of a group, in declaration order
    #[must_use]
    pub fn members(&self, group: GroupId) -> Option<&[usize]> {
        self.group_position(group)
            .map(|position| self.members[position].as_slice())
    }

    pub(crate) fn members_at(&self, position: usize) -> &[usize] {
        &self.members[position]
    }

    /// Group position of the given parameter
    #[must_use]
    pub fn group_position_of(&self, index: usize) -> usize {
        self.group_of[index]
    }

    /// Names of the members of each group, in group order
    #[must_use]
    pub fn member_names(&self) -> Vec<Vec<String>> {
        self.members
            .iter()
            .map(|members| {
                members
                    .iter()
                    .map(|&i| self.parameters[i].name.clone())
                    .collect()
            })
            .collect()
    }
}
