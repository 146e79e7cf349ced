//! Screening results
//!
//! Aggregate statistics are stored as one matrix per statistic with a row per
//! group (in `ParameterSpace::groups` order) and a column per output value.

use serde::{Deserialize, Serialize};

use super::{GroupId, OutputShape};

/// Complete output of a screening run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MorrisResult {
    /// Group ids, one per statistic row
    pub groups: Vec<GroupId>,
    /// Member parameter names per group
    pub members: Vec<Vec<String>>,
    pub output_shape: OutputShape,

    /// Signed mean of the elementary effects
    pub means: Vec<Vec<f64>>,
    /// Mean of the absolute elementary effects (mu*)
    pub means_star: Vec<Vec<f64>>,
    /// Sample variance of the elementary effects
    pub variances: Vec<Vec<f64>>,

    /// Raw elementary effects per group, in the order they were observed
    pub effects: Vec<Vec<Vec<f64>>>,

    /// Distinct (deduplicated) length of each selected trajectory
    pub distinct_lengths: Vec<usize>,
    /// Number of oracle evaluations the run consumed
    pub oracle_calls: usize,
}

/// One group's statistics, flattened for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupSummary {
    pub group: GroupId,
    pub members: Vec<String>,
    pub mean: Vec<f64>,
    pub mean_star: Vec<f64>,
    pub variance: Vec<f64>,
    /// Standard deviation of the elementary effects
    pub sigma: Vec<f64>,
    pub num_effects: usize,
}

impl MorrisResult {
    fn row(&self, group: GroupId) -> Option<usize> {
        self.groups.iter().position(|g| *g == group)
    }

    #[must_use]
    pub fn mean(&self, group: GroupId) -> Option<&[f64]> {
        self.row(group).map(|r| self.means[r].as_slice())
    }

    #[must_use]
    pub fn mean_star(&self, group: GroupId) -> Option<&[f64]> {
        self.row(group).map(|r| self.means_star[r].as_slice())
    }

    #[must_use]
    pub fn variance(&self, group: GroupId) -> Option<&[f64]> {
        self.row(group).map(|r| self.variances[r].as_slice())
    }

    /// Standard deviation of a group's effects
    #[must_use]
    pub fn sigma(&self, group: GroupId) -> Option<Vec<f64>> {
        self.variance(group)
            .map(|v| v.iter().map(|x| x.sqrt()).collect())
    }

    /// Raw elementary effects attributed to a group
    #[must_use]
    pub fn effects(&self, group: GroupId) -> Option<&[Vec<f64>]> {
        self.row(group).map(|r| self.effects[r].as_slice())
    }

    /// Total number of elementary effects across all groups
    #[must_use]
    pub fn num_effects(&self) -> usize {
        self.effects.iter().map(Vec::len).sum()
    }

    /// Per-group summary rows in group order
    #[must_use]
    pub fn summaries(&self) -> Vec<GroupSummary> {
        self.groups
            .iter()
            .enumerate()
            .map(|(r, &group)| GroupSummary {
                group,
                members: self.members[r].clone(),
                mean: self.means[r].clone(),
                mean_star: self.means_star[r].clone(),
                variance: self.variances[r].clone(),
                sigma: self.variances[r].iter().map(|v| v.sqrt()).collect(),
                num_effects: self.effects[r].len(),
            })
            .collect()
    }

    /// Groups ordered by decreasing mu* of output value `dim`.
    ///
    /// Returns an empty list when `dim` is out of range for the output shape.
    #[must_use]
    pub fn ranked_by_mean_star(&self, dim: usize) -> Vec<GroupId> {
        if dim >= self.output_shape.len() {
            return Vec::new();
        }
        let mut order: Vec<usize> = (0..self.groups.len()).collect();
        order.sort_by(|&a, &b| self.means_star[b][dim].total_cmp(&self.means_star[a][dim]));
        order.into_iter().map(|r| self.groups[r]).collect()
    }
}
