//! Configuration for a screening run.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Trajectory sampling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreeningConfig {
    /// Number of trajectories kept for evaluation
    #[serde(default = "default_num_trajectory")]
    pub num_trajectory: usize,
    /// Size of the candidate pool the kept trajectories are selected from
    #[serde(default = "default_total_num_trajectory")]
    pub total_num_trajectory: usize,
    /// Design points per trajectory, including the starting point
    #[serde(default = "default_len_design_mat")]
    pub len_design_mat: usize,
    /// Seed for the trajectory generator; drawn at random when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_num_trajectory() -> usize {
    10
}

fn default_total_num_trajectory() -> usize {
    5 * default_num_trajectory()
}

fn default_len_design_mat() -> usize {
    10
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            num_trajectory: default_num_trajectory(),
            total_num_trajectory: default_total_num_trajectory(),
            len_design_mat: default_len_design_mat(),
            seed: None,
        }
    }
}

impl ScreeningConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_trajectory == 0 {
            return Err(ConfigError::NoTrajectories);
        }
        if self.len_design_mat == 0 {
            return Err(ConfigError::EmptyTrajectory);
        }
        if self.total_num_trajectory <= self.num_trajectory {
            return Err(ConfigError::PoolTooSmall {
                num_trajectory: self.num_trajectory,
                total_num_trajectory: self.total_num_trajectory,
            });
        }
        Ok(())
    }

    /// Upper bound on oracle calls (before deduplication)
    #[must_use]
    pub fn max_oracle_calls(&self) -> usize {
        self.num_trajectory * self.len_design_mat
    }
}
