//! Candidate pool generation and space-filling selection
//!
//! Rather than searching all combinations for the optimal set of trajectories,
//! we oversample a pool and keep the members with the largest spread.

use rand::Rng;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::ParameterSpace;

use super::ScreeningConfig;
use super::trajectory::{Trajectory, generate_trajectory};

/// The selected trajectories, concatenated point-wise into one design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignMatrix {
    trajectories: Vec<Trajectory>,
    /// Spread of each selected trajectory, non-increasing
    spreads: Vec<f64>,
}

impl DesignMatrix {
    #[must_use]
    pub fn trajectories(&self) -> &[Trajectory] {
        &self.trajectories
    }

    #[must_use]
    pub fn spreads(&self) -> &[f64] {
        &self.spreads
    }

    #[must_use]
    pub fn num_trajectories(&self) -> usize {
        self.trajectories.len()
    }

    /// Total number of design points across all trajectories
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.trajectories.iter().map(Trajectory::len).sum()
    }

    /// Design points in concatenated order (trajectory by trajectory)
    pub fn columns(&self) -> impl Iterator<Item = &[f64]> {
        self.trajectories
            .iter()
            .flat_map(|t| t.points().iter().map(Vec::as_slice))
    }

    /// Each trajectory with consecutive duplicate points collapsed.
    #[must_use]
    pub fn distinct_blocks(&self) -> Vec<Trajectory> {
        self.trajectories.iter().map(Trajectory::dedup).collect()
    }
}

fn compute_spreads(pool: &[Trajectory]) -> Vec<f64> {
    #[cfg(feature = "parallel")]
    let spreads = pool.par_iter().map(Trajectory::spread).collect();

    #[cfg(not(feature = "parallel"))]
    let spreads = pool.iter().map(Trajectory::spread).collect();

    spreads
}

/// Keep the `keep` trajectories with the largest spread, widest first.
///
/// Ties keep generation order.
fn keep_widest(pool: Vec<Trajectory>, spreads: &[f64], keep: usize) -> DesignMatrix {
    let mut order: Vec<usize> = (0..pool.len()).collect();
    order.sort_by(|&a, &b| spreads[b].total_cmp(&spreads[a]));
    order.truncate(keep);

    let mut slots: Vec<Option<Trajectory>> = pool.into_iter().map(Some).collect();
    let trajectories = order
        .iter()
        .filter_map(|&i| slots[i].take())
        .collect();
    let spreads = order.iter().map(|&i| spreads[i]).collect();

    DesignMatrix {
        trajectories,
        spreads,
    }
}

/// Generate the candidate pool and select the widest trajectories.
///
/// Fails before drawing any randomness if the configuration is invalid.
pub fn select_trajectories<R: Rng>(
    space: &ParameterSpace,
    config: &ScreeningConfig,
    rng: &mut R,
) -> Result<DesignMatrix, ConfigError> {
    config.validate()?;

    let pool: Vec<Trajectory> = (0..config.total_num_trajectory)
        .map(|_| generate_trajectory(space, config.len_design_mat, rng))
        .collect();
    let spreads = compute_spreads(&pool);

    let design = keep_widest(pool, &spreads, config.num_trajectory);
    tracing::debug!(
        pool = config.total_num_trajectory,
        kept = design.num_trajectories(),
        widest = design.spreads.first().copied().unwrap_or(0.0),
        narrowest_kept = design.spreads.last().copied().unwrap_or(0.0),
        "Selected trajectories from candidate pool"
    );
    Ok(design)
}
