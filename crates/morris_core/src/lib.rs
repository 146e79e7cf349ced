//! Morris (one-at-a-time) global sensitivity screening engine
//!
//! This crate estimates how strongly each uncertain input of an expensive
//! black-box function influences its output, using a small number of
//! randomized one-at-a-time trajectories instead of an exhaustive sweep.
//! It supports:
//! - Discretized parameter grids with per-parameter level counts
//! - Grouped parameters that always move together
//! - Space-filling trajectory selection from an oversampled candidate pool
//! - Scalar or fixed-length vector oracle outputs
//! - A combined `screen` call or a two-phase `sample` / `analyze` workflow
//!
//! # Example
//!
//! ```ignore
//! use morris_core::{FnOracle, GroupId, Parameter, ParameterSpace, ScreeningConfig, screen};
//!
//! let space = ParameterSpace::new(vec![
//!     Parameter::new("capex", 0.8, 1.2, 4, GroupId(0)),
//!     Parameter::new("fuel", 0.5, 1.5, 4, GroupId(1)),
//! ])?;
//! let config = ScreeningConfig {
//!     num_trajectory: 10,
//!     total_num_trajectory: 40,
//!     len_design_mat: 6,
//!     seed: Some(42),
//! };
//!
//! let mut oracle = FnOracle::scalar(|x| x[0] + 2.0 * x[1]);
//! let result = screen(&space, &config, &mut oracle, None)?;
//! println!("mu* of fuel = {:?}", result.mean_star(GroupId(1)));
//! ```

#![warn(clippy::all)]

// ============================================================================
// Core modules
// ============================================================================

pub mod error;
pub mod model;
pub mod screening;

// ============================================================================
// Test modules
// ============================================================================

#[cfg(test)]
mod tests;

// ============================================================================
// Public re-exports for convenience
// ============================================================================

pub use error::{ConfigError, ConsistencyError, OracleError, ScreeningError};
pub use model::{GroupId, GroupSummary, MorrisResult, OutputShape, Parameter, ParameterSpace};
pub use screening::{
    DesignMatrix, Evaluation, FnOracle, Oracle, ScreeningConfig, ScreeningProgress, Trajectory,
    analyze, sample, screen, screen_with_rng, seeded_rng,
};
