//! Morris screening pipeline.
//!
//! Parameter space -> trajectory generation -> pool selection -> oracle
//! evaluation -> elementary effects -> statistics.
//!
//! # Combined Mode
//!
//! `screen` runs the whole pipeline against an `Oracle`:
//!
//! ```ignore
//! let result = screen(&space, &config, &mut oracle, Some(&progress))?;
//! ```
//!
//! # Two-Phase Analysis
//!
//! When the oracle cannot be called in-process, sample the design first, have
//! the points evaluated elsewhere, then analyze the outputs:
//!
//! ```ignore
//! let mut rng = seeded_rng(config.seed);
//! let design = sample(&space, &config, &mut rng)?;
//! let points: Vec<Vec<f64>> = design
//!     .distinct_blocks()
//!     .iter()
//!     .flat_map(|b| b.points().to_vec())
//!     .collect();
//!
//! let outputs = run_elsewhere(&points);
//! let evaluation = Evaluation::from_outputs(&design, OutputShape::Scalar, outputs)?;
//! let result = analyze(&space, &evaluation)?;
//! ```

mod config;
mod effects;
mod evaluator;
mod selection;
mod statistics;
mod trajectory;

pub use config::ScreeningConfig;
pub use effects::{GroupEffects, collect_effects};
pub use evaluator::{Evaluation, FnOracle, Oracle, ScreeningProgress, evaluate_design};
pub use selection::{DesignMatrix, select_trajectories};
pub use statistics::{GroupStatistics, summarize};
pub use trajectory::{Trajectory, generate_trajectory};

use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::ScreeningError;
use crate::model::{MorrisResult, ParameterSpace};

/// Build the run's generator, drawing a fresh seed when none is configured.
///
/// A drawn seed is logged so the run can be replayed.
#[must_use]
pub fn seeded_rng(seed: Option<u64>) -> SmallRng {
    let seed = seed.unwrap_or_else(|| {
        let seed = rand::rng().next_u64();
        tracing::info!(seed, "No seed configured, drew one");
        seed
    });
    SmallRng::seed_from_u64(seed)
}

/// Generate the candidate pool and return the selected design.
pub fn sample<R: Rng>(
    space: &ParameterSpace,
    config: &ScreeningConfig,
    rng: &mut R,
) -> Result<DesignMatrix, ScreeningError> {
    Ok(select_trajectories(space, config, rng)?)
}

/// Turn an evaluated design into per-group statistics.
pub fn analyze(
    space: &ParameterSpace,
    evaluation: &Evaluation,
) -> Result<MorrisResult, ScreeningError> {
    let effects = collect_effects(space, evaluation)?;
    let stats = summarize(&effects, evaluation.shape());
    tracing::debug!(effects = effects.total(), "Collected elementary effects");

    Ok(MorrisResult {
        groups: space.groups().to_vec(),
        members: space.member_names(),
        output_shape: evaluation.shape(),
        means: stats.means,
        means_star: stats.means_star,
        variances: stats.variances,
        effects: effects.into_inner(),
        distinct_lengths: evaluation.distinct_lengths(),
        oracle_calls: evaluation.num_points(),
    })
}

/// Run a full screening with the generator seeded from `config.seed`.
pub fn screen<O: Oracle + ?Sized>(
    space: &ParameterSpace,
    config: &ScreeningConfig,
    oracle: &mut O,
    progress: Option<&ScreeningProgress>,
) -> Result<MorrisResult, ScreeningError> {
    let mut rng = seeded_rng(config.seed);
    screen_with_rng(space, config, oracle, progress, &mut rng)
}

/// Run a full screening drawing randomness from a caller-supplied generator.
///
/// Configuration and output shape are validated before the first oracle call.
pub fn screen_with_rng<O: Oracle + ?Sized, R: Rng>(
    space: &ParameterSpace,
    config: &ScreeningConfig,
    oracle: &mut O,
    progress: Option<&ScreeningProgress>,
    rng: &mut R,
) -> Result<MorrisResult, ScreeningError> {
    tracing::info!(
        parameters = space.len(),
        groups = space.num_groups(),
        num_trajectory = config.num_trajectory,
        total_num_trajectory = config.total_num_trajectory,
        len_design_mat = config.len_design_mat,
        "Starting Morris screening"
    );

    oracle.output_shape().validate()?;
    let design = sample(space, config, rng)?;
    let evaluation = evaluate_design(&design, oracle, progress)?;
    let result = analyze(space, &evaluation)?;

    tracing::info!(
        oracle_calls = result.oracle_calls,
        effects = result.num_effects(),
        "Morris screening complete"
    );
    Ok(result)
}
