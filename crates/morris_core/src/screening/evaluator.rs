//! Oracle evaluation of a selected design.
//!
//! Each trajectory is deduplicated first; the oracle is then called exactly
//! once per distinct design point, sequentially, in design order. Nothing is
//! memoized or parallelized: oracles may mutate external state between calls.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{OracleError, ScreeningError};
use crate::model::OutputShape;

use super::DesignMatrix;
use super::trajectory::Trajectory;

/// The expensive function being screened.
///
/// Any state the oracle needs to mutate before producing a result (for
/// instance cost coefficients of an external model) belongs to the
/// implementor; the engine only guarantees call order.
pub trait Oracle {
    /// Shape of every output, fixed for the whole run
    fn output_shape(&self) -> OutputShape;

    /// Evaluate one design point; scalar oracles return a single value.
    fn evaluate(&mut self, point: &[f64]) -> Result<Vec<f64>, OracleError>;
}

impl<O: Oracle + ?Sized> Oracle for Box<O> {
    fn output_shape(&self) -> OutputShape {
        (**self).output_shape()
    }

    fn evaluate(&mut self, point: &[f64]) -> Result<Vec<f64>, OracleError> {
        (**self).evaluate(point)
    }
}

type OracleFn<'a> = Box<dyn FnMut(&[f64]) -> Result<Vec<f64>, OracleError> + 'a>;

/// Oracle backed by a closure
pub struct FnOracle<'a> {
    shape: OutputShape,
    f: OracleFn<'a>,
}

impl<'a> FnOracle<'a> {
    /// Wrap a fallible closure producing outputs of the given shape.
    pub fn new(
        shape: OutputShape,
        f: impl FnMut(&[f64]) -> Result<Vec<f64>, OracleError> + 'a,
    ) -> Self {
        Self {
            shape,
            f: Box::new(f),
        }
    }

    /// Wrap an infallible scalar function.
    pub fn scalar(mut f: impl FnMut(&[f64]) -> f64 + 'a) -> Self {
        Self::new(OutputShape::Scalar, move |x| Ok(vec![f(x)]))
    }

    /// Wrap an infallible function returning `len` values per point.
    pub fn vector(len: usize, mut f: impl FnMut(&[f64]) -> Vec<f64> + 'a) -> Self {
        Self::new(OutputShape::Vector(len), move |x| Ok(f(x)))
    }
}

impl fmt::Debug for FnOracle<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOracle")
            .field("shape", &self.shape)
            .finish_non_exhaustive()
    }
}

impl Oracle for FnOracle<'_> {
    fn output_shape(&self) -> OutputShape {
        self.shape
    }

    fn evaluate(&mut self, point: &[f64]) -> Result<Vec<f64>, OracleError> {
        (self.f)(point)
    }
}

/// Progress tracking for oracle evaluation
#[derive(Debug, Clone)]
pub struct ScreeningProgress {
    /// Completed oracle calls
    completed: Arc<AtomicUsize>,
    /// Oracle calls planned for the run
    total: Arc<AtomicUsize>,
}

impl ScreeningProgress {
    #[must_use]
    pub fn new(total: usize) -> Self {
        Self {
            completed: Arc::new(AtomicUsize::new(0)),
            total: Arc::new(AtomicUsize::new(total)),
        }
    }

    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::Relaxed)
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.total.load(Ordering::Relaxed)
    }

    /// Completed fraction in `[0, 1]`; zero when nothing is planned
    #[must_use]
    pub fn fraction(&self) -> f64 {
        match self.total() {
            0 => 0.0,
            total => self.completed() as f64 / total as f64,
        }
    }

    pub fn increment(&self) {
        self.completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn reset(&self, total: usize) {
        self.completed.store(0, Ordering::Relaxed);
        self.total.store(total, Ordering::Relaxed);
    }
}

impl Default for ScreeningProgress {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Deduplicated trajectory blocks with one oracle output per point
#[derive(Debug, Clone)]
pub struct Evaluation {
    shape: OutputShape,
    blocks: Vec<Trajectory>,
    outputs: Vec<Vec<Vec<f64>>>,
}

impl Evaluation {
    /// Pair externally computed outputs with a design.
    ///
    /// `outputs` must hold one entry per distinct design point, in the order
    /// of `DesignMatrix::distinct_blocks` flattened.
    pub fn from_outputs(
        design: &DesignMatrix,
        shape: OutputShape,
        outputs: Vec<Vec<f64>>,
    ) -> Result<Self, ScreeningError> {
        shape.validate()?;
        let blocks = design.distinct_blocks();
        let expected: usize = blocks.iter().map(Trajectory::len).sum();
        if outputs.len() != expected {
            return Err(ScreeningError::OutputCount {
                expected,
                actual: outputs.len(),
            });
        }
        if let Some((point, output)) = outputs
            .iter()
            .enumerate()
            .find(|(_, output)| output.len() != shape.len())
        {
            return Err(ScreeningError::OutputShape {
                point,
                expected: shape.len(),
                actual: output.len(),
            });
        }

        let mut remaining = outputs.into_iter();
        let outputs = blocks
            .iter()
            .map(|block| remaining.by_ref().take(block.len()).collect())
            .collect();

        Ok(Self {
            shape,
            blocks,
            outputs,
        })
    }

    #[must_use]
    pub fn shape(&self) -> OutputShape {
        self.shape
    }

    #[must_use]
    pub fn blocks(&self) -> &[Trajectory] {
        &self.blocks
    }

    /// Outputs per block, aligned with `blocks()`
    #[must_use]
    pub fn outputs(&self) -> &[Vec<Vec<f64>>] {
        &self.outputs
    }

    /// Distinct length of each trajectory block
    #[must_use]
    pub fn distinct_lengths(&self) -> Vec<usize> {
        self.blocks.iter().map(Trajectory::len).collect()
    }

    /// Number of evaluated design points
    #[must_use]
    pub fn num_points(&self) -> usize {
        self.blocks.iter().map(Trajectory::len).sum()
    }
}

/// Evaluate every distinct point of the design with the oracle.
///
/// The output shape is read once and validated before the first call. The
/// first oracle failure aborts the run.
pub fn evaluate_design<O: Oracle + ?Sized>(
    design: &DesignMatrix,
    oracle: &mut O,
    progress: Option<&ScreeningProgress>,
) -> Result<Evaluation, ScreeningError> {
    let shape = oracle.output_shape();
    shape.validate()?;

    let blocks = design.distinct_blocks();
    let total: usize = blocks.iter().map(Trajectory::len).sum();
    tracing::debug!(
        nominal_points = design.num_points(),
        distinct_points = total,
        "Deduplicated trajectory blocks"
    );
    if let Some(p) = progress {
        p.reset(total);
    }

    let mut point = 0;
    let mut outputs = Vec::with_capacity(blocks.len());
    for block in &blocks {
        let mut block_outputs = Vec::with_capacity(block.len());
        for x in block.points() {
            let y = oracle
                .evaluate(x)
                .map_err(|source| ScreeningError::Oracle { point, source })?;
            if y.len() != shape.len() {
                return Err(ScreeningError::OutputShape {
                    point,
                    expected: shape.len(),
                    actual: y.len(),
                });
            }
            tracing::trace!(point, "Oracle evaluated");
            block_outputs.push(y);
            point += 1;
            if let Some(p) = progress {
                p.increment();
            }
        }
        outputs.push(block_outputs);
    }

    Ok(Evaluation {
        shape,
        blocks,
        outputs,
    })
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;
    use crate::model::{GroupId, ParameterSpace};
    use crate::screening::{ScreeningConfig, select_trajectories};

    fn grouped_design() -> DesignMatrix {
        // Grouped followers produce duplicate consecutive points
        let space = ParameterSpace::from_arrays(
            &[(0.0, 1.0), (0.0, 1.0), (0.0, 1.0)],
            &[4, 4, 4],
            &[GroupId(0), GroupId(0), GroupId(0)],
        )
        .unwrap();
        let config = ScreeningConfig {
            num_trajectory: 4,
            total_num_trajectory: 12,
            len_design_mat: 10,
            seed: None,
        };
        select_trajectories(&space, &config, &mut SmallRng::seed_from_u64(17)).unwrap()
    }

    #[test]
    fn test_one_call_per_distinct_point_in_order() {
        let design = grouped_design();
        let expected: Vec<Vec<f64>> = design
            .distinct_blocks()
            .iter()
            .flat_map(|b| b.points().to_vec())
            .collect();

        let mut seen = Vec::new();
        let mut oracle = FnOracle::scalar(|x| {
            seen.push(x.to_vec());
            x.iter().sum()
        });
        let progress = ScreeningProgress::default();
        let evaluation = evaluate_design(&design, &mut oracle, Some(&progress)).unwrap();
        drop(oracle);

        assert_eq!(seen, expected);
        assert_eq!(evaluation.num_points(), expected.len());
        assert_eq!(progress.completed(), expected.len());
        assert_eq!(progress.total(), expected.len());
        assert_eq!(progress.fraction(), 1.0);
        assert!(evaluation.num_points() <= design.num_points());
    }

    #[test]
    fn test_cloned_progress_shares_counters() {
        let design = grouped_design();
        let progress = ScreeningProgress::new(1);
        let observer = progress.clone();
        let mut oracle = FnOracle::scalar(|x| x[0]);

        evaluate_design(&design, &mut oracle, Some(&progress)).unwrap();

        assert_eq!(observer.completed(), progress.completed());
        assert_eq!(observer.total(), progress.total());
        assert!(observer.completed() > 0);
    }

    #[test]
    fn test_distinct_blocks_have_no_repeated_neighbours() {
        let design = grouped_design();
        for block in design.distinct_blocks() {
            assert!(block.levels().windows(2).all(|w| w[0] != w[1]));
            assert_eq!(block.dedup(), block);
        }
    }

    #[test]
    fn test_oracle_failure_aborts() {
        let design = grouped_design();
        let mut calls = 0;
        let mut oracle = FnOracle::new(OutputShape::Scalar, |_| {
            calls += 1;
            if calls == 3 {
                Err("infeasible model".into())
            } else {
                Ok(vec![0.0])
            }
        });
        let err = evaluate_design(&design, &mut oracle, None).unwrap_err();
        drop(oracle);
        assert!(matches!(err, ScreeningError::Oracle { point: 2, .. }));
        assert_eq!(calls, 3);
    }

    #[test]
    fn test_wrong_output_length_rejected() {
        let design = grouped_design();
        let mut oracle = FnOracle::vector(2, |x| vec![x[0]]);
        let err = evaluate_design(&design, &mut oracle, None).unwrap_err();
        assert!(matches!(
            err,
            ScreeningError::OutputShape {
                point: 0,
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_from_outputs_splits_by_block() {
        let design = grouped_design();
        let lengths: Vec<usize> = design.distinct_blocks().iter().map(Trajectory::len).collect();
        let total: usize = lengths.iter().sum();
        let outputs: Vec<Vec<f64>> = (0..total).map(|i| vec![i as f64]).collect();

        let evaluation = Evaluation::from_outputs(&design, OutputShape::Scalar, outputs).unwrap();
        assert_eq!(evaluation.distinct_lengths(), lengths);
        assert_eq!(evaluation.outputs()[1][0], vec![lengths[0] as f64]);

        let short = Evaluation::from_outputs(&design, OutputShape::Scalar, vec![vec![0.0]]);
        assert!(matches!(short, Err(ScreeningError::OutputCount { .. })));
    }
}
