use std::fmt;

use crate::model::GroupId;

/// Failure raised by an oracle while evaluating a design point.
///
/// Oracles wrap external collaborators (solvers, simulators) whose error types
/// the engine cannot know, so failures are carried boxed.
pub type OracleError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors detected while validating the parameter space or run settings.
///
/// All of these are raised before the first oracle call.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    EmptyParameterSpace,
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
    /// Non-finite bounds or `lower > upper`
    InvalidRange {
        index: usize,
        lower: f64,
        upper: f64,
    },
    TooFewLevels {
        index: usize,
        levels: usize,
    },
    /// Neighbouring grid levels are not strictly increasing, as for a
    /// zero-width range or one too narrow to hold `levels` distinct values
    DegenerateGrid {
        index: usize,
        lower: f64,
        upper: f64,
        levels: usize,
    },
    /// Members of a group co-move on one level history, so they need equal level counts
    GroupLevelMismatch {
        group: GroupId,
        index: usize,
        levels: usize,
        expected: usize,
    },
    NoTrajectories,
    /// A trajectory needs at least its starting point
    EmptyTrajectory,
    PoolTooSmall {
        num_trajectory: usize,
        total_num_trajectory: usize,
    },
    /// Vector outputs must have at least one element
    InvalidOutputShape,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyParameterSpace => write!(f, "parameter space is empty"),
            ConfigError::LengthMismatch {
                what,
                expected,
                actual,
            } => write!(f, "expected {expected} {what}, got {actual}"),
            ConfigError::InvalidRange {
                index,
                lower,
                upper,
            } => write!(
                f,
                "parameter {index} has invalid range [{lower}, {upper}] (bounds must be finite with lower <= upper)"
            ),
            ConfigError::DegenerateGrid {
                index,
                lower,
                upper,
                levels,
            } => write!(
                f,
                "parameter {index}: {levels} levels over [{lower}, {upper}] do not give distinct grid values"
            ),
            ConfigError::TooFewLevels { index, levels } => {
                write!(f, "parameter {index} has {levels} levels, at least 2 required")
            }
            ConfigError::GroupLevelMismatch {
                group,
                index,
                levels,
                expected,
            } => write!(
                f,
                "parameter {index} has {levels} levels but {group} members have {expected}"
            ),
            ConfigError::NoTrajectories => write!(f, "num_trajectory must be at least 1"),
            ConfigError::EmptyTrajectory => write!(f, "len_design_mat must be at least 1"),
            ConfigError::PoolTooSmall {
                num_trajectory,
                total_num_trajectory,
            } => write!(
                f,
                "total_num_trajectory ({total_num_trajectory}) must exceed num_trajectory ({num_trajectory}), preferably 3-4 times"
            ),
            ConfigError::InvalidOutputShape => {
                write!(f, "vector output shape must have at least one element")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Trajectory steps that break the one-group-per-step guarantee.
///
/// These indicate a defect in trajectory generation rather than bad input.
#[derive(Debug, Clone, PartialEq)]
pub enum ConsistencyError {
    MultipleGroupsChanged {
        trajectory: usize,
        step: usize,
        groups: Vec<GroupId>,
    },
    NoChange {
        trajectory: usize,
        step: usize,
    },
}

impl fmt::Display for ConsistencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyError::MultipleGroupsChanged {
                trajectory,
                step,
                groups,
            } => write!(
                f,
                "trajectory {trajectory} step {step} changes more than one group: {groups:?}"
            ),
            ConsistencyError::NoChange { trajectory, step } => {
                write!(f, "trajectory {trajectory} step {step} changes no parameter")
            }
        }
    }
}

impl std::error::Error for ConsistencyError {}

/// Any failure of a screening run
#[derive(Debug)]
pub enum ScreeningError {
    Config(ConfigError),
    Consistency(ConsistencyError),
    /// The oracle returned an output whose length disagrees with its declared shape
    OutputShape {
        point: usize,
        expected: usize,
        actual: usize,
    },
    /// Externally supplied outputs do not cover the design
    OutputCount { expected: usize, actual: usize },
    Oracle { point: usize, source: OracleError },
}

impl fmt::Display for ScreeningError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScreeningError::Config(e) => write!(f, "configuration error: {e}"),
            ScreeningError::Consistency(e) => write!(f, "internal consistency error: {e}"),
            ScreeningError::OutputShape {
                point,
                expected,
                actual,
            } => write!(
                f,
                "oracle output at design point {point} has {actual} values, expected {expected}"
            ),
            ScreeningError::OutputCount { expected, actual } => {
                write!(f, "expected {expected} oracle outputs, got {actual}")
            }
            ScreeningError::Oracle { point, source } => {
                write!(f, "oracle failed at design point {point}: {source}")
            }
        }
    }
}

impl std::error::Error for ScreeningError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScreeningError::Config(e) => Some(e),
            ScreeningError::Consistency(e) => Some(e),
            ScreeningError::Oracle { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

impl From<ConfigError> for ScreeningError {
    fn from(err: ConfigError) -> Self {
        ScreeningError::Config(err)
    }
}

impl From<ConsistencyError> for ScreeningError {
    fn from(err: ConsistencyError) -> Self {
        ScreeningError::Consistency(err)
    }
}
