//! Built-in benchmark functions with known sensitivity structure
//!
//! These let a screening file be run end to end without an external model:
//! - `linear` - weighted sum, elementary effects equal the coefficients
//! - `ishigami` - strongly nonlinear, non-monotonic in three inputs
//! - `sobol_g` - product form, importance controlled by `a` (small = important)

use std::fmt;

use morris_core::{Oracle, OracleError, OutputShape};
use serde::{Deserialize, Serialize};

/// The point handed to a benchmark has the wrong number of inputs
#[derive(Debug, Clone, PartialEq)]
pub struct DimensionError {
    pub oracle: &'static str,
    pub expected: usize,
    pub actual: usize,
}

impl fmt::Display for DimensionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} oracle takes {} inputs, got {}",
            self.oracle, self.expected, self.actual
        )
    }
}

impl std::error::Error for DimensionError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BenchmarkOracle {
    Linear {
        coefficients: Vec<f64>,
    },
    Ishigami {
        #[serde(default = "default_ishigami_a")]
        a: f64,
        #[serde(default = "default_ishigami_b")]
        b: f64,
    },
    SobolG {
        a: Vec<f64>,
    },
}

fn default_ishigami_a() -> f64 {
    7.0
}

fn default_ishigami_b() -> f64 {
    0.1
}

impl BenchmarkOracle {
    pub fn name(&self) -> &'static str {
        match self {
            BenchmarkOracle::Linear { .. } => "linear",
            BenchmarkOracle::Ishigami { .. } => "ishigami",
            BenchmarkOracle::SobolG { .. } => "sobol_g",
        }
    }

    /// Number of inputs the function takes
    pub fn dimension(&self) -> usize {
        match self {
            BenchmarkOracle::Linear { coefficients } => coefficients.len(),
            BenchmarkOracle::Ishigami { .. } => 3,
            BenchmarkOracle::SobolG { a } => a.len(),
        }
    }

    /// Check the function against the number of parameters before a run
    pub fn check_dimension(&self, num_parameters: usize) -> Result<(), DimensionError> {
        if self.dimension() != num_parameters {
            return Err(DimensionError {
                oracle: self.name(),
                expected: self.dimension(),
                actual: num_parameters,
            });
        }
        Ok(())
    }

    fn value(&self, x: &[f64]) -> f64 {
        match self {
            BenchmarkOracle::Linear { coefficients } => {
                coefficients.iter().zip(x).map(|(c, v)| c * v).sum()
            }
            BenchmarkOracle::Ishigami { a, b } => {
                let s1 = x[0].sin();
                let s2 = x[1].sin();
                s1 + a * s2 * s2 + b * x[2].powi(4) * s1
            }
            BenchmarkOracle::SobolG { a } => a
                .iter()
                .zip(x)
                .map(|(a, v)| ((4.0 * v - 2.0).abs() + a) / (1.0 + a))
                .product(),
        }
    }
}

impl Oracle for BenchmarkOracle {
    fn output_shape(&self) -> OutputShape {
        OutputShape::Scalar
    }

    fn evaluate(&mut self, point: &[f64]) -> Result<Vec<f64>, OracleError> {
        self.check_dimension(point.len())?;
        Ok(vec![self.value(point)])
    }
}
