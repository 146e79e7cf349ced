//! Oracle output shape

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Shape of the values an oracle returns for one design point.
///
/// Declared by the oracle before evaluation starts and fixed for the whole
/// run. Scalar outputs are carried internally as one-element vectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    Scalar,
    Vector(usize),
}

impl OutputShape {
    /// Number of values per oracle call
    #[must_use]
    pub fn len(self) -> usize {
        match self {
            OutputShape::Scalar => 1,
            OutputShape::Vector(n) => n,
        }
    }

    #[must_use]
    pub fn is_scalar(self) -> bool {
        matches!(self, OutputShape::Scalar)
    }

    pub(crate) fn validate(self) -> Result<(), ConfigError> {
        if self.len() == 0 {
            return Err(ConfigError::InvalidOutputShape);
        }
        Ok(())
    }

    /// The additive identity for this shape
    #[must_use]
    pub fn zeros(self) -> Vec<f64> {
        vec![0.0; self.len()]
    }
}
