use morris_core::ScreeningConfig;
use serde::{Deserialize, Serialize};

use crate::oracles::BenchmarkOracle;

/// One uncertain input as written in a screening file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterData {
    pub name: String,
    pub lower: f64,
    pub upper: f64,
    #[serde(default = "default_levels")]
    pub levels: usize,
    /// Parameters sharing a group name move together; absent means a group of its own
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
}

fn default_levels() -> usize {
    4
}

/// A complete screening run as stored on disk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningData {
    pub parameters: Vec<ParameterData>,
    #[serde(default)]
    pub screening: ScreeningConfig,
    pub oracle: BenchmarkOracle,
}

impl ScreeningData {
    /// Load from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    /// Save to YAML string
    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }
}
