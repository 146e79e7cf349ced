//! Command-line front-end for Morris screening
//!
//! Loads a YAML screening file, runs it against a built-in benchmark oracle
//! and reports the ranked group statistics.

pub mod data;
pub mod logging;
pub mod oracles;
pub mod report;
pub mod util;

pub use data::{ScreeningData, to_parameter_space};
pub use logging::init_logging;
pub use oracles::BenchmarkOracle;
pub use report::{ReportFormat, ScreeningReport};
