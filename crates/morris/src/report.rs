//! Screening report: serialized output file and terminal summary

use std::fmt::Write as _;
use std::path::Path;

use clap::ValueEnum;
use color_eyre::eyre::{Result, WrapErr};
use jiff::Timestamp;
use morris_core::{GroupSummary, MorrisResult, OutputShape, ScreeningConfig};
use serde::{Deserialize, Serialize};

use crate::util::format::{format_stat, truncate_label};
use crate::util::io::atomic_write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Json,
    Yaml,
}

/// Everything needed to read a screening run back later
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningReport {
    pub generated_at: Timestamp,
    pub oracle: String,
    /// Settings the run used, including the seed actually drawn
    pub config: ScreeningConfig,
    pub output_shape: OutputShape,
    pub oracle_calls: usize,
    pub distinct_lengths: Vec<usize>,
    /// Groups ordered by decreasing mu* of the first output
    pub groups: Vec<GroupSummary>,
}

impl ScreeningReport {
    pub fn new(oracle: &str, config: ScreeningConfig, result: &MorrisResult) -> Self {
        let summaries = result.summaries();
        let groups = result
            .ranked_by_mean_star(0)
            .into_iter()
            .filter_map(|id| summaries.iter().find(|s| s.group == id).cloned())
            .collect();

        Self {
            generated_at: Timestamp::now(),
            oracle: oracle.to_string(),
            config,
            output_shape: result.output_shape,
            oracle_calls: result.oracle_calls,
            distinct_lengths: result.distinct_lengths.clone(),
            groups,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).wrap_err("Failed to serialize report as JSON")
    }

    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self).wrap_err("Failed to serialize report as YAML")
    }

    /// Serialize and atomically write the report
    pub fn write(&self, path: &Path, format: ReportFormat) -> Result<()> {
        let content = match format {
            ReportFormat::Json => self.to_json()?,
            ReportFormat::Yaml => self.to_yaml()?,
        };
        atomic_write(path, &content)
            .wrap_err_with(|| format!("Failed to write report to {}", path.display()))?;
        tracing::info!(path = %path.display(), ?format, "Report written");
        Ok(())
    }

    /// Fixed-width summary table of the first output, most influential group first
    pub fn format_table(&self) -> String {
        const MEMBERS_WIDTH: usize = 24;

        let mut out = String::new();
        let _ = writeln!(
            out,
            "{:>4}  {:<10}  {:<MEMBERS_WIDTH$}  {:>12}  {:>12}  {:>12}  {:>7}",
            "rank", "group", "members", "mu*", "mean", "sigma", "effects"
        );
        for (rank, summary) in self.groups.iter().enumerate() {
            let members = truncate_label(&summary.members.join(", "), MEMBERS_WIDTH);
            let first = |values: &[f64]| {
                values
                    .first()
                    .copied()
                    .map_or_else(String::new, format_stat)
            };
            let _ = writeln!(
                out,
                "{:>4}  {:<10}  {:<MEMBERS_WIDTH$}  {:>12}  {:>12}  {:>12}  {:>7}",
                rank + 1,
                summary.group.to_string(),
                members,
                first(&summary.mean_star),
                first(&summary.mean),
                first(&summary.sigma),
                summary.num_effects
            );
        }
        let _ = writeln!(
            out,
            "{} oracle calls over {} trajectories ({})",
            self.oracle_calls,
            self.distinct_lengths.len(),
            self.oracle
        );
        out
    }
}
