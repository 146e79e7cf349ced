//! Reduction of elementary effects to per-group statistics.

use crate::model::OutputShape;

use super::effects::GroupEffects;

/// Aggregate statistics, one row per group
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatistics {
    pub means: Vec<Vec<f64>>,
    pub means_star: Vec<Vec<f64>>,
    pub variances: Vec<Vec<f64>>,
}

fn elementwise_mean(effects: &[Vec<f64>], width: usize, f: impl Fn(f64) -> f64) -> Vec<f64> {
    let n = effects.len() as f64;
    (0..width)
        .map(|d| effects.iter().map(|e| f(e[d])).sum::<f64>() / n)
        .collect()
}

/// Sample variance (n - 1 denominator); a single effect has zero spread.
fn sample_variance(effects: &[Vec<f64>], means: &[f64]) -> Vec<f64> {
    if effects.len() < 2 {
        return vec![0.0; means.len()];
    }
    let denom = (effects.len() - 1) as f64;
    means
        .iter()
        .enumerate()
        .map(|(d, mean)| {
            effects
                .iter()
                .map(|e| (e[d] - mean) * (e[d] - mean))
                .sum::<f64>()
                / denom
        })
        .collect()
}

/// Compute mean, mu* and variance for every group.
///
/// A group that never received an effect gets zeros of the output shape, so
/// every row has the same width.
#[must_use]
pub fn summarize(effects: &GroupEffects, shape: OutputShape) -> GroupStatistics {
    let width = shape.len();
    let mut stats = GroupStatistics {
        means: Vec::with_capacity(effects.num_groups()),
        means_star: Vec::with_capacity(effects.num_groups()),
        variances: Vec::with_capacity(effects.num_groups()),
    };

    for position in 0..effects.num_groups() {
        let group = effects.get(position);
        if group.is_empty() {
            stats.means.push(shape.zeros());
            stats.means_star.push(shape.zeros());
            stats.variances.push(shape.zeros());
            continue;
        }
        let mean = elementwise_mean(group, width, |v| v);
        let mean_star = elementwise_mean(group, width, f64::abs);
        stats.variances.push(sample_variance(group, &mean));
        stats.means.push(mean);
        stats.means_star.push(mean_star);
    }

    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_of_signed_effects() {
        let effects = GroupEffects::new(1)
            .with_effect(0, vec![2.0])
            .with_effect(0, vec![-4.0])
            .with_effect(0, vec![8.0]);
        let stats = summarize(&effects, OutputShape::Scalar);

        assert!((stats.means[0][0] - 2.0).abs() < 1e-12);
        assert!((stats.means_star[0][0] - 14.0 / 3.0).abs() < 1e-12);
        // ((0)^2 + (-6)^2 + (6)^2) / 2
        assert!((stats.variances[0][0] - 36.0).abs() < 1e-12);
    }

    #[test]
    fn test_empty_group_defaults_to_zeros() {
        let effects = GroupEffects::new(2).with_effect(0, vec![1.0, -1.0, 3.0]);
        let stats = summarize(&effects, OutputShape::Vector(3));

        assert_eq!(stats.means[1], vec![0.0; 3]);
        assert_eq!(stats.means_star[1], vec![0.0; 3]);
        assert_eq!(stats.variances[1], vec![0.0; 3]);
        assert_eq!(stats.means_star[0], vec![1.0, 1.0, 3.0]);
        // One effect: no spread
        assert_eq!(stats.variances[0], vec![0.0; 3]);
    }
}
