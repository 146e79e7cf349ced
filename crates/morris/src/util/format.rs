/// Format a statistic for a fixed-width table column
///
/// Uses plain decimals in the usual range and switches to scientific notation
/// for very large or very small magnitudes.
pub fn format_stat(value: f64) -> String {
    let abs_value = value.abs();
    if abs_value == 0.0 {
        "0".to_string()
    } else if !(1e-3..1e5).contains(&abs_value) {
        format!("{value:.3e}")
    } else {
        format!("{value:.4}")
    }
}

/// Truncate a label to `width` characters, marking the cut with `~`
pub fn truncate_label(label: &str, width: usize) -> String {
    if label.chars().count() <= width {
        return label.to_string();
    }
    let mut cut: String = label.chars().take(width.saturating_sub(1)).collect();
    cut.push('~');
    cut
}
