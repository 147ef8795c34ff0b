//! Report formatting utilities for terminal output

use crate::models::{ProgressBand, ProgressState};

/// Format a percentage with precision that suits its magnitude
pub fn format_percentage(pct: f64) -> String {
    let magnitude = pct.abs();
    if magnitude < 0.1 && magnitude > 0.0 {
        format!("{:.2}%", pct)
    } else if magnitude < 100.0 {
        format!("{:.1}%", pct)
    } else {
        format!("{:.0}%", pct)
    }
}

/// Percentage change with an explicit sign, e.g. "+12.5%"
pub fn format_change(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{}", format_percentage(pct))
    } else {
        format_percentage(pct)
    }
}

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return "░".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Progress bar filled to the display-capped percentage, followed by the band marker
pub fn format_progress(state: &ProgressState, band: ProgressBand, width: usize) -> String {
    let marker = match band {
        ProgressBand::OnTrack => "",
        ProgressBand::NearLimit => " !",
        ProgressBand::Over => " !!",
    };
    format!(
        "{} {}{}",
        format_bar(state.display_percentage(), 100.0, width),
        format_percentage(state.percentage),
        marker
    )
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
