//! Utility functions for rendering UI components

use std::ops::Range;

pub fn truncate_string(s: &str, max_width: usize) -> String {
    if s.chars().count() > max_width {
        let truncated: String = s.chars().take(max_width.saturating_sub(3)).collect();
        format!("{}...", truncated)
    } else {
        s.to_string()
    }
}

/// Rows to draw so that `selected_row` stays on screen.
///
/// The window scrolls only as far as needed and never runs past the last row.
pub fn visible_row_window(selected_row: usize, total_rows: usize, capacity: usize) -> Range<usize> {
    let capacity = capacity.max(1);
    if total_rows <= capacity {
        return 0..total_rows;
    }
    let selected_row = selected_row.min(total_rows - 1);
    let start = selected_row.saturating_sub(capacity - 1).min(total_rows - capacity);
    start..start + capacity
}
