//! Terminal preview of a chart.

use super::ChartStyle;
use crate::models::PivotMatrix;

const BAR_WIDTH: usize = 40;

/// Render one text bar per defined cell, grouped by thread count.
pub(super) fn render_preview(matrix: &PivotMatrix, style: &ChartStyle) -> String {
    let mut lines = vec![style.title.clone(), String::new()];

    let Some(max) = matrix.max_value() else {
        lines.push("No data".to_string());
        return lines.join("\n");
    };

    let label_width = matrix.methods().iter().map(|m| m.len()).max().unwrap_or(0);

    for (threads, cells) in matrix.rows() {
        lines.push(format!("Threads {}:", threads.label()));

        for (method, cell) in matrix.methods().iter().zip(cells) {
            match cell {
                Some(value) => lines.push(format!(
                    "  {:<width$} {} {:.2} ms",
                    method,
                    "█".repeat(bar_length(*value, max)),
                    value,
                    width = label_width
                )),
                None => lines.push(format!("  {:<width$} -", method, width = label_width)),
            }
        }
    }

    lines.push(String::new());
    lines.push(format!("x: {} | y: {}", style.x_label, style.y_label));

    lines.join("\n")
}

fn bar_length(value: f64, max: f64) -> usize {
    if max <= 0.0 || value <= 0.0 {
        return 0;
    }
    ((value / max * BAR_WIDTH as f64).round() as usize).max(1)
}
