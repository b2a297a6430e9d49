//! SVG generation for grouped bar charts.

use super::ChartStyle;
use crate::models::PivotMatrix;

const MARGIN_LEFT: f64 = 80.0;
const MARGIN_RIGHT: f64 = 170.0;
const MARGIN_TOP: f64 = 50.0;
const MARGIN_BOTTOM: f64 = 70.0;

/// Share of each group's slot taken by bars; the rest is spacing.
const GROUP_FILL: f64 = 0.8;
const TARGET_TICKS: f64 = 5.0;

/// Generate the complete SVG document.
pub(super) fn render_svg(matrix: &PivotMatrix, style: &ChartStyle) -> String {
    let width = f64::from(style.width);
    let height = f64::from(style.height);
    let plot_w = (width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_h = (height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);

    let mut svg = String::new();

    svg.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    svg.push_str(&format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{w}\" height=\"{h}\" viewBox=\"0 0 {w} {h}\">\n",
        w = style.width,
        h = style.height
    ));
    svg.push_str("  <style>\n");
    svg.push_str("    text { font-family: sans-serif; fill: #222; }\n");
    svg.push_str("    .title { font-size: 16px; font-weight: bold; }\n");
    svg.push_str("    .axis-label { font-size: 13px; }\n");
    svg.push_str("    .tick { font-size: 11px; }\n");
    svg.push_str("    .axis { stroke: #333; stroke-width: 1; }\n");
    svg.push_str("    .grid { stroke: #ddd; stroke-width: 1; }\n");
    svg.push_str("  </style>\n");
    svg.push_str("  <rect width=\"100%\" height=\"100%\" fill=\"#ffffff\"/>\n");

    svg.push_str(&format!(
        "  <text class=\"title\" x=\"{:.1}\" y=\"30\" text-anchor=\"middle\">{}</text>\n",
        width / 2.0,
        escape_xml(&style.title)
    ));

    let bottom = MARGIN_TOP + plot_h;

    if !matrix.is_empty() {
        svg.push_str(&generate_y_ticks(matrix, plot_w, plot_h));
        svg.push_str(&generate_bars(matrix, style, plot_w, plot_h));
        svg.push_str(&generate_legend(matrix, style, plot_w));
    } else {
        svg.push_str(&format!(
            "  <text class=\"axis-label\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">No data</text>\n",
            MARGIN_LEFT + plot_w / 2.0,
            MARGIN_TOP + plot_h / 2.0
        ));
    }

    // Axes on top of grid lines
    svg.push_str(&format!(
        "  <line class=\"axis\" x1=\"{l:.1}\" y1=\"{b:.1}\" x2=\"{r:.1}\" y2=\"{b:.1}\"/>\n",
        l = MARGIN_LEFT,
        r = MARGIN_LEFT + plot_w,
        b = bottom
    ));
    svg.push_str(&format!(
        "  <line class=\"axis\" x1=\"{l:.1}\" y1=\"{t:.1}\" x2=\"{l:.1}\" y2=\"{b:.1}\"/>\n",
        l = MARGIN_LEFT,
        t = MARGIN_TOP,
        b = bottom
    ));

    svg.push_str(&format!(
        "  <text class=\"axis-label\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
        MARGIN_LEFT + plot_w / 2.0,
        height - 15.0,
        escape_xml(&style.x_label)
    ));
    let y_mid = MARGIN_TOP + plot_h / 2.0;
    svg.push_str(&format!(
        "  <text class=\"axis-label\" x=\"20\" y=\"{y:.1}\" text-anchor=\"middle\" transform=\"rotate(-90 20 {y:.1})\">{}</text>\n",
        escape_xml(&style.y_label),
        y = y_mid
    ));

    svg.push_str("</svg>\n");

    svg
}

/// Horizontal grid lines with value labels.
fn generate_y_ticks(matrix: &PivotMatrix, plot_w: f64, plot_h: f64) -> String {
    let mut section = String::new();
    let (y_max, step) = axis_scale(matrix.max_value().unwrap_or(0.0));
    let ticks = (y_max / step).round() as usize;

    for i in 0..=ticks {
        let value = step * i as f64;
        let y = MARGIN_TOP + plot_h - value / y_max * plot_h;
        section.push_str(&format!(
            "  <line class=\"grid\" x1=\"{:.1}\" y1=\"{y:.1}\" x2=\"{:.1}\" y2=\"{y:.1}\"/>\n",
            MARGIN_LEFT,
            MARGIN_LEFT + plot_w
        ));
        section.push_str(&format!(
            "  <text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"end\">{}</text>\n",
            MARGIN_LEFT - 6.0,
            y + 4.0,
            format_tick(value, step)
        ));
    }

    section
}

/// One group per thread count, one bar per defined cell.
fn generate_bars(matrix: &PivotMatrix, style: &ChartStyle, plot_w: f64, plot_h: f64) -> String {
    let mut section = String::new();
    let (y_max, _) = axis_scale(matrix.max_value().unwrap_or(0.0));

    let group_w = plot_w / matrix.threads().len() as f64;
    let bar_w = group_w * GROUP_FILL / matrix.methods().len().max(1) as f64;
    let bottom = MARGIN_TOP + plot_h;

    for (row, (threads, cells)) in matrix.rows().enumerate() {
        let group_x = MARGIN_LEFT + group_w * row as f64;
        let bars_x = group_x + group_w * (1.0 - GROUP_FILL) / 2.0;

        for (col, cell) in cells.iter().enumerate() {
            // Unobserved combinations leave a gap
            let Some(value) = cell else {
                continue;
            };
            let bar_h = value / y_max * plot_h;
            section.push_str(&format!(
                "  <rect class=\"bar\" x=\"{:.1}\" y=\"{:.1}\" width=\"{:.1}\" height=\"{:.1}\" fill=\"{}\"><title>{}, {} threads: {:.2} ms</title></rect>\n",
                bars_x + bar_w * col as f64,
                bottom - bar_h,
                bar_w,
                bar_h,
                style.color(col),
                escape_xml(&matrix.methods()[col]),
                threads,
                value
            ));
        }

        section.push_str(&format!(
            "  <text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\" text-anchor=\"middle\">{}</text>\n",
            group_x + group_w / 2.0,
            bottom + 18.0,
            threads
        ));
    }

    section
}

fn generate_legend(matrix: &PivotMatrix, style: &ChartStyle, plot_w: f64) -> String {
    let mut section = String::new();
    let x = MARGIN_LEFT + plot_w + 20.0;

    for (i, method) in matrix.methods().iter().enumerate() {
        let y = MARGIN_TOP + 10.0 + 20.0 * i as f64;
        section.push_str(&format!(
            "  <rect class=\"legend-swatch\" x=\"{:.1}\" y=\"{:.1}\" width=\"12\" height=\"12\" fill=\"{}\"/>\n",
            x,
            y,
            style.color(i)
        ));
        section.push_str(&format!(
            "  <text class=\"tick\" x=\"{:.1}\" y=\"{:.1}\">{}</text>\n",
            x + 18.0,
            y + 10.0,
            escape_xml(method)
        ));
    }

    section
}

/// Round the axis maximum up to a multiple of a 1-2-5 step.
///
/// Returns `(axis_max, step)`.
fn axis_scale(max: f64) -> (f64, f64) {
    if !max.is_finite() || max <= 0.0 {
        return (1.0, 0.2);
    }

    let raw = max / TARGET_TICKS;
    let magnitude = 10f64.powf(raw.log10().floor());
    let nice = match raw / magnitude {
        n if n <= 1.0 => 1.0,
        n if n <= 2.0 => 2.0,
        n if n <= 5.0 => 5.0,
        _ => 10.0,
    };
    let step = nice * magnitude;

    ((max / step).ceil() * step, step)
}

fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{:.0}", value)
    } else {
        let decimals = (-step.log10().floor()) as usize;
        format!("{:.*}", decimals, value)
    }
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
