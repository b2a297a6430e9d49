//! Chart rendering.
//!
//! [`render`] turns a [`PivotMatrix`] into a [`Chart`] value. Saving and
//! previewing are methods on that value, so no drawing state lives outside
//! it.

mod preview;
mod svg;

use crate::config::{default_palette, ChartConfig};
use crate::models::PivotMatrix;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info};

/// Presentation settings for a chart.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub width: u32,
    pub height: u32,
    pub palette: Vec<String>,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self::from(&ChartConfig::default())
    }
}

impl From<&ChartConfig> for ChartStyle {
    fn from(config: &ChartConfig) -> Self {
        let palette = if config.palette.is_empty() {
            default_palette()
        } else {
            config.palette.clone()
        };

        Self {
            title: config.title.clone(),
            x_label: config.x_label.clone(),
            y_label: config.y_label.clone(),
            width: config.width,
            height: config.height,
            palette,
        }
    }
}

impl ChartStyle {
    /// Colour for the method in column `index`.
    pub fn color(&self, index: usize) -> &str {
        if self.palette.is_empty() {
            return "#1f77b4";
        }
        &self.palette[index % self.palette.len()]
    }
}

/// A rendered grouped bar chart.
#[derive(Debug, Clone)]
pub struct Chart {
    svg: String,
    matrix: PivotMatrix,
    style: ChartStyle,
}

/// Render a grouped bar chart: one group per thread count, one bar per
/// method within the group.
pub fn render(matrix: &PivotMatrix, style: &ChartStyle) -> Chart {
    let svg = svg::render_svg(matrix, style);
    debug!(
        "Rendered {} bars into {} bytes of SVG",
        matrix.defined_cells(),
        svg.len()
    );

    Chart {
        svg,
        matrix: matrix.clone(),
        style: style.clone(),
    }
}

impl Chart {
    /// The SVG document.
    #[allow(dead_code)] // Accessor for callers that embed the chart
    pub fn svg(&self) -> &str {
        &self.svg
    }

    /// Write the chart to `path`, replacing any existing file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        std::fs::write(path, &self.svg)
            .with_context(|| format!("Failed to write chart to {}", path.display()))?;

        info!("Chart saved to: {}", path.display());
        Ok(())
    }

    /// Text rendering of the chart for a terminal.
    pub fn preview(&self) -> String {
        preview::render_preview(&self.matrix, &self.style)
    }

    /// Print the terminal preview to stdout.
    pub fn show(&self) {
        println!("{}", self.preview());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{aggregate, pivot};
    use crate::models::{Dataset, Record};

    fn sample_matrix() -> PivotMatrix {
        let dataset: Dataset = vec![
            Record::new("locked", 1, 10.0),
            Record::new("locked", 1, 20.0),
            Record::new("reduce", 1, 30.0),
            Record::new("parallel", 0, 5.0),
        ]
        .into_iter()
        .collect();
        pivot(&aggregate(&dataset))
    }

    #[test]
    fn test_style_from_config() {
        let mut config = ChartConfig::default();
        config.palette.clear();
        config.title = "Custom".to_string();

        let style = ChartStyle::from(&config);
        assert_eq!(style.title, "Custom");
        assert_eq!(style.palette.len(), 10);
        assert_eq!(style.color(0), style.color(10));
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.svg");
        std::fs::write(&path, "stale").unwrap();

        let chart = render(&sample_matrix(), &ChartStyle::default());
        chart.save(&path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content, chart.svg());
        assert!(content.starts_with("<?xml"));
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("results.svg");

        render(&sample_matrix(), &ChartStyle::default())
            .save(&path)
            .unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_save_unwritable_path() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the target path cannot be replaced by a file
        let path = dir.path().join("results.svg");
        std::fs::create_dir(&path).unwrap();

        let chart = render(&sample_matrix(), &ChartStyle::default());
        assert!(chart.save(&path).is_err());
    }

    #[test]
    fn test_render_empty_matrix() {
        let chart = render(&PivotMatrix::default(), &ChartStyle::default());
        assert!(chart.svg().contains("</svg>"));
        assert!(chart.preview().contains("No data"));
    }
}
