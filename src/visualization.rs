//! # Visualization
//!
//! $$
//! \{(x_i, y_i^{(k)})\}_{k=1}^{K} \mapsto \text{line chart}
//! $$
//!
//! Chart descriptions produced by the lab panels and their plotly rendering.
use std::path::Path;
use std::path::PathBuf;

use plotly::common::DashType;
use plotly::common::Line;
use plotly::common::Mode;
use plotly::common::Title;
use plotly::layout::Axis;
use plotly::Layout;
use plotly::Plot;
use plotly::Scatter;
use tracing::info;

use crate::error::LabError;
use crate::error::Result;

/// One named line on a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSeries {
  pub name: String,
  pub x: Vec<f64>,
  pub y: Vec<f64>,
}

/// Horizontal reference line, e.g. zero P&L or the maintenance margin.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceLine {
  pub name: String,
  pub y: f64,
  pub dashed: bool,
}

/// Renderer-agnostic line chart.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartSpec {
  pub title: String,
  pub x_label: String,
  pub y_label: String,
  pub series: Vec<ChartSeries>,
  pub reference_lines: Vec<ReferenceLine>,
}

impl ChartSpec {
  pub fn new(title: &str) -> Self {
    Self {
      title: title.into(),
      ..Self::default()
    }
  }

  pub fn x_label(mut self, label: &str) -> Self {
    self.x_label = label.into();
    self
  }

  pub fn y_label(mut self, label: &str) -> Self {
    self.y_label = label.into();
    self
  }

  /// Add a series. Unequal `x`/`y` lengths are reported by [`ChartSpec::validate`].
  pub fn line(mut self, name: &str, x: Vec<f64>, y: Vec<f64>) -> Self {
    self.series.push(ChartSeries {
      name: name.into(),
      x,
      y,
    });
    self
  }

  pub fn zero_line(self) -> Self {
    self.reference("zero", 0.0, false)
  }

  pub fn reference(mut self, name: &str, y: f64, dashed: bool) -> Self {
    self.reference_lines.push(ReferenceLine {
      name: name.into(),
      y,
      dashed,
    });
    self
  }

  /// Horizontal extent shared by all series.
  fn x_range(&self) -> Option<(f64, f64)> {
    let mut xs = self.series.iter().flat_map(|s| s.x.iter().copied());
    let first = xs.next()?;
    Some(xs.fold((first, first), |(lo, hi), x| (lo.min(x), hi.max(x))))
  }

  /// Every series must pair each x with exactly one y.
  pub fn validate(&self) -> Result<()> {
    match self.series.iter().find(|s| s.x.len() != s.y.len()) {
      Some(s) => Err(LabError::invalid(
        "series",
        format!(
          "`{}` in chart `{}` has {} x values and {} y values",
          s.name,
          self.title,
          s.x.len(),
          s.y.len()
        ),
      )),
      None => Ok(()),
    }
  }

  pub fn plot(&self) -> Result<Plot> {
    self.validate()?;
    let mut plot = Plot::new();
    for series in &self.series {
      let trace = Scatter::new(series.x.clone(), series.y.clone())
        .mode(Mode::Lines)
        .name(series.name.as_str());
      plot.add_trace(trace);
    }

    if let Some((lo, hi)) = self.x_range() {
      for line in &self.reference_lines {
        let dash = if line.dashed {
          DashType::Dash
        } else {
          DashType::Solid
        };
        let trace = Scatter::new(vec![lo, hi], vec![line.y, line.y])
          .mode(Mode::Lines)
          .name(line.name.as_str())
          .line(Line::new().width(1.0).dash(dash))
          .show_legend(false);
        plot.add_trace(trace);
      }
    }

    plot.set_layout(
      Layout::new()
        .title(Title::from(self.title.as_str()))
        .x_axis(Axis::new().title(Title::from(self.x_label.as_str())))
        .y_axis(Axis::new().title(Title::from(self.y_label.as_str()))),
    );
    Ok(plot)
  }

  /// Write the chart as a standalone HTML page.
  pub fn write_html(&self, path: &Path) -> Result<()> {
    let html = self.plot()?.to_html();
    std::fs::write(path, html)?;
    info!(path = %path.display(), title = %self.title, "chart written");
    Ok(())
  }
}

/// `path` for the first chart, `<stem>-<n>.<ext>` for the n-th after it.
pub fn numbered_path(path: &Path, index: usize) -> PathBuf {
  if index == 0 {
    return path.to_path_buf();
  }
  let stem = path.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
  let name = match path.extension() {
    Some(ext) => format!("{stem}-{}.{}", index + 1, ext.to_string_lossy()),
    None => format!("{stem}-{}", index + 1),
  };
  path.with_file_name(name)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn builder_collects_series() {
    let chart = ChartSpec::new("Hedge")
      .x_label("Market move %")
      .y_label("P&L")
      .line("Unhedged", vec![-10.0, 10.0], vec![-1.0, 1.0])
      .line("Hedged", vec![-10.0, 10.0], vec![0.0, 0.0])
      .zero_line();
    assert_eq!(chart.series.len(), 2);
    assert_eq!(chart.reference_lines[0].y, 0.0);
    assert_eq!(chart.x_range(), Some((-10.0, 10.0)));
  }

  #[test]
  fn mismatched_series_is_an_error() {
    let chart = ChartSpec::new("bad")
      .line("ok", vec![0.0, 1.0], vec![0.0, 1.0])
      .line("short", vec![1.0, 2.0], vec![5.0]);
    let err = chart.validate().unwrap_err();
    assert!(matches!(err, LabError::InvalidDomainInput { field: "series", .. }));
    assert!(err.to_string().contains("short"));
    assert!(chart.plot().is_err());

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.html");
    assert!(chart.write_html(&path).is_err());
    assert!(!path.exists());
  }

  #[test]
  fn later_charts_get_numbered_files() {
    let path = Path::new("out/basis.html");
    assert_eq!(numbered_path(path, 0), PathBuf::from("out/basis.html"));
    assert_eq!(numbered_path(path, 1), PathBuf::from("out/basis-2.html"));
    assert_eq!(numbered_path(Path::new("chart"), 2), PathBuf::from("chart-3"));
  }

  #[test]
  fn html_is_written() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("chart.html");
    ChartSpec::new("Payoff")
      .line("Long", vec![0.0, 1.0], vec![0.0, 1.0])
      .write_html(&path)
      .unwrap();
    let html = std::fs::read_to_string(&path).unwrap();
    assert!(html.contains("Payoff"));
  }
}
