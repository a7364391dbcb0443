//! Chart rendering capability

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, Utc};
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use tracing::{debug, warn};

use super::document::Region;
use crate::models::{ChartState, Dataset, ValueRange};
use crate::utils::DashboardError;

/// Draws a chart state onto a canvas region
pub trait ChartRenderer {
    fn render(&mut self, canvas: Region, state: &ChartState) -> Result<(), DashboardError>;

    /// Free whatever the previous render of `canvas` holds
    fn release(&mut self, _canvas: Region) {}
}

/// Renders charts as PNG files named after the canvas id
pub struct PlottersRenderer {
    output_dir: PathBuf,
    width: u32,
    height: u32,
}

impl PlottersRenderer {
    pub fn new(output_dir: PathBuf, width: u32, height: u32) -> Self {
        Self { output_dir, width, height }
    }

    pub fn path_for(&self, canvas: Region) -> PathBuf {
        self.output_dir.join(format!("{}.png", canvas.id()))
    }
}

impl ChartRenderer for PlottersRenderer {
    fn render(&mut self, canvas: Region, state: &ChartState) -> Result<(), DashboardError> {
        std::fs::create_dir_all(&self.output_dir)
            .map_err(|e| DashboardError::Render(format!("Failed to create {}: {}", self.output_dir.display(), e)))?;

        let path = self.path_for(canvas);
        draw_chart(&path, (self.width, self.height), state)?;
        debug!("Rendered #{} to {}", canvas.id(), path.display());
        Ok(())
    }

    fn release(&mut self, canvas: Region) {
        let path = self.path_for(canvas);
        if path.exists() {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!("Failed to release {}: {}", path.display(), e);
            }
        }
    }
}

fn at_midnight(date: NaiveDate) -> Option<DateTime<Utc>> {
    date.and_hms_opt(0, 0, 0)
        .map(|naive| DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
}

/// Split a sparse dataset into runs of consecutive present values
fn segments(dataset: &Dataset) -> Vec<Vec<(DateTime<Utc>, f64)>> {
    let mut runs = Vec::new();
    let mut current = Vec::new();

    for (date, value) in &dataset.points {
        match (value, at_midnight(*date)) {
            (Some(v), Some(ts)) => current.push((ts, *v)),
            _ => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// y bounds when the state does not fix them: data range plus 10%
fn fallback_range(state: &ChartState) -> ValueRange {
    let values: Vec<f64> = state.datasets.iter().flat_map(|d| d.values()).collect();
    if values.is_empty() {
        return ValueRange { min: 0.0, max: 1.0 };
    }

    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let padding = (max - min).max(1e-8) * 0.1;
    ValueRange {
        min: min - padding,
        max: max + padding,
    }
}

fn draw_chart(path: &Path, size: (u32, u32), state: &ChartState) -> Result<(), DashboardError> {
    let backend = BitMapBackend::new(path, size);
    let root = backend.into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| DashboardError::Render(format!("Failed to fill canvas: {}", e)))?;

    let (Some(first), Some(last)) = (state.labels.first(), state.labels.last()) else {
        // nothing loaded yet: leave a blank canvas
        return root
            .present()
            .map_err(|e| DashboardError::Render(format!("Failed to render chart: {}", e)));
    };

    let x_min = at_midnight(*first)
        .ok_or_else(|| DashboardError::Render(format!("Unplottable date {}", first)))?;
    let mut x_max = at_midnight(*last)
        .ok_or_else(|| DashboardError::Render(format!("Unplottable date {}", last)))?;
    if x_max <= x_min {
        x_max = x_min + Duration::days(1);
    }

    let range = state.y_range.unwrap_or_else(|| fallback_range(state));
    let (y_min, y_max) = if range.max > range.min {
        (range.min, range.max)
    } else {
        (range.min - 1.0, range.max + 1.0)
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(&state.title, ("sans-serif", 30.0).into_font())
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)
        .map_err(|e| DashboardError::Render(format!("Failed to build chart: {}", e)))?;

    chart
        .configure_mesh()
        .x_desc(&state.x_desc)
        .y_desc(&state.y_desc)
        .x_labels(10)
        .x_label_formatter(&|ts: &DateTime<Utc>| ts.format("%Y-%m-%d").to_string())
        .draw()
        .map_err(|e| DashboardError::Render(format!("Failed to draw mesh: {}", e)))?;

    let mut labelled = false;
    for dataset in &state.datasets {
        let (r, g, b) = (dataset.style.color.0, dataset.style.color.1, dataset.style.color.2);
        let style = RGBColor(r, g, b).stroke_width(dataset.style.width);

        for (i, run) in segments(dataset).into_iter().enumerate() {
            let anno = if dataset.style.dashed {
                chart.draw_series(DashedLineSeries::new(run, 6, 4, style))
            } else {
                chart.draw_series(LineSeries::new(run, style))
            }
            .map_err(|e| DashboardError::Render(format!("Failed to draw line: {}", e)))?;

            if i == 0 && !dataset.label.is_empty() {
                anno.label(dataset.label.as_str())
                    .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], style));
                labelled = true;
            }
        }
    }

    if labelled {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()
            .map_err(|e| DashboardError::Render(format!("Failed to draw legend: {}", e)))?;
    }

    root.present()
        .map_err(|e| DashboardError::Render(format!("Failed to render chart: {}", e)))?;

    Ok(())
}

/// Renderer that remembers what it was asked to draw
#[cfg(test)]
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub rendered: Vec<(Region, ChartState)>,
    pub released: Vec<Region>,
    pub fail: bool,
}

#[cfg(test)]
impl ChartRenderer for RecordingRenderer {
    fn render(&mut self, canvas: Region, state: &ChartState) -> Result<(), DashboardError> {
        if self.fail {
            return Err(DashboardError::Render("recording renderer set to fail".to_string()));
        }
        self.rendered.push((canvas, state.clone()));
        Ok(())
    }

    fn release(&mut self, canvas: Region) {
        self.released.push(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LineStyle, Rgb};

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn test_segments_break_on_missing_values() {
        let dataset = Dataset {
            label: "x".to_string(),
            points: vec![(d(1), Some(1.0)), (d(2), Some(2.0)), (d(3), None), (d(4), Some(4.0))],
            style: LineStyle::solid(Rgb::BLACK, 1),
        };
        let runs = segments(&dataset);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].len(), 2);
        assert_eq!(runs[1][0].1, 4.0);
    }

    #[test]
    fn test_fallback_range_pads_data() {
        let mut state = ChartState::empty(LineStyle::solid(Rgb::BLACK, 1));
        assert_eq!(fallback_range(&state), ValueRange { min: 0.0, max: 1.0 });

        state.datasets[0].points = vec![(d(1), Some(10.0)), (d(2), Some(20.0))];
        let range = fallback_range(&state);
        assert!((range.min - 9.0).abs() < 1e-9);
        assert!((range.max - 21.0).abs() < 1e-9);
    }
}
