//! Chart Plotter Module
//! Renders a static scatter plot of one variable against another, with an
//! optional fitted regression line.

use crate::stats::LinearFit;
use plotters::prelude::*;
use std::path::Path;
use thiserror::Error;

const CHART_SIZE: (u32, u32) = (1400, 1000);
const POINT_COLOR: RGBColor = RGBColor(52, 152, 219); // Blue
const FIT_COLOR: RGBColor = RGBColor(231, 76, 60); // Red

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("No data points to plot")]
    Empty,
    #[error("Failed to render chart: {0}")]
    Render(String),
}

/// Creates static scatter charts with plotters.
pub struct ScatterPlotter;

impl ScatterPlotter {
    /// Render `points` to a PNG at `output`. When `fit` is given, the
    /// regression line is drawn across the full x range.
    pub fn render_scatter(
        points: &[(f64, f64)],
        x_label: &str,
        y_label: &str,
        fit: Option<&LinearFit>,
        output: &Path,
    ) -> Result<(), ChartError> {
        if points.is_empty() {
            return Err(ChartError::Empty);
        }

        let (x_min, x_max) = Self::padded_range(points.iter().map(|p| p.0));
        let (y_min, y_max) = Self::padded_range(points.iter().map(|p| p.1));

        let root = BitMapBackend::new(output, CHART_SIZE).into_drawing_area();
        root.fill(&WHITE)
            .map_err(|e| ChartError::Render(e.to_string()))?;

        let mut chart = ChartBuilder::on(&root)
            .caption(format!("{} vs {}", y_label, x_label), ("sans-serif", 30))
            .margin(10)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .configure_mesh()
            .x_desc(x_label)
            .y_desc(y_label)
            .draw()
            .map_err(|e| ChartError::Render(e.to_string()))?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&(x, y)| Circle::new((x, y), 5, POINT_COLOR.filled())),
            )
            .map_err(|e| ChartError::Render(e.to_string()))?;

        if let Some(fit) = fit {
            chart
                .draw_series(LineSeries::new(
                    vec![(x_min, fit.predict(x_min)), (x_max, fit.predict(x_max))],
                    FIT_COLOR.stroke_width(2),
                ))
                .map_err(|e| ChartError::Render(e.to_string()))?
                .label(format!(
                    "fit: y = {:.3}x + {:.3} (r2 = {:.3})",
                    fit.slope, fit.intercept, fit.r_squared
                ))
                .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOR));

            chart
                .configure_series_labels()
                .border_style(&BLACK)
                .draw()
                .map_err(|e| ChartError::Render(e.to_string()))?;
        }

        root.present().map_err(|e| ChartError::Render(e.to_string()))
    }

    /// Data extent padded by 5% on each side; a degenerate extent gets a
    /// unit pad so the axis still has width.
    fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            if !v.is_nan() {
                min = min.min(v);
                max = max.max(v);
            }
        }
        if min.is_infinite() {
            return (0.0, 1.0);
        }

        let pad = if max > min { (max - min) * 0.05 } else { 1.0 };
        (min - pad, max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn padded_range_extends_extent() {
        let (lo, hi) = ScatterPlotter::padded_range([10.0, 20.0].into_iter());
        assert!((lo - 9.5).abs() < 1e-9);
        assert!((hi - 20.5).abs() < 1e-9);
    }

    #[test]
    fn padded_range_handles_constant_values() {
        let (lo, hi) = ScatterPlotter::padded_range([7.0, 7.0].into_iter());
        assert!(lo < 7.0 && hi > 7.0);
    }

    #[test]
    fn padded_range_ignores_nan() {
        let (lo, hi) = ScatterPlotter::padded_range([f64::NAN, 1.0, 2.0].into_iter());
        assert!(lo < 1.0 && hi > 2.0);
    }

    #[test]
    fn empty_points_are_an_error() {
        let result = ScatterPlotter::render_scatter(
            &[],
            "x",
            "y",
            None,
            Path::new("/tmp/never-written.png"),
        );
        assert!(matches!(result, Err(ChartError::Empty)));
    }
}
