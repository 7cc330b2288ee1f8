// ============================================================
// Layer 6 — Chart Renderer
// ============================================================
// Draws the five report charts as SVG files with plotters:
//
//   loss.svg                 — train vs validation MSE per epoch
//   mae.svg                  — train vs validation MAE per epoch
//   predicted_vs_actual.svg  — test scatter plus the y = x line
//   residuals.svg            — actual − predicted vs predicted
//   sales_distribution.svg   — raw vs training-split Sales, 50 bins
//
// All numbers come precomputed in ChartData; this file only draws.
//
// Reference: plotters documentation (ChartBuilder, SVGBackend)

use anyhow::{Context, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::{Path, PathBuf};

use crate::ml::evaluator::{ChartData, CurvePair, Histogram};

pub const LOSS_CHART: &str          = "loss.svg";
pub const MAE_CHART: &str           = "mae.svg";
pub const SCATTER_CHART: &str       = "predicted_vs_actual.svg";
pub const RESIDUAL_CHART: &str      = "residuals.svg";
pub const DISTRIBUTION_CHART: &str  = "sales_distribution.svg";

const CHART_SIZE: (u32, u32) = (800, 600);
const WIDE_SIZE: (u32, u32)  = (1200, 500);
const FONT: &str = "sans-serif";

type Area<'a> = DrawingArea<SVGBackend<'a>, Shift>;

/// Writes every chart into one directory.
pub struct ChartRenderer {
    dir: PathBuf,
}

impl ChartRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Render all charts and return the written paths.
    pub fn render_all(&self, charts: &ChartData) -> Result<Vec<PathBuf>> {
        Ok(vec![
            self.render(LOSS_CHART, |p| draw_curves(p, "Training and validation loss", "MSE", &charts.loss))?,
            self.render(MAE_CHART, |p| draw_curves(p, "Training and validation MAE", "MAE", &charts.mae))?,
            self.render(SCATTER_CHART, |p| draw_scatter(p, charts))?,
            self.render(RESIDUAL_CHART, |p| draw_residuals(p, charts))?,
            self.render(DISTRIBUTION_CHART, |p| {
                draw_distributions(p, &charts.sales_raw, &charts.sales_train)
            })?,
        ])
    }

    fn render(&self, name: &str, draw: impl FnOnce(&Path) -> Result<()>) -> Result<PathBuf> {
        let path = self.dir.join(name);
        draw(&path).with_context(|| format!("Cannot draw chart '{}'", path.display()))?;
        tracing::debug!("Wrote chart '{}'", path.display());
        Ok(path)
    }
}

fn draw_curves(path: &Path, title: &str, y_desc: &str, curves: &CurvePair) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let last_epoch = (curves.train.len().max(curves.validation.len()) as f64).max(2.0);
    let (lo, hi) = padded_range(curves.train.iter().chain(&curves.validation).copied());

    let mut chart = ChartBuilder::on(&root)
        .caption(title, (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(1f64..last_epoch, lo..hi)?;
    chart.configure_mesh().x_desc("Epoch").y_desc(y_desc).draw()?;

    chart
        .draw_series(LineSeries::new(epoch_points(&curves.train), &BLUE))?
        .label("train")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &BLUE));
    chart
        .draw_series(LineSeries::new(epoch_points(&curves.validation), &RED))?
        .label("validation")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    Ok(())
}

fn draw_scatter(path: &Path, charts: &ChartData) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (lo, hi) = padded_range(charts.scatter.iter().flat_map(|&(a, p)| [a, p]));
    let mut chart = ChartBuilder::on(&root)
        .caption("Predicted vs actual sales", (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(lo..hi, lo..hi)?;
    chart.configure_mesh().x_desc("Actual").y_desc("Predicted").draw()?;

    chart.draw_series(
        charts
            .scatter
            .iter()
            .map(|&(actual, predicted)| Circle::new((actual, predicted), 2, BLUE.mix(0.5).filled())),
    )?;

    let (from, to) = charts.identity_line;
    chart.draw_series(LineSeries::new(vec![(from, from), (to, to)], &RED))?;

    root.present()?;
    Ok(())
}

fn draw_residuals(path: &Path, charts: &ChartData) -> Result<()> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_lo, x_hi) = padded_range(charts.residuals.iter().map(|&(p, _)| p));
    let (y_lo, y_hi) = padded_range(charts.residuals.iter().map(|&(_, r)| r).chain([0.0]));

    let mut chart = ChartBuilder::on(&root)
        .caption("Residuals", (FONT, 24))
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart.configure_mesh().x_desc("Predicted").y_desc("Actual - predicted").draw()?;

    chart.draw_series(
        charts
            .residuals
            .iter()
            .map(|&(predicted, residual)| Circle::new((predicted, residual), 2, GREEN.mix(0.6).filled())),
    )?;
    chart.draw_series(LineSeries::new(vec![(x_lo, 0.0), (x_hi, 0.0)], &BLACK))?;

    root.present()?;
    Ok(())
}

fn draw_distributions(path: &Path, raw: &Histogram, train: &Histogram) -> Result<()> {
    let root = SVGBackend::new(path, WIDE_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (left, right) = root.split_horizontally((WIDE_SIZE.0 / 2) as i32);
    draw_histogram(&left, "Sales (train CSV)", raw, &BLUE)?;
    draw_histogram(&right, "Sales (training split)", train, &MAGENTA)?;

    root.present()?;
    Ok(())
}

fn draw_histogram(area: &Area<'_>, title: &str, hist: &Histogram, color: &RGBColor) -> Result<()> {
    let (x_lo, x_hi) = match (hist.bins.first(), hist.bins.last()) {
        (Some(first), Some(last)) => (first.lower, last.upper),
        _ => (0.0, 1.0),
    };
    let y_hi = (hist.max_count() as f64 * 1.1).max(1.0);

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, 20))
        .margin(10)
        .x_label_area_size(35)
        .y_label_area_size(50)
        .build_cartesian_2d(x_lo..x_hi, 0f64..y_hi)?;
    chart.configure_mesh().x_desc("Sales").y_desc("Count").draw()?;

    chart.draw_series(hist.bins.iter().map(|b| {
        Rectangle::new([(b.lower, 0.0), (b.upper, b.count as f64)], color.mix(0.6).filled())
    }))?;
    Ok(())
}

fn epoch_points(values: &[f64]) -> Vec<(f64, f64)> {
    values
        .iter()
        .enumerate()
        .map(|(i, &v)| ((i + 1) as f64, v))
        .collect()
}

/// Axis range over the finite values with 5% padding on each side.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));

    if lo > hi {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_padded_range() {
        assert_eq!(padded_range([0.0, 10.0].into_iter()), (-0.5, 10.5));
        assert_eq!(padded_range([3.0, 3.0].into_iter()), (2.5, 3.5));
        assert_eq!(padded_range(std::iter::empty()), (0.0, 1.0));

        let (lo, hi) = padded_range([f64::NAN, 1.0, 2.0].into_iter());
        assert!((lo - 0.95).abs() < 1e-12 && (hi - 2.05).abs() < 1e-12);
    }

    #[test]
    fn test_epoch_points_start_at_one() {
        assert_eq!(epoch_points(&[0.5, 0.25]), vec![(1.0, 0.5), (2.0, 0.25)]);
    }
}
