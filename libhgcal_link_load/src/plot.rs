use std::error::Error;
use std::path::Path;

use plotters::prelude::*;

use super::error::HistogramError;
use super::histogram::{Histogram1D, Histogram2D};

const PLOT_SIZE: (u32, u32) = (1200, 900);
const COLORBAR_WIDTH: u32 = 140;
const COLORBAR_STEPS: usize = 100;
const Y_TITLE_1D: &str = "Number of Entries";
const FONT: (&str, u32) = ("sans-serif", 20);

/// Color of a 2D cell, from blue (few entries) to red (most entries)
fn heat_color(frac: f64) -> HSLColor {
    HSLColor(0.66 * (1.0 - frac.clamp(0.0, 1.0)), 0.9, 0.5)
}

fn render_error(path: &Path, e: Box<dyn Error>) -> HistogramError {
    HistogramError::Render {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn draw_histogram(hist: &Histogram1D, path: &Path, x_title: &str) -> Result<(), Box<dyn Error>> {
    let y_max = hist.max_count().max(1) as f64;

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(hist.axis.min..hist.axis.max(), 0.0..(y_max * 1.1))?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_title)
        .y_desc(Y_TITLE_1D)
        .axis_desc_style(FONT)
        .draw()?;

    chart.draw_series(
        hist.bins()
            .filter(|(_, _, count)| *count > 0)
            .map(|(low, high, count)| {
                Rectangle::new([(low, 0.0), (high, count as f64)], BLUE.mix(0.6).filled())
            }),
    )?;

    root.present()?;
    Ok(())
}

fn draw_histogram_2d(
    hist: &Histogram2D,
    path: &Path,
    x_title: &str,
    y_title: &str,
) -> Result<(), Box<dyn Error>> {
    let max_count = hist.max_count().max(1) as f64;

    let root = BitMapBackend::new(path, PLOT_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let (main_area, bar_area) = root.split_horizontally((PLOT_SIZE.0 - COLORBAR_WIDTH) as i32);

    let mut chart = ChartBuilder::on(&main_area)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            hist.x_axis.min..hist.x_axis.max(),
            hist.y_axis.min..hist.y_axis.max(),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_desc(x_title)
        .y_desc(y_title)
        .axis_desc_style(FONT)
        .draw()?;

    let x_width = hist.x_axis.bin_width;
    let y_width = hist.y_axis.bin_width;
    chart.draw_series((0..hist.x_axis.n_bins).flat_map(move |bx| {
        (0..hist.y_axis.n_bins).filter_map(move |by| {
            let count = hist.count(bx, by);
            if count == 0 {
                return None;
            }
            let x0 = hist.x_axis.low_edge(bx);
            let y0 = hist.y_axis.low_edge(by);
            Some(Rectangle::new(
                [(x0, y0), (x0 + x_width, y0 + y_width)],
                heat_color(count as f64 / max_count).filled(),
            ))
        })
    }))?;

    // Color bar
    let mut bar = ChartBuilder::on(&bar_area)
        .margin_top(20)
        .margin_bottom(80)
        .margin_right(20)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..1.0, 0.0..max_count)?;
    bar.configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .disable_x_axis()
        .draw()?;
    let step = max_count / COLORBAR_STEPS as f64;
    bar.draw_series((0..COLORBAR_STEPS).map(|idx| {
        let low = idx as f64 * step;
        Rectangle::new(
            [(0.0, low), (1.0, low + step)],
            heat_color(idx as f64 / (COLORBAR_STEPS - 1) as f64).filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}

/// Bin the values with a given bin width and write the histogram to a PNG at path.
///
/// The y axis is always the number of entries; the x axis title is given by the caller.
pub fn plot_histogram(
    values: &[f64],
    path: &Path,
    bin_width: f64,
    x_title: &str,
) -> Result<(), HistogramError> {
    let hist = Histogram1D::new(values, bin_width)?;
    draw_histogram(&hist, path, x_title).map_err(|e| render_error(path, e))?;
    log::info!(
        "Wrote histogram of {} entries ({} bins) to {}",
        hist.entries(),
        hist.axis.n_bins,
        path.to_string_lossy()
    );
    Ok(())
}

/// Bin pairs of values with independent bin widths and write the 2D histogram to a PNG at path.
pub fn plot_histogram_2d(
    xs: &[f64],
    ys: &[f64],
    path: &Path,
    bin_widths: (f64, f64),
    x_title: &str,
    y_title: &str,
) -> Result<(), HistogramError> {
    let hist = Histogram2D::new(xs, ys, bin_widths.0, bin_widths.1)?;
    draw_histogram_2d(&hist, path, x_title, y_title).map_err(|e| render_error(path, e))?;
    log::info!(
        "Wrote 2D histogram of {} entries ({}x{} bins) to {}",
        hist.entries(),
        hist.x_axis.n_bins,
        hist.y_axis.n_bins,
        path.to_string_lossy()
    );
    Ok(())
}
