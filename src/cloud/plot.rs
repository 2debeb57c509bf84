//! Rendering of the (B, M) phase-space cloud
//!
//! Draws, on fixed [-1, 1] x [-1, 1] axes:
//! - Filled KDE contours of the jittered points
//! - The jittered points themselves
//! - The centroid of the unjittered values
//! - The origin, where an ideal random source sits
//! - Region annotations and a legend
//!
//! Uses the bitmap backend; the image size is in pixels and all font sizes
//! are derived from it as if the figure were 9 inches tall.

use crate::cloud::kde::{Kde, DEFAULT_CUT};
use crate::cloud::{Centroid, ResultPopulation};
use crate::config::PlotConfig;
use crate::error::{Error, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontStyle;
use std::path::Path;
use tracing::debug;

const AXIS_RANGE: (f64, f64) = (-1.0, 1.0);
const FIGURE_HEIGHT_INCHES: f64 = 9.0;
const POINTS_PER_INCH: f64 = 72.0;
const KDE_ALPHA: f64 = 0.3;
/// Fewer jittered points than this get no density contours
const MIN_CONTOUR_POINTS: usize = 2;

const ROYAL_BLUE: RGBColor = RGBColor(65, 105, 225);
const DARK_RED: RGBColor = RGBColor(139, 0, 0);
const DARK_BLUE: RGBColor = RGBColor(0, 0, 139);
const LIGHT_GREY: RGBColor = RGBColor(230, 230, 230);
const BLUES_LOW: RGBColor = RGBColor(198, 219, 239);
const BLUES_HIGH: RGBColor = RGBColor(8, 48, 107);

type CloudChart<'a, 'b> =
    ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn plot_err(e: impl std::fmt::Display) -> Error {
    Error::Plot(e.to_string())
}

/// Pixel size of a typographic point at the configured image height
fn font_px(points: f64, height: u32) -> f64 {
    points * height as f64 / FIGURE_HEIGHT_INCHES / POINTS_PER_INCH
}

/// Colour for a contour band, `t` in [0, 1] from outermost to innermost
pub fn blues(t: f64) -> RGBColor {
    let t = t.clamp(0.0, 1.0);
    let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
    RGBColor(
        lerp(BLUES_LOW.0, BLUES_HIGH.0),
        lerp(BLUES_LOW.1, BLUES_HIGH.1),
        lerp(BLUES_LOW.2, BLUES_HIGH.2),
    )
}

/// Legend text for the centroid
pub fn centroid_label(centroid: &Centroid) -> String {
    format!(
        "Centroid (mean B: {:.5}, mean M: {:.5})",
        centroid.burstiness, centroid.memory
    )
}

/// Render the cloud to `output`, replacing any existing file
///
/// Returns the centroid of the unjittered values.
pub fn render_cloud(
    population: &ResultPopulation,
    settings: &PlotConfig,
    output: &Path,
) -> Result<Centroid> {
    let centroid = population
        .centroid()
        .ok_or_else(|| Error::InvalidInput("Cannot plot an empty population".to_string()))?;
    let points = population.jittered(settings.jitter_std, settings.seed)?;

    let (width, height) = (settings.width, settings.height);
    let px = |pt: f64| font_px(pt, height);

    let root = BitMapBackend::new(output, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Statistical validation of the QRNG series (Goh & Barabási phase space)",
            ("sans-serif", px(16.0), FontStyle::Bold),
        )
        .margin(px(12.0) as i32)
        .x_label_area_size(px(40.0) as i32)
        .y_label_area_size(px(48.0) as i32)
        .build_cartesian_2d(AXIS_RANGE.0..AXIS_RANGE.1, AXIS_RANGE.0..AXIS_RANGE.1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Burstiness (B)")
        .y_desc("Memory (M)")
        .label_style(("sans-serif", px(10.0)))
        .axis_desc_style(("sans-serif", px(12.0)))
        .draw()
        .map_err(plot_err)?;

    draw_density(&mut chart, &points, settings)?;

    let line = BLACK.stroke_width(px(0.8).max(1.0) as u32);
    chart
        .draw_series([
            PathElement::new(vec![(AXIS_RANGE.0, 0.0), (AXIS_RANGE.1, 0.0)], line),
            PathElement::new(vec![(0.0, AXIS_RANGE.0), (0.0, AXIS_RANGE.1)], line),
        ])
        .map_err(plot_err)?;

    let dot = px(2.5).max(1.0) as i32;
    let sample_style = ROYAL_BLUE.mix(0.5).filled();
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, dot, sample_style)))
        .map_err(plot_err)?
        .label(format!("QRNG samples (N={})", population.len()))
        .legend(move |(x, y)| Circle::new((x, y), dot, sample_style));

    let marker = px(7.0).max(2.0) as i32;
    let rim = px(2.0).max(1.0) as i32;
    let center = (centroid.burstiness, centroid.memory);
    chart
        .draw_series(std::iter::once(Circle::new(center, marker + rim, WHITE.filled())))
        .map_err(plot_err)?;
    chart
        .draw_series(std::iter::once(Circle::new(center, marker, DARK_RED.filled())))
        .map_err(plot_err)?
        .label(centroid_label(&centroid))
        .legend(move |(x, y)| Circle::new((x, y), marker, DARK_RED.filled()));

    let cross = BLACK.stroke_width(rim as u32);
    chart
        .draw_series(std::iter::once(Cross::new((0.0, 0.0), marker, cross)))
        .map_err(plot_err)?
        .label("Perfect randomness (0, 0)")
        .legend(move |(x, y)| Cross::new((x, y), marker, cross));

    let note = px(9.0);
    draw_annotation(
        &mut chart,
        (-0.95, -0.9),
        &["PERIODIC / REGULAR", "(typical for p = 0.5)"],
        DARK_BLUE,
        HPos::Left,
        note,
    )?;
    draw_annotation(
        &mut chart,
        (0.95, 0.9),
        &["BURSTINESS / CLUSTERING", "(bits bunch together)"],
        DARK_RED,
        HPos::Right,
        note,
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(("sans-serif", px(10.0)))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    debug!(path = %output.display(), width, height, "cloud rendered");

    Ok(centroid)
}

/// Filled iso-proportion contours of the jittered points
fn draw_density(
    chart: &mut CloudChart<'_, '_>,
    points: &[(f64, f64)],
    settings: &PlotConfig,
) -> Result<()> {
    let Some(kde) = contour_kde(points, settings.bw_adjust) else {
        return Ok(());
    };

    let (x_range, y_range) = kde.support(DEFAULT_CUT, AXIS_RANGE);
    let grid = kde.evaluate(x_range, y_range, settings.kde_grid);
    let cells = grid.bands(settings.kde_levels, settings.kde_thresh);
    let top_band = settings.kde_levels.saturating_sub(2).max(1) as f64;

    debug!(cells = cells.len(), bandwidth = ?kde.bandwidth(), "density bands");

    chart
        .draw_series(cells.iter().map(|cell| {
            let color = blues(cell.band as f64 / top_band).mix(KDE_ALPHA);
            Rectangle::new([cell.lower_left, cell.upper_right], color.filled())
        }))
        .map_err(plot_err)?;

    Ok(())
}

fn contour_kde(points: &[(f64, f64)], bw_adjust: f64) -> Option<Kde> {
    if points.len() < MIN_CONTOUR_POINTS {
        return None;
    }
    Kde::fit(points, bw_adjust)
}

/// Boxed multi-line note whose bottom edge sits at `anchor`
fn draw_annotation(
    chart: &mut CloudChart<'_, '_>,
    anchor: (f64, f64),
    lines: &[&str],
    color: RGBColor,
    align: HPos,
    font_size: f64,
) -> Result<()> {
    let style = ("sans-serif", font_size).into_font().color(&color);

    let area = chart.plotting_area();
    let (pw, ph) = area.dim_in_pixel();
    let span = AXIS_RANGE.1 - AXIS_RANGE.0;
    let per_px = (span / pw.max(1) as f64, span / ph.max(1) as f64);

    let mut text_w = 0u32;
    let mut line_h = 0u32;
    for line in lines {
        let (w, h) = area.estimate_text_size(line, &style).map_err(plot_err)?;
        text_w = text_w.max(w);
        line_h = line_h.max(h);
    }

    let pad = font_size * 0.5;
    let line_step = line_h as f64 * 1.2 * per_px.1;
    let box_w = (text_w as f64 + 2.0 * pad) * per_px.0;
    let box_h = line_step * lines.len() as f64 + 2.0 * pad * per_px.1;

    let (x0, x1) = match align {
        HPos::Right => (anchor.0 - box_w, anchor.0),
        _ => (anchor.0, anchor.0 + box_w),
    };
    let (y0, y1) = (anchor.1, anchor.1 + box_h);
    let text_x = match align {
        HPos::Right => x1 - pad * per_px.0,
        _ => x0 + pad * per_px.0,
    };

    chart
        .draw_series([
            Rectangle::new([(x0, y0), (x1, y1)], WHITE.mix(0.8).filled()),
            Rectangle::new([(x0, y0), (x1, y1)], LIGHT_GREY.stroke_width(1)),
        ])
        .map_err(plot_err)?;

    let anchored = style.pos(Pos::new(align, VPos::Top));
    chart
        .draw_series(lines.iter().enumerate().map(|(i, line)| {
            let y = y1 - pad * per_px.1 - i as f64 * line_step;
            Text::new(line.to_string(), (text_x, y), anchored.clone())
        }))
        .map_err(plot_err)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::FileMetrics;
    use crate::metrics::MetricPair;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_font_px_at_300_dpi() {
        assert_relative_eq!(font_px(72.0, 2700), 300.0);
        assert_relative_eq!(font_px(9.0, 900), 12.5);
    }

    #[test]
    fn test_blues_ramp() {
        assert_eq!(blues(0.0), BLUES_LOW);
        assert_eq!(blues(1.0), BLUES_HIGH);
        assert_eq!(blues(7.0), BLUES_HIGH);

        let mid = blues(0.5);
        assert!(mid.2 < BLUES_LOW.2 && mid.2 > BLUES_HIGH.2);
    }

    #[test]
    fn test_centroid_label_has_five_decimals() {
        let label = centroid_label(&Centroid {
            burstiness: -0.171234,
            memory: 0.000049,
        });
        assert_eq!(label, "Centroid (mean B: -0.17123, mean M: 0.00005)");
    }

    #[test]
    fn test_no_contours_below_two_points() {
        assert!(contour_kde(&[], 1.5).is_none());
        assert!(contour_kde(&[(0.1, -0.2)], 1.5).is_none());
        assert!(contour_kde(&[(0.1, -0.2), (0.15, -0.1)], 1.5).is_some());
    }

    #[test]
    fn test_render_empty_population_fails() {
        let dir = TempDir::new().unwrap();
        let result = render_cloud(
            &ResultPopulation::new(),
            &PlotConfig::default(),
            &dir.path().join("cloud.png"),
        );
        assert!(matches!(result, Err(Error::InvalidInput(_))));
    }

    #[test]
    #[ignore = "Requires system fonts for text rendering"]
    fn test_render_writes_png() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("cloud.png");

        let mut population = ResultPopulation::new();
        for i in 0..40 {
            population.push(FileMetrics {
                path: format!("qrng_{:04}", i),
                bits: 32768,
                events: 16384,
                metrics: MetricPair::new(-0.17 + i as f64 * 1e-3, 0.01 - i as f64 * 5e-4),
            });
        }

        let settings = PlotConfig {
            width: 600,
            height: 450,
            kde_grid: 40,
            seed: Some(1),
            ..PlotConfig::default()
        };

        let centroid = render_cloud(&population, &settings, &output).unwrap();
        assert_eq!(Some(centroid), population.centroid());

        let bytes = std::fs::read(&output).unwrap();
        assert_eq!(&bytes[..4], b"\x89PNG");
    }
}
