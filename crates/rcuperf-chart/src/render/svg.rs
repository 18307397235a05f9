// SPDX-License-Identifier: MIT OR Apache-2.0
//! SVG output through plotters.

use super::{Chart, ChartRenderer, LegendLocation, RenderOutput, Scale, X_LABEL};
use crate::style::{MarkerGeometry, SeriesColor};
use plotters::coord::Shift;
use plotters::coord::ranged1d::{AsRangedCoord, ValueFormatter};
use plotters::prelude::*;
use rcuperf_core::{Error, Result};
use std::fmt;
use std::fs;
use std::ops::Range;
use std::path::PathBuf;
use tracing::info;

/// Default canvas size in pixels
const DEFAULT_SIZE: (u32, u32) = (1024, 768);

fn render_err<E: fmt::Display>(e: E) -> Error {
    Error::render(e.to_string())
}

const fn rgb(color: SeriesColor) -> RGBColor {
    let (r, g, b) = color.rgb();
    RGBColor(r, g, b)
}

const fn label_position(location: LegendLocation) -> SeriesLabelPosition {
    match location {
        LegendLocation::UpperRight => SeriesLabelPosition::UpperRight,
        LegendLocation::UpperLeft => SeriesLabelPosition::UpperLeft,
        LegendLocation::LowerLeft => SeriesLabelPosition::LowerLeft,
        LegendLocation::LowerRight => SeriesLabelPosition::LowerRight,
        LegendLocation::CenterRight => SeriesLabelPosition::MiddleRight,
        LegendLocation::CenterLeft => SeriesLabelPosition::MiddleLeft,
        LegendLocation::UpperCenter => SeriesLabelPosition::UpperMiddle,
        LegendLocation::LowerCenter => SeriesLabelPosition::LowerMiddle,
        LegendLocation::Center => SeriesLabelPosition::MiddleMiddle,
    }
}

/// Writes each chart to `<out_dir>/<artifact name>`
#[derive(Debug, Clone)]
pub struct SvgRenderer {
    out_dir: PathBuf,
    size: (u32, u32),
}

impl SvgRenderer {
    /// Renderer writing into `out_dir` (created on first use)
    #[must_use]
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
            size: DEFAULT_SIZE,
        }
    }

    /// Override the canvas size
    #[must_use]
    pub const fn with_size(mut self, width: u32, height: u32) -> Self {
        self.size = (width, height);
        self
    }

    /// Render `chart` into an SVG document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the chart has no points, if a log chart
    /// has a non-positive value, or if plotters fails.
    pub fn render_to_string(&self, chart: &Chart) -> Result<String> {
        let bounds = chart
            .bounds()
            .ok_or_else(|| Error::render(format!("{} has no points", chart.artifact_name())))?;
        let x_range = bounds.x_min.saturating_sub(1)..bounds.x_max.saturating_add(1);

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.size).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            match chart.options().scale {
                Scale::Linear => {
                    let span = bounds.y_max - bounds.y_min;
                    let pad = if span > 0.0 {
                        span * 0.05
                    } else {
                        bounds.y_max.abs().max(1.0) * 0.1
                    };
                    draw(&root, chart, x_range, (bounds.y_min - pad)..(bounds.y_max + pad))?;
                }
                Scale::Log => {
                    if bounds.y_min <= 0.0 {
                        return Err(Error::render(format!(
                            "log scale needs positive values, {} has {}",
                            chart.artifact_name(),
                            bounds.y_min
                        )));
                    }
                    let range = (bounds.y_min / 1.5)..(bounds.y_max * 1.5);
                    draw(&root, chart, x_range, range.log_scale())?;
                }
            }
            root.present().map_err(render_err)?;
        }
        Ok(svg)
    }
}

impl ChartRenderer for SvgRenderer {
    fn render(&mut self, chart: &Chart) -> Result<RenderOutput> {
        let svg = self.render_to_string(chart)?;
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(chart.artifact_name());
        fs::write(&path, svg)?;
        info!(path = %path.display(), "wrote chart");
        Ok(RenderOutput::File(path))
    }
}

fn draw<DB, Y>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    x_range: Range<u32>,
    y_range: Y,
) -> Result<()>
where
    DB: DrawingBackend,
    Y: AsRangedCoord<Value = f64>,
    Y::CoordDescType: ValueFormatter<f64>,
{
    let mut ctx = ChartBuilder::on(root)
        .caption(chart.title(), ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, y_range)
        .map_err(render_err)?;

    ctx.configure_mesh()
        .x_desc(X_LABEL)
        .y_desc(chart.y_label())
        .draw()
        .map_err(render_err)?;

    for styled in chart.series() {
        let line = rgb(styled.style.line.color).stroke_width(styled.style.line.width);
        ctx.draw_series(LineSeries::new(styled.series.points(), line))
            .map_err(render_err)?
            .label(styled.label.clone())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], line));

        let marker = rgb(styled.style.marker.color);
        let points: Vec<(u32, f64)> = styled.series.points().collect();
        match styled.style.marker.shape.geometry(styled.style.marker.size) {
            MarkerGeometry::Disc(radius) => {
                ctx.draw_series(
                    points
                        .iter()
                        .map(|&p| Circle::new(p, radius, marker.filled())),
                )
                .map_err(render_err)?;
            }
            MarkerGeometry::Filled(outline) => {
                ctx.draw_series(
                    points
                        .iter()
                        .map(|&p| EmptyElement::at(p) + Polygon::new(outline.clone(), marker.filled())),
                )
                .map_err(render_err)?;
            }
            MarkerGeometry::Strokes(segments) => {
                ctx.draw_series(points.iter().flat_map(|&p| {
                    segments.iter().map(move |segment| {
                        EmptyElement::at(p) + PathElement::new(segment.to_vec(), marker.stroke_width(2))
                    })
                }))
                .map_err(render_err)?;
            }
        }
    }

    ctx.configure_series_labels()
        .position(label_position(chart.options().legend))
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(render_err)?;
    Ok(())
}
