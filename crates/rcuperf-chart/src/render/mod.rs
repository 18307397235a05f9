// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chart assembly and output backends.
//!
//! A [`Chart`] is a [`SeriesSet`] with every style resolved and every label
//! decided. Backends implement [`ChartRenderer`]:
//!
//! - [`SvgRenderer`] - one SVG file per chart
//! - [`TextRenderer`] - a plain table on a writer

mod svg;
mod text;

pub use svg::SvgRenderer;
pub use text::TextRenderer;

use crate::series::{KeyFilter, Series, SeriesSet};
use crate::style::{SeriesStyle, StyleTable};
use rcuperf_core::{Error, Metric, Result};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Horizontal axis label
pub const X_LABEL: &str = "Number of Reader Threads";

/// Vertical axis scale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Linear y axis
    #[default]
    Linear,
    /// Logarithmic y axis
    Log,
}

/// Where the legend box is placed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LegendLocation {
    /// Top right corner
    UpperRight,
    /// Top left corner
    UpperLeft,
    /// Bottom left corner
    LowerLeft,
    /// Bottom right corner
    #[default]
    LowerRight,
    /// Middle of the right edge
    CenterRight,
    /// Middle of the left edge
    CenterLeft,
    /// Middle of the top edge
    UpperCenter,
    /// Middle of the bottom edge
    LowerCenter,
    /// Plot center
    Center,
}

impl LegendLocation {
    /// Every location
    pub const ALL: [Self; 9] = [
        Self::UpperRight,
        Self::UpperLeft,
        Self::LowerLeft,
        Self::LowerRight,
        Self::CenterRight,
        Self::CenterLeft,
        Self::UpperCenter,
        Self::LowerCenter,
        Self::Center,
    ];

    /// Name in `lower right` form
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::UpperRight => "upper right",
            Self::UpperLeft => "upper left",
            Self::LowerLeft => "lower left",
            Self::LowerRight => "lower right",
            Self::CenterRight => "center right",
            Self::CenterLeft => "center left",
            Self::UpperCenter => "upper center",
            Self::LowerCenter => "lower center",
            Self::Center => "center",
        }
    }
}

impl fmt::Display for LegendLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for LegendLocation {
    type Err = Error;

    /// Accepts `lower right`, `lower-right` and `lower_right`, in any case.
    /// `right` is an alias of `center right`.
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_'], " ");
        if normalized == "right" {
            return Ok(Self::CenterRight);
        }
        Self::ALL
            .into_iter()
            .find(|loc| loc.name() == normalized)
            .ok_or_else(|| {
                let known: Vec<_> = Self::ALL.iter().map(|l| l.name()).collect();
                Error::config(format!(
                    "unknown legend location {s:?}, expected one of: {}",
                    known.join(", ")
                ))
            })
    }
}

/// Everything about a chart except its data
#[derive(Debug, Clone, Serialize)]
pub struct ChartOptions {
    /// Metric on the y axis
    pub metric: Metric,
    /// Fields pinned for this chart
    pub filter: KeyFilter,
    /// Y axis scale
    pub scale: Scale,
    /// Legend placement
    pub legend: LegendLocation,
    /// Caption; derived from metric and filter when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ChartOptions {
    /// Linear chart of `metric` under `filter` with the legend lower right
    #[must_use]
    pub fn new(metric: Metric, filter: KeyFilter) -> Self {
        Self {
            metric,
            filter,
            scale: Scale::default(),
            legend: LegendLocation::default(),
            title: None,
        }
    }
}

/// A series with its resolved style and display label
#[derive(Debug, Clone, Serialize)]
pub struct StyledSeries {
    /// Data
    pub series: Series,
    /// Resolved style
    pub style: SeriesStyle,
    /// Legend text
    pub label: String,
}

/// Data range covered by a chart
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Bounds {
    pub x_min: u32,
    pub x_max: u32,
    pub y_min: f64,
    pub y_max: f64,
}

/// A fully resolved chart, ready for any [`ChartRenderer`]
#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    options: ChartOptions,
    series: Vec<StyledSeries>,
}

impl Chart {
    /// Resolve the style of every series in `set`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSeriesStyle`] for the first series without a
    /// style table entry.
    pub fn new(set: &SeriesSet, styles: &StyleTable, options: ChartOptions) -> Result<Self> {
        let series = set
            .series
            .iter()
            .map(|(name, series)| {
                Ok(StyledSeries {
                    series: series.clone(),
                    style: *styles.get(name)?,
                    label: name.replace('_', " "),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { options, series })
    }

    /// Options the chart was built with
    #[must_use]
    pub const fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Series in identity order
    #[must_use]
    pub fn series(&self) -> &[StyledSeries] {
        &self.series
    }

    /// Whether there is nothing to draw
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.iter().all(|s| s.series.is_empty())
    }

    /// Caption text
    #[must_use]
    pub fn title(&self) -> String {
        self.options.title.clone().unwrap_or_else(|| {
            format!(
                "{} ({})",
                self.options.metric.axis_label(),
                self.options.filter
            )
        })
    }

    /// Vertical axis label
    #[must_use]
    pub const fn y_label(&self) -> &'static str {
        self.options.metric.axis_label()
    }

    /// File name of the rendered artifact:
    /// `res_<metric>_<size>_<all>_<writers>[_<read kind>].svg`, with `any`
    /// standing in for fields the filter leaves open.
    #[must_use]
    pub fn artifact_name(&self) -> String {
        fn field<T: fmt::Display>(value: Option<T>) -> String {
            value.map_or_else(|| "any".to_string(), |v| v.to_string())
        }

        let filter = &self.options.filter;
        let mut name = format!(
            "res_{}_{}_{}_{}",
            self.options.metric,
            field(filter.dataset_size),
            field(filter.total_readers),
            field(filter.writers)
        );
        if let Some(kind) = &filter.read_kind {
            name.push('_');
            name.push_str(kind);
        }
        name.push_str(".svg");
        name
    }

    pub(crate) fn bounds(&self) -> Option<Bounds> {
        let mut points = self.series.iter().flat_map(|s| s.series.points());
        let (x, y) = points.next()?;
        let init = Bounds {
            x_min: x,
            x_max: x,
            y_min: y,
            y_max: y,
        };
        Some(points.fold(init, |b, (x, y)| Bounds {
            x_min: b.x_min.min(x),
            x_max: b.x_max.max(x),
            y_min: b.y_min.min(y),
            y_max: b.y_max.max(y),
        }))
    }
}

/// Where a rendered chart went
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutput {
    /// Written to this file
    File(PathBuf),
    /// Shown on the renderer's writer
    Screen,
}

/// A chart output backend
pub trait ChartRenderer {
    /// Render one chart.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] if the chart cannot be drawn and
    /// [`Error::Io`] if the output cannot be written.
    fn render(&mut self, chart: &Chart) -> Result<RenderOutput>;
}
