// SPDX-License-Identifier: MIT OR Apache-2.0
//! Chart series construction and rendering for rcuperf
//!
//! - [`series`] - Filtering and grouping aggregates into named curves
//! - [`style`] - Marker and line styles per series
//! - [`render`] - Chart assembly and output backends

#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]

/// Chart assembly and output backends
pub mod render;
/// Series filtering and grouping
pub mod series;
/// Series style table
pub mod style;

pub use render::{
    Chart, ChartOptions, ChartRenderer, LegendLocation, RenderOutput, Scale, StyledSeries,
    SvgRenderer, TextRenderer,
};
pub use series::{
    DEFAULT_IMPLEMENTATION_PREFIX, KeyFilter, OmittedPoint, Series, SeriesQuery, SeriesSet,
    build_default_series, build_series, series_identity,
};
pub use style::{LineStyle, MarkerGeometry, MarkerShape, MarkerStyle, SeriesColor, SeriesStyle, StyleTable};
