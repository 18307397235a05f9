// SPDX-License-Identifier: MIT OR Apache-2.0
//! Series styles.
//!
//! Every series drawn on a chart needs a marker and a line style. The
//! built-in table covers the benchmark binaries shipped with the sweep;
//! additional entries are loaded from TOML:
//!
//! ```toml
//! [styles.rcuptr_hp]
//! marker = "triangle-up"
//! color = "magenta"
//! line_width = 2
//! ```

use rcuperf_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f64::consts::PI;
use std::fmt;

/// Default marker radius in pixels
const DEFAULT_MARKER_SIZE: u32 = 4;

/// Marker shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarkerShape {
    /// Filled square
    Square,
    /// Filled diamond
    Diamond,
    /// Filled disc
    Circle,
    /// Triangle pointing up
    TriangleUp,
    /// Triangle pointing down
    TriangleDown,
    /// Five-pointed star
    Star,
    /// `+`
    Plus,
    /// `x`
    Cross,
}

/// Marker outline relative to the data point, in pixels
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkerGeometry {
    /// Filled circle of the given radius
    Disc(i32),
    /// Filled polygon
    Filled(Vec<(i32, i32)>),
    /// Independent line segments
    Strokes(Vec<[(i32, i32); 2]>),
}

impl MarkerShape {
    /// Outline of this shape with radius `size`
    #[must_use]
    pub fn geometry(self, size: u32) -> MarkerGeometry {
        let s = i32::try_from(size).unwrap_or(i32::MAX);
        match self {
            Self::Circle => MarkerGeometry::Disc(s),
            Self::Square => MarkerGeometry::Filled(vec![(-s, -s), (s, -s), (s, s), (-s, s)]),
            Self::Diamond => MarkerGeometry::Filled(vec![(0, -s), (s, 0), (0, s), (-s, 0)]),
            // Screen y grows downwards
            Self::TriangleUp => MarkerGeometry::Filled(vec![(0, -s), (s, s), (-s, s)]),
            Self::TriangleDown => MarkerGeometry::Filled(vec![(0, s), (s, -s), (-s, -s)]),
            Self::Star => MarkerGeometry::Filled(star_outline(f64::from(size))),
            Self::Plus => MarkerGeometry::Strokes(vec![[(-s, 0), (s, 0)], [(0, -s), (0, s)]]),
            Self::Cross => {
                MarkerGeometry::Strokes(vec![[(-s, -s), (s, s)], [(-s, s), (s, -s)]])
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn star_outline(radius: f64) -> Vec<(i32, i32)> {
    let inner = radius * 0.4;
    (0..10_i32)
        .map(|i| {
            let r = if i % 2 == 0 { radius } else { inner };
            let angle = f64::from(i) * PI / 5.0 - PI / 2.0;
            (
                (r * angle.cos()).round() as i32,
                (r * angle.sin()).round() as i32,
            )
        })
        .collect()
}

/// Basic palette
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SeriesColor {
    /// Blue
    Blue,
    /// Red
    Red,
    /// Green
    Green,
    /// Cyan
    Cyan,
    /// Magenta
    Magenta,
    /// Yellow
    Yellow,
    /// Black
    Black,
}

impl SeriesColor {
    /// RGB components
    #[must_use]
    pub const fn rgb(self) -> (u8, u8, u8) {
        match self {
            Self::Blue => (0, 0, 255),
            Self::Red => (255, 0, 0),
            Self::Green => (0, 128, 0),
            Self::Cyan => (0, 191, 191),
            Self::Magenta => (191, 0, 191),
            Self::Yellow => (191, 191, 0),
            Self::Black => (0, 0, 0),
        }
    }
}

/// Marker drawn at every point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    /// Shape
    pub shape: MarkerShape,
    /// Fill or stroke color
    pub color: SeriesColor,
    /// Radius in pixels
    pub size: u32,
}

/// Line connecting consecutive points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LineStyle {
    /// Stroke color
    pub color: SeriesColor,
    /// Stroke width in pixels, at least 1
    pub width: u32,
}

/// Marker and line style of one series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeriesStyle {
    /// Point marker
    pub marker: MarkerStyle,
    /// Connecting line
    pub line: LineStyle,
}

impl SeriesStyle {
    /// Marker and line in the same color, default sizes
    #[must_use]
    pub const fn solid(shape: MarkerShape, color: SeriesColor) -> Self {
        Self {
            marker: MarkerStyle {
                shape,
                color,
                size: DEFAULT_MARKER_SIZE,
            },
            line: LineStyle { color, width: 1 },
        }
    }
}

/// Styles keyed by series identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTable {
    styles: BTreeMap<String, SeriesStyle>,
}

impl Default for StyleTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleFile {
    #[serde(default)]
    styles: BTreeMap<String, StyleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StyleEntry {
    marker: MarkerShape,
    color: SeriesColor,
    marker_size: Option<u32>,
    line_color: Option<SeriesColor>,
    line_width: Option<u32>,
}

impl StyleEntry {
    fn into_style(self, name: &str) -> Result<SeriesStyle> {
        let mut style = SeriesStyle::solid(self.marker, self.color);
        if let Some(size) = self.marker_size {
            if size == 0 {
                return Err(Error::config(format!("style {name}: marker_size must be positive")));
            }
            style.marker.size = size;
        }
        if let Some(color) = self.line_color {
            style.line.color = color;
        }
        if let Some(width) = self.line_width {
            if width == 0 {
                return Err(Error::config(format!("style {name}: line_width must be positive")));
            }
            style.line.width = width;
        }
        Ok(style)
    }
}

impl StyleTable {
    /// Table without any entry
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            styles: BTreeMap::new(),
        }
    }

    /// Styles of the implementations measured by the default sweep
    #[must_use]
    pub fn builtin() -> Self {
        use MarkerShape::{Circle, Cross, Diamond, Plus, Square, Star, TriangleDown, TriangleUp};
        use SeriesColor::{Blue, Cyan, Green, Red};

        let mut table = Self::empty();
        for (name, shape, color) in [
            ("std_mutex", Square, Blue),
            ("tbb_srw_mutex", Diamond, Red),
            ("tbb_qrw_mutex", Circle, Red),
            ("rcuptr", TriangleDown, Green),
            ("rcuptr_jss", TriangleUp, Green),
            ("urcu", Star, Cyan),
            ("urcu_mb", Plus, Cyan),
            ("urcu_bp", Cross, Cyan),
        ] {
            table.insert(name, SeriesStyle::solid(shape, color));
        }
        table
    }

    /// Add or replace the style of `name`
    pub fn insert(&mut self, name: impl Into<String>, style: SeriesStyle) -> Option<SeriesStyle> {
        self.styles.insert(name.into(), style)
    }

    /// Style of series `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSeriesStyle`] if the table has no entry.
    pub fn get(&self, name: &str) -> Result<&SeriesStyle> {
        self.styles
            .get(name)
            .ok_or_else(|| Error::UnknownSeriesStyle {
                series: name.to_string(),
            })
    }

    /// Whether `name` has a style
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.styles.contains_key(name)
    }

    /// Entry names in order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }

    /// Add the `[styles.<name>]` entries of a TOML document, replacing
    /// existing entries of the same name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document does not parse or an
    /// entry has a zero size or width.
    pub fn extend_from_toml(&mut self, text: &str) -> Result<()> {
        let file: StyleFile =
            toml::from_str(text).map_err(|e| Error::config(format!("invalid style file: {e}")))?;
        for (name, entry) in file.styles {
            let style = entry.into_style(&name)?;
            self.insert(name, style);
        }
        Ok(())
    }

    /// Built-in table extended with a TOML document.
    ///
    /// # Errors
    ///
    /// See [`StyleTable::extend_from_toml`].
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let mut table = Self::builtin();
        table.extend_from_toml(text)?;
        Ok(table)
    }
}

impl fmt::Display for MarkerShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Square => "square",
            Self::Diamond => "diamond",
            Self::Circle => "circle",
            Self::TriangleUp => "triangle-up",
            Self::TriangleDown => "triangle-down",
            Self::Star => "star",
            Self::Plus => "plus",
            Self::Cross => "cross",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries() {
        let table = StyleTable::default();
        let mutex = table.get("std_mutex").unwrap();
        assert_eq!(mutex.marker.shape, MarkerShape::Square);
        assert_eq!(mutex.line.color, SeriesColor::Blue);
        assert_eq!(table.get("urcu_bp").unwrap().marker.shape, MarkerShape::Cross);
        assert_eq!(table.names().count(), 8);
    }

    #[test]
    fn test_unknown_style() {
        let err = StyleTable::default().get("measure_rcuptr").unwrap_err();
        assert!(matches!(err, Error::UnknownSeriesStyle { series } if series == "measure_rcuptr"));
    }

    #[test]
    fn test_toml_extends_builtin() {
        let table = StyleTable::from_toml_str(
            r#"
            [styles.rcuptr_hp]
            marker = "triangle-up"
            color = "magenta"
            line_width = 2

            [styles.std_mutex]
            marker = "circle"
            color = "black"
            "#,
        )
        .unwrap();

        let hp = table.get("rcuptr_hp").unwrap();
        assert_eq!(hp.marker.color, SeriesColor::Magenta);
        assert_eq!(hp.line.width, 2);
        assert_eq!(hp.marker.size, DEFAULT_MARKER_SIZE);
        assert_eq!(
            table.get("std_mutex").unwrap().marker.shape,
            MarkerShape::Circle
        );
        assert!(table.contains("urcu"));
    }

    #[test]
    fn test_toml_rejects_bad_entries() {
        assert!(StyleTable::from_toml_str("[styles.x]\nmarker = \"hexagon\"\ncolor = \"red\"").is_err());
        assert!(StyleTable::from_toml_str("[styles.x]\nmarker = \"star\"\ncolor = \"red\"\nline_width = 0").is_err());
        assert!(StyleTable::from_toml_str("[styles.x]\nmarker = \"star\"\ncolor = \"red\"\nshade = 1").is_err());
        assert!(StyleTable::from_toml_str("").is_ok());
    }

    #[test]
    fn test_geometry() {
        assert_eq!(MarkerShape::Circle.geometry(3), MarkerGeometry::Disc(3));
        let MarkerGeometry::Filled(star) = MarkerShape::Star.geometry(10) else {
            panic!("star should be filled");
        };
        assert_eq!(star.len(), 10);
        assert_eq!(star[0], (0, -10));
        let MarkerGeometry::Strokes(plus) = MarkerShape::Plus.geometry(2) else {
            panic!("plus should be strokes");
        };
        assert_eq!(plus, [[(-2, 0), (2, 0)], [(0, -2), (0, 2)]]);
    }
}
