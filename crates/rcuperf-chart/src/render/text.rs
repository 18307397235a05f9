// SPDX-License-Identifier: MIT OR Apache-2.0
//! Plain-text table output.

use super::{Chart, ChartRenderer, RenderOutput};
use rcuperf_core::Result;
use std::collections::BTreeSet;
use std::io::Write;

/// Minimum column width
const MIN_WIDTH: usize = 12;

/// Prints each chart as a table: one row per x, one column per series
#[derive(Debug)]
pub struct TextRenderer<W: Write> {
    out: W,
}

impl<W: Write> TextRenderer<W> {
    /// Renderer writing to `out`
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> ChartRenderer for TextRenderer<W> {
    fn render(&mut self, chart: &Chart) -> Result<RenderOutput> {
        let xs: BTreeSet<u32> = chart
            .series()
            .iter()
            .flat_map(|s| s.series.points().map(|(x, _)| x))
            .collect();
        let widths: Vec<usize> = chart
            .series()
            .iter()
            .map(|s| s.label.chars().count().max(MIN_WIDTH))
            .collect();

        writeln!(self.out, "# {}", chart.title())?;
        write!(self.out, "{:>8}", "readers")?;
        for (s, width) in chart.series().iter().zip(widths.iter().copied()) {
            write!(self.out, "  {:>width$}", s.label)?;
        }
        writeln!(self.out)?;

        for x in xs {
            write!(self.out, "{x:>8}")?;
            for (s, width) in chart.series().iter().zip(widths.iter().copied()) {
                match s.series.get(x) {
                    Some(y) => write!(self.out, "  {y:>width$.1}")?,
                    None => write!(self.out, "  {:>width$}", "-")?,
                }
            }
            writeln!(self.out)?;
        }
        writeln!(self.out)?;
        self.out.flush()?;
        Ok(RenderOutput::Screen)
    }
}
