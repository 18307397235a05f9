// SPDX-License-Identifier: MIT OR Apache-2.0
//! Locale-aware number parsing.
//!
//! Benchmark binaries print counters through the C++ locale, so the same
//! value may appear as `12345.6` or `12,345.6` (or `12.345,6`).

/// Grouping and decimal separators used by the benchmark output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumberFormat {
    /// Thousands separator, removed before parsing
    pub grouping: char,
    /// Decimal separator
    pub decimal: char,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self::ENGLISH
    }
}

impl NumberFormat {
    /// `12,345.6`
    pub const ENGLISH: Self = Self {
        grouping: ',',
        decimal: '.',
    };

    /// `12.345,6`
    pub const EUROPEAN: Self = Self {
        grouping: '.',
        decimal: ',',
    };

    /// Parse `text` into a number, ignoring grouping separators.
    ///
    /// Trailing separators (e.g. a sentence-ending comma swallowed by a
    /// pattern) are ignored. Returns `None` if nothing numeric remains.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<f64> {
        let trimmed = text
            .trim()
            .trim_end_matches(|c| c == self.grouping || c == self.decimal);
        if trimmed.is_empty() {
            return None;
        }

        let mut normalized = String::with_capacity(trimmed.len());
        for c in trimmed.chars() {
            if c == self.grouping {
                continue;
            }
            if c == self.decimal {
                normalized.push('.');
            } else if c.is_ascii_digit() {
                normalized.push(c);
            } else {
                return None;
            }
        }
        normalized.parse().ok()
    }
}
