// SPDX-License-Identifier: MIT OR Apache-2.0
//! Extraction of metric values from raw benchmark output.
//!
//! A capture is the concatenated stdout and stderr of one benchmark run,
//! usually wrapped by `perf stat`. Only the lines the benchmark prints
//! itself (`reader sum: 1,234.5`) are of interest here.

use crate::number::NumberFormat;
use rcuperf_core::{Error, Metric, Result};
use regex::Regex;
use tracing::warn;

/// Numeric token accepted after a metric label
const NUMBER_PATTERN: &str = r"(\d[\d.,]*)";

/// A pattern whose single capture group yields a value for `metric`
#[derive(Debug, Clone)]
pub struct CaptureRule {
    pattern: Regex,
    metric: Metric,
}

impl CaptureRule {
    /// Compile a rule.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `pattern` does not compile or does not
    /// have exactly one capture group.
    pub fn new(pattern: &str, metric: Metric) -> Result<Self> {
        let pattern = Regex::new(pattern)
            .map_err(|e| Error::config(format!("invalid capture pattern: {e}")))?;
        // captures_len counts the implicit whole-match group
        if pattern.captures_len() != 2 {
            return Err(Error::config(format!(
                "capture pattern {:?} must have exactly one group",
                pattern.as_str()
            )));
        }
        Ok(Self { pattern, metric })
    }

    /// Rule matching `<label>: <number>` for `metric`.
    ///
    /// # Errors
    ///
    /// See [`CaptureRule::new`].
    pub fn for_metric(metric: Metric) -> Result<Self> {
        let pattern = format!(
            "{}: {NUMBER_PATTERN}",
            regex::escape(metric.capture_label())
        );
        Self::new(&pattern, metric)
    }

    /// The metric this rule feeds
    #[must_use]
    pub const fn metric(&self) -> Metric {
        self.metric
    }
}

/// Ordered collection of capture rules
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<CaptureRule>,
}

impl RuleSet {
    /// One rule per [`Metric`], in [`Metric::ALL`] order.
    ///
    /// # Errors
    ///
    /// See [`CaptureRule::new`].
    pub fn standard() -> Result<Self> {
        let rules = Metric::ALL
            .into_iter()
            .map(CaptureRule::for_metric)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Build a rule set from `(pattern, metric)` pairs.
    ///
    /// # Errors
    ///
    /// Propagates the first [`CaptureRule::new`] failure.
    pub fn from_patterns<'a>(
        patterns: impl IntoIterator<Item = (&'a str, Metric)>,
    ) -> Result<Self> {
        let rules = patterns
            .into_iter()
            .map(|(pattern, metric)| CaptureRule::new(pattern, metric))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { rules })
    }

    /// Rules in application order
    #[must_use]
    pub fn rules(&self) -> &[CaptureRule] {
        &self.rules
    }
}

/// Values observed in one capture, in encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCapture {
    observations: Vec<(Metric, f64)>,
}

impl RawCapture {
    /// Build a capture from explicit observations
    #[must_use]
    pub const fn from_observations(observations: Vec<(Metric, f64)>) -> Self {
        Self { observations }
    }

    /// All `(metric, value)` pairs
    #[must_use]
    pub fn observations(&self) -> &[(Metric, f64)] {
        &self.observations
    }

    /// Values for a single metric, in encounter order
    pub fn values(&self, metric: Metric) -> impl Iterator<Item = f64> + '_ {
        self.observations
            .iter()
            .filter(move |(m, _)| *m == metric)
            .map(|&(_, v)| v)
    }

    /// Whether no rule matched
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }
}

/// Applies a [`RuleSet`] to capture text
#[derive(Debug, Clone)]
pub struct CaptureParser {
    rules: RuleSet,
    number: NumberFormat,
}

impl CaptureParser {
    /// Create a parser
    #[must_use]
    pub const fn new(rules: RuleSet, number: NumberFormat) -> Self {
        Self { rules, number }
    }

    /// Parser with the standard rules and the given number format.
    ///
    /// # Errors
    ///
    /// See [`RuleSet::standard`].
    pub fn standard(number: NumberFormat) -> Result<Self> {
        Ok(Self::new(RuleSet::standard()?, number))
    }

    /// Extract every rule match from `text`.
    ///
    /// Text without any match yields an empty capture. A matched token that
    /// does not parse as a number is logged and dropped.
    #[must_use]
    pub fn parse(&self, text: &str) -> RawCapture {
        let mut observations = Vec::new();
        for rule in self.rules.rules() {
            for caps in rule.pattern.captures_iter(text) {
                let Some(token) = caps.get(1) else {
                    continue;
                };
                match self.number.parse(token.as_str()) {
                    Some(value) => observations.push((rule.metric, value)),
                    None => warn!(
                        metric = %rule.metric,
                        token = token.as_str(),
                        "ignoring unparsable value"
                    ),
                }
            }
        }
        RawCapture { observations }
    }
}
