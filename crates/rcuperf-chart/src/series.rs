// SPDX-License-Identifier: MIT OR Apache-2.0
//! Grouping aggregates into chart series.
//!
//! A chart compares implementations along one axis (usually the number of
//! active readers) while every other parameter is pinned by a [`KeyFilter`].
//! Each surviving aggregate contributes one reduced point to the series
//! named after its implementation.

use rcuperf_capture::ResultStore;
use rcuperf_core::{Metric, ParameterKey, trimmed_mean};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use tracing::{debug, warn};

/// Prefix of the benchmark binary names, stripped from series identities
pub const DEFAULT_IMPLEMENTATION_PREFIX: &str = "measure_";

/// Pins any subset of the key fields; unset fields match everything
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct KeyFilter {
    /// Implementation name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub implementation: Option<String>,
    /// Dataset size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dataset_size: Option<u64>,
    /// Total (slow) reader count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_readers: Option<u32>,
    /// Active reader count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_readers: Option<u32>,
    /// Writer count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub writers: Option<u32>,
    /// Read-operation kind
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_kind: Option<String>,
}

impl KeyFilter {
    /// Filter matching every key
    #[must_use]
    pub fn any() -> Self {
        Self::default()
    }

    /// Pin the dataset size
    #[must_use]
    pub const fn with_dataset_size(mut self, size: u64) -> Self {
        self.dataset_size = Some(size);
        self
    }

    /// Pin the total reader count
    #[must_use]
    pub const fn with_total_readers(mut self, count: u32) -> Self {
        self.total_readers = Some(count);
        self
    }

    /// Pin the writer count
    #[must_use]
    pub const fn with_writers(mut self, count: u32) -> Self {
        self.writers = Some(count);
        self
    }

    /// Pin the read-operation kind
    #[must_use]
    pub fn with_read_kind(mut self, kind: impl Into<String>) -> Self {
        self.read_kind = Some(kind.into());
        self
    }

    /// Whether `key` agrees with every pinned field
    #[must_use]
    pub fn matches(&self, key: &ParameterKey) -> bool {
        self.implementation
            .as_deref()
            .is_none_or(|v| v == key.implementation())
            && self.dataset_size.is_none_or(|v| v == key.dataset_size())
            && self.total_readers.is_none_or(|v| v == key.total_readers())
            && self.active_readers.is_none_or(|v| v == key.active_readers())
            && self.writers.is_none_or(|v| v == key.writers())
            && self
                .read_kind
                .as_deref()
                .is_none_or(|v| Some(v) == key.read_kind())
    }

    /// Every distinct `(dataset size, total readers, writers, read kind)`
    /// combination present in `store`, in ascending order.
    #[must_use]
    pub fn observed_combinations(store: &ResultStore) -> Vec<Self> {
        let combos: BTreeSet<Self> = store
            .iter()
            .map(|(key, _)| Self {
                implementation: None,
                dataset_size: Some(key.dataset_size()),
                total_readers: Some(key.total_readers()),
                active_readers: None,
                writers: Some(key.writers()),
                read_kind: key.read_kind().map(str::to_string),
            })
            .collect();
        combos.into_iter().collect()
    }
}

impl fmt::Display for KeyFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(v) = &self.implementation {
            parts.push(format!("implementation {v}"));
        }
        if let Some(v) = self.dataset_size {
            parts.push(format!("dataset size {v}"));
        }
        if let Some(v) = self.total_readers {
            parts.push(format!("all readers {v}"));
        }
        if let Some(v) = self.active_readers {
            parts.push(format!("readers {v}"));
        }
        if let Some(v) = self.writers {
            parts.push(format!("writers {v}"));
        }
        if let Some(v) = &self.read_kind {
            parts.push(format!("read kind {v}"));
        }
        if parts.is_empty() {
            f.write_str("all keys")
        } else {
            f.write_str(&parts.join(", "))
        }
    }
}

/// What to chart: a metric, a filter, and series to leave out
#[derive(Debug, Clone)]
pub struct SeriesQuery {
    /// Metric reduced into the y values
    pub metric: Metric,
    /// Pinned key fields
    pub filter: KeyFilter,
    /// Series whose identity contains any of these substrings are skipped
    pub exclude: Vec<String>,
}

impl SeriesQuery {
    /// Query over every key for `metric`
    #[must_use]
    pub fn new(metric: Metric) -> Self {
        Self {
            metric,
            filter: KeyFilter::any(),
            exclude: Vec::new(),
        }
    }

    /// Replace the filter
    #[must_use]
    pub fn with_filter(mut self, filter: KeyFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Skip series whose identity contains `pattern`
    #[must_use]
    pub fn excluding(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Whether the series `identity` is excluded
    #[must_use]
    pub fn excludes(&self, identity: &str) -> bool {
        self.exclude.iter().any(|p| identity.contains(p.as_str()))
    }
}

/// One named curve: x to reduced y, kept sorted by x
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    name: String,
    points: BTreeMap<u32, f64>,
}

impl Series {
    /// Create an empty series
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: BTreeMap::new(),
        }
    }

    /// Series identity
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the value at `x`, returning the value it replaced
    pub fn insert(&mut self, x: u32, y: f64) -> Option<f64> {
        self.points.insert(x, y)
    }

    /// Value at `x`
    #[must_use]
    pub fn get(&self, x: u32) -> Option<f64> {
        self.points.get(&x).copied()
    }

    /// Points in ascending x order
    pub fn points(&self) -> impl Iterator<Item = (u32, f64)> + '_ {
        self.points.iter().map(|(&x, &y)| (x, y))
    }

    /// Number of points
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series has no points
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A point left out because its aggregate had too few trial values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OmittedPoint {
    /// Series the point belonged to
    pub series: String,
    /// Key of the aggregate
    pub key: ParameterKey,
    /// Number of values that were available
    pub available: usize,
}

/// Output of [`build_series`]
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SeriesSet {
    /// Series by identity
    pub series: BTreeMap<String, Series>,
    /// Points omitted for insufficient data
    pub omitted: Vec<OmittedPoint>,
}

impl SeriesSet {
    /// Whether no series has any point
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Series named `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Series> {
        self.series.get(name)
    }
}

/// Group the aggregates selected by `query` into series.
///
/// `identity` names the series a key belongs to and `x` places it on the
/// horizontal axis. When two selected keys of one series share an x, the
/// later key in store order overwrites the earlier point. Series that end
/// up without points are not included.
pub fn build_series<I, X>(store: &ResultStore, query: &SeriesQuery, identity: I, x: X) -> SeriesSet
where
    I: Fn(&ParameterKey) -> String,
    X: Fn(&ParameterKey) -> u32,
{
    let mut set = SeriesSet::default();
    for (key, aggregate) in store {
        if !query.filter.matches(key) {
            continue;
        }
        let name = identity(key);
        if query.excludes(&name) {
            continue;
        }

        let values = aggregate.values(query.metric);
        match trimmed_mean(values) {
            Ok(y) => {
                let position = x(key);
                let series = set
                    .series
                    .entry(name.clone())
                    .or_insert_with(|| Series::new(name.clone()));
                if let Some(previous) = series.insert(position, y) {
                    debug!(series = %name, x = position, previous, y, "overwriting point");
                }
            }
            Err(error) => {
                warn!(%key, metric = %query.metric, %error, "omitting point");
                set.omitted.push(OmittedPoint {
                    series: name,
                    key: key.clone(),
                    available: values.len(),
                });
            }
        }
    }
    set
}

/// Implementation name of `key` with `prefix` removed
#[must_use]
pub fn series_identity(key: &ParameterKey, prefix: &str) -> String {
    let name = key.implementation();
    name.strip_prefix(prefix).unwrap_or(name).to_string()
}

/// [`build_series`] grouped by implementation (minus `prefix`) over the
/// active reader count.
pub fn build_default_series(store: &ResultStore, query: &SeriesQuery, prefix: &str) -> SeriesSet {
    build_series(
        store,
        query,
        |key| series_identity(key, prefix),
        ParameterKey::active_readers,
    )
}
