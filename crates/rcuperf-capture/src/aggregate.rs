// SPDX-License-Identifier: MIT OR Apache-2.0
//! Accumulation of repeated trials per parameter key.

use crate::parser::RawCapture;
use rcuperf_core::{Metric, ParameterKey};
use std::collections::BTreeMap;
use std::collections::btree_map;

/// All values observed for one parameter key, per metric
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrialAggregate {
    values: BTreeMap<Metric, Vec<f64>>,
    captures: usize,
}

impl TrialAggregate {
    /// Create an empty aggregate
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append every value of `capture`, keeping encounter order
    pub fn record(&mut self, capture: &RawCapture) {
        self.captures += 1;
        for &(metric, value) in capture.observations() {
            self.values.entry(metric).or_default().push(value);
        }
    }

    /// Values recorded for `metric` (empty if none)
    #[must_use]
    pub fn values(&self, metric: Metric) -> &[f64] {
        self.values.get(&metric).map_or(&[][..], Vec::as_slice)
    }

    /// Number of captures recorded, including empty ones
    #[must_use]
    pub const fn capture_count(&self) -> usize {
        self.captures
    }
}

/// Aggregates keyed by [`ParameterKey`], iterated in key order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultStore {
    aggregates: BTreeMap<ParameterKey, TrialAggregate>,
}

impl ResultStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one capture under `key`, creating the aggregate on first use
    pub fn record(&mut self, key: ParameterKey, capture: &RawCapture) {
        self.aggregates.entry(key).or_default().record(capture);
    }

    /// Aggregate for `key`, if any capture was recorded
    #[must_use]
    pub fn get(&self, key: &ParameterKey) -> Option<&TrialAggregate> {
        self.aggregates.get(key)
    }

    /// Iterate over `(key, aggregate)` pairs in key order
    pub fn iter(&self) -> btree_map::Iter<'_, ParameterKey, TrialAggregate> {
        self.aggregates.iter()
    }

    /// Number of distinct keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.aggregates.len()
    }

    /// Whether no capture was recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.aggregates.is_empty()
    }
}

impl<'a> IntoIterator for &'a ResultStore {
    type Item = (&'a ParameterKey, &'a TrialAggregate);
    type IntoIter = btree_map::Iter<'a, ParameterKey, TrialAggregate>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(readers: u32) -> ParameterKey {
        ParameterKey::new("measure_rcuptr", 8196, 0, readers, 1).unwrap()
    }

    fn capture(values: &[(Metric, f64)]) -> RawCapture {
        RawCapture::from_observations(values.to_vec())
    }

    #[test]
    fn test_values_accumulate_in_order() {
        let mut store = ResultStore::new();
        store.record(key(2), &capture(&[(Metric::ReaderSum, 100.0)]));
        store.record(key(2), &capture(&[(Metric::ReaderSum, 300.0)]));
        store.record(
            key(2),
            &capture(&[(Metric::ReaderSum, 200.0), (Metric::WriterSum, 9.0)]),
        );

        assert_eq!(store.len(), 1);
        let agg = store.get(&key(2)).unwrap();
        assert_eq!(agg.values(Metric::ReaderSum), [100.0, 300.0, 200.0]);
        assert_eq!(agg.values(Metric::WriterSum), [9.0]);
        assert_eq!(agg.capture_count(), 3);
    }

    #[test]
    fn test_empty_capture_contributes_nothing() {
        let mut store = ResultStore::new();
        store.record(key(1), &RawCapture::default());
        let agg = store.get(&key(1)).unwrap();
        assert_eq!(agg.capture_count(), 1);
        for metric in Metric::ALL {
            assert!(agg.values(metric).is_empty());
        }
    }

    #[test]
    fn test_distinct_keys_kept_apart() {
        let mut store = ResultStore::new();
        store.record(key(1), &capture(&[(Metric::ReaderSum, 1.0)]));
        store.record(key(2), &capture(&[(Metric::ReaderSum, 2.0)]));
        assert_eq!(store.len(), 2);
        let readers: Vec<u32> = store.iter().map(|(k, _)| k.active_readers()).collect();
        assert_eq!(readers, [1, 2]);
    }
}
