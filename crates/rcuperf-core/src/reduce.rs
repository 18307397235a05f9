// SPDX-License-Identifier: MIT OR Apache-2.0
//! Outlier-trimmed reduction of repeated trials.
//!
//! Repeated runs of one parameter combination are noisy (scheduler jitter,
//! cache state). The representative value drops one maximum and one minimum
//! observation and averages what is left.

use crate::error::{Error, Result};

/// Minimum number of values [`trimmed_mean`] accepts
pub const MIN_TRIALS: usize = 3;

/// Mean of `values` after removing one maximum and one minimum element.
///
/// Ties are removed once only: `[5, 5, 5, 9]` drops one `9` and one `5`.
/// Input order does not matter.
///
/// # Errors
///
/// Returns [`Error::InsufficientData`] for fewer than [`MIN_TRIALS`] values,
/// since trimming two elements would leave nothing to average.
///
/// # Examples
///
/// ```
/// use rcuperf_core::trimmed_mean;
///
/// assert_eq!(trimmed_mean(&[10.0, 1.0, 2.0, 3.0, 100.0]).unwrap(), 5.0);
/// assert!(trimmed_mean(&[5.0, 5.0]).is_err());
/// ```
pub fn trimmed_mean(values: &[f64]) -> Result<f64> {
    if values.len() < MIN_TRIALS {
        return Err(Error::InsufficientData {
            available: values.len(),
            required: MIN_TRIALS,
        });
    }

    // Sort a copy so the sum of the kept elements is independent of input order.
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let kept = &sorted[1..sorted.len() - 1];
    Ok(kept.iter().sum::<f64>() / kept.len() as f64)
}
