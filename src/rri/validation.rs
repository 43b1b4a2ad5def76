//! Validation and normalisation of raw RR interval and time series.
//!
//! These functions form the construction pipeline of [`RRi`](super::RRi):
//! interval values are checked for positivity and normalised to
//! milliseconds, and the time series is either derived from the cumulative
//! interval sum or validated against the structural rules (matching length,
//! no negative values, strictly increasing, no zero after the first
//! position). They are public so callers can validate input without
//! constructing an `RRi`.

use anyhow::{anyhow, Result};
use nalgebra::DVector;

use crate::rri::stats::median;

/// Series with a median below this value are taken to be expressed in
/// seconds and are scaled to milliseconds. Physiological RR intervals are
/// roughly 300-2000 ms (0.3-2.0 s), so the two units are separated by three
/// orders of magnitude and a single cutoff distinguishes them. This is a
/// heuristic, not a unit tag; borderline series below 10 ms cannot be
/// represented without pre-scaling them to milliseconds.
const SECONDS_MEDIAN_THRESHOLD: f64 = 10.0;

/// Validates a raw RR interval series and normalises it to milliseconds.
///
/// # Arguments
///
/// * `rri` - A slice of RR interval values, in milliseconds or seconds.
///
/// # Returns
///
/// A `DVector<f64>` of positive interval values in milliseconds.
///
/// # Errors
///
/// Returns an error if any element is zero or negative.
///
/// # Examples
///
/// ```
/// use hrv_rri::rri::validation::validate_rri;
///
/// let ms = validate_rri(&[0.8, 0.9, 1.2]).unwrap();
/// assert_eq!(ms.as_slice(), &[800.0, 900.0, 1200.0]);
/// ```
pub fn validate_rri(rri: &[f64]) -> Result<DVector<f64>> {
    if rri.iter().any(|&value| value <= 0.0) {
        return Err(anyhow!("rri series can only have positive values"));
    }
    Ok(transform_rri_to_milliseconds(DVector::from_row_slice(rri)))
}

fn transform_rri_to_milliseconds(rri: DVector<f64>) -> DVector<f64> {
    if median(&rri) < SECONDS_MEDIAN_THRESHOLD {
        rri * 1000.0
    } else {
        rri
    }
}

/// Derives the beat time series from a validated interval series.
///
/// Each beat occurs at the cumulative sum of the preceding intervals,
/// converted to seconds and shifted so the first beat is at exactly 0
/// ("time since first beat").
///
/// # Arguments
///
/// * `rri` - Validated RR intervals in milliseconds.
///
/// # Returns
///
/// A `DVector<f64>` of beat times in seconds, same length as the input,
/// starting at 0.
pub fn create_time_array(rri: &DVector<f64>) -> DVector<f64> {
    let mut acc = 0.0;
    let cumsum: Vec<f64> = rri
        .iter()
        .map(|value| {
            acc += value;
            acc / 1000.0
        })
        .collect();
    let mut time = DVector::from_vec(cumsum);
    if let Some(first) = time.get(0).copied() {
        time.add_scalar_mut(-first);
    }
    time
}

/// Validates a user-supplied time series against an interval series.
///
/// The time series must have the same length as the interval series, contain
/// no negative values, be strictly monotonically increasing, and contain no
/// zero outside the first position. The length check always runs first; the
/// remaining order is stable and pinned by the test suite.
///
/// # Arguments
///
/// * `rri` - Validated RR intervals in milliseconds.
/// * `time` - Candidate beat times in seconds.
///
/// # Returns
///
/// The accepted time series as a `DVector<f64>`.
///
/// # Errors
///
/// Returns an error describing the first violated rule.
pub fn validate_time(rri: &DVector<f64>, time: &[f64]) -> Result<DVector<f64>> {
    if rri.len() != time.len() {
        return Err(anyhow!("rri and time series must have the same length"));
    }
    if time.iter().any(|&t| t < 0.0) {
        return Err(anyhow!("time series cannot have negative values"));
    }
    if time.iter().skip(1).any(|&t| t == 0.0) {
        return Err(anyhow!("time series cannot have 0 values after first position"));
    }
    if time.windows(2).any(|pair| pair[1] <= pair[0]) {
        return Err(anyhow!("time series must be monotonically increasing"));
    }
    Ok(DVector::from_row_slice(time))
}
