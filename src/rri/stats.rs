//! Descriptive statistics over an RR interval series.
//!
//! All reductions operate on the interval values only, never on the time
//! series, and leave the `RRi` untouched. Variance and standard deviation
//! are population statistics (divide by `n`), matching the conventions of
//! the numeric vector type.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use nalgebra::DVector;

use crate::rri::RRi;

/// Summary statistics of an RR interval series, as returned by
/// [`RRi::describe`].
///
/// Behaves as a small fixed-key mapping: keys are exactly
/// `min`, `max`, `amplitude`, `mean`, `median`, `var` and `std`, available
/// through [`Description::get`] and [`Description::iter`]. Rendering the
/// mapping itself for display yields the label `description`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Description {
    pub min: f64,
    pub max: f64,
    pub amplitude: f64,
    pub mean: f64,
    pub median: f64,
    pub var: f64,
    pub std: f64,
}

impl Description {
    /// Mapping keys, in iteration order.
    pub const KEYS: [&'static str; 7] =
        ["min", "max", "amplitude", "mean", "median", "var", "std"];

    /// Looks up a statistic by key. Returns `None` for unknown keys.
    pub fn get(&self, key: &str) -> Option<f64> {
        match key {
            "min" => Some(self.min),
            "max" => Some(self.max),
            "amplitude" => Some(self.amplitude),
            "mean" => Some(self.mean),
            "median" => Some(self.median),
            "var" => Some(self.var),
            "std" => Some(self.std),
            _ => None,
        }
    }

    /// Iterates over `(key, value)` pairs in the order of [`Description::KEYS`].
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, f64)> {
        [
            ("min", self.min),
            ("max", self.max),
            ("amplitude", self.amplitude),
            ("mean", self.mean),
            ("median", self.median),
            ("var", self.var),
            ("std", self.std),
        ]
        .into_iter()
    }
}

impl fmt::Display for Description {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "description")
    }
}

/// Median of a vector; `NaN` for an empty vector.
pub(crate) fn median(values: &DVector<f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return f64::NAN;
    }
    let mut sorted: Vec<f64> = values.iter().copied().collect();
    sorted.sort_by(f64::total_cmp);
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

impl RRi {
    /// Mean of the interval values in milliseconds.
    pub fn mean(&self) -> f64 {
        self.values().mean()
    }

    /// Population variance of the interval values.
    pub fn var(&self) -> f64 {
        self.values().variance()
    }

    /// Population standard deviation of the interval values.
    pub fn std(&self) -> f64 {
        self.values().variance().sqrt()
    }

    /// Median of the interval values in milliseconds.
    pub fn median(&self) -> f64 {
        median(self.values())
    }

    /// Smallest interval value in milliseconds.
    pub fn min(&self) -> f64 {
        self.values().min()
    }

    /// Largest interval value in milliseconds.
    pub fn max(&self) -> f64 {
        self.values().max()
    }

    /// Difference between the largest and smallest interval value.
    pub fn amplitude(&self) -> f64 {
        self.max() - self.min()
    }

    /// Root mean square of the interval values.
    pub fn rms(&self) -> f64 {
        (self.values().dot(self.values()) / self.len() as f64).sqrt()
    }

    /// Summarises the interval series as a [`Description`].
    ///
    /// # Examples
    ///
    /// ```
    /// use hrv_rri::rri::RRi;
    ///
    /// let rri = RRi::new(&[800.0, 810.0, 815.0, 750.0]).unwrap();
    /// let description = rri.describe();
    /// assert_eq!(description.get("amplitude"), Some(65.0));
    /// assert_eq!(format!("{description}"), "description");
    /// ```
    pub fn describe(&self) -> Description {
        Description {
            min: self.min(),
            max: self.max(),
            amplitude: self.amplitude(),
            mean: self.mean(),
            median: self.median(),
            var: self.var(),
            std: self.std(),
        }
    }

    /// Converts the interval series to instantaneous heart rate in beats per
    /// minute (`60000 / rri`).
    ///
    /// The result is a plain vector rather than an `RRi` because the unit
    /// and domain change.
    pub fn to_hr(&self) -> DVector<f64> {
        self.values().map(|value| 60_000.0 / value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FAKE_RRI: [f64; 4] = [800.0, 810.0, 815.0, 750.0];
    // variance() uses the E[x^2] - E[x]^2 form, so allow for cancellation
    // error at millisecond magnitudes
    const TOL: f64 = 1e-6;

    fn fake_rri() -> RRi {
        RRi::new(&FAKE_RRI).unwrap()
    }

    #[test]
    fn test_statistical_values() {
        let rri = fake_rri();

        let mean = FAKE_RRI.iter().sum::<f64>() / 4.0;
        let var = FAKE_RRI.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / 4.0;

        assert!((rri.mean() - mean).abs() < TOL);
        assert!((rri.var() - var).abs() < TOL);
        assert!((rri.std() - var.sqrt()).abs() < TOL);
        assert_eq!(rri.median(), 805.0);
        assert_eq!(rri.min(), 750.0);
        assert_eq!(rri.max(), 815.0);
        assert_eq!(rri.amplitude(), 65.0);

        let rms = (FAKE_RRI.iter().map(|v| v * v).sum::<f64>() / 4.0).sqrt();
        assert!((rri.rms() - rms).abs() < TOL);
    }

    #[test]
    fn test_median_odd_length() {
        let rri = RRi::new(&[800.0, 810.0, 815.0]).unwrap();
        assert_eq!(rri.median(), 810.0);
    }

    #[test]
    fn test_describe_keys_and_values() {
        let rri = fake_rri();
        let description = rri.describe();

        let keys: Vec<&str> = description.iter().map(|(key, _)| key).collect();
        assert_eq!(keys, Description::KEYS);

        assert_eq!(description.get("min"), Some(rri.min()));
        assert_eq!(description.get("max"), Some(rri.max()));
        assert_eq!(description.get("amplitude"), Some(rri.amplitude()));
        assert_eq!(description.get("mean"), Some(rri.mean()));
        assert_eq!(description.get("median"), Some(rri.median()));
        assert_eq!(description.get("var"), Some(rri.var()));
        assert_eq!(description.get("std"), Some(rri.std()));
        assert_eq!(description.get("rms"), None);
    }

    #[test]
    fn test_describe_display_label() {
        let description = fake_rri().describe();
        assert_eq!(format!("{description}"), "description");
    }

    #[test]
    fn test_to_hr() {
        let rri = fake_rri();
        let heart_rate = rri.to_hr();
        let expected = [75.0, 74.07407407, 73.6196319, 80.0];

        assert_eq!(heart_rate.len(), rri.len());
        for (hr, exp) in heart_rate.iter().zip(expected.iter()) {
            assert!((hr - exp).abs() < 1e-6, "expected {exp}, got {hr}");
        }
    }

    #[test]
    fn test_median_empty_is_nan() {
        let empty = DVector::<f64>::zeros(0);
        assert!(median(&empty).is_nan());
    }
}
