//! The RR interval series value type.
//!
//! An [`RRi`] pairs an ordered series of beat-to-beat intervals in
//! milliseconds with the time of each beat in seconds, relative to the first
//! beat. Instances are immutable: every transformation (arithmetic,
//! slicing, filtering) returns a freshly validated instance, so the
//! invariants established at construction hold for the lifetime of every
//! value.

pub mod stats;
pub mod validation;

use std::fmt;
use std::ops::{Add, Div, Mul, Range, Sub};

use anyhow::Result;
use nalgebra::DVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub use stats::Description;

/// An immutable RR interval series.
///
/// Holds two equal-length vectors: interval values in milliseconds (all
/// positive) and beat times in seconds (non-negative, strictly increasing,
/// zero only ever at the first position). Both are fixed at construction;
/// the fields are private and there are no mutators, so attempts to
/// reassign them do not compile:
///
/// ```compile_fail
/// use hrv_rri::rri::RRi;
///
/// let mut rri = RRi::new(&[800.0, 810.0]).unwrap();
/// rri.values = nalgebra::DVector::from_element(2, 1.0);
/// ```
///
/// # Examples
///
/// ```
/// use hrv_rri::rri::RRi;
///
/// let rri = RRi::new(&[800.0, 810.0, 815.0, 750.0]).unwrap();
/// assert_eq!(rri.time()[0], 0.0);
/// assert!((rri.time()[3] - 2.375).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RRi {
    values: DVector<f64>,
    time: DVector<f64>,
}

impl RRi {
    /// Builds an `RRi` from raw interval values, deriving the beat times
    /// from the cumulative interval sum.
    ///
    /// Values with a small magnitude (median below 10) are taken to be in
    /// seconds and are normalised to milliseconds; see
    /// [`validation::validate_rri`].
    ///
    /// # Errors
    ///
    /// Returns an error if any interval value is zero or negative.
    pub fn new(rri: &[f64]) -> Result<Self> {
        let values = validation::validate_rri(rri)?;
        let time = validation::create_time_array(&values);
        Ok(Self { values, time })
    }

    /// Builds an `RRi` from raw interval values and an explicit time series.
    ///
    /// # Errors
    ///
    /// Returns an error if any interval value is zero or negative, or if the
    /// time series fails any rule of [`validation::validate_time`].
    pub fn with_time(rri: &[f64], time: &[f64]) -> Result<Self> {
        let values = validation::validate_rri(rri)?;
        let time = validation::validate_time(&values, time)?;
        Ok(Self { values, time })
    }

    /// Interval values in milliseconds.
    pub fn values(&self) -> &DVector<f64> {
        &self.values
    }

    /// Beat times in seconds.
    pub fn time(&self) -> &DVector<f64> {
        &self.time
    }

    /// Number of beats in the series.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Applies `f` to every interval value and wraps the result in a new
    /// `RRi` carrying the original time series.
    ///
    /// The result passes through the full validation pipeline, so a
    /// transform that produces non-positive values is rejected rather than
    /// yielding an instance with broken invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if the transformed values are not a valid interval
    /// series.
    pub fn map<F>(&self, f: F) -> Result<Self>
    where
        F: Fn(f64) -> f64,
    {
        let mapped: Vec<f64> = self.values.iter().map(|&value| f(value)).collect();
        Self::with_time(&mapped, self.time.as_slice())
    }

    /// Raises every interval value to the power `exp`.
    ///
    /// # Panics
    ///
    /// Panics if the result is not a valid interval series.
    pub fn pow(&self, exp: f64) -> Self {
        self.map(|value| value.powf(exp))
            .expect("rri arithmetic produced an invalid series")
    }

    /// Absolute value of every interval.
    ///
    /// # Panics
    ///
    /// Panics if the result is not a valid interval series.
    pub fn abs(&self) -> Self {
        self.map(f64::abs)
            .expect("rri arithmetic produced an invalid series")
    }

    /// A new `RRi` over the beats in `range`, keeping their original times.
    ///
    /// # Panics
    ///
    /// Panics if `range` is out of bounds.
    pub fn slice(&self, range: Range<usize>) -> Self {
        let len = range.end - range.start;
        Self {
            values: self.values.rows(range.start, len).into_owned(),
            time: self.time.rows(range.start, len).into_owned(),
        }
    }

    /// A new `RRi` keeping the beats whose time lies in `[start, end]`
    /// (both bounds inclusive, in seconds).
    ///
    /// # Errors
    ///
    /// Returns an error if the selected beats do not form a valid series.
    ///
    /// # Examples
    ///
    /// ```
    /// use hrv_rri::rri::RRi;
    ///
    /// let rri = RRi::new(&[800.0, 810.0, 815.0, 750.0]).unwrap();
    /// let window = rri.time_range(0.5, 2.0).unwrap();
    /// assert_eq!(window.values().as_slice(), &[810.0, 815.0]);
    /// ```
    pub fn time_range(&self, start: f64, end: f64) -> Result<Self> {
        let (values, time): (Vec<f64>, Vec<f64>) = self
            .values
            .iter()
            .zip(self.time.iter())
            .filter(|(_, &t)| t >= start && t <= end)
            .map(|(&value, &t)| (value, t))
            .unzip();
        Self::with_time(&values, &time)
    }

    /// A new `RRi` with the time series shifted so the first beat is at 0.
    pub fn reset_time(&self) -> Self {
        let mut time = self.time.clone();
        if let Some(first) = time.get(0).copied() {
            time.add_scalar_mut(-first);
        }
        Self {
            values: self.values.clone(),
            time,
        }
    }

    /// Elementwise `values == value`.
    pub fn equal(&self, value: f64) -> DVector<bool> {
        self.values.map(|v| v == value)
    }

    /// Elementwise `values != value`.
    pub fn not_equal(&self, value: f64) -> DVector<bool> {
        self.values.map(|v| v != value)
    }

    /// Elementwise `values > value`.
    pub fn gt(&self, value: f64) -> DVector<bool> {
        self.values.map(|v| v > value)
    }

    /// Elementwise `values >= value`.
    pub fn gt_eq(&self, value: f64) -> DVector<bool> {
        self.values.map(|v| v >= value)
    }

    /// Elementwise `values < value`.
    pub fn lt(&self, value: f64) -> DVector<bool> {
        self.values.map(|v| v < value)
    }

    /// Elementwise `values <= value`.
    pub fn lt_eq(&self, value: f64) -> DVector<bool> {
        self.values.map(|v| v <= value)
    }
}

// Scalar arithmetic applies to the interval values only and keeps the time
// series untouched, so chained transformations stay within the RRi type.
// Results re-enter the validation pipeline; an operation that drives a value
// to zero or below panics, as std::ops cannot surface a Result.

impl Mul<f64> for &RRi {
    type Output = RRi;

    fn mul(self, rhs: f64) -> RRi {
        self.map(|value| value * rhs)
            .expect("rri arithmetic produced an invalid series")
    }
}

impl Mul<f64> for RRi {
    type Output = RRi;

    fn mul(self, rhs: f64) -> RRi {
        &self * rhs
    }
}

impl Add<f64> for &RRi {
    type Output = RRi;

    fn add(self, rhs: f64) -> RRi {
        self.map(|value| value + rhs)
            .expect("rri arithmetic produced an invalid series")
    }
}

impl Add<f64> for RRi {
    type Output = RRi;

    fn add(self, rhs: f64) -> RRi {
        &self + rhs
    }
}

impl Sub<f64> for &RRi {
    type Output = RRi;

    fn sub(self, rhs: f64) -> RRi {
        self.map(|value| value - rhs)
            .expect("rri arithmetic produced an invalid series")
    }
}

impl Sub<f64> for RRi {
    type Output = RRi;

    fn sub(self, rhs: f64) -> RRi {
        &self - rhs
    }
}

impl Div<f64> for &RRi {
    type Output = RRi;

    fn div(self, rhs: f64) -> RRi {
        self.map(|value| value / rhs)
            .expect("rri arithmetic produced an invalid series")
    }
}

impl Div<f64> for RRi {
    type Output = RRi;

    fn div(self, rhs: f64) -> RRi {
        &self / rhs
    }
}

const SUMMARY_THRESHOLD: usize = 1000;
const EDGE_ITEMS: usize = 3;
const LINE_WIDTH: usize = 75;

impl fmt::Display for RRi {
    /// Renders the series as `RRi array([...])`, following the default
    /// array printing of the numeric ecosystem: series longer than 1000
    /// elements are summarised as the first and last three elements around
    /// an ellipsis, scientific notation is used when the shown magnitudes
    /// span more than three orders (or exceed 1e8), and lines wrap at 75
    /// columns with a continuation indent aligned under the opening bracket.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_repr(&self.values))
    }
}

fn format_repr(values: &DVector<f64>) -> String {
    let n = values.len();
    let truncated = n > SUMMARY_THRESHOLD;
    let shown: Vec<f64> = if truncated {
        values
            .iter()
            .take(EDGE_ITEMS)
            .chain(values.iter().skip(n - EDGE_ITEMS))
            .copied()
            .collect()
    } else {
        values.iter().copied().collect()
    };

    let max_abs = shown.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()));
    let min_abs = shown
        .iter()
        .map(|v| v.abs())
        .filter(|&v| v > 0.0)
        .fold(f64::INFINITY, f64::min);
    let scientific = max_abs >= 1e8 || (min_abs.is_finite() && max_abs / min_abs > 1000.0);
    let all_integral = shown.iter().all(|v| v.fract() == 0.0);

    let render = |v: f64| -> String {
        if scientific {
            format_scientific(v)
        } else if all_integral {
            format!("{v}.")
        } else {
            format!("{v}")
        }
    };

    let mut tokens: Vec<String> = Vec::with_capacity(shown.len() + 1);
    if truncated {
        tokens.extend(shown[..EDGE_ITEMS].iter().map(|&v| render(v)));
        tokens.push("...".to_string());
        tokens.extend(shown[EDGE_ITEMS..].iter().map(|&v| render(v)));
    } else {
        tokens.extend(shown.iter().map(|&v| render(v)));
    }

    let mut out = String::from("RRi array([");
    let mut line_len = out.len();
    for (i, token) in tokens.iter().enumerate() {
        if i == 0 {
            out.push_str(token);
            line_len += token.len();
        } else if line_len + 2 + token.len() <= LINE_WIDTH {
            out.push_str(", ");
            out.push_str(token);
            line_len += 2 + token.len();
        } else {
            out.push_str(",\n       ");
            out.push_str(token);
            line_len = 7 + token.len();
        }
    }
    out.push_str("])");
    out
}

/// Formats `v` in scientific notation with a four-digit mantissa fraction
/// and a signed two-digit exponent.
fn format_scientific(v: f64) -> String {
    let formatted = format!("{v:.4e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent: i32 = exponent.parse().unwrap_or(0);
            let sign = if exponent < 0 { '-' } else { '+' };
            format!("{mantissa}e{sign}{:02}", exponent.abs())
        }
        None => formatted,
    }
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawRRi {
    values: Vec<f64>,
    time: Vec<f64>,
}

#[cfg(feature = "serde")]
impl Serialize for RRi {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        RawRRi {
            values: self.values.iter().copied().collect(),
            time: self.time.iter().copied().collect(),
        }
        .serialize(serializer)
    }
}

// Deserialization goes through the constructor so that decoded payloads
// uphold the same invariants as directly constructed instances.
#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for RRi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawRRi::deserialize(deserializer)?;
        RRi::with_time(&raw.values, &raw.time).map_err(serde::de::Error::custom)
    }
}
