//! RR interval (RRi) series for heart rate variability analysis.
//!
//! This crate provides the `RRi` value type: an immutable series of
//! beat-to-beat intervals in milliseconds paired with the time of each beat
//! in seconds. It validates and normalises raw input, derives beat times,
//! and offers arithmetic, elementwise comparison and descriptive statistics
//! over the interval series.

pub mod rri;
