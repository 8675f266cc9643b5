//! Restaurant launch forecasting.
//!
//! Loads pre-trained rating, sales, success, city and month models, encodes a
//! restaurant profile into their feature vectors, runs the stages in
//! dependency order and composes the resulting report.

pub mod config;
pub mod error;
pub mod forecast;
pub mod telemetry;
