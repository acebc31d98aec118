//! Rental aggregation and dashboard assembly.
//!
//! This module groups rental records by hour and by weather code, computes
//! the headline metrics, and attaches weather labels for the charts.

pub mod aggregate;
pub mod analyzer;
pub mod labels;
pub mod types;
pub mod utility;
