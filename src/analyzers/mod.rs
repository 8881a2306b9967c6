//! Aggregation and scoring over filtered rental records.
//!
//! This module groups records into period buckets for the charts, scores
//! daily records by recency, frequency and monetary value using tertile
//! bins, and joins the daily table with hourly totals.

pub mod aggregate;
pub mod merge;
pub mod rfm;
pub mod tertile;
pub mod types;
pub mod utility;
