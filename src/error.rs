//! Error and notice types for the analytics pipeline.
//!
//! [`AnalyticsError`] covers failures that stop an operation (bad input files,
//! broken invariants, binning that cannot be performed). [`Notice`] covers the
//! recoverable conditions a dashboard shows in place of a chart.

use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// Errors raised while loading or analysing rental tables.
#[derive(Debug, thiserror::Error)]
pub enum AnalyticsError {
    /// Returned when an input file does not exist or is unreadable.
    #[error("cannot open {path}")]
    Open {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV reader rejects a record.
    #[error("CSV parse error at line {line}")]
    Csv {
        /// One-based line of the offending record (0 when unknown).
        line: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when two daily rows share a date. Lines are one-based with
    /// the header on line 1, matching [`AnalyticsError::Csv`].
    #[error("duplicate date {date} in daily table (lines {first_line} and {second_line})")]
    DuplicateDate {
        date: NaiveDate,
        first_line: u64,
        second_line: u64,
    },

    /// Returned when two hourly rows share a (date, hour) pair.
    #[error("duplicate hour {hour} on {date} in hourly table")]
    DuplicateHour { date: NaiveDate, hour: u8 },

    /// Returned when an hourly row has an hour outside 0..=23.
    #[error("hour {hour} out of range on {date} (line {line})")]
    HourOutOfRange {
        date: NaiveDate,
        hour: u8,
        line: u64,
    },

    /// Returned when an operation that needs rows receives none.
    #[error("no data matches the selected filter")]
    NoData,

    /// Returned when a column cannot be split into three quantile bins.
    #[error("cannot split {values} values into 3 quantile bins: only {distinct} distinct")]
    Binning { values: usize, distinct: usize },
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;

/// A user-visible, non-fatal condition attached to a dashboard run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A panel had no rows to work with after filtering.
    EmptyResult { section: String },
    /// The requested end date precedes the start date.
    InvalidRange { start: NaiveDate, end: NaiveDate },
    /// An RFM dimension fell back to fewer than three bins.
    BinningDegraded { dimension: String, bins: usize },
}

impl Notice {
    pub fn empty(section: &str) -> Self {
        Notice::EmptyResult {
            section: section.to_string(),
        }
    }

    /// Message shown in place of the panel.
    pub fn message(&self) -> String {
        match self {
            Notice::EmptyResult { section } => {
                format!("Tidak ada data yang cocok dengan filter yang dipilih ({section}).")
            }
            Notice::InvalidRange { start, end } => format!(
                "Tanggal selesai ({end}) tidak boleh lebih kecil dari tanggal mulai ({start})."
            ),
            Notice::BinningDegraded { dimension, bins } => format!(
                "Not enough distinct {dimension} values for 3 score bins; using {bins}."
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_notice_mentions_section() {
        let notice = Notice::empty("monthly");
        assert!(notice.message().contains("monthly"));
    }

    #[test]
    fn test_notice_serializes_with_kind_tag() {
        let notice = Notice::BinningDegraded {
            dimension: "recency".into(),
            bins: 2,
        };
        let json = serde_json::to_value(&notice).unwrap();
        assert_eq!(json["kind"], "binning_degraded");
        assert_eq!(json["bins"], 2);
    }
}
