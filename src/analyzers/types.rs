//! Data types produced by the analysis pipeline.

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::categories::{Season, Weather};
use crate::error::Notice;

/// Coarse time bucket used as the first grouping key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PeriodBucket {
    Month { year: i32, month: u32 },
    Hour(u8),
}

impl Serialize for PeriodBucket {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PeriodBucket::Month { year, month } => {
                serializer.serialize_str(&format!("{year:04}-{month:02}"))
            }
            PeriodBucket::Hour(hour) => serializer.serialize_u8(*hour),
        }
    }
}

/// Categorical field a record can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Season,
    Weather,
    Holiday,
}

/// Value of a [`GroupKey`] for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupValue {
    Season(Season),
    Weather(Weather),
    Holiday(bool),
}

/// Summed rentals for one (period, keys...) combination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggregateRow {
    pub period: PeriodBucket,
    pub keys: Vec<GroupValue>,
    pub total: u64,
}

/// Ordinal score assigned by tertile binning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// Label for `bin` out of `bins` when larger values score higher.
    pub fn ascending(bin: usize, bins: usize) -> Self {
        match (bins, bin) {
            (3, 0) => Tier::Low,
            (3, 1) => Tier::Medium,
            (3, _) => Tier::High,
            (2, 0) => Tier::Low,
            (2, _) => Tier::High,
            _ => Tier::Medium,
        }
    }

    /// Label for `bin` out of `bins` when smaller values score higher.
    pub fn descending(bin: usize, bins: usize) -> Self {
        Self::ascending(bins.saturating_sub(1).saturating_sub(bin), bins)
    }
}

/// RFM fields derived for one daily record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmRow {
    #[serde(rename = "dteday")]
    pub date: NaiveDate,
    #[serde(rename = "Recency")]
    pub recency: i64,
    #[serde(rename = "Frequency")]
    pub frequency: u32,
    #[serde(rename = "Monetary")]
    pub monetary: u32,
    #[serde(rename = "Recency_Score")]
    pub recency_score: Tier,
    #[serde(rename = "Frequency_Score")]
    pub frequency_score: Tier,
    #[serde(rename = "Monetary_Score")]
    pub monetary_score: Tier,
}

/// Result of an RFM pass over one filtered set.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmReport {
    pub reference_date: NaiveDate,
    pub rows: Vec<RfmRow>,
    pub notices: Vec<Notice>,
}

impl RfmReport {
    pub fn head(&self, n: usize) -> &[RfmRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}

/// Equal-width histogram bin, `[start, end)` except the last which is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}
