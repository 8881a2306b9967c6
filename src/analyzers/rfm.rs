//! Recency / Frequency / Monetary scoring of daily rental records.
//!
//! Scores are relative to the set passed in: every call recomputes the
//! reference date and the bin edges.

use tracing::{debug, instrument, warn};

use crate::analyzers::tertile::{coarse_bins, tertile_bins};
use crate::analyzers::types::{RfmReport, RfmRow, Tier};
use crate::error::{AnalyticsError, Notice, Result};
use crate::records::RentalRecord;

/// Direction in which a dimension is scored.
#[derive(Debug, Clone, Copy)]
enum Ranking {
    /// Larger values score higher.
    Ascending,
    /// Smaller values score higher.
    Descending,
}

/// Computes RFM values and tertile scores for `records`.
///
/// Recency is the number of days before the latest date in `records`.
/// Frequency and Monetary are both the day's rental count.
///
/// # Errors
///
/// Returns [`AnalyticsError::NoData`] for an empty slice. A dimension with
/// too few distinct values for three bins is scored on fewer bins and a
/// [`Notice::BinningDegraded`] is attached instead of failing.
#[instrument(skip(records), fields(rows = records.len()))]
pub fn compute_rfm(records: &[RentalRecord]) -> Result<RfmReport> {
    let reference_date = records
        .iter()
        .map(|r| r.date)
        .max()
        .ok_or(AnalyticsError::NoData)?;

    let recency: Vec<i64> = records
        .iter()
        .map(|r| (reference_date - r.date).num_days())
        .collect();
    let counts: Vec<u32> = records.iter().map(|r| r.count).collect();

    let recency_values: Vec<f64> = recency.iter().map(|&d| d as f64).collect();
    let count_values: Vec<f64> = counts.iter().map(|&c| f64::from(c)).collect();

    let mut notices = Vec::new();
    let recency_scores = score("recency", &recency_values, Ranking::Descending, &mut notices);
    let frequency_scores = score("frequency", &count_values, Ranking::Ascending, &mut notices);
    let monetary_scores = score("monetary", &count_values, Ranking::Ascending, &mut notices);

    let rows = records
        .iter()
        .enumerate()
        .map(|(i, record)| RfmRow {
            date: record.date,
            recency: recency[i],
            frequency: counts[i],
            monetary: counts[i],
            recency_score: recency_scores[i],
            frequency_score: frequency_scores[i],
            monetary_score: monetary_scores[i],
        })
        .collect();

    debug!(%reference_date, notices = notices.len(), "RFM scores computed");

    Ok(RfmReport {
        reference_date,
        rows,
        notices,
    })
}

fn score(
    dimension: &str,
    values: &[f64],
    ranking: Ranking,
    notices: &mut Vec<Notice>,
) -> Vec<Tier> {
    let (bins, bin_count) = match tertile_bins(values) {
        Ok(bins) => (bins, 3),
        Err(e) => {
            let (bins, bin_count) = coarse_bins(values);
            warn!(dimension, error = %e, bins = bin_count, "Falling back to coarse binning");
            notices.push(Notice::BinningDegraded {
                dimension: dimension.to_string(),
                bins: bin_count,
            });
            (bins, bin_count)
        }
    };

    bins.into_iter()
        .map(|bin| match ranking {
            Ranking::Ascending => Tier::ascending(bin, bin_count),
            Ranking::Descending => Tier::descending(bin, bin_count),
        })
        .collect()
}
