//! Date-range, season and weather filtering.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::categories::{Season, Weather};
use crate::error::Notice;
use crate::parser::Dataset;
use crate::records::Observation;

/// Inclusive date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Smallest range covering every record, or `None` for an empty table.
    pub fn spanning<R: Observation>(records: &[R]) -> Option<Self> {
        let start = records.iter().map(Observation::date).min()?;
        let end = records.iter().map(Observation::date).max()?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    /// Pulls both ends inside `bounds`, the way a bounded date picker would.
    pub fn clamp_to(self, bounds: DateRange) -> Self {
        Self {
            start: self.start.clamp(bounds.start, bounds.end),
            end: self.end.clamp(bounds.start, bounds.end),
        }
    }
}

/// User-selected filter for one dashboard run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalFilter {
    pub range: DateRange,
    pub seasons: BTreeSet<Season>,
    pub weather: BTreeSet<Weather>,
}

impl RentalFilter {
    pub fn new(
        range: DateRange,
        seasons: impl IntoIterator<Item = Season>,
        weather: impl IntoIterator<Item = Weather>,
    ) -> Self {
        Self {
            range,
            seasons: seasons.into_iter().collect(),
            weather: weather.into_iter().collect(),
        }
    }

    /// Full span of `records` with every category that occurs in them selected,
    /// so that applying it returns `records` unchanged.
    pub fn all<R: Observation>(records: &[R]) -> Option<Self> {
        let range = DateRange::spanning(records)?;
        let seasons = Season::ALL
            .into_iter()
            .chain(records.iter().map(Observation::season));
        let weather = Weather::SELECTABLE
            .into_iter()
            .chain(records.iter().map(Observation::weather));
        Some(Self::new(range, seasons, weather))
    }

    /// Builds the filter for user picks against `dataset`. Missing ends default
    /// to the data bounds and both ends are clamped to them; empty category
    /// lists select every category present. Bounds come from the daily table,
    /// or from the hourly table when the daily one has no rows.
    pub fn resolve(
        dataset: &Dataset,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
        seasons: Vec<Season>,
        weather: Vec<Weather>,
    ) -> Self {
        let bounds = DateRange::spanning(&dataset.daily).or_else(|| {
            warn!("Daily table is empty; panels built from it will show notices");
            DateRange::spanning(&dataset.hourly)
        });

        let range = match bounds {
            Some(bounds) => DateRange::new(
                start.unwrap_or(bounds.start),
                end.unwrap_or(bounds.end),
            )
            .clamp_to(bounds),
            None => {
                warn!("Both tables are empty; every panel will show a notice");
                DateRange::new(
                    start.unwrap_or(NaiveDate::MIN),
                    end.unwrap_or(NaiveDate::MAX),
                )
            }
        };

        for season in seasons.iter().filter(|s| matches!(s, Season::Unknown(_))) {
            warn!(%season, "Selected season code has no name");
        }
        for condition in weather.iter().filter(|w| matches!(w, Weather::Unknown(_))) {
            warn!(weather = %condition, "Selected weather code has no name");
        }

        let seasons: BTreeSet<Season> = if seasons.is_empty() {
            dataset.seasons()
        } else {
            seasons.into_iter().collect()
        };
        let weather: BTreeSet<Weather> = if weather.is_empty() {
            dataset.weather()
        } else {
            weather.into_iter().collect()
        };

        Self::new(range, seasons, weather)
    }

    /// Reports an inverted range. The filter still runs; with `end < start`
    /// no date can match, so the result is empty.
    pub fn validate(&self) -> Option<Notice> {
        if self.range.is_inverted() {
            warn!(start = %self.range.start, end = %self.range.end, "End date precedes start date");
            Some(Notice::InvalidRange {
                start: self.range.start,
                end: self.range.end,
            })
        } else {
            None
        }
    }

    pub fn matches<R: Observation>(&self, record: &R) -> bool {
        self.range.contains(record.date())
            && self.seasons.contains(&record.season())
            && self.weather.contains(&record.weather())
    }

    /// Returns the matching records in their original order.
    pub fn apply<R: Observation + Clone>(&self, records: &[R]) -> Vec<R> {
        let filtered: Vec<R> = records.iter().filter(|r| self.matches(*r)).cloned().collect();
        debug!(input = records.len(), output = filtered.len(), "Filter applied");
        filtered
    }
}

/// Free-function form of [`RentalFilter::apply`].
pub fn filter<R: Observation + Clone>(
    records: &[R],
    range: DateRange,
    seasons: &BTreeSet<Season>,
    weather: &BTreeSet<Weather>,
) -> Vec<R> {
    RentalFilter {
        range,
        seasons: seasons.clone(),
        weather: weather.clone(),
    }
    .apply(records)
}
