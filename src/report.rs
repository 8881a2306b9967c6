//! Assembles the chart-ready data for every dashboard panel.
//!
//! Each panel independently checks for empty input and carries a [`Notice`]
//! instead of data when there is nothing to plot. Rendering is left to the
//! consumer of the serialized [`DashboardReport`].

use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

use crate::analyzers::aggregate::{aggregate_by_period, hour_of_day, month};
use crate::analyzers::rfm::compute_rfm;
use crate::analyzers::types::{
    AggregateRow, GroupKey, GroupValue, HistogramBin, PeriodBucket, RfmRow,
};
use crate::analyzers::utility::{HISTOGRAM_BINS, histogram};
use crate::categories::{Season, Weather};
use crate::error::Notice;
use crate::filter::RentalFilter;
use crate::parser::Dataset;
use crate::records::{HourlyRecord, RentalRecord};

pub const COMMENTARY: &str = "\
### Insight 1: Pengaruh Suhu dan Kelembaban
- Suhu yang lebih tinggi cenderung meningkatkan peminjaman sepeda, sementara kelembaban tinggi mengurangi peminjaman.

### Insight 2: Pengaruh Hari Libur dan Cuaca
- Hari libur meningkatkan peminjaman sepeda, dengan puncaknya pada jam tertentu.

### RFM Analysis Insights:
- Pengguna dengan **Recency tinggi** lebih aktif dan berpotensi lebih mudah dijadikan target promosi.
- Pengguna dengan **Frequency tinggi** adalah pelanggan setia yang dapat diberikan program loyalitas.
- Pengguna dengan **Monetary tinggi** berkontribusi besar pada pendapatan dan dapat diberi penawaran eksklusif.

### Rekomendasi:
- **Recency**: Targetkan pengguna dengan Recency rendah untuk meningkatkan retensi.
- **Frequency**: Berikan program loyalitas untuk pengguna dengan Frequency tinggi.
- **Monetary**: Berikan promosi untuk pengguna dengan Monetary rendah untuk meningkatkan peminjaman.
";

/// Chart data, or the notice to show in its place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "content", rename_all = "snake_case")]
pub enum Panel<T> {
    Ready(T),
    Unavailable { notice: Notice, message: String },
}

impl<T> Panel<T> {
    fn unavailable(notice: Notice) -> Self {
        let message = notice.message();
        Panel::Unavailable { notice, message }
    }

    fn empty(section: &str) -> Self {
        Self::unavailable(Notice::empty(section))
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Panel::Ready(_))
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Panel::Ready(data) => Some(data),
            Panel::Unavailable { .. } => None,
        }
    }
}

/// Options that change how panels are prepared.
#[derive(Debug, Clone, Copy)]
pub struct ReportOptions {
    /// Request a logarithmic count axis for the holiday chart.
    pub log_scale: bool,
    /// Rows shown in the RFM table.
    pub head_rows: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            log_scale: true,
            head_rows: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub temperature: f64,
    pub humidity: f64,
    pub count: u32,
    pub weather: Weather,
    pub season: Season,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourPoint {
    pub hour: u8,
    pub total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<HourPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolidayChart {
    pub series: Vec<Series>,
    /// True only when requested and every plotted total is positive.
    pub log_scale: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmHistograms {
    pub recency: Vec<HistogramBin>,
    pub frequency: Vec<HistogramBin>,
    pub monetary: Vec<HistogramBin>,
}

/// Everything the dashboard shows for one filter.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    pub filter: RentalFilter,
    pub notices: Vec<Notice>,
    pub filtered_table: Panel<Vec<RentalRecord>>,
    pub monthly: Panel<Vec<AggregateRow>>,
    pub scatter: Panel<Vec<ScatterPoint>>,
    pub hourly_by_holiday: Panel<HolidayChart>,
    pub hourly_by_weather: Panel<Vec<Series>>,
    pub rfm_histograms: Panel<RfmHistograms>,
    pub rfm_head: Panel<Vec<RfmRow>>,
    pub commentary: &'static str,
}

/// Runs the whole pipeline for `filter` over `dataset`.
#[instrument(skip(dataset, filter), fields(daily = dataset.daily.len(), hourly = dataset.hourly.len()))]
pub fn build_report(
    dataset: &Dataset,
    filter: &RentalFilter,
    options: ReportOptions,
) -> DashboardReport {
    let mut notices: Vec<Notice> = filter.validate().into_iter().collect();

    let daily = filter.apply(&dataset.daily);
    let hourly = filter.apply(&dataset.hourly);

    let (rfm_histograms, rfm_head) = rfm_panels(&daily, options.head_rows, &mut notices);

    let report = DashboardReport {
        filter: filter.clone(),
        filtered_table: table_panel(&daily),
        monthly: monthly_panel(&daily),
        scatter: scatter_panel(&daily),
        hourly_by_holiday: holiday_panel(&hourly, options.log_scale),
        hourly_by_weather: weather_panel(&hourly),
        rfm_histograms,
        rfm_head,
        notices,
        commentary: COMMENTARY,
    };

    info!(
        daily_rows = daily.len(),
        hourly_rows = hourly.len(),
        notices = report.notices.len(),
        "Dashboard report built"
    );

    report
}

fn table_panel(daily: &[RentalRecord]) -> Panel<Vec<RentalRecord>> {
    if daily.is_empty() {
        return Panel::empty("filtered_table");
    }
    Panel::Ready(daily.to_vec())
}

fn monthly_panel(daily: &[RentalRecord]) -> Panel<Vec<AggregateRow>> {
    let rows = aggregate_by_period(daily, month, &[GroupKey::Season, GroupKey::Weather]);
    if rows.is_empty() {
        return Panel::empty("monthly");
    }
    Panel::Ready(rows)
}

fn scatter_panel(daily: &[RentalRecord]) -> Panel<Vec<ScatterPoint>> {
    if daily.is_empty() {
        return Panel::empty("scatter");
    }
    Panel::Ready(
        daily
            .iter()
            .map(|r| ScatterPoint {
                temperature: r.temperature,
                humidity: r.humidity,
                count: r.count,
                weather: r.weather,
                season: r.season,
            })
            .collect(),
    )
}

/// Splits hour-of-day aggregates into one series per value of the single
/// grouping key, keeping the key order.
fn split_series(rows: Vec<AggregateRow>, label: impl Fn(&GroupValue) -> String) -> Vec<Series> {
    let mut grouped: BTreeMap<GroupValue, Vec<HourPoint>> = BTreeMap::new();
    for row in rows {
        let (PeriodBucket::Hour(hour), Some(key)) = (row.period, row.keys.first().copied()) else {
            continue;
        };
        grouped.entry(key).or_default().push(HourPoint {
            hour,
            total: row.total,
        });
    }
    grouped
        .into_iter()
        .map(|(key, points)| Series {
            label: label(&key),
            points,
        })
        .collect()
}

fn holiday_panel(hourly: &[HourlyRecord], log_scale: bool) -> Panel<HolidayChart> {
    let rows = aggregate_by_period(hourly, hour_of_day, &[GroupKey::Holiday]);
    if rows.is_empty() {
        return Panel::empty("hourly_by_holiday");
    }

    let series = split_series(rows, |key| match key {
        GroupValue::Holiday(true) => "Hari Libur".to_string(),
        _ => "Hari Kerja".to_string(),
    });
    let positive = series
        .iter()
        .flat_map(|s| &s.points)
        .all(|p| p.total > 0);

    Panel::Ready(HolidayChart {
        series,
        log_scale: log_scale && positive,
    })
}

fn weather_panel(hourly: &[HourlyRecord]) -> Panel<Vec<Series>> {
    let rows = aggregate_by_period(hourly, hour_of_day, &[GroupKey::Weather]);
    if rows.is_empty() {
        return Panel::empty("hourly_by_weather");
    }

    Panel::Ready(split_series(rows, |key| match key {
        GroupValue::Weather(weather) => weather.label(),
        other => format!("{other:?}"),
    }))
}

fn rfm_panels(
    daily: &[RentalRecord],
    head_rows: usize,
    notices: &mut Vec<Notice>,
) -> (Panel<RfmHistograms>, Panel<Vec<RfmRow>>) {
    let report = match compute_rfm(daily) {
        Ok(report) => report,
        Err(e) => {
            debug!(error = %e, "RFM analysis skipped");
            return (Panel::empty("rfm_histograms"), Panel::empty("rfm_head"));
        }
    };

    notices.extend(report.notices.iter().cloned());

    let recency: Vec<f64> = report.rows.iter().map(|r| r.recency as f64).collect();
    let frequency: Vec<f64> = report.rows.iter().map(|r| f64::from(r.frequency)).collect();
    let monetary: Vec<f64> = report.rows.iter().map(|r| f64::from(r.monetary)).collect();

    let histograms = RfmHistograms {
        recency: histogram(&recency, HISTOGRAM_BINS),
        frequency: histogram(&frequency, HISTOGRAM_BINS),
        monetary: histogram(&monetary, HISTOGRAM_BINS),
    };

    (
        Panel::Ready(histograms),
        Panel::Ready(report.head(head_rows).to_vec()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::DateRange;
    use crate::records::DayExtras;
    use chrono::NaiveDate;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2011, 1, d).unwrap()
    }

    fn dataset() -> Dataset {
        let daily = (1..=6)
            .map(|d| RentalRecord {
                date: date(d),
                season: Season::Spring,
                weather: if d % 2 == 0 { Weather::Cloudy } else { Weather::Clear },
                temperature: 0.1 * f64::from(d),
                humidity: 0.5,
                holiday: d == 3,
                count: 100 * d,
                extras: DayExtras::default(),
            })
            .collect();
        let hourly = vec![
            HourlyRecord {
                date: date(1),
                hour: 8,
                season: Season::Spring,
                weather: Weather::Clear,
                temperature: 0.1,
                humidity: 0.5,
                holiday: false,
                count: 60,
            },
            HourlyRecord {
                date: date(3),
                hour: 8,
                season: Season::Spring,
                weather: Weather::Extreme,
                temperature: 0.3,
                humidity: 0.9,
                holiday: true,
                count: 4,
            },
        ];
        Dataset::new(daily, hourly)
    }

    fn all_filter(dataset: &Dataset) -> RentalFilter {
        RentalFilter::new(
            DateRange::spanning(&dataset.daily).unwrap(),
            Season::ALL,
            [Weather::Clear, Weather::Cloudy, Weather::Severe, Weather::Extreme],
        )
    }

    #[test]
    fn test_full_report_has_every_panel() {
        let dataset = dataset();
        let report = build_report(&dataset, &all_filter(&dataset), ReportOptions::default());

        assert!(report.notices.is_empty());
        assert_eq!(report.filtered_table.ready().unwrap().len(), 6);
        assert!(report.monthly.is_ready());
        assert_eq!(report.scatter.ready().unwrap().len(), 6);
        assert_eq!(report.rfm_head.ready().unwrap().len(), 5);

        let holiday = report.hourly_by_holiday.ready().unwrap();
        let labels: Vec<_> = holiday.series.iter().map(|s| s.label.as_str()).collect();
        assert_eq!(labels, vec!["Hari Kerja", "Hari Libur"]);
        assert!(holiday.log_scale);
    }

    #[test]
    fn test_weather_legend_uses_labels() {
        let dataset = dataset();
        let report = build_report(&dataset, &all_filter(&dataset), ReportOptions::default());
        let labels: Vec<_> = report
            .hourly_by_weather
            .ready()
            .unwrap()
            .iter()
            .map(|s| s.label.clone())
            .collect();
        assert_eq!(labels, vec!["Cuaca Cerah", "Cuaca Sangat Buruk"]);
    }

    #[test]
    fn test_empty_filter_substitutes_notices() {
        let dataset = dataset();
        let filter = RentalFilter::new(
            DateRange::spanning(&dataset.daily).unwrap(),
            [Season::Winter],
            Weather::SELECTABLE,
        );
        let report = build_report(&dataset, &filter, ReportOptions::default());

        assert!(!report.filtered_table.is_ready());
        assert!(!report.monthly.is_ready());
        assert!(!report.scatter.is_ready());
        assert!(!report.hourly_by_holiday.is_ready());
        assert!(!report.hourly_by_weather.is_ready());
        assert!(!report.rfm_histograms.is_ready());
        assert_eq!(
            report.rfm_head,
            Panel::Unavailable {
                notice: Notice::empty("rfm_head"),
                message: Notice::empty("rfm_head").message(),
            }
        );
    }

    #[test]
    fn test_inverted_range_reported() {
        let dataset = dataset();
        let mut filter = all_filter(&dataset);
        filter.range = DateRange::new(date(5), date(2));
        let report = build_report(&dataset, &filter, ReportOptions::default());

        assert!(matches!(report.notices[0], Notice::InvalidRange { .. }));
        assert!(!report.filtered_table.is_ready());
    }

    #[test]
    fn test_report_serializes_to_json() {
        let dataset = dataset();
        let report = build_report(&dataset, &all_filter(&dataset), ReportOptions::default());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["monthly"]["status"], "ready");
        assert_eq!(json["monthly"]["content"][0]["period"], "2011-01");
    }
}
