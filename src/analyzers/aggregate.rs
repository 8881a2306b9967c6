use crate::analyzers::types::{AggregateRow, GroupKey, GroupValue, PeriodBucket};
use crate::records::{HourlyRecord, Observation};
use chrono::Datelike;
use std::collections::BTreeMap;

/// Calendar-month bucket of a record's date.
pub fn month<R: Observation>(record: &R) -> PeriodBucket {
    let date = record.date();
    PeriodBucket::Month {
        year: date.year(),
        month: date.month(),
    }
}

/// Hour-of-day bucket of an hourly record.
pub fn hour_of_day(record: &HourlyRecord) -> PeriodBucket {
    PeriodBucket::Hour(record.hour)
}

impl GroupKey {
    pub fn value_of<R: Observation>(self, record: &R) -> GroupValue {
        match self {
            GroupKey::Season => GroupValue::Season(record.season()),
            GroupKey::Weather => GroupValue::Weather(record.weather()),
            GroupKey::Holiday => GroupValue::Holiday(record.holiday()),
        }
    }
}

/// Groups `records` by `(period(record), keys...)` and sums their counts.
///
/// Rows come out ordered by period, then by each key's natural order.
/// Empty input gives empty output.
pub fn aggregate_by_period<R, F>(records: &[R], period: F, keys: &[GroupKey]) -> Vec<AggregateRow>
where
    R: Observation,
    F: Fn(&R) -> PeriodBucket,
{
    let mut totals: BTreeMap<(PeriodBucket, Vec<GroupValue>), u64> = BTreeMap::new();

    for record in records {
        let group: Vec<GroupValue> = keys.iter().map(|k| k.value_of(record)).collect();
        *totals.entry((period(record), group)).or_default() += u64::from(record.count());
    }

    totals
        .into_iter()
        .map(|((period, keys), total)| AggregateRow {
            period,
            keys,
            total,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::{Season, Weather};
    use crate::records::{DayExtras, RentalRecord};
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32, season: Season, weather: Weather, count: u32) -> RentalRecord {
        RentalRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            season,
            weather,
            temperature: 0.5,
            humidity: 0.5,
            holiday: false,
            count,
            extras: DayExtras::default(),
        }
    }

    fn hour(h: u8, holiday: bool, weather: Weather, count: u32) -> HourlyRecord {
        HourlyRecord {
            date: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            hour: h,
            season: Season::Spring,
            weather,
            temperature: 0.2,
            humidity: 0.8,
            holiday,
            count,
        }
    }

    #[test]
    fn test_monthly_totals_without_keys() {
        let records = vec![
            day(2011, 2, 1, Season::Spring, Weather::Clear, 10),
            day(2011, 1, 1, Season::Spring, Weather::Clear, 5),
            day(2011, 1, 2, Season::Spring, Weather::Cloudy, 7),
        ];
        let rows = aggregate_by_period(&records, month, &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period, PeriodBucket::Month { year: 2011, month: 1 });
        assert_eq!(rows[0].total, 12);
        assert_eq!(rows[1].total, 10);
    }

    #[test]
    fn test_monthly_totals_by_season_and_weather() {
        let records = vec![
            day(2011, 3, 1, Season::Spring, Weather::Cloudy, 4),
            day(2011, 3, 2, Season::Spring, Weather::Clear, 6),
            day(2011, 3, 25, Season::Summer, Weather::Clear, 9),
            day(2011, 3, 3, Season::Spring, Weather::Clear, 1),
        ];
        let rows = aggregate_by_period(&records, month, &[GroupKey::Season, GroupKey::Weather]);

        let summary: Vec<_> = rows.iter().map(|r| (r.keys.clone(), r.total)).collect();
        assert_eq!(
            summary,
            vec![
                (
                    vec![
                        GroupValue::Season(Season::Spring),
                        GroupValue::Weather(Weather::Clear)
                    ],
                    7
                ),
                (
                    vec![
                        GroupValue::Season(Season::Spring),
                        GroupValue::Weather(Weather::Cloudy)
                    ],
                    4
                ),
                (
                    vec![
                        GroupValue::Season(Season::Summer),
                        GroupValue::Weather(Weather::Clear)
                    ],
                    9
                ),
            ]
        );
    }

    #[test]
    fn test_hourly_by_holiday_conserves_total() {
        let records = vec![
            hour(8, false, Weather::Clear, 100),
            hour(8, true, Weather::Clear, 20),
            hour(17, false, Weather::Cloudy, 150),
            hour(8, false, Weather::Cloudy, 30),
        ];
        let rows = aggregate_by_period(&records, hour_of_day, &[GroupKey::Holiday]);

        assert!(rows.len() <= records.len());
        let total: u64 = rows.iter().map(|r| r.total).sum();
        assert_eq!(total, 300);
        assert_eq!(rows[0].period, PeriodBucket::Hour(8));
        assert_eq!(rows[0].keys, vec![GroupValue::Holiday(false)]);
        assert_eq!(rows[0].total, 130);
    }

    #[test]
    fn test_unknown_weather_sorts_last() {
        let records = vec![
            hour(3, false, Weather::Unknown(9), 1),
            hour(3, false, Weather::Extreme, 2),
            hour(3, false, Weather::Clear, 3),
        ];
        let rows = aggregate_by_period(&records, hour_of_day, &[GroupKey::Weather]);
        let keys: Vec<_> = rows.iter().map(|r| r.keys[0]).collect();
        assert_eq!(
            keys,
            vec![
                GroupValue::Weather(Weather::Clear),
                GroupValue::Weather(Weather::Extreme),
                GroupValue::Weather(Weather::Unknown(9)),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        let records: Vec<RentalRecord> = Vec::new();
        assert!(aggregate_by_period(&records, month, &[GroupKey::Season]).is_empty());
    }
}
