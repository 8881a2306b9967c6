//! Row types for the daily and hourly rental tables.
//!
//! `DayRow` and `HourRow` mirror the CSV columns one to one (codes and 0/1
//! flags as stored). [`RentalRecord`] and [`HourlyRecord`] are the validated
//! forms the rest of the crate works with.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::categories::{Season, Weather};

/// One line of `day.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DayRow {
    #[serde(default)]
    pub instant: Option<u32>,
    pub dteday: NaiveDate,
    pub season: u8,
    #[serde(default)]
    pub yr: Option<u8>,
    #[serde(default)]
    pub mnth: Option<u8>,
    pub holiday: u8,
    #[serde(default)]
    pub weekday: Option<u8>,
    #[serde(default)]
    pub workingday: Option<u8>,
    pub weathersit: u8,
    pub temp: f64,
    #[serde(default)]
    pub atemp: Option<f64>,
    pub hum: f64,
    #[serde(default)]
    pub windspeed: Option<f64>,
    #[serde(default)]
    pub casual: Option<u32>,
    #[serde(default)]
    pub registered: Option<u32>,
    pub cnt: u32,
}

/// One line of `hour.csv`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct HourRow {
    #[serde(default)]
    pub instant: Option<u32>,
    pub dteday: NaiveDate,
    pub season: u8,
    pub hr: u8,
    pub holiday: u8,
    pub weathersit: u8,
    pub temp: f64,
    pub hum: f64,
    pub cnt: u32,
}

/// Columns of the daily table that no analysis reads but the merged export
/// writes back out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayExtras {
    pub instant: Option<u32>,
    pub yr: Option<u8>,
    pub mnth: Option<u8>,
    pub weekday: Option<u8>,
    pub workingday: Option<u8>,
    pub atemp: Option<f64>,
    pub windspeed: Option<f64>,
    pub casual: Option<u32>,
    pub registered: Option<u32>,
}

/// A day of rentals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentalRecord {
    pub date: NaiveDate,
    pub season: Season,
    pub weather: Weather,
    pub temperature: f64,
    pub humidity: f64,
    pub holiday: bool,
    pub count: u32,
    #[serde(skip)]
    pub extras: DayExtras,
}

impl From<DayRow> for RentalRecord {
    fn from(row: DayRow) -> Self {
        RentalRecord {
            date: row.dteday,
            season: Season::from_code(row.season),
            weather: Weather::from_code(row.weathersit),
            temperature: row.temp,
            humidity: row.hum,
            holiday: row.holiday != 0,
            count: row.cnt,
            extras: DayExtras {
                instant: row.instant,
                yr: row.yr,
                mnth: row.mnth,
                weekday: row.weekday,
                workingday: row.workingday,
                atemp: row.atemp,
                windspeed: row.windspeed,
                casual: row.casual,
                registered: row.registered,
            },
        }
    }
}

impl RentalRecord {
    /// Rebuilds the CSV row this record was read from.
    pub fn to_row(&self) -> DayRow {
        DayRow {
            instant: self.extras.instant,
            dteday: self.date,
            season: self.season.code(),
            yr: self.extras.yr,
            mnth: self.extras.mnth,
            holiday: u8::from(self.holiday),
            weekday: self.extras.weekday,
            workingday: self.extras.workingday,
            weathersit: self.weather.code(),
            temp: self.temperature,
            atemp: self.extras.atemp,
            hum: self.humidity,
            windspeed: self.extras.windspeed,
            casual: self.extras.casual,
            registered: self.extras.registered,
            cnt: self.count,
        }
    }
}

/// One hour of rentals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyRecord {
    pub date: NaiveDate,
    pub hour: u8,
    pub season: Season,
    pub weather: Weather,
    pub temperature: f64,
    pub humidity: f64,
    pub holiday: bool,
    pub count: u32,
}

impl From<HourRow> for HourlyRecord {
    fn from(row: HourRow) -> Self {
        HourlyRecord {
            date: row.dteday,
            hour: row.hr,
            season: Season::from_code(row.season),
            weather: Weather::from_code(row.weathersit),
            temperature: row.temp,
            humidity: row.hum,
            holiday: row.holiday != 0,
            count: row.cnt,
        }
    }
}

/// Fields shared by daily and hourly records, used by filtering and grouping.
pub trait Observation {
    fn date(&self) -> NaiveDate;
    fn season(&self) -> Season;
    fn weather(&self) -> Weather;
    fn holiday(&self) -> bool;
    fn count(&self) -> u32;
}

impl Observation for RentalRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn season(&self) -> Season {
        self.season
    }
    fn weather(&self) -> Weather {
        self.weather
    }
    fn holiday(&self) -> bool {
        self.holiday
    }
    fn count(&self) -> u32 {
        self.count
    }
}

impl Observation for HourlyRecord {
    fn date(&self) -> NaiveDate {
        self.date
    }
    fn season(&self) -> Season {
        self.season
    }
    fn weather(&self) -> Weather {
        self.weather
    }
    fn holiday(&self) -> bool {
        self.holiday
    }
    fn count(&self) -> u32 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day_row() -> DayRow {
        DayRow {
            instant: Some(1),
            dteday: NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(),
            season: 1,
            yr: Some(0),
            mnth: Some(1),
            holiday: 0,
            weekday: Some(6),
            workingday: Some(0),
            weathersit: 2,
            temp: 0.344167,
            atemp: Some(0.363625),
            hum: 0.805833,
            windspeed: Some(0.160446),
            casual: Some(331),
            registered: Some(654),
            cnt: 985,
        }
    }

    #[test]
    fn test_day_row_maps_codes_to_categories() {
        let record = RentalRecord::from(day_row());
        assert_eq!(record.season, Season::Spring);
        assert_eq!(record.weather, Weather::Cloudy);
        assert!(!record.holiday);
        assert_eq!(record.count, 985);
    }

    #[test]
    fn test_to_row_restores_original_columns() {
        let row = day_row();
        let record = RentalRecord::from(row.clone());
        assert_eq!(record.to_row(), row);
    }

    #[test]
    fn test_hour_row_keeps_unknown_weather() {
        let record = HourlyRecord::from(HourRow {
            instant: None,
            dteday: NaiveDate::from_ymd_opt(2011, 1, 26).unwrap(),
            season: 1,
            hr: 16,
            holiday: 1,
            weathersit: 4,
            temp: 0.22,
            hum: 0.93,
            cnt: 1,
        });
        assert_eq!(record.weather, Weather::Extreme);
        assert!(record.holiday);
    }
}
