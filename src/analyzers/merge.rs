//! Joins each day with the sum of its hourly counts.

use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

use crate::records::{HourlyRecord, RentalRecord};

/// A daily record with its hourly total attached.
#[derive(Debug, Clone, PartialEq)]
pub struct MergedDay {
    pub record: RentalRecord,
    pub hourly_cnt: Option<u64>,
}

/// CSV layout of the merged table: the daily columns plus `hourly_cnt`.
#[derive(Debug, Serialize)]
pub struct MergedRow {
    pub instant: Option<u32>,
    pub dteday: NaiveDate,
    pub season: u8,
    pub yr: Option<u8>,
    pub mnth: Option<u8>,
    pub holiday: u8,
    pub weekday: Option<u8>,
    pub workingday: Option<u8>,
    pub weathersit: u8,
    pub temp: f64,
    pub atemp: Option<f64>,
    pub hum: f64,
    pub windspeed: Option<f64>,
    pub casual: Option<u32>,
    pub registered: Option<u32>,
    pub cnt: u32,
    pub hourly_cnt: Option<u64>,
}

impl From<&MergedDay> for MergedRow {
    fn from(day: &MergedDay) -> Self {
        let row = day.record.to_row();
        MergedRow {
            instant: row.instant,
            dteday: row.dteday,
            season: row.season,
            yr: row.yr,
            mnth: row.mnth,
            holiday: row.holiday,
            weekday: row.weekday,
            workingday: row.workingday,
            weathersit: row.weathersit,
            temp: row.temp,
            atemp: row.atemp,
            hum: row.hum,
            windspeed: row.windspeed,
            casual: row.casual,
            registered: row.registered,
            cnt: row.cnt,
            hourly_cnt: day.hourly_cnt,
        }
    }
}

/// Sum of hourly counts per date.
pub fn daily_totals(hourly: &[HourlyRecord]) -> HashMap<NaiveDate, u64> {
    let mut totals = HashMap::new();
    for record in hourly {
        *totals.entry(record.date).or_default() += u64::from(record.count);
    }
    totals
}

/// Left join of `daily` with the per-day hourly totals. Days with no hourly
/// rows get `hourly_cnt = None`. Neither input is modified.
pub fn merge_hourly_totals(daily: &[RentalRecord], hourly: &[HourlyRecord]) -> Vec<MergedDay> {
    let totals = daily_totals(hourly);
    daily
        .iter()
        .map(|record| MergedDay {
            record: record.clone(),
            hourly_cnt: totals.get(&record.date).copied(),
        })
        .collect()
}
