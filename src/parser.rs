//! CSV loader for the daily and hourly rental tables.

use flate2::read::GzDecoder;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::categories::{Season, Weather};
use crate::error::{AnalyticsError, Result};
use crate::records::{DayRow, HourRow, HourlyRecord, RentalRecord};

/// Both raw tables, read once and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub daily: Vec<RentalRecord>,
    pub hourly: Vec<HourlyRecord>,
}

impl Dataset {
    pub fn new(daily: Vec<RentalRecord>, hourly: Vec<HourlyRecord>) -> Self {
        Self { daily, hourly }
    }

    /// The four named seasons plus any other code found in either table.
    pub fn seasons(&self) -> BTreeSet<Season> {
        Season::ALL
            .into_iter()
            .chain(self.daily.iter().map(|r| r.season))
            .chain(self.hourly.iter().map(|r| r.season))
            .collect()
    }

    /// The selectable weather conditions plus any other code found in either table.
    pub fn weather(&self) -> BTreeSet<Weather> {
        Weather::SELECTABLE
            .into_iter()
            .chain(self.daily.iter().map(|r| r.weather))
            .chain(self.hourly.iter().map(|r| r.weather))
            .collect()
    }
}

/// Loads `day.csv` and `hour.csv` (either may be gzip-compressed with a `.gz`
/// extension).
#[instrument(skip_all, fields(day = %day_path.display(), hour = %hour_path.display()))]
pub fn load_dataset(day_path: &Path, hour_path: &Path) -> Result<Dataset> {
    let daily = parse_daily(open_table(day_path)?)?;
    let hourly = parse_hourly(open_table(hour_path)?)?;

    info!(
        daily_rows = daily.len(),
        hourly_rows = hourly.len(),
        "Rental tables loaded"
    );

    Ok(Dataset::new(daily, hourly))
}

/// Opens a table for reading, transparently decompressing `.gz` files.
pub fn open_table(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| AnalyticsError::Open {
        path: path.to_path_buf(),
        source: e,
    })?;
    let reader = BufReader::new(file);

    if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!(path = %path.display(), "Reading gzip-compressed table");
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Parses the daily table, enforcing one row per date.
pub fn parse_daily<R: Read>(reader: R) -> Result<Vec<RentalRecord>> {
    let rows: Vec<DayRow> = read_rows(reader)?;
    let mut seen: HashMap<chrono::NaiveDate, u64> = HashMap::new();
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        let line = data_line(index);
        if let Some(&first_line) = seen.get(&row.dteday) {
            return Err(AnalyticsError::DuplicateDate {
                date: row.dteday,
                first_line,
                second_line: line,
            });
        }
        seen.insert(row.dteday, line);

        let record = RentalRecord::from(row);
        note_unknown_codes(record.season, record.weather);
        records.push(record);
    }

    Ok(records)
}

/// Parses the hourly table, enforcing hours in 0..=23 and unique (date, hour) pairs.
pub fn parse_hourly<R: Read>(reader: R) -> Result<Vec<HourlyRecord>> {
    let rows: Vec<HourRow> = read_rows(reader)?;
    let mut seen = HashSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (index, row) in rows.into_iter().enumerate() {
        if row.hr > 23 {
            return Err(AnalyticsError::HourOutOfRange {
                date: row.dteday,
                hour: row.hr,
                line: data_line(index),
            });
        }
        if !seen.insert((row.dteday, row.hr)) {
            return Err(AnalyticsError::DuplicateHour {
                date: row.dteday,
                hour: row.hr,
            });
        }

        let record = HourlyRecord::from(row);
        note_unknown_codes(record.season, record.weather);
        records.push(record);
    }

    Ok(records)
}

/// One-based file line of the `index`-th data record (header is line 1).
fn data_line(index: usize) -> u64 {
    index as u64 + 2
}

fn read_rows<R: Read, T: serde::de::DeserializeOwned>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut rows = Vec::new();

    for result in rdr.deserialize() {
        let row: T = result.map_err(|e| AnalyticsError::Csv {
            line: e.position().map_or(0, |p| p.line()),
            source: e,
        })?;
        rows.push(row);
    }

    Ok(rows)
}

fn note_unknown_codes(season: Season, weather: Weather) {
    if let Season::Unknown(code) = season {
        debug!(code, "Unknown season code");
    }
    if let Weather::Unknown(code) = weather {
        debug!(code, "Unknown weather code");
    }
}
