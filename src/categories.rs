//! Season and weather categories.
//!
//! Both tables encode these as small integer codes. Codes outside the known
//! range are kept as `Unknown(code)` so that a stray value never breaks a
//! chart legend.

use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
#[error("unrecognised {kind} \"{input}\"")]
pub struct ParseCategoryError {
    kind: &'static str,
    input: String,
}

/// Meteorological season (`season` column, codes 1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
    Unknown(u8),
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Season::Spring,
            2 => Season::Summer,
            3 => Season::Fall,
            4 => Season::Winter,
            other => Season::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Season::Spring => 1,
            Season::Summer => 2,
            Season::Fall => 3,
            Season::Winter => 4,
            Season::Unknown(code) => code,
        }
    }

    /// Dashboard label used in tables and legends.
    pub fn label(self) -> String {
        match self {
            Season::Spring => "Musim Semi".into(),
            Season::Summer => "Musim Panas".into(),
            Season::Fall => "Musim Gugur".into(),
            Season::Winter => "Musim Dingin".into(),
            Season::Unknown(code) => format!("Unknown ({code})"),
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Season {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl FromStr for Season {
    type Err = ParseCategoryError;

    /// Accepts an English name, the dashboard label, or the numeric code.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if let Ok(code) = input.parse::<u8>() {
            return Ok(Season::from_code(code));
        }
        let season = match input.to_lowercase().as_str() {
            "spring" | "musim semi" => Season::Spring,
            "summer" | "musim panas" => Season::Summer,
            "fall" | "autumn" | "musim gugur" => Season::Fall,
            "winter" | "musim dingin" => Season::Winter,
            _ => {
                return Err(ParseCategoryError {
                    kind: "season",
                    input: input.to_string(),
                });
            }
        };
        Ok(season)
    }
}

/// Weather situation (`weathersit` column).
///
/// The dataset documents codes 1-4; most extracts only contain 1-3, so code 4
/// is the "severe+" bucket and anything else is `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Weather {
    Clear,
    Cloudy,
    Severe,
    Extreme,
    Unknown(u8),
}

impl Weather {
    /// Categories offered by the weather selector.
    pub const SELECTABLE: [Weather; 3] = [Weather::Clear, Weather::Cloudy, Weather::Severe];

    pub fn from_code(code: u8) -> Self {
        match code {
            1 => Weather::Clear,
            2 => Weather::Cloudy,
            3 => Weather::Severe,
            4 => Weather::Extreme,
            other => Weather::Unknown(other),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Weather::Clear => 1,
            Weather::Cloudy => 2,
            Weather::Severe => 3,
            Weather::Extreme => 4,
            Weather::Unknown(code) => code,
        }
    }

    pub fn label(self) -> String {
        match self {
            Weather::Clear => "Cuaca Cerah".into(),
            Weather::Cloudy => "Cuaca Berawan".into(),
            Weather::Severe => "Cuaca Buruk".into(),
            Weather::Extreme => "Cuaca Sangat Buruk".into(),
            Weather::Unknown(code) => format!("Unknown ({code})"),
        }
    }
}

impl fmt::Display for Weather {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

impl Serialize for Weather {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.label())
    }
}

impl FromStr for Weather {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let input = s.trim();
        if let Ok(code) = input.parse::<u8>() {
            return Ok(Weather::from_code(code));
        }
        let weather = match input.to_lowercase().as_str() {
            "clear" | "cuaca cerah" => Weather::Clear,
            "cloudy" | "mist" | "cuaca berawan" => Weather::Cloudy,
            "severe" | "light" | "cuaca buruk" => Weather::Severe,
            "extreme" | "heavy" | "cuaca sangat buruk" => Weather::Extreme,
            _ => {
                return Err(ParseCategoryError {
                    kind: "weather",
                    input: input.to_string(),
                });
            }
        };
        Ok(weather)
    }
}
