//! Query result model structs.
//!
//! All structs derive `Serialize` so they can be handed to the UI layer or
//! printed as JSON by the CLI.

use serde::{Serialize, Serializer};
use std::fmt;

/// Rendered when optional data (e.g. `results.csv`) is absent.
pub const PLACEHOLDER_UNAVAILABLE: &str = "—";
/// Rendered when a row references an id that does not resolve.
pub const PLACEHOLDER_UNKNOWN: &str = "Unknown";

/// Outcome of an optional join.
///
/// `Unknown` means the referencing row exists but its foreign key did not
/// resolve; `Unavailable` means the data needed for the join is missing
/// altogether (no results loaded, no winner row, null column).
#[derive(Debug, Clone, PartialEq)]
pub enum Joined<T> {
    Value(T),
    Unknown,
    Unavailable,
}

impl<T> Joined<T> {
    /// `Value` when present, `Unavailable` otherwise.
    pub fn from_option(value: Option<T>) -> Self {
        match value {
            Some(v) => Joined::Value(v),
            None => Joined::Unavailable,
        }
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Joined::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Joined::Value(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Joined<U> {
        match self {
            Joined::Value(v) => Joined::Value(f(v)),
            Joined::Unknown => Joined::Unknown,
            Joined::Unavailable => Joined::Unavailable,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Joined<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Joined::Value(v) => write!(f, "{}", v),
            Joined::Unknown => f.write_str(PLACEHOLDER_UNKNOWN),
            Joined::Unavailable => f.write_str(PLACEHOLDER_UNAVAILABLE),
        }
    }
}

impl<T: Serialize> Serialize for Joined<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Joined::Value(v) => v.serialize(serializer),
            Joined::Unknown => serializer.serialize_str(PLACEHOLDER_UNKNOWN),
            Joined::Unavailable => serializer.serialize_str(PLACEHOLDER_UNAVAILABLE),
        }
    }
}

/// One row of the season race results table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RaceRow {
    pub race_id: i64,
    pub round: i64,
    /// Grand prix name, e.g. "Bahrain Grand Prix".
    pub grand_prix: String,
    /// Display date ("28 Mar 2021"), empty when the CSV has none.
    pub date: String,
    pub winner: Joined<String>,
    pub team: Joined<String>,
    pub laps: Joined<i64>,
    pub time: Joined<String>,
}

/// End-of-season driver championship row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DriverStandingRow {
    pub position: i64,
    pub driver_id: i64,
    pub driver: Joined<String>,
    pub nationality: Joined<String>,
    /// Constructor the driver raced for in the season's final race.
    pub team: Joined<String>,
    pub points: Joined<f64>,
    pub wins: Joined<i64>,
}

/// End-of-season constructor championship row.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConstructorStandingRow {
    pub position: i64,
    pub constructor_id: i64,
    pub team: Joined<String>,
    pub nationality: Joined<String>,
    pub points: Joined<f64>,
    pub wins: Joined<i64>,
}

/// A race as drawn on the season timeline.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimelineRace {
    pub race_id: i64,
    pub season: i32,
    pub round: i64,
    pub name: String,
    pub date: String,
    /// "Location, Country" of the circuit, or "Unknown".
    pub circuit_label: String,
    /// Constructor of the race winner, when results are loaded.
    pub winner_constructor_id: Option<i64>,
}

/// A constructor taking part in a season.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConstructorInfo {
    pub constructor_id: i64,
    pub name: String,
}

/// Fastest lap of a race.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FastestLap {
    pub driver: Joined<String>,
    pub time: Joined<String>,
    pub lap: Joined<i64>,
    /// Average speed with unit, e.g. "207.235 km/h".
    pub speed: Option<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PodiumEntry {
    pub position: i64,
    pub driver: Joined<String>,
}

/// Everything the race details popup shows.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RaceDetails {
    pub race_id: i64,
    pub season: i32,
    pub name: String,
    pub date: String,
    pub winner: Joined<String>,
    pub team: Joined<String>,
    pub fastest_lap: Option<FastestLap>,
    pub podium: Vec<PodiumEntry>,
}

/// One driver's starting and finishing position in a race.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GridEntry {
    pub driver_id: i64,
    pub driver_name: String,
    pub constructor_name: String,
    pub grid: i64,
    /// `None` when the driver did not finish.
    pub position: Option<i64>,
}

/// Race choice for the grid chart race dropdown.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RaceOption {
    pub race_id: i64,
    pub label: String,
}

/// A race placed on the circuit map.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapRace {
    pub race_id: i64,
    pub season: i32,
    pub round: i64,
    pub name: String,
    pub circuit_name: String,
    /// Country name normalized to the world outline's naming.
    pub country: String,
    pub lat: f64,
    pub lng: f64,
}

/// "Forename Surname", or `None` when both parts are blank.
pub fn driver_full_name(forename: Option<&str>, surname: Option<&str>) -> Option<String> {
    let name = format!("{} {}", forename.unwrap_or(""), surname.unwrap_or(""));
    let name = name.trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// "Forename Surname (ABC)" using the first three letters of the driver ref.
pub fn driver_name_with_code(
    forename: Option<&str>,
    surname: Option<&str>,
    driver_ref: Option<&str>,
) -> String {
    let name = format!("{} {}", forename.unwrap_or(""), surname.unwrap_or(""));
    let abbr: String = driver_ref
        .unwrap_or("")
        .to_uppercase()
        .chars()
        .take(3)
        .collect();
    if abbr.is_empty() {
        name
    } else {
        format!("{} ({})", name, abbr)
    }
}

/// Map CSV country names onto the names used by the world outline.
pub fn normalize_country(name: &str) -> String {
    match name {
        "UK" => "United Kingdom".to_string(),
        "USA" => "United States of America".to_string(),
        "UAE" => "United Arab Emirates".to_string(),
        "Korea" => "South Korea".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joined_display_uses_placeholders() {
        assert_eq!(Joined::Value(56).to_string(), "56");
        assert_eq!(Joined::<i64>::Unknown.to_string(), "Unknown");
        assert_eq!(Joined::<i64>::Unavailable.to_string(), "—");
    }

    #[test]
    fn joined_serializes_placeholders_as_text() {
        let json = serde_json::to_string(&vec![
            Joined::Value("Ferrari".to_string()),
            Joined::Unknown,
            Joined::Unavailable,
        ])
        .unwrap();
        assert_eq!(json, r#"["Ferrari","Unknown","—"]"#);
    }

    #[test]
    fn driver_names() {
        assert_eq!(
            driver_full_name(Some("Lewis"), Some("Hamilton")).as_deref(),
            Some("Lewis Hamilton")
        );
        assert_eq!(driver_full_name(None, Some(" ")), None);
        assert_eq!(
            driver_name_with_code(Some("Max"), Some("Verstappen"), Some("max_verstappen")),
            "Max Verstappen (MAX)"
        );
        assert_eq!(driver_name_with_code(Some("Nino"), Some("Farina"), None), "Nino Farina");
    }

    #[test]
    fn countries_are_normalized() {
        assert_eq!(normalize_country("UK"), "United Kingdom");
        assert_eq!(normalize_country("Korea"), "South Korea");
        assert_eq!(normalize_country("Italy"), "Italy");
    }
}
