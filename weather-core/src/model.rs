use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Base URL for OpenWeather condition icons.
pub const ICON_BASE_URL: &str = "https://openweathermap.org/img/wn";

/// Where to look up the weather: a coordinate pair or a free-text place name.
#[derive(Debug, Clone, PartialEq)]
pub enum Location {
    Coordinates { lat: f64, lon: f64 },
    City(String),
}

impl Location {
    pub fn city(name: impl Into<String>) -> Self {
        Location::City(name.into())
    }

    /// Query parameters identifying this location.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Location::Coordinates { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            Location::City(name) => vec![("q", name.clone())],
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Coordinates { lat, lon } => write!(f, "{lat:.4}, {lon:.4}"),
            Location::City(name) => f.write_str(name),
        }
    }
}

/// Unit system requested from the upstream API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    #[default]
    Metric,
    Imperial,
    Standard,
}

impl Units {
    pub fn as_str(&self) -> &'static str {
        match self {
            Units::Metric => "metric",
            Units::Imperial => "imperial",
            Units::Standard => "standard",
        }
    }

    pub const fn all() -> &'static [Units] {
        &[Units::Metric, Units::Imperial, Units::Standard]
    }

    pub fn temperature_suffix(&self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
            Units::Standard => "K",
        }
    }

    /// Short mark for compact temperatures such as the forecast strip.
    pub fn degree_mark(&self) -> &'static str {
        match self {
            Units::Metric | Units::Imperial => "°",
            Units::Standard => "K",
        }
    }

    pub fn wind_suffix(&self) -> &'static str {
        match self {
            Units::Imperial => "mph",
            Units::Metric | Units::Standard => "m/s",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub pressure_hpa: u32,
    /// Coarse classification such as "Rain" or "Clear".
    pub category: String,
    pub description: String,
    pub icon: String,
    pub place: String,
    pub country: String,
}

/// One sample of the forecast time series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    pub timestamp: DateTime<Utc>,
    /// Upstream label, `YYYY-MM-DD HH:MM:SS`.
    pub label: String,
    pub temp_max: f64,
    pub temp_min: f64,
    pub icon: String,
    pub description: String,
}

/// Result of one successful pipeline run: both requests succeeded.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub current: CurrentConditions,
    pub forecast: Vec<ForecastEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconSize {
    Small,
    Large,
}

pub fn icon_url(icon: &str, size: IconSize) -> String {
    match size {
        IconSize::Small => format!("{ICON_BASE_URL}/{icon}.png"),
        IconSize::Large => format!("{ICON_BASE_URL}/{icon}@2x.png"),
    }
}
