use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::fmt;
use tracing::{debug, instrument};

use crate::{
    error::WeatherError,
    model::{CurrentConditions, ForecastEntry, Location, Units},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    units: Units,
    lang: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::default(),
            lang: "en".to_string(),
            http: Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn units(&self) -> Units {
        self.units
    }

    /// Fetch `endpoint` for `location` and decode it once the status sentinel says OK.
    ///
    /// The HTTP status line is ignored: the upstream body always carries a `cod`
    /// field, and that field alone decides between payload and "not found".
    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        location: &Location,
    ) -> Result<T, WeatherError> {
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), endpoint);

        let mut query = location.query_pairs();
        query.push(("units", self.units.as_str().to_string()));
        query.push(("lang", self.lang.clone()));
        query.push(("appid", self.api_key.clone()));

        let res = self.http.get(&url).query(&query).send().await?;
        let http_status = res.status();
        let body = res.text().await?;

        debug!(endpoint, %http_status, bytes = body.len(), "OpenWeather response received");

        let envelope: OwEnvelope = serde_json::from_str(&body)?;
        match envelope.cod {
            Some(ref cod) if cod.is_ok() => {}
            other => {
                return Err(WeatherError::NotFound {
                    status: other.map_or_else(|| "missing".to_string(), |c| c.to_string()),
                    message: envelope.message.unwrap_or_default(),
                });
            }
        }

        Ok(serde_json::from_str(&body)?)
    }
}

/// `cod` arrives as a number from `/weather` and as a string from `/forecast`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwStatus {
    Code(i64),
    Text(String),
}

impl OwStatus {
    const OK: i64 = 200;

    fn is_ok(&self) -> bool {
        match self {
            OwStatus::Code(code) => *code == Self::OK,
            OwStatus::Text(text) => text.trim().parse::<i64>() == Ok(Self::OK),
        }
    }
}

impl fmt::Display for OwStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwStatus::Code(code) => write!(f, "{code}"),
            OwStatus::Text(text) => f.write_str(text),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OwEnvelope {
    #[serde(default)]
    cod: Option<OwStatus>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    main: String,
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Default, Deserialize)]
struct OwSys {
    #[serde(default)]
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
    main: OwMain,
    weather: Vec<OwWeather>,
    wind: OwWind,
    #[serde(default)]
    sys: OwSys,
}

#[derive(Debug, Deserialize)]
struct OwForecastMain {
    temp_min: f64,
    temp_max: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    dt_txt: String,
    main: OwForecastMain,
    weather: Vec<OwWeather>,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
}

impl TryFrom<OwCurrentResponse> for CurrentConditions {
    type Error = WeatherError;

    fn try_from(parsed: OwCurrentResponse) -> Result<Self, Self::Error> {
        let weather = parsed
            .weather
            .into_iter()
            .next()
            .ok_or_else(|| WeatherError::Malformed("current conditions without weather".into()))?;

        Ok(CurrentConditions {
            temperature: parsed.main.temp,
            feels_like: parsed.main.feels_like,
            humidity_pct: parsed.main.humidity,
            wind_speed: parsed.wind.speed,
            pressure_hpa: parsed.main.pressure,
            category: weather.main,
            description: weather.description,
            icon: weather.icon,
            place: parsed.name,
            country: parsed.sys.country.unwrap_or_default(),
        })
    }
}

impl TryFrom<OwForecastEntry> for ForecastEntry {
    type Error = WeatherError;

    fn try_from(entry: OwForecastEntry) -> Result<Self, Self::Error> {
        let timestamp = unix_to_utc(entry.dt).ok_or_else(|| {
            WeatherError::Malformed(format!("forecast timestamp {} out of range", entry.dt))
        })?;
        let weather = entry.weather.into_iter().next().ok_or_else(|| {
            WeatherError::Malformed(format!("forecast entry {} without weather", entry.dt_txt))
        })?;

        Ok(ForecastEntry {
            timestamp,
            label: entry.dt_txt,
            temp_max: entry.main.temp_max,
            temp_min: entry.main.temp_min,
            icon: weather.icon,
            description: weather.description,
        })
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    #[instrument(level = "debug", skip(self))]
    async fn current(&self, location: &Location) -> Result<CurrentConditions, WeatherError> {
        let parsed: OwCurrentResponse = self.get_json("weather", location).await?;
        parsed.try_into()
    }

    #[instrument(level = "debug", skip(self))]
    async fn forecast(&self, location: &Location) -> Result<Vec<ForecastEntry>, WeatherError> {
        let parsed: OwForecastResponse = self.get_json("forecast", location).await?;
        parsed.list.into_iter().map(ForecastEntry::try_from).collect()
    }
}

fn unix_to_utc(ts: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(ts, 0)
}
