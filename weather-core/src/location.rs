//! Startup location resolution.
//!
//! The device position comes from a [`Geolocator`]; when there is none, or it
//! refuses or fails, the configured default city is used instead.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::fmt::Debug;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::model::Location;

pub const DEFAULT_IP_GEOLOCATION_URL: &str = "http://ip-api.com/json";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinates> for Location {
    fn from(c: Coordinates) -> Self {
        Location::Coordinates { lat: c.lat, lon: c.lon }
    }
}

#[derive(Debug, Error)]
pub enum GeolocationError {
    #[error("geolocation permission denied")]
    Denied,

    #[error("geolocation unavailable: {0}")]
    Unavailable(String),

    #[error("geolocation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse geolocation response: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of the device's current position.
#[async_trait]
pub trait Geolocator: Send + Sync + Debug {
    async fn locate(&self) -> Result<Coordinates, GeolocationError>;
}

/// Locates the device by its public IP address.
///
/// Consent is explicit: without it no request is made and `locate` reports
/// [`GeolocationError::Denied`].
#[derive(Debug, Clone)]
pub struct IpGeolocator {
    url: String,
    permitted: bool,
    http: Client,
}

impl IpGeolocator {
    pub fn new(url: impl Into<String>, permitted: bool) -> Self {
        Self { url: url.into(), permitted, http: Client::new() }
    }
}

#[derive(Debug, Deserialize)]
struct IpApiResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

#[async_trait]
impl Geolocator for IpGeolocator {
    async fn locate(&self) -> Result<Coordinates, GeolocationError> {
        if !self.permitted {
            return Err(GeolocationError::Denied);
        }

        let body = self.http.get(&self.url).send().await?.text().await?;
        let parsed: IpApiResponse = serde_json::from_str(&body)?;

        match (parsed.status.as_str(), parsed.lat, parsed.lon) {
            ("success", Some(lat), Some(lon)) => Ok(Coordinates { lat, lon }),
            _ => Err(GeolocationError::Unavailable(
                parsed.message.unwrap_or_else(|| format!("status {}", parsed.status)),
            )),
        }
    }
}

/// Resolve the location to show at startup.
pub async fn resolve_location(geolocator: Option<&dyn Geolocator>, default_city: &str) -> Location {
    let Some(geolocator) = geolocator else {
        info!(default_city, "Geolocation not available, using default city");
        return Location::city(default_city);
    };

    match geolocator.locate().await {
        Ok(coords) => {
            debug!(lat = coords.lat, lon = coords.lon, "Resolved device position");
            coords.into()
        }
        Err(GeolocationError::Denied) => {
            info!(default_city, "Geolocation permission denied, using default city");
            Location::city(default_city)
        }
        Err(err) => {
            warn!(error = %err, default_city, "Geolocation failed, using default city");
            Location::city(default_city)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Fixed(Result<Coordinates, ()>);

    #[async_trait]
    impl Geolocator for Fixed {
        async fn locate(&self) -> Result<Coordinates, GeolocationError> {
            self.0.map_err(|_| GeolocationError::Unavailable("no fix".into()))
        }
    }

    #[tokio::test]
    async fn granted_position_is_used() {
        let geo = Fixed(Ok(Coordinates { lat: 39.93, lon: 32.86 }));
        let loc = resolve_location(Some(&geo), "Istanbul").await;

        assert_eq!(loc, Location::Coordinates { lat: 39.93, lon: 32.86 });
    }

    #[tokio::test]
    async fn failing_capability_falls_back() {
        let geo = Fixed(Err(()));
        let loc = resolve_location(Some(&geo), "Istanbul").await;

        assert_eq!(loc, Location::city("Istanbul"));
    }

    #[tokio::test]
    async fn absent_capability_falls_back() {
        let loc = resolve_location(None, "Antalya").await;
        assert_eq!(loc, Location::city("Antalya"));
    }

    #[tokio::test]
    async fn ip_geolocator_without_consent_is_denied() {
        // Unroutable URL: a request attempt would surface as Transport, not Denied.
        let geo = IpGeolocator::new("http://127.0.0.1:9/json", false);
        let err = geo.locate().await.unwrap_err();

        assert!(matches!(err, GeolocationError::Denied));
    }
}
