use tracing::{debug, instrument};

use crate::{
    error::WeatherError,
    location::{Geolocator, resolve_location},
    model::{Location, Report},
    provider::WeatherProvider,
};

/// Fetch current conditions, then the forecast for the same location.
///
/// The forecast is requested only after the current conditions succeeded; a
/// failure of either request fails the whole run.
#[instrument(level = "debug", skip(provider))]
pub async fn fetch_report(
    provider: &dyn WeatherProvider,
    location: &Location,
) -> Result<Report, WeatherError> {
    let current = provider.current(location).await?;
    debug!(place = %current.place, category = %current.category, "Current conditions fetched");

    let forecast = provider.forecast(location).await?;
    debug!(entries = forecast.len(), "Forecast fetched");

    Ok(Report { current, forecast })
}

/// Resolve the startup location, then fetch its report.
pub async fn fetch_startup_report(
    provider: &dyn WeatherProvider,
    geolocator: Option<&dyn Geolocator>,
    default_city: &str,
) -> Result<Report, WeatherError> {
    let location = resolve_location(geolocator, default_city).await;
    fetch_report(provider, &location).await
}

/// Turn raw search input into a city location; blank input yields nothing.
pub fn search_location(input: &str) -> Option<Location> {
    let city = input.trim();
    if city.is_empty() {
        None
    } else {
        Some(Location::city(city))
    }
}
