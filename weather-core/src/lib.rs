//! Core library for the `weather` dashboard.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather provider behind a `WeatherProvider` abstraction
//! - Startup location resolution with a default-city fallback
//! - The fetch pipeline and the dashboard controller that owns the view
//!
//! It is used by `weather-cli`, but the view model is independent of any
//! particular front end.

pub mod config;
pub mod dashboard;
pub mod error;
pub mod forecast;
pub mod location;
pub mod model;
pub mod pipeline;
pub mod provider;
pub mod theme;
pub mod view;

pub use config::Config;
pub use dashboard::{Dashboard, Ticket};
pub use error::WeatherError;
pub use location::{Coordinates, GeolocationError, Geolocator, IpGeolocator};
pub use model::{CurrentConditions, ForecastEntry, Location, Report, Units};
pub use pipeline::{fetch_report, fetch_startup_report, search_location};
pub use provider::{WeatherProvider, openweather::OpenWeatherProvider};
pub use theme::Theme;
pub use view::{UiState, View};
