use anyhow::{Context, bail};
use chrono::Local;
use clap::{Parser, Subcommand};
use inquire::{Confirm, Password, PasswordDisplayMode, Select, Text};
use std::sync::Arc;
use tracing::debug;
use weather_core::{
    Config, Dashboard, Geolocator, IpGeolocator, Location, Units, provider::provider_from_config,
    search_location,
};

use crate::{live, render};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Current weather and five-day forecast")]
pub struct Cli {
    /// Skip geolocation and start with the configured default city.
    #[arg(long, global = true)]
    pub no_geolocation: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the API key, default city, units and geolocation consent.
    Configure,

    /// Print the dashboard once and exit.
    Show {
        /// City name; without it the startup location is resolved.
        city: Option<String>,

        #[arg(long, requires = "lon", conflicts_with = "city", allow_hyphen_values = true)]
        lat: Option<f64>,

        #[arg(long, requires = "lat", conflicts_with = "city", allow_hyphen_values = true)]
        lon: Option<f64>,
    },

    /// Interactive dashboard with a live clock and search prompt (default).
    Live,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Some(Command::Configure) => configure(),
            Some(Command::Show { city, lat, lon }) => {
                let config = Config::load()?;
                let location = match (city, lat, lon) {
                    (Some(city), _, _) => Some(
                        search_location(&city).context("City name must not be blank")?,
                    ),
                    (None, Some(lat), Some(lon)) => Some(Location::Coordinates { lat, lon }),
                    _ => None,
                };
                show(&config, location, self.no_geolocation).await
            }
            Some(Command::Live) | None => {
                let config = Config::load()?;
                let provider = provider_from_config(&config)?;
                let geolocator = geolocator(&config, self.no_geolocation);
                live::run(config, provider, geolocator).await
            }
        }
    }
}

fn geolocator(config: &Config, disabled: bool) -> Option<Arc<dyn Geolocator>> {
    if disabled {
        return None;
    }
    Some(Arc::new(IpGeolocator::new(config.geolocation_url.clone(), config.allow_geolocation)))
}

async fn show(config: &Config, location: Option<Location>, no_geolocation: bool) -> anyhow::Result<()> {
    let provider = provider_from_config(config)?;
    let now = Local::now();
    let mut dashboard = Dashboard::new(config.units);

    let view = match location {
        Some(location) => {
            debug!(%location, "Showing weather for explicit location");
            dashboard.run(provider.as_ref(), &location, &now).await
        }
        None => {
            let geolocator = geolocator(config, no_geolocation);
            dashboard
                .start(provider.as_ref(), geolocator.as_deref(), &config.default_city, &now)
                .await
        }
    };

    print!("{}", render::page(view, &Local::now()));
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let prompt = if config.stored_api_key().is_some() {
        "OpenWeather API key (leave empty to keep current):"
    } else {
        "OpenWeather API key:"
    };
    let api_key = Password::new(prompt)
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()?;
    if !api_key.trim().is_empty() {
        config.set_api_key(api_key.trim().to_string());
    } else if config.stored_api_key().is_none() {
        bail!("An API key is required.");
    }

    let city = Text::new("Default city:").with_default(&config.default_city).prompt()?;
    config.set_default_city(&city);

    let start = Units::all().iter().position(|u| *u == config.units).unwrap_or(0);
    config.units = Select::new("Units:", Units::all().to_vec())
        .with_starting_cursor(start)
        .prompt()?;

    config.allow_geolocation =
        Confirm::new("Allow locating this device by its IP address at startup?")
            .with_default(config.allow_geolocation)
            .prompt()?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}
