use crate::{
    Config,
    error::WeatherError,
    model::{CurrentConditions, ForecastEntry, Location},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// Upstream source of current conditions and the multi-day forecast.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current(&self, location: &Location) -> Result<CurrentConditions, WeatherError>;

    async fn forecast(&self, location: &Location) -> Result<Vec<ForecastEntry>, WeatherError>;
}

/// Construct the OpenWeather provider described by `config`.
pub fn provider_from_config(config: &Config) -> anyhow::Result<Arc<dyn WeatherProvider>> {
    let api_key = config.api_key().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `weather configure` or set {}.",
            crate::config::API_KEY_ENV
        )
    })?;

    let provider = OpenWeatherProvider::new(api_key)
        .with_base_url(config.base_url.clone())
        .with_units(config.units)
        .with_lang(config.lang.clone());

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let mut cfg = Config::default();
        cfg.api_key = None;

        // An ambient OPENWEATHER_API_KEY would satisfy the lookup.
        if std::env::var(crate::config::API_KEY_ENV).is_ok() {
            return;
        }

        let err = provider_from_config(&cfg).unwrap_err();
        assert!(err.to_string().contains("No OpenWeather API key configured"));
        assert!(err.to_string().contains("Hint: run `weather configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_is_set() {
        let mut cfg = Config::default();
        cfg.set_api_key("KEY".to_string());

        assert!(provider_from_config(&cfg).is_ok());
    }
}
