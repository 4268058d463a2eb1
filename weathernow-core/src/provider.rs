use crate::{
    Config,
    error::ProviderError,
    model::{Coordinates, Forecast},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::{fmt::Debug, sync::Arc};

pub mod openweather;

/// The weather data source. Implementations parse and validate at this
/// boundary; anything that does not match the expected shape is an error.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// Up to `count` 3-hourly samples for `place`, plus the place itself.
    async fn forecast(&self, place: &str, count: u32) -> Result<Forecast, ProviderError>;

    /// Place names matching `prefix`, for autocomplete.
    async fn find(&self, prefix: &str) -> Result<Vec<String>, ProviderError>;

    /// Name of the place at `coordinates`.
    async fn place_at(&self, coordinates: Coordinates) -> Result<String, ProviderError>;
}

/// Construct the provider described by `config`.
pub fn provider_from_config(config: &Config) -> Result<Arc<dyn WeatherProvider>, ProviderError> {
    let api_key = config.api_key().ok_or(ProviderError::MissingApiKey)?;

    let provider = match config.base_url.as_deref() {
        Some(base_url) => OpenWeatherProvider::with_base_url(api_key.to_owned(), base_url),
        None => OpenWeatherProvider::new(api_key.to_owned()),
    };

    Ok(Arc::new(provider))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn provider_from_config_errors_when_missing_api_key() {
        let cfg = Config::default();
        let err = provider_from_config(&cfg).unwrap_err();
        assert!(matches!(err, ProviderError::MissingApiKey));
        assert!(err.to_string().contains("Hint: run `weathernow configure`"));
    }

    #[test]
    fn provider_from_config_works_when_key_is_set() {
        let cfg = Config { api_key: Some("KEY".to_string()), ..Config::default() };
        assert!(provider_from_config(&cfg).is_ok());
    }

    #[test]
    fn provider_from_config_honours_base_url() {
        let cfg = Config {
            api_key: Some("KEY".to_string()),
            base_url: Some("http://localhost:9999/".to_string()),
            ..Config::default()
        };
        let provider = provider_from_config(&cfg).expect("key is configured");
        assert!(format!("{provider:?}").contains("http://localhost:9999"));
    }
}
