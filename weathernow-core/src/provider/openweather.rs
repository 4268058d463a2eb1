use async_trait::async_trait;
use chrono::NaiveDateTime;
use reqwest::Client;
use serde::{Deserialize, Deserializer, de::DeserializeOwned};
use std::fmt;

use crate::{
    error::ProviderError,
    model::{Coordinates, Forecast, ForecastSample, ForecastSeries, Location},
};

use super::WeatherProvider;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

const DT_TXT_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &'static str,
        query: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%url, ?query, "requesting OpenWeather {endpoint}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|source| ProviderError::Transport { endpoint, source })?;

        if !status.is_success() {
            tracing::warn!(%status, "OpenWeather {endpoint} request failed");
            return Err(ProviderError::Status { endpoint, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| {
            tracing::warn!(error = %source, "OpenWeather {endpoint} response did not parse");
            ProviderError::Malformed { endpoint, source }
        })
    }
}

impl fmt::Debug for OpenWeatherProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenWeatherProvider")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    feels_like: f64,
    temp_min: f64,
    temp_max: f64,
    pressure: f64,
    humidity: f64,
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
    #[serde(default)]
    deg: f64,
    gust: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct OwClouds {
    all: f64,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt: i64,
    main: OwMain,
    // Only the primary condition is kept.
    #[serde(rename = "weather", deserialize_with = "primary_condition")]
    condition: OwWeather,
    #[serde(default)]
    clouds: OwClouds,
    wind: OwWind,
    // Missing when visibility is unlimited.
    #[serde(default = "unlimited_visibility")]
    visibility: f64,
    #[serde(default)]
    pop: f64,
    #[serde(deserialize_with = "dt_txt")]
    dt_txt: NaiveDateTime,
}

#[derive(Debug, Deserialize)]
struct OwCoord {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    country: String,
    coord: OwCoord,
    #[serde(default)]
    population: u64,
    #[serde(default)]
    timezone: i32,
    sunrise: i64,
    sunset: i64,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    list: Vec<OwForecastEntry>,
    city: OwCity,
}

#[derive(Debug, Deserialize)]
struct OwFindEntry {
    name: String,
}

#[derive(Debug, Deserialize)]
struct OwFindResponse {
    list: Vec<OwFindEntry>,
}

#[derive(Debug, Deserialize)]
struct OwCurrentResponse {
    name: String,
}

fn unlimited_visibility() -> f64 {
    10_000.0
}

fn primary_condition<'de, D: Deserializer<'de>>(deserializer: D) -> Result<OwWeather, D::Error> {
    Vec::<OwWeather>::deserialize(deserializer)?
        .into_iter()
        .next()
        .ok_or_else(|| serde::de::Error::custom("forecast entry has no weather condition"))
}

fn dt_txt<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    NaiveDateTime::parse_from_str(&raw, DT_TXT_FORMAT)
        .map_err(|e| serde::de::Error::custom(format!("invalid dt_txt '{raw}': {e}")))
}

impl From<OwForecastEntry> for ForecastSample {
    fn from(entry: OwForecastEntry) -> Self {
        ForecastSample {
            timestamp: entry.dt,
            temperature: entry.main.temp,
            feels_like: entry.main.feels_like,
            temp_min: entry.main.temp_min,
            temp_max: entry.main.temp_max,
            pressure: entry.main.pressure,
            humidity: entry.main.humidity,
            visibility_meters: entry.visibility,
            wind_speed_mps: entry.wind.speed,
            wind_gust_mps: entry.wind.gust,
            wind_direction_deg: entry.wind.deg,
            cloudiness_pct: entry.clouds.all,
            precipitation_chance: entry.pop,
            condition_icon: entry.condition.icon,
            condition_main: entry.condition.main,
            condition_description: entry.condition.description,
            local_time: entry.dt_txt,
        }
    }
}

impl From<OwCity> for Location {
    fn from(city: OwCity) -> Self {
        Location {
            name: city.name,
            country: city.country,
            coordinates: Coordinates { latitude: city.coord.lat, longitude: city.coord.lon },
            population: city.population,
            timezone_offset: city.timezone,
            sunrise: city.sunrise,
            sunset: city.sunset,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn forecast(&self, place: &str, count: u32) -> Result<Forecast, ProviderError> {
        let parsed: OwForecastResponse = self
            .get_json("forecast", &[("q", place.to_string()), ("cnt", count.to_string())])
            .await?;

        let samples = parsed.list.into_iter().map(ForecastSample::from).collect();
        let forecast = Forecast { series: ForecastSeries::new(samples), location: parsed.city.into() };

        tracing::info!(
            place = %forecast.location.name,
            samples = forecast.series.len(),
            "forecast received"
        );
        Ok(forecast)
    }

    async fn find(&self, prefix: &str) -> Result<Vec<String>, ProviderError> {
        let parsed: OwFindResponse = self.get_json("find", &[("q", prefix.to_string())]).await?;

        let mut names: Vec<String> = Vec::with_capacity(parsed.list.len());
        for entry in parsed.list {
            if !names.contains(&entry.name) {
                names.push(entry.name);
            }
        }
        Ok(names)
    }

    async fn place_at(&self, coordinates: Coordinates) -> Result<String, ProviderError> {
        let parsed: OwCurrentResponse = self
            .get_json(
                "weather",
                &[
                    ("lat", coordinates.latitude.to_string()),
                    ("lon", coordinates.longitude.to_string()),
                ],
            )
            .await?;
        Ok(parsed.name)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
