use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// One 3-hourly data point of a provider forecast.
///
/// Temperatures are in Kelvin, exactly as the provider reports them; use the
/// helpers in [`crate::units`] for display values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSample {
    pub timestamp: i64,
    pub temperature: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: f64,
    pub humidity: f64,
    pub visibility_meters: f64,
    pub wind_speed_mps: f64,
    pub wind_gust_mps: Option<f64>,
    pub wind_direction_deg: f64,
    pub cloudiness_pct: f64,
    /// Probability of precipitation, 0.0..=1.0.
    pub precipitation_chance: f64,
    pub condition_icon: String,
    pub condition_main: String,
    pub condition_description: String,
    /// Provider-local wall clock time of the sample. Authoritative for
    /// date bucketing and display, independent of `timestamp`.
    pub local_time: NaiveDateTime,
}

impl ForecastSample {
    pub fn local_date(&self) -> NaiveDate {
        self.local_time.date()
    }
}

/// Samples of a single fetch, ascending by `timestamp`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastSeries {
    samples: Vec<ForecastSample>,
}

impl ForecastSeries {
    /// Builds a series, ordering samples by timestamp. The sort is stable so
    /// samples sharing a timestamp keep provider order.
    pub fn new(mut samples: Vec<ForecastSample>) -> Self {
        samples.sort_by_key(|s| s.timestamp);
        Self { samples }
    }

    pub fn samples(&self) -> &[ForecastSample] {
        &self.samples
    }

    pub fn first(&self) -> Option<&ForecastSample> {
        self.samples.first()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// The place a forecast was issued for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub country: String,
    pub coordinates: Coordinates,
    pub population: u64,
    /// Offset from UTC in seconds.
    pub timezone_offset: i32,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Series and location of one successful fetch. They are only ever
/// replaced together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Forecast {
    pub series: ForecastSeries,
    pub location: Location,
}

/// The sample chosen to stand for a whole calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub sample: ForecastSample,
}
