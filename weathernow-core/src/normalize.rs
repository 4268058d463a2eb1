//! Turns a flat 3-hourly series into "current conditions" plus one
//! representative sample per calendar day.

use chrono::{NaiveDate, Timelike};

use crate::{
    model::{DailySummary, ForecastSample, ForecastSeries},
    units::DAY_START_HOUR,
};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedForecast {
    /// First sample of the series, regardless of its time of day.
    pub current: Option<ForecastSample>,
    /// One slot per distinct local date, in first-seen order. A slot is
    /// `None` when that date has no sample at or after 06:00.
    pub daily: Vec<Option<DailySummary>>,
}

impl NormalizedForecast {
    /// The first `days` slots, placeholders included, so a renderer keeps a
    /// stable number of columns.
    pub fn strip(&self, days: usize) -> &[Option<DailySummary>] {
        &self.daily[..self.daily.len().min(days)]
    }
}

pub fn normalize(series: &ForecastSeries) -> NormalizedForecast {
    let samples = series.samples();

    let mut dates: Vec<NaiveDate> = Vec::new();
    for sample in samples {
        let date = sample.local_date();
        if !dates.contains(&date) {
            dates.push(date);
        }
    }

    let daily = dates
        .into_iter()
        .map(|date| {
            samples
                .iter()
                .find(|s| s.local_date() == date && s.local_time.hour() >= DAY_START_HOUR)
                .map(|s| DailySummary { date, sample: s.clone() })
        })
        .collect();

    NormalizedForecast { current: samples.first().cloned(), daily }
}
