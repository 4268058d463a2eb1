//! Unit conversions and small presentation helpers.
//!
//! All of these are total: any finite input gives a value, nothing here
//! returns an error. Rounding is half away from zero.

use chrono::{NaiveDateTime, Timelike};

const KELVIN_OFFSET: f64 = 273.15;

/// First hour (inclusive) of the daytime window.
pub const DAY_START_HOUR: u32 = 6;
/// First hour (inclusive) after the daytime window.
pub const DAY_END_HOUR: u32 = 18;

pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - KELVIN_OFFSET).round() as i64
}

pub fn celsius_to_kelvin(celsius: i64) -> f64 {
    celsius as f64 + KELVIN_OFFSET
}

pub fn meters_to_kilometers(meters: f64) -> i64 {
    (meters / 1000.0).round() as i64
}

pub fn mps_to_kmh(mps: f64) -> i64 {
    (mps * 3.6).round() as i64
}

/// Whether `local_time` falls in the fixed [06:00, 18:00) daytime window.
pub fn is_daytime(local_time: NaiveDateTime) -> bool {
    (DAY_START_HOUR..DAY_END_HOUR).contains(&local_time.hour())
}

/// Recomputes the day/night variant of a provider icon code (`"10n"` ->
/// `"10d"`) from the local hour. The provider's own suffix is ignored.
pub fn day_or_night_icon(icon: &str, local_time: NaiveDateTime) -> String {
    let base = icon.strip_suffix(['d', 'n']).unwrap_or(icon);
    let suffix = if is_daytime(local_time) { 'd' } else { 'n' };
    format!("{base}{suffix}")
}
