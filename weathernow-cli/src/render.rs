//! Terminal view: place, current conditions, and the daily strip.

use std::fmt::{self, Write};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use console::Style;
use weathernow_core::{
    AppState, DailySummary, ForecastSample, Location, NormalizedForecast, Status, Theme,
    units::{day_or_night_icon, kelvin_to_celsius, meters_to_kilometers, mps_to_kmh},
};

/// Days shown in the forecast strip.
pub const STRIP_DAYS: usize = 6;

struct Palette {
    title: Style,
    accent: Style,
    muted: Style,
    alert: Style,
}

impl Palette {
    fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Palette {
                title: Style::new().black().bold(),
                accent: Style::new().blue(),
                muted: Style::new().black().dim(),
                alert: Style::new().red(),
            },
            Theme::Dark => Palette {
                title: Style::new().white().bold(),
                accent: Style::new().yellow().bright(),
                muted: Style::new().white().dim(),
                alert: Style::new().red().bright(),
            },
        }
    }
}

pub fn render(state: &AppState, normalized: &NormalizedForecast) -> Result<String, fmt::Error> {
    let p = Palette::for_theme(state.theme);
    let mut out = String::new();

    if let Some(notice) = &state.notice {
        writeln!(out, "{}", p.alert.apply_to(notice))?;
    }

    match (state.status, &state.forecast, &normalized.current) {
        (Status::Ready, Some(forecast), Some(current)) => {
            render_current(&mut out, &p, &forecast.location, current)?;
            out.push('\n');
            render_strip(&mut out, &p, &forecast.location, normalized)?;
        }
        (Status::Loading, _, _) if state.place.is_empty() => {}
        (Status::Loading, _, _) => writeln!(out, "{}", p.muted.apply_to("Loading..."))?,
        _ => writeln!(out, "{}", p.muted.apply_to(format!("No data available for {}", state.place)))?,
    }

    Ok(out.trim_end().to_string())
}

fn render_current(
    out: &mut String,
    p: &Palette,
    location: &Location,
    current: &ForecastSample,
) -> fmt::Result {
    let place = if location.country.is_empty() {
        location.name.clone()
    } else {
        format!("{}, {}", location.name, location.country)
    };
    writeln!(out, "{}", p.title.apply_to(place))?;
    writeln!(
        out,
        "{}  {}",
        p.title.apply_to(current.local_time.format("%A")),
        p.muted.apply_to(current.local_time.format("%d.%m.%Y")),
    )?;

    let icon = day_or_night_icon(&current.condition_icon, current.local_time);
    writeln!(
        out,
        "{}  {} {}",
        p.accent.apply_to(format!("{}°", kelvin_to_celsius(current.temperature))),
        glyph(&icon),
        current.condition_description,
    )?;
    writeln!(
        out,
        "{}° feels like   {}° ↓  {}° ↑",
        kelvin_to_celsius(current.feels_like),
        kelvin_to_celsius(current.temp_min),
        kelvin_to_celsius(current.temp_max),
    )?;
    writeln!(out, "{}", details(p, location, current))
}

fn render_strip(
    out: &mut String,
    p: &Palette,
    location: &Location,
    normalized: &NormalizedForecast,
) -> fmt::Result {
    writeln!(out, "{}", p.title.apply_to("Forecast (next days)"))?;
    for slot in normalized.strip(STRIP_DAYS) {
        match slot {
            Some(day) => render_day(out, p, location, day)?,
            None => writeln!(out, "{}", p.muted.apply_to("  --.--  no daytime data"))?,
        }
    }
    Ok(())
}

fn render_day(
    out: &mut String,
    p: &Palette,
    location: &Location,
    day: &DailySummary,
) -> fmt::Result {
    let s = &day.sample;
    let icon = day_or_night_icon(&s.condition_icon, s.local_time);
    writeln!(
        out,
        "  {} {:<9} {} {:>4}  {}  {}° ↓ {}° ↑",
        p.muted.apply_to(day.date.format("%d.%m")),
        day.date.format("%A"),
        glyph(&icon),
        p.accent.apply_to(format!("{}°", kelvin_to_celsius(s.temperature))),
        s.condition_description,
        kelvin_to_celsius(s.temp_min),
        kelvin_to_celsius(s.temp_max),
    )?;
    writeln!(out, "    {}", details(p, location, s))
}

fn details(p: &Palette, location: &Location, s: &ForecastSample) -> String {
    let line = format!(
        "Visibility {} km | Pressure {} hPa | Humidity {}% | Wind {} km/h | Sunrise {} | Sunset {}",
        meters_to_kilometers(s.visibility_meters),
        s.pressure.round(),
        s.humidity.round(),
        mps_to_kmh(s.wind_speed_mps),
        local_clock(location.sunrise, location.timezone_offset),
        local_clock(location.sunset, location.timezone_offset),
    );
    p.muted.apply_to(line).to_string()
}

/// `H:MM` wall clock time at the location for an epoch timestamp.
fn local_clock(epoch: i64, offset_secs: i32) -> String {
    let offset = FixedOffset::east_opt(offset_secs).unwrap_or_else(|| Utc.fix());
    match DateTime::from_timestamp(epoch, 0) {
        Some(t) => t.with_timezone(&offset).format("%-H:%M").to_string(),
        None => "--:--".to_string(),
    }
}

fn glyph(icon: &str) -> &'static str {
    let night = icon.ends_with('n');
    match icon.get(..2).unwrap_or("") {
        "01" if night => "🌙",
        "01" => "☀",
        "02" if night => "☁",
        "02" => "⛅",
        "03" | "04" => "☁",
        "09" | "10" => "🌧",
        "11" => "⛈",
        "13" => "❄",
        "50" => "🌫",
        _ => "·",
    }
}
