use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use inquire::{Password, PasswordDisplayMode, Select, Text};
use weathernow_core::{
    AppState, Config, Controller, Coordinates, Event, FixedPosition, Geolocator, Theme,
    provider_from_config,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weathernow", version, about = "Weather forecast in your terminal")]
pub struct Cli {
    /// Colour theme; overrides the configured one.
    #[arg(long, global = true, value_enum)]
    pub theme: Option<ThemeArg>,

    /// Number of 3-hourly samples to request.
    #[arg(long, global = true)]
    pub count: Option<u32>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ThemeArg {
    Light,
    Dark,
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Configure the API key, default place and theme.
    Configure,

    /// Show the forecast for a place.
    Show {
        /// Place name; defaults to the configured place.
        place: Option<String>,
    },

    /// Search for a place by name, pick a match, and show its forecast.
    Search {
        /// At least three characters of the place name.
        text: String,
    },

    /// Show the forecast for the place at the given coordinates.
    Locate {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,

        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let Cli { theme, count, command } = self;

        let load_config = || -> anyhow::Result<Config> {
            let mut config = Config::load()?;
            if let Some(theme) = theme {
                config.theme = theme.into();
            }
            if count.is_some() {
                config.forecast_count = count;
            }
            tracing::debug!(theme = ?config.theme, count = config.forecast_count(), "configuration loaded");
            Ok(config)
        };

        match command {
            Command::Configure => configure()?,
            Command::Show { place } => {
                let config = load_config()?;
                let mut controller = controller(&config, FixedPosition::unavailable())?;
                let place = place.unwrap_or_else(|| config.default_place().to_string());
                controller.run(Event::PlaceChanged(place)).await;
                print(&controller)?;
            }
            Command::Search { text } => {
                let config = load_config()?;
                let mut controller = controller(&config, FixedPosition::unavailable())?;
                search(&mut controller, text).await?;
                print(&controller)?;
            }
            Command::Locate { lat, lon } => {
                let config = load_config()?;
                let here = FixedPosition::new(Coordinates { latitude: lat, longitude: lon });
                let mut controller = controller(&config, here)?;
                controller.run(Event::LocateRequested).await;

                // Lookup failures leave the place unset; fall back to the default.
                if controller.state().place.is_empty() {
                    let place = config.default_place().to_string();
                    controller.run(Event::PlaceChanged(place)).await;
                }
                print(&controller)?;
            }
        }

        Ok(())
    }
}

fn controller<G: Geolocator + 'static>(config: &Config, geolocator: G) -> anyhow::Result<Controller> {
    let provider = provider_from_config(config)?;
    Ok(Controller::new(
        AppState::new("", config.theme),
        provider,
        Arc::new(geolocator),
        config.forecast_count(),
    ))
}

async fn search(controller: &mut Controller, text: String) -> anyhow::Result<()> {
    controller.run(Event::QueryChanged(text)).await;

    let suggestions = controller.state().suggestions.clone();
    if suggestions.len() > 1 {
        let picked = Select::new("Which place?", suggestions)
            .prompt()
            .context("No place selected")?;
        controller.dispatch(Event::SuggestionPicked(picked));
    }

    controller.run(Event::SearchSubmitted).await;
    Ok(())
}

fn print(controller: &Controller) -> anyhow::Result<()> {
    let view = render::render(controller.state(), &controller.normalized())
        .context("Failed to render forecast")?;
    println!("{view}");
    Ok(())
}

fn configure() -> anyhow::Result<()> {
    // The file as stored, so an environment key is never written back.
    let mut config = Config::load_from(&Config::config_file_path()?)?;

    let api_key = Password::new("OpenWeather API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let place = Text::new("Default place:")
        .with_default(config.default_place())
        .prompt()
        .context("Failed to read default place")?;
    config.default_place = Some(place.trim().to_string());

    let themes = vec!["light", "dark"];
    let start = if config.theme == Theme::Dark { 1 } else { 0 };
    let theme = Select::new("Theme:", themes)
        .with_starting_cursor(start)
        .prompt()
        .context("Failed to read theme")?;
    config.theme = if theme == "dark" { Theme::Dark } else { Theme::Light };

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}
