//! View state and its transitions.
//!
//! [`reduce`] is a pure `(state, event) -> (state, effect)` function. Effects
//! are performed by [`controller::Controller`], which feeds their results
//! back in as events. Every forecast and geolocation request is tagged with
//! the generation it was issued under; results from older generations are
//! dropped, so a slow response can never overwrite a newer one.

use serde::{Deserialize, Serialize};

use crate::{
    error::{LocateError, ProviderError},
    model::Forecast,
};

pub mod controller;

/// Autocomplete only kicks in from this many characters.
pub const MIN_QUERY_LEN: usize = 3;

pub const LOCATION_NOT_FOUND: &str = "Location not found";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Loading,
    Ready,
    /// The last fetch failed or returned nothing usable.
    NoData,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub place: String,
    /// Token of the latest forecast request.
    pub generation: u64,
    /// Token of the latest geolocation lookup, separate from `generation` so
    /// a failed lookup leaves the current forecast request alone.
    pub locate_generation: u64,
    pub forecast: Option<Forecast>,
    pub status: Status,
    /// Text currently typed into the search box.
    pub query: String,
    pub suggestions: Vec<String>,
    /// User-facing message, e.g. [`LOCATION_NOT_FOUND`].
    pub notice: Option<String>,
    pub locating: bool,
    pub theme: Theme,
}

impl AppState {
    pub fn new(place: impl Into<String>, theme: Theme) -> Self {
        Self { place: place.into(), theme, ..Self::default() }
    }
}

#[derive(Debug)]
pub enum Event {
    PlaceChanged(String),
    ForecastLoaded { generation: u64, result: Result<Forecast, ProviderError> },
    QueryChanged(String),
    SuggestionsLoaded { query: String, result: Result<Vec<String>, ProviderError> },
    SuggestionPicked(String),
    SearchSubmitted,
    LocateRequested,
    LocationResolved { generation: u64, result: Result<String, LocateError> },
    ThemeToggled,
}

impl AppState {
    /// Whether a completion event still belongs to the latest request of its
    /// kind. Events that are not completions are always current.
    pub fn is_current(&self, event: &Event) -> bool {
        match event {
            Event::ForecastLoaded { generation, .. } => *generation == self.generation,
            Event::LocationResolved { generation, .. } => *generation == self.locate_generation,
            Event::SuggestionsLoaded { query, .. } => *query == self.query,
            _ => true,
        }
    }
}

/// Work the reducer asks for. Each one completes with exactly one [`Event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchForecast { place: String, generation: u64 },
    FetchSuggestions { query: String },
    Locate { generation: u64 },
}

pub fn reduce(mut state: AppState, event: Event) -> (AppState, Option<Effect>) {
    match event {
        Event::PlaceChanged(place) => change_place(state, place),

        event if !state.is_current(&event) => (state, None),

        Event::ForecastLoaded { result, .. } => {
            match result {
                Ok(forecast) if !forecast.series.is_empty() => {
                    state.forecast = Some(forecast);
                    state.status = Status::Ready;
                }
                _ => {
                    state.forecast = None;
                    state.status = Status::NoData;
                }
            }
            (state, None)
        }

        Event::QueryChanged(query) => {
            // Candidates belong to the previous text; never resolve against them.
            state.suggestions.clear();
            let effect = (query.trim().chars().count() >= MIN_QUERY_LEN)
                .then(|| Effect::FetchSuggestions { query: query.clone() });
            state.query = query;
            (state, effect)
        }

        Event::SuggestionsLoaded { result, .. } => {
            match result {
                Ok(suggestions) => {
                    state.suggestions = suggestions;
                    state.notice = None;
                }
                Err(_) => state.suggestions.clear(),
            }
            (state, None)
        }

        Event::SuggestionPicked(name) => {
            state.query = name;
            (state, None)
        }

        Event::SearchSubmitted => match resolve_query(&state.query, &state.suggestions) {
            Some(place) => {
                state.suggestions.clear();
                change_place(state, place)
            }
            None => {
                state.notice = Some(LOCATION_NOT_FOUND.to_string());
                (state, None)
            }
        },

        Event::LocateRequested => {
            state.locate_generation += 1;
            state.locating = true;
            let generation = state.locate_generation;
            (state, Some(Effect::Locate { generation }))
        }

        Event::LocationResolved { result, .. } => {
            state.locating = false;
            match result {
                Ok(place) => change_place(state, place),
                Err(_) => (state, None),
            }
        }

        Event::ThemeToggled => {
            state.theme = state.theme.toggled();
            (state, None)
        }
    }
}

fn change_place(mut state: AppState, place: String) -> (AppState, Option<Effect>) {
    let place = place.trim().to_string();
    if place.is_empty() {
        return (state, None);
    }

    state.generation += 1;
    // A newer place supersedes any pending geolocation lookup.
    state.locate_generation += 1;
    state.place = place.clone();
    state.status = Status::Loading;
    state.notice = None;
    state.locating = false;
    let generation = state.generation;
    (state, Some(Effect::FetchForecast { place, generation }))
}

/// Picks the place a submitted query refers to: a case-insensitive exact
/// match among the candidates, otherwise the only candidate. No candidates
/// or several non-matching ones means the place is unknown.
pub fn resolve_query(query: &str, suggestions: &[String]) -> Option<String> {
    let query = query.trim();
    if query.is_empty() {
        return None;
    }

    if let Some(exact) = suggestions.iter().find(|s| s.eq_ignore_ascii_case(query)) {
        return Some(exact.clone());
    }

    match suggestions {
        [only] => Some(only.clone()),
        _ => None,
    }
}
