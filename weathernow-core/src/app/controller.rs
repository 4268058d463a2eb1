use std::sync::Arc;

use crate::{
    app::{AppState, Effect, Event, reduce},
    error::LocateError,
    geo::Geolocator,
    normalize::{NormalizedForecast, normalize},
    provider::WeatherProvider,
};

/// Sole owner of [`AppState`]. All changes go through [`Controller::dispatch`].
#[derive(Debug)]
pub struct Controller {
    state: AppState,
    provider: Arc<dyn WeatherProvider>,
    geolocator: Arc<dyn Geolocator>,
    forecast_count: u32,
}

impl Controller {
    pub fn new(
        state: AppState,
        provider: Arc<dyn WeatherProvider>,
        geolocator: Arc<dyn Geolocator>,
        forecast_count: u32,
    ) -> Self {
        Self { state, provider, geolocator, forecast_count }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Current conditions and daily strip of the displayed forecast.
    pub fn normalized(&self) -> NormalizedForecast {
        self.state
            .forecast
            .as_ref()
            .map(|f| normalize(&f.series))
            .unwrap_or_default()
    }

    /// Applies `event` and returns the effect it asks for, if any.
    pub fn dispatch(&mut self, event: Event) -> Option<Effect> {
        if !self.state.is_current(&event) {
            tracing::debug!(?event, "discarding superseded result");
        }

        let state = std::mem::take(&mut self.state);
        let (state, effect) = reduce(state, event);
        self.state = state;
        effect
    }

    /// Performs `effect` and returns the event that reports its outcome.
    /// Borrows immutably so several effects can be in flight before their
    /// results are dispatched.
    pub async fn perform(&self, effect: Effect) -> Event {
        match effect {
            Effect::FetchForecast { place, generation } => {
                let result = self.provider.forecast(&place, self.forecast_count).await;
                if let Err(e) = &result {
                    tracing::warn!(%place, error = %e, "no forecast data");
                }
                Event::ForecastLoaded { generation, result }
            }
            Effect::FetchSuggestions { query } => {
                let result = self.provider.find(&query).await;
                if let Err(e) = &result {
                    tracing::debug!(%query, error = %e, "autocomplete failed");
                }
                Event::SuggestionsLoaded { query, result }
            }
            Effect::Locate { generation } => {
                let result = self.locate_place().await;
                if let Err(e) = &result {
                    tracing::debug!(error = %e, "geolocation lookup failed");
                }
                Event::LocationResolved { generation, result }
            }
        }
    }

    /// Dispatches `event`, then performs effects one after another until the
    /// state settles.
    pub async fn run(&mut self, event: Event) {
        let mut next = self.dispatch(event);
        while let Some(effect) = next {
            let completion = self.perform(effect).await;
            next = self.dispatch(completion);
        }
    }

    async fn locate_place(&self) -> Result<String, LocateError> {
        let coordinates = self.geolocator.locate().await?;
        Ok(self.provider.place_at(coordinates).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        app::{LOCATION_NOT_FOUND, Status, Theme},
        error::ProviderError,
        geo::FixedPosition,
        model::{Coordinates, Forecast, ForecastSeries, Location, fixtures::three_hourly},
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeProvider {
        places: Vec<String>,
        here: String,
        forecast_calls: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn calls(&self) -> Vec<String> {
            self.forecast_calls.lock().expect("not poisoned").clone()
        }
    }

    fn unknown_place() -> ProviderError {
        let source = serde_json::from_str::<serde_json::Value>("").unwrap_err();
        ProviderError::Malformed { endpoint: "forecast", source }
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn forecast(&self, place: &str, _count: u32) -> Result<Forecast, ProviderError> {
            self.forecast_calls.lock().expect("not poisoned").push(place.to_string());
            if !self.places.iter().any(|p| p == place) {
                return Err(unknown_place());
            }
            Ok(Forecast {
                series: ForecastSeries::new(three_hourly("2024-03-01 00:00:00", 16)),
                location: Location {
                    name: place.to_string(),
                    country: "GB".to_string(),
                    coordinates: Coordinates { latitude: 0.0, longitude: 0.0 },
                    population: 0,
                    timezone_offset: 0,
                    sunrise: 0,
                    sunset: 0,
                },
            })
        }

        async fn find(&self, prefix: &str) -> Result<Vec<String>, ProviderError> {
            Ok(self.places.iter().filter(|p| p.starts_with(prefix)).cloned().collect())
        }

        async fn place_at(&self, _coordinates: Coordinates) -> Result<String, ProviderError> {
            Ok(self.here.clone())
        }
    }

    fn controller(provider: Arc<FakeProvider>, geo: FixedPosition) -> Controller {
        Controller::new(AppState::new("Paris", Theme::Light), provider, Arc::new(geo), 56)
    }

    fn provider() -> Arc<FakeProvider> {
        Arc::new(FakeProvider {
            places: vec!["London".into(), "Londrina".into(), "Paris".into(), "Brighton".into()],
            here: "Brighton".into(),
            ..FakeProvider::default()
        })
    }

    #[tokio::test]
    async fn run_loads_forecast() {
        let provider = provider();
        let mut c = controller(provider.clone(), FixedPosition::unavailable());

        c.run(Event::PlaceChanged("Paris".into())).await;

        assert_eq!(c.state().status, Status::Ready);
        assert_eq!(provider.calls(), vec!["Paris".to_string()]);
        let n = c.normalized();
        assert!(n.current.is_some());
        assert_eq!(n.daily.len(), 2);
    }

    #[tokio::test]
    async fn unknown_place_is_no_data() {
        let mut c = controller(provider(), FixedPosition::unavailable());
        c.run(Event::PlaceChanged("Atlantis".into())).await;

        assert_eq!(c.state().status, Status::NoData);
        assert!(c.normalized().current.is_none());
    }

    #[tokio::test]
    async fn autocomplete_select_submit_fetches_once_and_drops_stale() {
        let provider = provider();
        let mut c = controller(provider.clone(), FixedPosition::unavailable());

        // A fetch for the initial place is still in flight.
        let in_flight = c.dispatch(Event::PlaceChanged("Paris".into())).expect("fetch effect");

        c.run(Event::QueryChanged("Lon".into())).await;
        assert!(c.state().suggestions.contains(&"London".to_string()));

        c.dispatch(Event::SuggestionPicked("London".into()));
        let fetch = c.dispatch(Event::SearchSubmitted).expect("fetch effect");
        assert_eq!(c.state().place, "London");

        let london = c.perform(fetch).await;
        let paris = c.perform(in_flight).await;
        assert!(c.dispatch(london).is_none());
        assert!(c.dispatch(paris).is_none());

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls.iter().filter(|p| *p == "London").count(), 1);
        let shown = c.state().forecast.as_ref().map(|f| f.location.name.as_str());
        assert_eq!(shown, Some("London"));
    }

    #[tokio::test]
    async fn ambiguous_submit_keeps_current_forecast() {
        let provider = provider();
        let mut c = controller(provider.clone(), FixedPosition::unavailable());
        c.run(Event::PlaceChanged("Paris".into())).await;

        c.run(Event::QueryChanged("Lon".into())).await;
        c.run(Event::SearchSubmitted).await;

        assert_eq!(c.state().notice.as_deref(), Some(LOCATION_NOT_FOUND));
        assert_eq!(c.state().place, "Paris");
        assert_eq!(provider.calls().len(), 1);
    }

    #[tokio::test]
    async fn locate_switches_to_current_place() {
        let provider = provider();
        let here = Coordinates { latitude: 50.82, longitude: -0.14 };
        let mut c = controller(provider.clone(), FixedPosition::new(here));

        c.run(Event::LocateRequested).await;

        assert_eq!(c.state().place, "Brighton");
        assert_eq!(c.state().status, Status::Ready);
        assert!(!c.state().locating);
    }

    #[tokio::test]
    async fn denied_geolocation_keeps_pending_forecast() {
        let provider = provider();
        let mut c = controller(provider.clone(), FixedPosition::unavailable());

        let pending = c.dispatch(Event::PlaceChanged("Paris".into())).expect("fetch effect");
        c.run(Event::LocateRequested).await;
        let loaded = c.perform(pending).await;
        c.dispatch(loaded);

        assert_eq!(c.state().place, "Paris");
        assert_eq!(c.state().status, Status::Ready);
    }

    #[tokio::test]
    async fn unavailable_geolocation_is_ignored() {
        let provider = provider();
        let mut c = controller(provider.clone(), FixedPosition::unavailable());

        c.run(Event::LocateRequested).await;

        assert_eq!(c.state().place, "Paris");
        assert!(!c.state().locating);
        assert!(c.state().notice.is_none());
        assert!(provider.calls().is_empty());
    }
}
