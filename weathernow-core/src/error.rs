/// Failures at the weather provider boundary. Callers treat every variant as
/// "no data"; the distinction is kept for logs and tests.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No API key configured.\nHint: run `weathernow configure` or set WEATHERNOW_API_KEY.")]
    MissingApiKey,
    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("Malformed {endpoint} response: {source}")]
    Malformed {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// Geolocation failures. All of them leave the current place unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LocationError {
    #[error("Location permission denied")]
    PermissionDenied,
    #[error("Location service unavailable")]
    Unavailable,
    #[error("Location request timed out")]
    Timeout,
}

/// Why a "use my location" lookup produced no place name.
#[derive(Debug, thiserror::Error)]
pub enum LocateError {
    #[error(transparent)]
    Location(#[from] LocationError),
    #[error(transparent)]
    Provider(#[from] ProviderError),
}
