//! Shared HTTP plumbing for the Mapbox APIs.

use reqwest::Url;
use serde::de::DeserializeOwned;

use super::error::MapboxError;

/// Default base URL for the Mapbox Geocoding v5 API.
pub const DEFAULT_GEOCODING_URL: &str = "https://api.mapbox.com/geocoding/v5/mapbox.places";

/// Default base URL for the Mapbox Directions v5 driving profile.
pub const DEFAULT_DIRECTIONS_URL: &str = "https://api.mapbox.com/directions/v5/mapbox/driving";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Configuration for the Mapbox clients.
#[derive(Debug, Clone)]
pub struct MapboxConfig {
    /// Access token appended to every request.
    pub access_token: String,

    /// Base URL for geocoding requests.
    pub geocoding_url: String,

    /// Base URL for directions requests.
    pub directions_url: String,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl MapboxConfig {
    /// Create a new config with the given access token.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            directions_url: DEFAULT_DIRECTIONS_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Set a custom geocoding base URL (for testing).
    pub fn with_geocoding_url(mut self, url: impl Into<String>) -> Self {
        self.geocoding_url = url.into();
        self
    }

    /// Set a custom directions base URL (for testing).
    pub fn with_directions_url(mut self, url: impl Into<String>) -> Self {
        self.directions_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// HTTP client shared by the geocoding and directions wrappers.
#[derive(Debug, Clone)]
pub struct MapboxClient {
    http: reqwest::Client,
    config: MapboxConfig,
}

impl MapboxClient {
    /// Create a new client with the given configuration.
    pub fn new(config: MapboxConfig) -> Result<Self, MapboxError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { http, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &MapboxConfig {
        &self.config
    }

    /// Fetch a URL and parse the JSON body.
    ///
    /// Rejects non-http(s) schemes before dispatch, maps non-2xx statuses
    /// to [`MapboxError::Api`] and parse failures to [`MapboxError::Json`].
    pub(super) async fn fetch_json<T: DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, MapboxError> {
        let parsed = Url::parse(url).map_err(|_| MapboxError::InvalidScheme)?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(MapboxError::InvalidScheme);
        }

        let response = self.http.get(parsed).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MapboxError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| MapboxError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
