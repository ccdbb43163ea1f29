//! ODPT HTTP client.
//!
//! Provides async methods for querying the ODPT open-data API. Handles
//! authentication, bounded concurrency, and conversion to domain types.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;
use tracing::debug;

use crate::domain::{
    CalendarKind, Origin, OriginPoint, RouteRef, StopDetails, StopRef, TimetableRun, TransitMode,
};
use crate::reach::TransitProvider;

use super::convert::{
    busstop_pole_details, convert_bus_timetables, convert_busstop_poles, convert_stations,
    convert_train_timetables, station_details,
};
use super::error::OdptError;
use super::types::{BusTimetableDto, BusstopPoleDto, StationDto, TrainTimetableDto};

/// Default base URL for the ODPT API.
const DEFAULT_BASE_URL: &str = "https://api-challenge2024.odpt.org/api/v4";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Query parameter carrying the consumer key.
const CONSUMER_KEY_PARAM: &str = "acl:consumerKey";

/// How much of an undecodable body to keep in errors.
const ERROR_BODY_CHARS: usize = 500;

/// Configuration for the ODPT client.
#[derive(Debug, Clone)]
pub struct OdptConfig {
    /// Consumer key for authentication
    pub api_key: String,
    /// Base URL for the API (defaults to the public ODPT endpoint)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl OdptConfig {
    /// Create a new config with the given consumer key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// ODPT API client.
///
/// Uses a semaphore to limit concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct OdptClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    semaphore: Arc<Semaphore>,
}

impl OdptClient {
    /// Create a new ODPT client with the given configuration.
    pub fn new(config: OdptConfig) -> Result<Self, OdptError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(OdptError::Client)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent.max(1))),
        })
    }

    /// Full URL for an API resource path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Issue a GET request and decode the JSON array response.
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, OdptError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| OdptError::Closed)?;

        let url = self.url(path);
        debug!(%url, ?params, "ODPT request");

        let response = self
            .http
            .get(&url)
            .query(params)
            .query(&[(CONSUMER_KEY_PARAM, self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| OdptError::Http {
                resource: path.to_string(),
                source,
            })?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(OdptError::Unauthorized {
                resource: path.to_string(),
            });
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(OdptError::RateLimited {
                resource: path.to_string(),
            });
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OdptError::Status {
                resource: path.to_string(),
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await.map_err(|source| OdptError::Http {
            resource: path.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| OdptError::Decode {
            resource: path.to_string(),
            message: e.to_string(),
            body: body.chars().take(ERROR_BODY_CHARS).collect(),
        })
    }

    /// Bus stop poles within the origin's radius.
    pub async fn busstop_poles_near(
        &self,
        origin: &Origin,
    ) -> Result<Vec<BusstopPoleDto>, OdptError> {
        let (lat, lon, radius) = place_params(origin);
        self.get_json(
            "places/odpt:BusstopPole",
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("radius", radius.as_str()),
            ],
        )
        .await
    }

    /// Stations within the origin's radius.
    pub async fn stations_near(&self, origin: &Origin) -> Result<Vec<StationDto>, OdptError> {
        let (lat, lon, radius) = place_params(origin);
        self.get_json(
            "places/odpt:Station",
            &[
                ("lat", lat.as_str()),
                ("lon", lon.as_str()),
                ("radius", radius.as_str()),
            ],
        )
        .await
    }

    /// Bus runs of one route pattern.
    pub async fn bus_timetables(
        &self,
        route: &RouteRef,
        calendar: CalendarKind,
    ) -> Result<Vec<BusTimetableDto>, OdptError> {
        self.get_json(
            "odpt:BusTimetable",
            &[
                ("odpt:busroutePattern", route.as_str()),
                ("odpt:calendar", calendar.odpt_id()),
            ],
        )
        .await
    }

    /// Train runs of one railway line.
    pub async fn train_timetables(
        &self,
        route: &RouteRef,
        calendar: CalendarKind,
    ) -> Result<Vec<TrainTimetableDto>, OdptError> {
        self.get_json(
            "odpt:TrainTimetable",
            &[
                ("odpt:railway", route.as_str()),
                ("odpt:calendar", calendar.odpt_id()),
            ],
        )
        .await
    }

    /// Bus stop pole records with the given identifier.
    pub async fn busstop_pole(&self, stop: &StopRef) -> Result<Vec<BusstopPoleDto>, OdptError> {
        self.get_json("odpt:BusstopPole", &[("owl:sameAs", stop.as_str())])
            .await
    }

    /// Station records with the given identifier.
    pub async fn station(&self, stop: &StopRef) -> Result<Vec<StationDto>, OdptError> {
        self.get_json("odpt:Station", &[("owl:sameAs", stop.as_str())])
            .await
    }
}

/// Nearby-search query values.
fn place_params(origin: &Origin) -> (String, String, String) {
    (
        origin.location.latitude.to_string(),
        origin.location.longitude.to_string(),
        origin.radius_m.to_string(),
    )
}

impl TransitProvider for OdptClient {
    async fn find_stops_near(
        &self,
        mode: TransitMode,
        origin: &Origin,
    ) -> Result<Vec<OriginPoint>, OdptError> {
        match mode {
            TransitMode::Bus => Ok(convert_busstop_poles(
                &self.busstop_poles_near(origin).await?,
            )),
            TransitMode::Train => Ok(convert_stations(&self.stations_near(origin).await?)),
        }
    }

    async fn get_timetable(
        &self,
        mode: TransitMode,
        route: &RouteRef,
        calendar: CalendarKind,
    ) -> Result<Arc<Vec<TimetableRun>>, OdptError> {
        let runs = match mode {
            TransitMode::Bus => convert_bus_timetables(&self.bus_timetables(route, calendar).await?),
            TransitMode::Train => {
                convert_train_timetables(&self.train_timetables(route, calendar).await?)
            }
        };
        Ok(Arc::new(runs))
    }

    async fn get_stop_details(
        &self,
        mode: TransitMode,
        stop: &StopRef,
    ) -> Result<Option<StopDetails>, OdptError> {
        let details = match mode {
            TransitMode::Bus => self
                .busstop_pole(stop)
                .await?
                .first()
                .map(busstop_pole_details),
            TransitMode::Train => self.station(stop).await?.first().map(station_details),
        };

        details
            .transpose()
            .map_err(|source| OdptError::IncompleteRecord {
                stop: stop.clone(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_builder() {
        let config = OdptConfig::new("test-key")
            .with_base_url("http://localhost:8080")
            .with_max_concurrent(10)
            .with_timeout(60);

        assert_eq!(config.api_key, "test-key");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.max_concurrent, 10);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn config_defaults() {
        let config = OdptConfig::new("test-key");

        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.max_concurrent, DEFAULT_MAX_CONCURRENT);
        assert_eq!(config.timeout_secs, 30);
    }

    #[test]
    fn client_creation() {
        let client = OdptClient::new(OdptConfig::new("test-key"));
        assert!(client.is_ok());
    }

    #[test]
    fn url_joins_without_double_slash() {
        let client =
            OdptClient::new(OdptConfig::new("k").with_base_url("http://localhost:8080/api/v4/"))
                .unwrap();
        assert_eq!(
            client.url("odpt:BusTimetable"),
            "http://localhost:8080/api/v4/odpt:BusTimetable"
        );
    }

    #[test]
    fn nearby_query_values() {
        let origin = Origin::new(35.6439, 139.6993, 100).unwrap();
        let (lat, lon, radius) = place_params(&origin);
        assert_eq!(lat, "35.6439");
        assert_eq!(lon, "139.6993");
        assert_eq!(radius, "100");
    }

    // Requests against the real API need a consumer key and network access,
    // so they are not exercised here; the mock client covers the conversions.
}
