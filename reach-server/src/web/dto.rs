//! Data transfer objects for web requests and responses.

use chrono::{Duration, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{
    CalendarKind, ReachableResult, TimeError, TimeOfDay, TransitMode, UnknownVariant,
};
use crate::reach::{ReachReport, ReachRequest};

/// Budget used when the request does not name one (one hour).
pub const DEFAULT_REQUIRED_SECS: u32 = 60 * 60;

/// ODPT timetables are published in Japan Standard Time, which has no DST.
const TIMETABLE_UTC_OFFSET_HOURS: i64 = 9;

/// Current wall-clock time in the timetables' zone, regardless of the
/// server's own time zone.
pub fn timetable_now() -> NaiveDateTime {
    Utc::now().naive_utc() + Duration::hours(TIMETABLE_UTC_OFFSET_HOURS)
}

/// Request for reachable stops.
#[derive(Debug, Deserialize)]
pub struct ReachableQuery {
    /// Origin latitude
    pub lat: f64,

    /// Origin longitude
    pub lon: f64,

    /// Search radius around the origin in meters
    pub radius: u32,

    /// `weekday` or `holiday` (defaults to today's calendar)
    pub calendar: Option<String>,

    /// Departure as HH:MM or seconds since midnight (defaults to now)
    pub departure: Option<String>,

    /// Time budget in seconds (defaults to one hour)
    pub required: Option<u32>,

    /// `bus`, `train` or `all` (defaults to all)
    pub mode: Option<String>,
}

/// Error turning query parameters into an analysis request.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error(transparent)]
    Time(#[from] TimeError),

    #[error(transparent)]
    Variant(#[from] UnknownVariant),
}

impl ReachableQuery {
    /// Build the analysis request, filling defaults from `now`, a wall-clock
    /// time in the timetables' zone (see [`timetable_now`]).
    ///
    /// Origin validation is left to the analyzer.
    pub fn to_request(&self, now: NaiveDateTime) -> Result<ReachRequest, QueryError> {
        let calendar = match non_empty(&self.calendar) {
            Some(c) => CalendarKind::parse(c)?,
            None => CalendarKind::for_date(now.date()),
        };

        let departure = match non_empty(&self.departure) {
            Some(d) => parse_departure(d)?,
            None => TimeOfDay::from_secs(now.time().num_seconds_from_midnight()),
        };

        let modes = match non_empty(&self.mode) {
            Some(m) => TransitMode::parse_set(m)?,
            None => TransitMode::ALL.to_vec(),
        };

        Ok(ReachRequest::new(
            self.lat,
            self.lon,
            self.radius,
            calendar,
            departure,
            self.required.unwrap_or(DEFAULT_REQUIRED_SECS),
        )
        .with_modes(modes))
    }
}

/// Form fields left blank arrive as empty strings.
fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Parse a departure given either as HH:MM or as plain seconds.
fn parse_departure(s: &str) -> Result<TimeOfDay, TimeError> {
    if s.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(secs) = s.parse::<u32>() {
            return Ok(TimeOfDay::from_secs(secs));
        }
    }
    TimeOfDay::parse_hhmm(s)
}

/// A reachable stop in the response.
#[derive(Debug, Serialize)]
pub struct ReachableResultDto {
    /// Stop or station name
    pub name: String,

    pub latitude: f64,
    pub longitude: f64,

    /// Seconds since midnight; may exceed one day
    pub arrival_secs: u32,

    /// Arrival formatted as HH:MM (hours may exceed 23)
    pub arrival: String,
}

impl From<&ReachableResult> for ReachableResultDto {
    fn from(result: &ReachableResult) -> Self {
        Self {
            name: result.name.clone(),
            latitude: result.latitude,
            longitude: result.longitude,
            arrival_secs: result.arrival_secs,
            arrival: result.arrival().to_string(),
        }
    }
}

/// Response for a reachability query.
#[derive(Debug, Serialize)]
pub struct ReachableResponse {
    pub results: Vec<ReachableResultDto>,

    /// Stops found near the origin
    pub origin_points: usize,

    /// Timetables fetched
    pub routes_fetched: usize,

    /// Runs examined
    pub runs_scanned: usize,

    /// Runs that reached at least one stop
    pub windows: usize,
}

impl From<&ReachReport> for ReachableResponse {
    fn from(report: &ReachReport) -> Self {
        Self {
            results: report.results.iter().map(ReachableResultDto::from).collect(),
            origin_points: report.origin_points,
            routes_fetched: report.routes_fetched,
            runs_scanned: report.runs_scanned,
            windows: report.windows,
        }
    }
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
