//! Mock ODPT client for testing without API access.
//!
//! Loads ODPT-shaped JSON from a directory and serves it as if it were live
//! API responses, including radius filtering for nearby searches.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::domain::{
    CalendarKind, Coordinate, Origin, OriginPoint, RouteRef, StopDetails, StopRef, TimetableRun,
    TransitMode,
};
use crate::reach::TransitProvider;

use super::convert::{
    busstop_pole_details, convert_bus_timetables, convert_busstop_poles, convert_stations,
    convert_train_timetables, station_details,
};
use super::error::OdptError;
use super::types::{BusTimetableDto, BusstopPoleDto, StationDto, TrainTimetableDto};

const BUS_STOPS_FILE: &str = "bus_stops.json";
const STATIONS_FILE: &str = "stations.json";
const BUS_TIMETABLES_FILE: &str = "bus_timetables.json";
const TRAIN_TIMETABLES_FILE: &str = "train_timetables.json";

/// Raw data set as it would come back from the API.
#[derive(Debug, Clone, Default)]
struct MockData {
    bus_stops: Vec<BusstopPoleDto>,
    stations: Vec<StationDto>,
    bus_timetables: Vec<BusTimetableDto>,
    train_timetables: Vec<TrainTimetableDto>,
}

impl MockData {
    fn load(data_dir: &Path) -> Result<Self, OdptError> {
        if !data_dir.is_dir() {
            return Err(OdptError::Mock(format!(
                "mock data directory {:?} does not exist",
                data_dir
            )));
        }

        let data = Self {
            bus_stops: load_file(data_dir, BUS_STOPS_FILE)?,
            stations: load_file(data_dir, STATIONS_FILE)?,
            bus_timetables: load_file(data_dir, BUS_TIMETABLES_FILE)?,
            train_timetables: load_file(data_dir, TRAIN_TIMETABLES_FILE)?,
        };

        if data.bus_stops.is_empty() && data.stations.is_empty() {
            return Err(OdptError::Mock(format!(
                "no stops or stations found in {:?}",
                data_dir
            )));
        }

        Ok(data)
    }
}

/// Load one JSON array file; a missing file is an empty array.
fn load_file<T: DeserializeOwned>(data_dir: &Path, name: &str) -> Result<Vec<T>, OdptError> {
    let path = data_dir.join(name);
    if !path.exists() {
        return Ok(Vec::new());
    }

    let json = std::fs::read_to_string(&path)
        .map_err(|e| OdptError::Mock(format!("failed to read {:?}: {}", path, e)))?;

    serde_json::from_str(&json)
        .map_err(|e| OdptError::Mock(format!("failed to parse {:?}: {}", path, e)))
}

/// Whether a record's calendar matches the requested one. Records without a
/// calendar run every day.
fn calendar_matches(record: Option<&str>, calendar: CalendarKind) -> bool {
    record.is_none_or(|c| c == calendar.odpt_id())
}

fn within(origin: &Origin, lat: Option<f64>, long: Option<f64>) -> bool {
    match (lat, long) {
        (Some(lat), Some(long)) => origin.contains(&Coordinate::new(lat, long)),
        _ => false,
    }
}

/// Mock ODPT client that serves data from JSON files.
///
/// This is useful for development and testing without an ODPT consumer key.
#[derive(Clone)]
pub struct MockOdptClient {
    data: Arc<MockData>,
}

impl MockOdptClient {
    /// Create a new mock client by loading JSON files from a directory.
    ///
    /// Expects any of `bus_stops.json`, `stations.json`,
    /// `bus_timetables.json` and `train_timetables.json`, each a JSON array
    /// in the API's response format.
    pub fn new(data_dir: impl AsRef<Path>) -> Result<Self, OdptError> {
        let data = MockData::load(data_dir.as_ref())?;
        Ok(Self {
            data: Arc::new(data),
        })
    }

    /// Number of bus stops and stations loaded.
    pub fn stop_count(&self) -> usize {
        self.data.bus_stops.len() + self.data.stations.len()
    }
}

impl TransitProvider for MockOdptClient {
    async fn find_stops_near(
        &self,
        mode: TransitMode,
        origin: &Origin,
    ) -> Result<Vec<OriginPoint>, OdptError> {
        let data = &self.data;

        let points = match mode {
            TransitMode::Bus => {
                let near: Vec<_> = data
                    .bus_stops
                    .iter()
                    .filter(|p| within(origin, p.lat, p.long))
                    .cloned()
                    .collect();
                convert_busstop_poles(&near)
            }
            TransitMode::Train => {
                let near: Vec<_> = data
                    .stations
                    .iter()
                    .filter(|s| within(origin, s.lat, s.long))
                    .cloned()
                    .collect();
                convert_stations(&near)
            }
        };

        Ok(points)
    }

    async fn get_timetable(
        &self,
        mode: TransitMode,
        route: &RouteRef,
        calendar: CalendarKind,
    ) -> Result<Arc<Vec<TimetableRun>>, OdptError> {
        let data = &self.data;

        let runs = match mode {
            TransitMode::Bus => {
                let matching: Vec<_> = data
                    .bus_timetables
                    .iter()
                    .filter(|t| t.busroute_pattern.as_deref() == Some(route.as_str()))
                    .filter(|t| calendar_matches(t.calendar.as_deref(), calendar))
                    .cloned()
                    .collect();
                convert_bus_timetables(&matching)
            }
            TransitMode::Train => {
                let matching: Vec<_> = data
                    .train_timetables
                    .iter()
                    .filter(|t| t.railway.as_deref() == Some(route.as_str()))
                    .filter(|t| calendar_matches(t.calendar.as_deref(), calendar))
                    .cloned()
                    .collect();
                convert_train_timetables(&matching)
            }
        };

        Ok(Arc::new(runs))
    }

    async fn get_stop_details(
        &self,
        mode: TransitMode,
        stop: &StopRef,
    ) -> Result<Option<StopDetails>, OdptError> {
        let data = &self.data;

        let details = match mode {
            TransitMode::Bus => data
                .bus_stops
                .iter()
                .find(|p| p.same_as.as_deref() == Some(stop.as_str()))
                .map(busstop_pole_details),
            TransitMode::Train => data
                .stations
                .iter()
                .find(|s| s.same_as.as_deref() == Some(stop.as_str()))
                .map(station_details),
        };

        details
            .transpose()
            .map_err(|source| OdptError::IncompleteRecord {
                stop: stop.clone(),
                source,
            })
    }
}
