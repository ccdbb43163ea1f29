//! Timetable runs and the records derived from them.

use super::geo::Coordinate;
use super::ids::{RouteRef, StopRef};
use super::time::TimeOfDay;

/// Whether a visit's time was published as an arrival or a departure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitKind {
    Arrival,
    Departure,
}

/// One stop visit within a run, with its single canonical time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Visit {
    pub stop: StopRef,
    pub time: TimeOfDay,
    pub kind: VisitKind,
}

impl Visit {
    pub fn new(stop: StopRef, time: TimeOfDay, kind: VisitKind) -> Self {
        Self { stop, time, kind }
    }
}

/// One scheduled vehicle traversal of a route.
///
/// Visits are kept in published order, which is temporal order. The order is
/// never changed after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableRun {
    /// Provider identifier of the run, when it has one.
    pub id: Option<String>,
    visits: Vec<Visit>,
}

impl TimetableRun {
    pub fn new(id: Option<String>, visits: Vec<Visit>) -> Self {
        Self { id, visits }
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    pub fn len(&self) -> usize {
        self.visits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visits.is_empty()
    }

    /// Whether visit times never decrease along the run.
    pub fn is_monotonic(&self) -> bool {
        self.visits.windows(2).all(|w| w[0].time <= w[1].time)
    }

    /// A label for log messages.
    pub fn label(&self) -> &str {
        self.id.as_deref().unwrap_or("<unnamed run>")
    }
}

/// A stop near the search origin together with the routes serving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginPoint {
    pub stop: StopRef,
    pub routes: Vec<RouteRef>,
}

/// Display data for a stop.
#[derive(Debug, Clone, PartialEq)]
pub struct StopDetails {
    pub name: String,
    pub location: Coordinate,
}

/// A stop reached within a window, with the time the vehicle is there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachableEntry {
    pub stop: StopRef,
    pub arrival: TimeOfDay,
}

/// A resolved reachable stop, as returned to callers.
#[derive(Debug, Clone, PartialEq)]
pub struct ReachableResult {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Seconds since local midnight; may exceed one day.
    pub arrival_secs: u32,
}

impl ReachableResult {
    pub fn new(details: &StopDetails, arrival: TimeOfDay) -> Self {
        Self {
            name: details.name.clone(),
            latitude: details.location.latitude,
            longitude: details.location.longitude,
            arrival_secs: arrival.as_secs(),
        }
    }

    pub fn arrival(&self) -> TimeOfDay {
        TimeOfDay::from_secs(self.arrival_secs)
    }
}
