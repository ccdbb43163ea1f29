//! Conversion from ODPT DTOs to domain types.
//!
//! Timetable records carry exactly one of an arrival or a departure time, and
//! train records may carry neither (pass-through points). Each record is
//! resolved here, once, into a canonical [`Visit`] or skipped.

use tracing::{trace, warn};

use crate::domain::{
    Coordinate, OriginPoint, RouteRef, StopDetails, StopRef, TimeOfDay, TimetableRun,
    TransitMode, Visit, VisitKind,
};

use super::types::{
    BusTimetableDto, BusTimetableObject, BusstopPoleDto, StationDto, TrainTimetableDto,
    TrainTimetableObject,
};

/// Error during DTO to domain conversion.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConversionError {
    /// Failed to parse a time string
    #[error("invalid time: {0}")]
    InvalidTime(#[from] crate::domain::TimeError),

    /// Missing required field
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// Empty identifier
    #[error("empty identifier in {0}")]
    EmptyId(&'static str),
}

/// A timetable record's time, resolved to whichever field is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordTime<'a> {
    Arrival(&'a str),
    Departure(&'a str),
    Absent,
}

impl<'a> RecordTime<'a> {
    fn resolve(arrival: Option<&'a str>, departure: Option<&'a str>) -> Self {
        match (arrival, departure) {
            (Some(t), _) => RecordTime::Arrival(t),
            (None, Some(t)) => RecordTime::Departure(t),
            (None, None) => RecordTime::Absent,
        }
    }

    fn parse(self) -> Result<Option<(TimeOfDay, VisitKind)>, ConversionError> {
        match self {
            RecordTime::Arrival(t) => Ok(Some((TimeOfDay::parse_hhmm(t)?, VisitKind::Arrival))),
            RecordTime::Departure(t) => {
                Ok(Some((TimeOfDay::parse_hhmm(t)?, VisitKind::Departure)))
            }
            RecordTime::Absent => Ok(None),
        }
    }
}

/// A raw timetable record that can be normalized into a [`Visit`].
pub trait TimetableObject {
    /// Mode whose field layout this record uses.
    const MODE: TransitMode;

    /// Resolve to a visit, or `None` for a pass-through record.
    fn normalize(&self) -> Result<Option<Visit>, ConversionError>;
}

impl TimetableObject for BusTimetableObject {
    const MODE: TransitMode = TransitMode::Bus;

    /// Bus records always carry a time; a record without one is an error.
    fn normalize(&self) -> Result<Option<Visit>, ConversionError> {
        let time = RecordTime::resolve(self.arrival_time.as_deref(), self.departure_time.as_deref());
        let (time, kind) = time
            .parse()?
            .ok_or(ConversionError::MissingField("odpt:arrivalTime/odpt:departureTime"))?;
        let pole = self
            .busstop_pole
            .as_deref()
            .ok_or(ConversionError::MissingField("odpt:busstopPole"))?;
        let stop =
            StopRef::new(pole).map_err(|_| ConversionError::EmptyId("odpt:busstopPole"))?;

        Ok(Some(Visit::new(stop, time, kind)))
    }
}

impl TimetableObject for TrainTimetableObject {
    const MODE: TransitMode = TransitMode::Train;

    fn normalize(&self) -> Result<Option<Visit>, ConversionError> {
        let time = RecordTime::resolve(self.arrival_time.as_deref(), self.departure_time.as_deref());
        let Some((time, kind)) = time.parse()? else {
            return Ok(None);
        };

        let station = self
            .arrival_station
            .as_deref()
            .or(self.departure_station.as_deref())
            .ok_or(ConversionError::MissingField(
                "odpt:arrivalStation/odpt:departureStation",
            ))?;
        let stop =
            StopRef::new(station).map_err(|_| ConversionError::EmptyId("timetable station"))?;

        Ok(Some(Visit::new(stop, time, kind)))
    }
}

/// Normalize every record of one run, skipping pass-through records.
///
/// Any other failure rejects the whole run.
pub fn convert_run<O: TimetableObject>(
    id: Option<&str>,
    objects: &[O],
) -> Result<TimetableRun, ConversionError> {
    let mut visits = Vec::with_capacity(objects.len());

    for (idx, object) in objects.iter().enumerate() {
        match object.normalize()? {
            Some(visit) => visits.push(visit),
            None => trace!(
                mode = %O::MODE,
                run = id.unwrap_or("<unnamed run>"),
                index = idx,
                "skipping pass-through record"
            ),
        }
    }

    let run = TimetableRun::new(id.map(str::to_string), visits);
    if !run.is_monotonic() {
        warn!(
            mode = %O::MODE,
            run = run.label(),
            "Run times decrease along the route; windows keep the contiguous prefix only"
        );
    }

    Ok(run)
}

/// Convert a bus timetable response, dropping runs that fail to convert.
pub fn convert_bus_timetables(runs: &[BusTimetableDto]) -> Vec<TimetableRun> {
    convert_runs(
        runs.iter()
            .map(|r| (r.same_as.as_deref(), r.objects.as_slice())),
    )
}

/// Convert a train timetable response, dropping runs that fail to convert.
pub fn convert_train_timetables(runs: &[TrainTimetableDto]) -> Vec<TimetableRun> {
    convert_runs(
        runs.iter()
            .map(|r| (r.same_as.as_deref(), r.objects.as_slice())),
    )
}

fn convert_runs<'a, O, I>(runs: I) -> Vec<TimetableRun>
where
    O: TimetableObject + 'a,
    I: Iterator<Item = (Option<&'a str>, &'a [O])>,
{
    let mut results = Vec::new();

    for (id, objects) in runs {
        match convert_run(id, objects) {
            Ok(run) => results.push(run),
            Err(e) => {
                // A bad record only costs its own run
                warn!(
                    mode = %O::MODE,
                    run = id.unwrap_or("<unnamed run>"),
                    error = %e,
                    "skipping timetable run"
                );
            }
        }
    }

    results
}

/// Convert nearby bus stop poles into origin points.
pub fn convert_busstop_poles(poles: &[BusstopPoleDto]) -> Vec<OriginPoint> {
    poles
        .iter()
        .filter_map(|pole| {
            let stop = StopRef::new(pole.same_as.as_deref()?).ok()?;
            let routes = pole
                .busroute_pattern
                .iter()
                .filter_map(|r| RouteRef::new(r).ok())
                .collect();
            Some(OriginPoint { stop, routes })
        })
        .collect()
}

/// Convert nearby stations into origin points. A station belongs to at most
/// one railway line.
pub fn convert_stations(stations: &[StationDto]) -> Vec<OriginPoint> {
    stations
        .iter()
        .filter_map(|station| {
            let stop = StopRef::new(station.same_as.as_deref()?).ok()?;
            let routes = station
                .railway
                .as_deref()
                .and_then(|r| RouteRef::new(r).ok())
                .into_iter()
                .collect();
            Some(OriginPoint { stop, routes })
        })
        .collect()
}

/// Build display details from a stop pole.
pub fn busstop_pole_details(pole: &BusstopPoleDto) -> Result<StopDetails, ConversionError> {
    stop_details(pole.title.as_deref(), pole.lat, pole.long)
}

/// Build display details from a station.
pub fn station_details(station: &StationDto) -> Result<StopDetails, ConversionError> {
    stop_details(station.title.as_deref(), station.lat, station.long)
}

fn stop_details(
    title: Option<&str>,
    lat: Option<f64>,
    long: Option<f64>,
) -> Result<StopDetails, ConversionError> {
    let name = title.ok_or(ConversionError::MissingField("dc:title"))?;
    let latitude = lat.ok_or(ConversionError::MissingField("geo:lat"))?;
    let longitude = long.ok_or(ConversionError::MissingField("geo:long"))?;

    Ok(StopDetails {
        name: name.to_string(),
        location: Coordinate::new(latitude, longitude),
    })
}
