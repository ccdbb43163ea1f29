//! Reachability analysis.
//!
//! Answers "which stops can I reach from here within this much time, if I
//! leave now?" by boarding every run that serves a stop near the origin and
//! riding it until the time budget runs out.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{
    CalendarKind, InvalidOrigin, Origin, OriginPoint, ReachableResult, RouteRef, TimeOfDay,
    TimetableRun, TransitMode,
};

use super::aggregate::aggregate;
use super::config::ReachConfig;
use super::provider::TransitProvider;
use super::window::{ReachableWindow, extract_window};

/// Error from reachability analysis.
///
/// Provider failures never surface here; they only shrink the result.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ReachError {
    /// Origin coordinates or radius are unusable
    #[error("invalid origin: {0}")]
    InvalidOrigin(#[from] InvalidOrigin),

    /// No transport mode was requested
    #[error("no transport modes requested")]
    NoModes,
}

/// Request for reachability analysis.
#[derive(Debug, Clone)]
pub struct ReachRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_m: u32,

    /// Which timetable variant to use.
    pub calendar: CalendarKind,

    /// Time the rider is at the origin. Vehicles leaving at exactly this
    /// time are missed.
    pub departure: TimeOfDay,

    /// Time budget in seconds from `departure`.
    pub required_secs: u32,

    /// Modes to search. Results from all modes are merged.
    pub modes: Vec<TransitMode>,
}

impl ReachRequest {
    /// Create a request searching all modes.
    pub fn new(
        latitude: f64,
        longitude: f64,
        radius_m: u32,
        calendar: CalendarKind,
        departure: TimeOfDay,
        required_secs: u32,
    ) -> Self {
        Self {
            latitude,
            longitude,
            radius_m,
            calendar,
            departure,
            required_secs,
            modes: TransitMode::ALL.to_vec(),
        }
    }

    /// Restrict the request to the given modes.
    pub fn with_modes(mut self, modes: impl IntoIterator<Item = TransitMode>) -> Self {
        self.modes = modes.into_iter().collect();
        self
    }

    /// Validate the request, returning its origin.
    pub fn validate(&self, max_radius_m: u32) -> Result<Origin, ReachError> {
        if self.modes.is_empty() {
            return Err(ReachError::NoModes);
        }
        Ok(Origin::with_max_radius(
            self.latitude,
            self.longitude,
            self.radius_m,
            max_radius_m,
        )?)
    }
}

/// Result of reachability analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReachReport {
    /// Reachable stops, earliest arrival first, one per name.
    pub results: Vec<ReachableResult>,

    /// Stops found near the origin across all modes.
    pub origin_points: usize,

    /// Distinct timetables fetched successfully.
    pub routes_fetched: usize,

    /// Runs examined for a boarding point.
    pub runs_scanned: usize,

    /// Runs that yielded a non-empty window.
    pub windows: usize,
}

/// Reachability analyzer over a transit data provider.
pub struct Analyzer<'a, P: TransitProvider> {
    provider: &'a P,
    config: &'a ReachConfig,
}

impl<'a, P: TransitProvider> Analyzer<'a, P> {
    /// Create a new analyzer.
    pub fn new(provider: &'a P, config: &'a ReachConfig) -> Self {
        Self { provider, config }
    }

    /// Run the analysis.
    ///
    /// Only an unusable request is an error. Failed provider calls are
    /// logged and the affected stop, route or mode contributes nothing.
    pub async fn analyze(&self, request: &ReachRequest) -> Result<ReachReport, ReachError> {
        let origin = request.validate(self.config.max_radius_m)?;
        let mut report = ReachReport::default();

        let mut points: Vec<(TransitMode, OriginPoint)> = Vec::new();
        for mode in distinct(&request.modes) {
            match self.provider.find_stops_near(mode, &origin).await {
                Ok(found) => {
                    debug!(%mode, stops = found.len(), "Found stops near origin");
                    points.extend(found.into_iter().map(|p| (mode, p)));
                }
                Err(e) => {
                    warn!(
                        %mode,
                        error = %e,
                        transient = e.is_transient(),
                        "Failed to find nearby stops, skipping mode"
                    );
                }
            }
        }
        report.origin_points = points.len();

        if points.is_empty() {
            debug!(origin = %origin.location, "No stops near origin");
            return Ok(report);
        }

        let timetables = self.fetch_timetables(&points, request.calendar).await;
        report.routes_fetched = timetables.len();

        let mut windows: Vec<ReachableWindow> = Vec::new();
        for (mode, point) in &points {
            for route in &point.routes {
                let Some(runs) = timetables.get(&(*mode, route.clone())) else {
                    continue;
                };
                for run in runs.iter() {
                    report.runs_scanned += 1;
                    if let Some(window) = extract_window(
                        run,
                        &point.stop,
                        request.departure,
                        request.required_secs,
                        *mode,
                    ) {
                        windows.push(window);
                    }
                }
            }
        }
        report.windows = windows.len();

        debug!(
            runs = report.runs_scanned,
            windows = report.windows,
            "Extracted reachability windows"
        );

        report.results = aggregate(self.provider, &windows, self.config.batch_size).await;
        Ok(report)
    }

    /// Fetch the timetable of every distinct route serving the origin
    /// points, in batches.
    async fn fetch_timetables(
        &self,
        points: &[(TransitMode, OriginPoint)],
        calendar: CalendarKind,
    ) -> HashMap<(TransitMode, RouteRef), Arc<Vec<TimetableRun>>> {
        let mut seen = HashSet::new();
        let routes: Vec<(TransitMode, RouteRef)> = points
            .iter()
            .flat_map(|(mode, p)| p.routes.iter().map(move |r| (*mode, r.clone())))
            .filter(|key| seen.insert(key.clone()))
            .collect();

        debug!(routes = routes.len(), %calendar, "Fetching timetables");

        let mut timetables = HashMap::with_capacity(routes.len());

        for batch in routes.chunks(self.config.batch_size.max(1)) {
            let futures = batch
                .iter()
                .map(|(mode, route)| self.provider.get_timetable(*mode, route, calendar));
            let results = join_all(futures).await;

            for ((mode, route), result) in batch.iter().zip(results) {
                match result {
                    Ok(runs) => {
                        timetables.insert((*mode, route.clone()), runs);
                    }
                    Err(e) => {
                        warn!(
                            %route,
                            %mode,
                            error = %e,
                            transient = e.is_transient(),
                            "Failed to fetch timetable, skipping route"
                        );
                    }
                }
            }
        }

        timetables
    }
}

/// Modes in request order without repeats.
fn distinct(modes: &[TransitMode]) -> Vec<TransitMode> {
    let mut seen = HashSet::new();
    modes.iter().copied().filter(|m| seen.insert(*m)).collect()
}

/// Stops reachable from a point within a time budget, over all modes.
///
/// Convenience wrapper around [`Analyzer`] with the default configuration.
/// An invalid origin yields an error; every other failure only shrinks the
/// result.
pub async fn analyze_reachability<P: TransitProvider>(
    provider: &P,
    latitude: f64,
    longitude: f64,
    radius_m: u32,
    calendar: CalendarKind,
    departure_secs: u32,
    required_secs: u32,
) -> Result<Vec<ReachableResult>, ReachError> {
    let config = ReachConfig::default();
    let request = ReachRequest::new(
        latitude,
        longitude,
        radius_m,
        calendar,
        TimeOfDay::from_secs(departure_secs),
        required_secs,
    );

    let report = Analyzer::new(provider, &config).analyze(&request).await?;
    Ok(report.results)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ReachRequest {
        ReachRequest::new(
            35.6439,
            139.6993,
            100,
            CalendarKind::Weekday,
            TimeOfDay::from_secs(43_200),
            3600,
        )
    }

    #[test]
    fn request_defaults_to_all_modes() {
        assert_eq!(request().modes, vec![TransitMode::Bus, TransitMode::Train]);
    }

    #[test]
    fn validate_accepts_good_request() {
        let origin = request().validate(4000).unwrap();
        assert_eq!(origin.radius_m, 100);
    }

    #[test]
    fn validate_rejects_no_modes() {
        let req = request().with_modes(Vec::new());
        assert_eq!(req.validate(4000), Err(ReachError::NoModes));
    }

    #[test]
    fn validate_rejects_bad_origin() {
        let mut req = request();
        req.latitude = 91.0;
        assert!(matches!(
            req.validate(4000),
            Err(ReachError::InvalidOrigin(InvalidOrigin::Latitude(_)))
        ));

        let mut req = request();
        req.radius_m = 500;
        assert!(matches!(
            req.validate(400),
            Err(ReachError::InvalidOrigin(InvalidOrigin::Radius { .. }))
        ));
    }

    #[test]
    fn distinct_modes_keep_order() {
        assert_eq!(
            distinct(&[TransitMode::Train, TransitMode::Bus, TransitMode::Train]),
            vec![TransitMode::Train, TransitMode::Bus]
        );
    }
}
