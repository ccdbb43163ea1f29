//! Data provider abstraction for the analysis core.

use std::future::Future;
use std::sync::Arc;

use crate::domain::{
    CalendarKind, Origin, OriginPoint, RouteRef, StopDetails, StopRef, TimetableRun, TransitMode,
};
use crate::odpt::OdptError;

/// Trait for providing stops, timetables and stop details.
///
/// This abstraction allows the analysis to run against the live API, the
/// mock data set, a cache in front of either, or test fixtures.
pub trait TransitProvider {
    /// Stops of `mode` within the origin's radius, each with the routes
    /// serving it.
    fn find_stops_near(
        &self,
        mode: TransitMode,
        origin: &Origin,
    ) -> impl Future<Output = Result<Vec<OriginPoint>, OdptError>> + Send;

    /// All runs of `route` published for `calendar`, in provider order.
    fn get_timetable(
        &self,
        mode: TransitMode,
        route: &RouteRef,
        calendar: CalendarKind,
    ) -> impl Future<Output = Result<Arc<Vec<TimetableRun>>, OdptError>> + Send;

    /// Display details of a stop, or `None` if the provider has no record.
    fn get_stop_details(
        &self,
        mode: TransitMode,
        stop: &StopRef,
    ) -> impl Future<Output = Result<Option<StopDetails>, OdptError>> + Send;
}
