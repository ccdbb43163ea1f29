//! Domain types for reachability analysis.
//!
//! This module contains the validated value types shared by the provider
//! client and the analysis core. Types enforce their invariants at
//! construction time, so code that receives them can trust their validity.

mod calendar;
mod geo;
mod ids;
mod time;
mod visit;

pub use calendar::{CalendarKind, TransitMode, UnknownVariant};
pub use geo::{Coordinate, InvalidOrigin, MAX_RADIUS_M, Origin};
pub use ids::{EmptyId, RouteRef, StopRef};
pub use time::{SECS_PER_DAY, TimeError, TimeOfDay};
pub use visit::{
    OriginPoint, ReachableEntry, ReachableResult, StopDetails, TimetableRun, Visit, VisitKind,
};
