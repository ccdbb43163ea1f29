//! Reachability window extraction.
//!
//! A window is the stretch of one run between boarding at the origin stop
//! and the last visit still inside the time budget.

use crate::domain::{ReachableEntry, StopRef, TimeOfDay, TimetableRun, TransitMode};

/// Stops reached by riding one run from the origin stop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachableWindow {
    /// Mode of the run, used to resolve stop details.
    pub mode: TransitMode,
    /// Entries in run order, starting with the boarding visit.
    pub entries: Vec<ReachableEntry>,
}

/// Index of the first visit to `origin` strictly after `departure`.
///
/// A vehicle at the origin exactly at `departure` is not boardable.
pub fn find_anchor(run: &TimetableRun, origin: &StopRef, departure: TimeOfDay) -> Option<usize> {
    run.visits()
        .iter()
        .position(|v| &v.stop == origin && v.time > departure)
}

/// Extract the window of `run` boarded at `origin` after `departure`.
///
/// Returns `None` if the run never serves the origin after `departure`, or if
/// the boarding visit itself is already past the budget. Only the first
/// qualifying pass through the origin is considered. If times decrease along
/// the run, only the contiguous prefix inside the budget is kept.
pub fn extract_window(
    run: &TimetableRun,
    origin: &StopRef,
    departure: TimeOfDay,
    required_secs: u32,
    mode: TransitMode,
) -> Option<ReachableWindow> {
    let anchor = find_anchor(run, origin, departure)?;
    let deadline = departure.saturating_add_secs(required_secs);

    let entries: Vec<ReachableEntry> = run.visits()[anchor..]
        .iter()
        .take_while(|v| v.time <= deadline)
        .map(|v| ReachableEntry {
            stop: v.stop.clone(),
            arrival: v.time,
        })
        .collect();

    if entries.is_empty() {
        return None;
    }

    Some(ReachableWindow { mode, entries })
}
