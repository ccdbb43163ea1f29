//! Reachability analysis core.
//!
//! Given a point, a calendar, a departure time and a time budget, finds
//! every stop reachable by boarding a single vehicle near the point:
//!
//! 1. Stops near the origin are looked up per transport mode
//! 2. The timetable of every route serving them is fetched once
//! 3. Each run is cut down to its reachable window (see [`extract_window`])
//! 4. Windows are resolved to named stops, ordered by arrival and
//!    deduplicated by name

mod aggregate;
mod analyze;
mod config;
mod provider;
mod window;


pub use aggregate::sort_and_dedup;
pub use analyze::{
    Analyzer, ReachError, ReachReport, ReachRequest, analyze_reachability,
};
pub use config::ReachConfig;
pub use provider::TransitProvider;
pub use window::{ReachableWindow, extract_window, find_anchor};
