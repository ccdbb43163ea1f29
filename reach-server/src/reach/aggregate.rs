//! Result aggregation across windows.

use std::collections::{HashMap, HashSet};

use futures::future::join_all;
use tracing::{debug, warn};

use crate::domain::{ReachableResult, StopDetails, StopRef, TransitMode};

use super::provider::TransitProvider;
use super::window::ReachableWindow;

/// Sort results by arrival time and keep the earliest result per name.
///
/// The sort is stable, so results arriving at the same time keep their
/// discovery order.
pub fn sort_and_dedup(mut results: Vec<ReachableResult>) -> Vec<ReachableResult> {
    results.sort_by_key(|r| r.arrival_secs);

    let mut seen = HashSet::new();
    results.retain(|r| seen.insert(r.name.clone()));
    results
}

/// Resolve every distinct stop in `windows` to its details.
///
/// Lookups run concurrently in batches of `batch_size`. Stops that fail to
/// resolve are missing from the returned map.
pub async fn resolve_stops<P: TransitProvider>(
    provider: &P,
    windows: &[ReachableWindow],
    batch_size: usize,
) -> HashMap<(TransitMode, StopRef), StopDetails> {
    let mut seen = HashSet::new();
    let stops: Vec<(TransitMode, StopRef)> = windows
        .iter()
        .flat_map(|w| w.entries.iter().map(move |e| (w.mode, e.stop.clone())))
        .filter(|key| seen.insert(key.clone()))
        .collect();

    debug!(stops = stops.len(), "Resolving stop details");

    let mut resolved = HashMap::with_capacity(stops.len());

    for batch in stops.chunks(batch_size.max(1)) {
        let futures = batch
            .iter()
            .map(|(mode, stop)| provider.get_stop_details(*mode, stop));
        let results = join_all(futures).await;

        for ((mode, stop), result) in batch.iter().zip(results) {
            match result {
                Ok(Some(details)) => {
                    resolved.insert((*mode, stop.clone()), details);
                }
                Ok(None) => {
                    warn!(%stop, %mode, "Unknown stop, dropping its entries");
                }
                Err(e) => {
                    warn!(
                        %stop,
                        %mode,
                        error = %e,
                        transient = e.is_transient(),
                        "Failed to fetch stop details, dropping its entries"
                    );
                }
            }
        }
    }

    resolved
}

/// Flatten windows into resolved results, in discovery order.
///
/// Entries whose stop is missing from `details` are dropped.
pub fn flatten_windows(
    windows: &[ReachableWindow],
    details: &HashMap<(TransitMode, StopRef), StopDetails>,
) -> Vec<ReachableResult> {
    windows
        .iter()
        .flat_map(|w| {
            w.entries.iter().filter_map(move |e| {
                details
                    .get(&(w.mode, e.stop.clone()))
                    .map(|d| ReachableResult::new(d, e.arrival))
            })
        })
        .collect()
}

/// Resolve, sort and deduplicate the entries of all windows.
pub async fn aggregate<P: TransitProvider>(
    provider: &P,
    windows: &[ReachableWindow],
    batch_size: usize,
) -> Vec<ReachableResult> {
    let details = resolve_stops(provider, windows, batch_size).await;
    sort_and_dedup(flatten_windows(windows, &details))
}
