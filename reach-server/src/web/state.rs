//! Application state for the web layer.

use std::sync::Arc;

use crate::reach::ReachConfig;

/// Shared application state.
///
/// Generic over the transit provider so the server can run against the live
/// API or the mock data set.
pub struct AppState<P> {
    /// Transit data provider (usually cached)
    pub provider: Arc<P>,

    /// Analysis configuration
    pub config: Arc<ReachConfig>,
}

impl<P> AppState<P> {
    /// Create a new app state.
    pub fn new(provider: P, config: ReachConfig) -> Self {
        Self {
            provider: Arc::new(provider),
            config: Arc::new(config),
        }
    }
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            provider: Arc::clone(&self.provider),
            config: Arc::clone(&self.config),
        }
    }
}
