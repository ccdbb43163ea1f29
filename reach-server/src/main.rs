use std::net::SocketAddr;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use reach_server::cache::{CacheConfig, CachedProvider};
use reach_server::odpt::{MockOdptClient, OdptClient, OdptConfig};
use reach_server::reach::{ReachConfig, TransitProvider};
use reach_server::web::{AppState, create_router};

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reach_server=info")),
        )
        .init();

    let addr: SocketAddr = std::env::var("REACH_BIND_ADDR")
        .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string())
        .parse()
        .expect("REACH_BIND_ADDR must be a socket address");

    let cache_config = CacheConfig::default();
    let reach_config = ReachConfig::default();

    // Serve from local files if a mock directory is given
    if let Ok(dir) = std::env::var("ODPT_MOCK_DIR") {
        let mock = MockOdptClient::new(&dir).expect("Failed to load mock ODPT data");
        info!(dir = %dir, stops = mock.stop_count(), "Using mock ODPT data");
        serve(CachedProvider::new(mock, &cache_config), reach_config, addr).await;
        return;
    }

    // Get consumer key from environment
    let api_key = std::env::var("ODPT_API_KEY").unwrap_or_else(|_| {
        warn!("ODPT_API_KEY not set. API calls will fail.");
        String::new()
    });

    let mut odpt_config = OdptConfig::new(api_key);
    if let Ok(url) = std::env::var("ODPT_BASE_URL") {
        odpt_config = odpt_config.with_base_url(url);
    }
    let client = OdptClient::new(odpt_config).expect("Failed to create ODPT client");

    serve(CachedProvider::new(client, &cache_config), reach_config, addr).await;
}

async fn serve<P>(provider: P, config: ReachConfig, addr: SocketAddr)
where
    P: TransitProvider + Send + Sync + 'static,
{
    let app = create_router(AppState::new(provider, config));

    info!("Reachability server listening on http://{addr}");
    info!("Open http://{addr} in your browser for the web interface.");
    info!("API Endpoints:");
    info!("  GET  /health     - Health check");
    info!("  GET  /reachable  - Stops reachable within a time budget");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listen address");
    axum::serve(listener, app).await.expect("Server error");
}
