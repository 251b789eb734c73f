//! HTTP server for geomarks
//!
//! The proxy between map clients and the upstream encyclopedia API.

pub mod routes;
pub mod state;

use crate::config::Config;
use crate::error::Result;
use crate::upstream::wikipedia::WikipediaSource;
use routes::create_router;
use state::AppState;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{debug, info};

/// Start the HTTP server
///
/// # Arguments
/// * `config` - Server configuration
///
/// # Returns
/// Never returns unless the server shuts down
pub async fn run(config: Config) -> Result<()> {
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| crate::error::Error::Server(format!("invalid server address: {}", e)))?;

    let source = WikipediaSource::from_config(&config.upstream)?;
    let state = Arc::new(AppState::new(config, source));

    spawn_limiter_sweep(Arc::clone(&state));

    let app = create_router(Arc::clone(&state));

    info!("starting server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| crate::error::Error::Server(format!("failed to bind to {}: {}", addr, e)))?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| crate::error::Error::Server(format!("server error: {}", e)))?;

    Ok(())
}

/// Periodically drop expired rate limit entries so the client map stays
/// bounded by recently-active clients
fn spawn_limiter_sweep(state: Arc<AppState<WikipediaSource>>) {
    let period = state.limiter.window();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.tick().await; // first tick fires immediately, skip it
        loop {
            ticker.tick().await;
            let swept = state.limiter.sweep_expired(Instant::now());
            if swept > 0 {
                debug!(
                    "rate limiter sweep removed {} entries, {} tracked",
                    swept,
                    state.limiter.tracked_clients()
                );
            }
        }
    });
}
