//! Locate command handler
//!
//! Exercises the client pipeline end to end: geolocate this device, then
//! search around the fix through a running proxy server.

use crate::client::ApiClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::{get_formatter, SearchReport};
use crate::geo::get_position_provider;
use crate::validate::SearchRequest;
use crate::viewport::{ViewState, ViewportController};
use clap::Args;

/// Locate command arguments
#[derive(Args)]
pub struct LocateArgs {
    /// Zoom level used to derive the search radius
    #[arg(long, short = 'z')]
    pub zoom: Option<f64>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,
}

/// Run the locate command
pub async fn run(args: LocateArgs) -> Result<()> {
    let config = Config::load()?;
    let zoom = args.zoom.unwrap_or(config.defaults.zoom);

    let client = ApiClient::new(format!("http://{}", config.server_addr()));
    let controller = ViewportController::new(client);
    let mut updates = controller.subscribe();

    let format = args.format.unwrap_or_else(|| config.defaults.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("unknown format: {}", format)))?;

    let provider = get_position_provider();
    let viewport = controller.locate(&provider, zoom).await?;
    eprintln!(
        "Located at ({:.5}, {:.5}), searching {:.0}m",
        viewport.center.lat,
        viewport.center.lon,
        viewport.radius()
    );

    // Wait for the dispatched search to resolve
    loop {
        updates
            .changed()
            .await
            .map_err(|_| Error::Server("viewport pipeline closed".to_string()))?;

        let state = updates.borrow_and_update().clone();
        match state {
            ViewState::Ready { viewport, landmarks } => {
                let report = SearchReport {
                    request: SearchRequest::new(viewport.center, viewport.radius()),
                    landmarks,
                };
                println!("{}", formatter.format(&report)?);
                return Ok(());
            }
            ViewState::Failed { message } => {
                return Err(Error::Network(format!(
                    "search failed (is the server running?): {}",
                    message
                )));
            }
            ViewState::Idle | ViewState::Loading => continue,
        }
    }
}
