//! Status command handler
//!
//! Checks whether a geomarks server is reachable.

use crate::config::Config;
use crate::error::Result;
use clap::Args;

/// Status command arguments
#[derive(Args)]
pub struct StatusArgs {
    /// Override the server address ("host:port")
    #[arg(long)]
    pub addr: Option<String>,
}

/// Run the status command
pub async fn run(args: StatusArgs) -> Result<()> {
    let config = Config::load()?;
    let addr = args.addr.unwrap_or_else(|| config.server_addr());
    let url = format!("http://{}/api/status", addr);

    match reqwest::get(&url).await {
        Ok(response) => {
            if response.status().is_success() {
                println!("Server: RUNNING on {}", addr);
                if let Ok(status) = response.json::<serde_json::Value>().await {
                    if let Some(version) = status.get("version").and_then(|v| v.as_str()) {
                        println!("  Version: {}", version);
                    }
                    if let Some(uptime) = status.get("uptime_secs").and_then(|v| v.as_u64()) {
                        println!("  Uptime: {}s", uptime);
                    }
                }
            } else {
                println!("Server: ERROR (status {})", response.status());
            }
        }
        Err(_) => {
            println!("Server: NOT RUNNING on {}", addr);
        }
    }

    Ok(())
}
