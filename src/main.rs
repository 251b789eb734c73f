//! geomarks CLI entry point
//!
//! Map-based landmark discovery - CLI + proxy server

use geomarks::cli;

#[tokio::main]
async fn main() {
    if let Err(e) = cli::run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
