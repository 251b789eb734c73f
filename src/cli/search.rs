//! Search command handler
//!
//! One-shot landmark search straight against the upstream, no server needed.

use crate::config::Config;
use crate::coord::Coordinates;
use crate::error::{Error, Result};
use crate::format::{available_formats, get_formatter, SearchReport};
use crate::geo::{get_position_provider, PositionProvider};
use crate::upstream::wikipedia::WikipediaSource;
use crate::upstream::LandmarkSource;
use crate::validate::SearchRequest;
use clap::Args;

/// Search command arguments
#[derive(Args)]
pub struct SearchArgs {
    /// Latitude
    #[arg(long)]
    pub lat: Option<f64>,

    /// Longitude
    #[arg(long)]
    pub lon: Option<f64>,

    /// Use current location (IP geolocation)
    #[arg(long, conflicts_with_all = ["lat", "lon"])]
    pub here: bool,

    /// Search radius in meters
    #[arg(long, short = 'r')]
    pub radius: Option<f64>,

    /// Output format
    #[arg(long, short = 'f')]
    pub format: Option<String>,

    /// Write output to file
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// List available formats
    #[arg(short = 'F', long = "list-formats")]
    pub list_formats: bool,
}

/// Run the search command
pub async fn run(args: SearchArgs) -> Result<()> {
    if args.list_formats {
        list_formats();
        return Ok(());
    }

    let config = Config::load()?;

    // Determine the search center
    let center = if args.here {
        let position = get_position_provider().position().await?;
        eprintln!("Using IP location: {}", position.display_name);
        Coordinates::new(position.lat, position.lon)
    } else if let (Some(lat), Some(lon)) = (args.lat, args.lon) {
        Coordinates::new(lat, lon)
    } else if config.location.default_here {
        let position = get_position_provider().position().await?;
        eprintln!("Using IP location: {}", position.display_name);
        Coordinates::new(position.lat, position.lon)
    } else {
        eprintln!("Error: No location specified. Use --lat/--lon or --here");
        std::process::exit(1);
    };

    center.validate()?;

    let radius = args.radius.unwrap_or(config.defaults.radius);
    let request = SearchRequest::new(center, radius);

    let source = WikipediaSource::from_config(&config.upstream)?;
    let landmarks = source.search(request.center, request.radius).await?;

    let report = SearchReport { request, landmarks };

    // Format output
    let format = args.format.unwrap_or_else(|| config.defaults.format.clone());
    let formatter = get_formatter(&format)
        .ok_or_else(|| Error::Config(format!("unknown format: {}", format)))?;
    let output = formatter.format(&report)?;

    if let Some(path) = args.output {
        std::fs::write(&path, &output)?;
        eprintln!("Output written to {}", path);
    } else {
        println!("{}", output);
    }

    Ok(())
}

/// Print available output formats
fn list_formats() {
    println!("Available output formats:");
    for format in available_formats() {
        println!("  {:6} - {}", format.name, format.description);
    }
}
