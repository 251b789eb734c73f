//! Detail command handler
//!
//! Fetches the detail record for a single landmark by page id.

use crate::config::Config;
use crate::error::Result;
use crate::upstream::wikipedia::WikipediaSource;
use crate::upstream::{LandmarkDetail, LandmarkSource};
use clap::Args;

/// Detail command arguments
#[derive(Args)]
pub struct DetailArgs {
    /// Upstream page id of the landmark
    pub pageid: u64,

    /// Output as JSON instead of text
    #[arg(long)]
    pub json: bool,
}

/// Run the detail command
pub async fn run(args: DetailArgs) -> Result<()> {
    let config = Config::load()?;

    let source = WikipediaSource::from_config(&config.upstream)?;
    let detail = source.detail(args.pageid).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detail)?);
    } else {
        print_detail(&detail);
    }

    Ok(())
}

fn print_detail(detail: &LandmarkDetail) {
    println!("{} (#{})", detail.title, detail.pageid);

    if let Some(url) = &detail.url {
        println!("{}", url);
    }

    if let Some(thumbnail) = &detail.thumbnail {
        println!(
            "Thumbnail: {} ({}x{})",
            thumbnail.source, thumbnail.width, thumbnail.height
        );
    }

    if let Some(extract) = &detail.extract {
        println!("\n{}", extract);
    }
}
