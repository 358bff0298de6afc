//! Print the OpenAPI document as JSON.

use clap::Parser;
use color_eyre::eyre::Result;
use marketplace::doc::ApiDoc;
use utoipa::OpenApi;

/// Dump the marketplace OpenAPI document.
#[derive(Debug, Parser)]
#[command(name = "openapi-dump")]
struct Args {
    /// Emit compact JSON instead of pretty-printed output.
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let json = if args.compact {
        doc.to_json()?
    } else {
        doc.to_pretty_json()?
    };
    println!("{json}");
    Ok(())
}
