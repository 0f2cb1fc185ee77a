use anyhow::Context;
use clap::Parser;
use route_buffer::{
    sdk::check::{check_route, RouteCheckRequest},
    sdk::config::OrsConfig,
    sdk::deliveries::DeliveryLookup,
    sdk::routing::{CachedGeocoder, GeoCache, ViaPolicy},
    sdk::util::log::init_logging,
};
use std::{fs::File, io::Write, path::PathBuf};

/// Draws a driving route and flags the deliveries of a zone that lie within a
/// buffer distance of it
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Start location, as an address or "lat,lon"
    #[arg(short, long)]
    start: String,

    /// End location, as an address or "lat,lon"
    #[arg(short, long)]
    end: String,

    /// Via-point between start and end (repeatable, kept in order)
    #[arg(short, long = "via")]
    vias: Vec<String>,

    /// Delivery zone to check
    #[arg(short, long)]
    zone: String,

    /// Buffer distance around the route, in meters
    #[arg(short, long, default_value_t = 1000.0)]
    buffer: f64,

    /// CSV file holding the delivery records
    #[arg(long, default_value = "deliveries.csv")]
    deliveries: PathBuf,

    /// Where to write the result as JSON
    #[arg(short, long, default_value = "route_check.json")]
    output: PathBuf,

    /// Geocoding cache file
    #[arg(long, default_value = "geo_cache.json")]
    cache: PathBuf,

    /// Drop via-points that cannot be geocoded instead of failing
    #[arg(long)]
    skip_unresolved_via: bool,

    /// More logging (once for debug, twice for trace)
    #[arg(long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    dotenvy::dotenv().ok();

    if cli.zone.trim().is_empty() {
        anyhow::bail!("Please enter a zone to search for deliveries");
    }
    if !cli.buffer.is_finite() || cli.buffer < 0.0 {
        anyhow::bail!("Buffer must be a non-negative number of meters, got {}", cli.buffer);
    }

    let config = OrsConfig::from_env().context("Invalid ORS configuration")?;
    let provider = config.build_provider()?;
    let cache = GeoCache::load_from_file(&cli.cache)
        .with_context(|| format!("Failed to read geocode cache {}", cli.cache.display()))?;
    let geocoder = CachedGeocoder::new(&*provider, cache);
    let store = DeliveryLookup::from_csv(&cli.deliveries)
        .with_context(|| format!("Failed to load {}", cli.deliveries.display()))?;
    log::info!(
        "Loaded {} deliveries from {}",
        store.len(),
        cli.deliveries.display()
    );

    let request = RouteCheckRequest {
        start: cli.start,
        vias: cli.vias,
        end: cli.end,
        zone: cli.zone,
        buffer_m: cli.buffer,
        via_policy: if cli.skip_unresolved_via {
            ViaPolicy::SkipUnresolved
        } else {
            ViaPolicy::Fail
        },
    };

    let result = check_route(&request, &geocoder, &*provider, &store);

    // keep whatever was geocoded, even if the request failed
    geocoder
        .into_cache()
        .save_to_file(&cli.cache)
        .with_context(|| format!("Failed to save geocode cache {}", cli.cache.display()))?;

    let check = result?;
    let counts = check.classification.counts;
    log::info!(
        "Found {} deliveries: {} inside buffer, {} outside buffer",
        counts.total,
        counts.in_buffer,
        counts.out_of_buffer
    );

    let json_output = serde_json::to_string_pretty(&check)?;
    let mut file = File::create(&cli.output)
        .with_context(|| format!("Failed to create {}", cli.output.display()))?;
    file.write_all(json_output.as_bytes())?;
    log::info!("Route check written to {}", cli.output.display());

    Ok(())
}
