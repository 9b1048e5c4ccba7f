// src/bin/locate.rs
// DOCUMENTATION: Terminal client for the nearby emergency services flow
// PURPOSE: Run the client orchestrator with console collaborators

use anyhow::{bail, Result};
use clap::Parser;
use nearby_emergency::client::console::{
    parse_position, ConsoleGeolocation, ConsoleList, ConsoleMap, ConsoleNotifier,
};
use nearby_emergency::client::{
    ClientConfig, Collaborators, CredentialSource, FileLocationStore, LocationMode, LocationStore,
    Orchestrator, SearchMode,
};
use nearby_emergency::models::Coordinate;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// List hospitals, police and fire stations near a position
#[derive(Parser, Debug)]
#[command(name = "locate", version, about)]
struct Args {
    /// Current latitude
    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    /// Current longitude
    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,

    /// one-shot, continuous (reads "lat,lon" lines from stdin) or cached-then-live
    #[arg(long, env = "LOCATION_MODE")]
    mode: Option<LocationMode>,

    /// proxy or direct
    #[arg(long, env = "SEARCH_MODE")]
    search: Option<SearchMode>,

    /// Backend base URL
    #[arg(long, env = "BACKEND_URL")]
    backend: Option<String>,

    /// Use this subscription key instead of a backend-issued token
    #[arg(long)]
    key: Option<String>,

    /// Search radius in meters
    #[arg(long)]
    radius: Option<u32>,

    /// Seconds to wait for a position
    #[arg(long)]
    timeout: Option<u64>,

    /// Fallback position used when no location is available, as "lat,lon"
    #[arg(long, allow_hyphen_values = true)]
    fallback: Option<String>,

    /// File holding the last known location
    #[arg(long, env = "SAVED_LOCATION_PATH")]
    saved_location: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn into_config(self) -> Result<(ClientConfig, Option<Coordinate>)> {
        let mut config = ClientConfig::from_env();

        if let Some(mode) = self.mode {
            config.location_mode = mode;
        }
        if let Some(search) = self.search {
            config.search_mode = search;
        }
        if let Some(backend) = self.backend {
            config.backend_url = backend;
        }
        if let Some(key) = self.key {
            config.credential_source = CredentialSource::StaticKey(key);
        }
        if let Some(radius) = self.radius {
            config.radius_m = radius;
        }
        if let Some(timeout) = self.timeout {
            config.location_timeout = Duration::from_secs(timeout);
        }
        if let Some(fallback) = self.fallback.as_deref() {
            match parse_position(fallback) {
                Some(position) => config.fallback = Some(position),
                None => bail!("invalid --fallback {:?}, expected \"lat,lon\"", fallback),
            }
        }
        if self.saved_location.is_some() {
            config.saved_location_path = self.saved_location;
        }

        let position = match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
            (None, None) => None,
            _ => bail!("--lat and --lon must be given together"),
        };

        Ok((config, position))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if std::env::var("RUST_LOG").is_err() {
        let level = if args.verbose { "debug" } else { "warn" };
        std::env::set_var("RUST_LOG", level);
    }
    env_logger::init();

    let (config, position) = args.into_config()?;

    let store = config
        .saved_location_path
        .clone()
        .map(|path| Arc::new(FileLocationStore::new(path)) as Arc<dyn LocationStore>);

    let collaborators = Collaborators {
        geolocation: Arc::new(ConsoleGeolocation::new(position)),
        surface: Arc::new(ConsoleMap),
        list: Box::new(ConsoleList),
        notifier: Arc::new(ConsoleNotifier),
        store,
    };

    let shutdown = CancellationToken::new();
    let ctrl_c = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrl_c.cancel();
        }
    });

    let mut orchestrator = Orchestrator::new(config, collaborators);
    let summary = orchestrator.run(shutdown).await;

    log::info!(
        "Finished: {} cycles, {} rendered, {} superseded, {} without services, {} aborted",
        summary.cycles,
        summary.rendered,
        summary.superseded,
        summary.no_services,
        summary.aborted
    );

    if summary.rendered == 0 && summary.cycles > 0 {
        std::process::exit(1);
    }
    Ok(())
}
