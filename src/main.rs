use clap::Parser;
use nearby_api::{AppState, RestApi};
use nearby_storage::{ArtisanStore, GeocoderConfig, HttpGeocoder};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

/// Nearby artisan discovery server
#[derive(Parser, Debug)]
#[command(name = "nearby")]
#[command(about = "Find artisans near a client", long_about = None)]
struct Args {
    /// Path to the data directory (holds artisans.json)
    #[arg(short, long, default_value = "./data")]
    data_dir: PathBuf,

    /// Address to bind the HTTP API to
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    /// HTTP API port
    #[arg(long, default_value_t = 8000)]
    http_port: u16,

    /// Base URL of the Nominatim-compatible geocoding service
    #[arg(long, default_value = nearby_storage::DEFAULT_GEOCODER_URL)]
    geocoder_url: String,

    /// Geocoding request timeout in seconds
    #[arg(long, default_value_t = 10)]
    geocoder_timeout_secs: u64,

    /// User agent sent to the geocoding service
    #[arg(long, default_value = concat!("nearby/", env!("CARGO_PKG_VERSION")))]
    geocoder_user_agent: String,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting nearby v{}", env!("CARGO_PKG_VERSION"));
    info!("Data directory: {:?}", args.data_dir);
    info!("HTTP API: {}:{}", args.bind, args.http_port);
    info!("Geocoder: {}", args.geocoder_url);

    let store = Arc::new(ArtisanStore::open(&args.data_dir)?);
    info!("Storage initialized with {} artisans", store.len());

    let geocoder = Arc::new(HttpGeocoder::new(GeocoderConfig {
        base_url: args.geocoder_url.clone(),
        user_agent: args.geocoder_user_agent.clone(),
        timeout: Duration::from_secs(args.geocoder_timeout_secs),
    })?);

    let state = AppState::new(store.clone(), geocoder);
    let bind = args.bind.clone();
    let http_port = args.http_port;
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on {}:{}", bind, http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(state, &bind, http_port).await {
                error!("HTTP server error: {}", e);
            }
        })
    });

    info!("nearby started successfully");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received");
        }
        _ = tokio::task::spawn_blocking(move || {
            http_handle.join().ok();
        }) => {
            info!("HTTP server stopped");
        }
    }

    info!("Shutting down...");
    store.save()?;
    Ok(())
}
