use clap::Parser;
use framefit_api::{ApiSettings, RestApi};
use framefit_core::SaddleConfig;
use framefit_storage::{CatalogManager, CatalogSource};
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

/// Resolve a bicycle frame catalog and serve fit-based rankings
#[derive(Parser, Debug)]
#[command(name = "framefit")]
#[command(about = "Bicycle frame geometry resolver and ranking server", long_about = None)]
struct Args {
    /// Catalog location: a JSON dump file or an http(s) endpoint returning all records
    #[arg(short, long)]
    source: Option<String>,

    /// HTTP API port
    #[arg(long, default_value_t = 8080)]
    http_port: u16,

    /// Saddle height along the seat tube (cm)
    #[arg(long, value_parser = parse_length, default_value_t = SaddleConfig::default().saddle_height)]
    saddle_height: f64,

    /// Saddle setback behind the bottom bracket (cm)
    #[arg(long, value_parser = parse_length, default_value_t = SaddleConfig::default().saddle_fore_aft)]
    saddle_fore_aft: f64,

    /// Number of frames returned by a ranking when the request does not say
    #[arg(long, default_value_t = framefit_similarity::DEFAULT_TOP_N)]
    top_n: usize,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

/// A length in cm; NaN and infinities are rejected.
fn parse_length(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("{s} is not a finite length"))
    }
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

    info!("Starting FrameFit v{}", env!("CARGO_PKG_VERSION"));
    info!("HTTP API port: {}", args.http_port);
    info!(
        "Saddle: height {} cm, fore/aft {} cm",
        args.saddle_height, args.saddle_fore_aft
    );

    let saddle = SaddleConfig::new(args.saddle_height, args.saddle_fore_aft);
    let source = args.source.as_deref().map(CatalogSource::parse);
    let manager = Arc::new(CatalogManager::new(source, saddle));

    if manager.source().is_some() {
        // failure is already logged; serve an empty catalog
        if let Ok(count) = manager.populate().await {
            info!("Catalog loaded: {} frames", count);
        }
    } else {
        warn!("No --source given, serving an empty catalog");
    }

    let manager_http = manager.clone();
    let http_port = args.http_port;
    let settings = ApiSettings {
        default_top_n: args.top_n,
    };
    let http_handle = std::thread::spawn(move || {
        info!("Starting HTTP server on port {}", http_port);
        let sys = actix_web::rt::System::new();
        sys.block_on(async {
            if let Err(e) = RestApi::start(manager_http, http_port, settings).await {
                tracing::error!("HTTP server error: {}", e);
            }
        })
    });

    info!("FrameFit started successfully");
    info!("HTTP API: http://localhost:{}/", args.http_port);

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
    Ok(())
}
