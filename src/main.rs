//! camserve: an HTTPS static file server for camera web app development.
//!
//! This is the application entry point. It initializes tracing, builds the
//! server configuration from command line arguments, resolves the machine's
//! LAN address, provisions a self-signed certificate bundle covering it, and
//! serves the document root over TLS with permissive CORS headers.
//!
//! Browsers only expose `getUserMedia` and related camera APIs in a secure
//! context, so plain HTTP is useless for testing camera apps from a phone on
//! the same network. Startup order is strictly sequential: address discovery
//! feeds certificate provisioning, which feeds the TLS listener.

mod cert;
mod config;
mod http;
mod net;
mod routes;

use std::path::PathBuf;

use axum_server::Handle;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cert::{ensure_certificate_bundle, RcgenGenerator};
use config::{ServerConfig, DEFAULT_BIND_HOST, DEFAULT_LOG_FILTER, DEFAULT_PORT};
use net::resolve_local_address;
use routes::create_router;

/// camserve: HTTPS static file server for camera web app development
#[derive(Parser, Debug)]
#[command(name = "camserve", version, about)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Address to bind to
    #[arg(long, default_value = DEFAULT_BIND_HOST)]
    bind: String,

    /// Directory to serve (defaults to the current directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Path of the key+certificate bundle (defaults to server.pem in the root)
    #[arg(long)]
    bundle: Option<PathBuf>,

    /// Log level filter (e.g., "camserve=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&log_filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Install rustls crypto provider for HTTPS support
    rustls::crypto::aws_lc_rs::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let root = match args.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };
    let config = ServerConfig::new(args.bind, args.port, root, args.bundle);
    tracing::info!(
        root = %config.root.display(),
        addr = %config.bind_addr(),
        "Loaded configuration"
    );

    // Discovery never fails; worst case it falls back to "localhost".
    let local_address = resolve_local_address();
    tracing::info!(%local_address, "Resolved local network address");

    // Fatal on failure: a missing certificate means no secure context, and
    // without one the camera APIs are unavailable anyway.
    ensure_certificate_bundle(&config, &RcgenGenerator, &local_address)?;

    print_banner(&config, &local_address);

    let app = create_router(&config);
    http::start_server(app, &config, Handle::new()).await?;

    println!("\nServer stopped.");
    Ok(())
}

/// Prints the operator banner: every URL the server answers on, plus the
/// self-signed certificate caveats for first-time users.
fn print_banner(config: &ServerConfig, local_address: &str) {
    let port = config.port;
    println!("{}", "=".repeat(60));
    println!("camserve running - serving {}", config.root.display());
    println!("{}", "=".repeat(60));
    println!("Local access:   https://localhost:{port}");
    println!("Local access:   https://127.0.0.1:{port}");
    println!("Network access: https://{local_address}:{port}");
    println!();
    println!("To access from your phone:");
    println!("  1. Make sure the phone is on the same WiFi network");
    println!("  2. Open: https://{local_address}:{port}");
    println!("  3. Accept the security warning (self-signed certificate)");
    println!();
    println!("Your browser will warn about the self-signed certificate.");
    println!("Click 'Advanced' -> 'Proceed' (or similar) to continue.");
    println!("{}", "=".repeat(60));
    println!("Press Ctrl+C to stop the server");
    println!("{}", "=".repeat(60));
}
