//! HTTPS server startup logic.

use std::net::SocketAddr;

use axum::Router;
use axum_server::tls_rustls::RustlsConfig;
use axum_server::Handle;

use crate::config::ServerConfig;

use super::shutdown;

/// Server startup error. Bind and TLS-load failures are fatal; nothing here
/// is retried.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    #[error("failed to load TLS configuration: {0}")]
    TlsConfig(String),

    #[error("server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Starts the HTTPS server and blocks until it shuts down.
///
/// The rustls config is loaded from the combined bundle: the PEM parser
/// picks the certificate blocks and the private key block out of the same
/// file, so one path serves as both arguments. Per-connection I/O errors are
/// absorbed by the accept loop; only bind or TLS-load failures surface here.
pub async fn start_server(
    app: Router,
    config: &ServerConfig,
    handle: Handle,
) -> Result<(), ServerError> {
    let addr: SocketAddr = config.bind_addr().parse()?;

    let rustls_config = RustlsConfig::from_pem_file(&config.bundle_path, &config.bundle_path)
        .await
        .map_err(|e| {
            ServerError::TlsConfig(format!(
                "failed to load certificate bundle '{}': {}",
                config.bundle_path.display(),
                e
            ))
        })?;

    shutdown::setup_shutdown_handler(handle.clone());

    tracing::info!(%addr, bundle = %config.bundle_path.display(), "Starting HTTPS server");

    axum_server::bind_rustls(addr, rustls_config)
        .handle(handle)
        .serve(app.into_make_service())
        .await?;

    Ok(())
}
