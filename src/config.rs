//! Server configuration and constants.
//!
//! `ServerConfig` is the immutable configuration value built once at startup
//! from command line arguments and passed to the components that need it.
//! Defaults mirror how the tool is normally used: serve the current directory
//! on every interface, port 8443, with the certificate bundle kept next to
//! the files being served.

use std::path::PathBuf;

/// Default listen port. 8443 is the conventional alternative HTTPS port and
/// does not require elevated privileges.
pub const DEFAULT_PORT: u16 = 8443;

/// Default bind host: all interfaces, so phones on the same network can reach
/// the server.
pub const DEFAULT_BIND_HOST: &str = "0.0.0.0";

/// File name of the combined key+certificate bundle, relative to the
/// document root.
pub const BUNDLE_FILE_NAME: &str = "server.pem";

/// Validity period of a freshly generated certificate, in days.
pub const CERT_VALIDITY_DAYS: i64 = 365;

/// Default tracing filter when neither `--log-level` nor `RUST_LOG` is set.
pub const DEFAULT_LOG_FILTER: &str = "camserve=info,tower_http=warn";

/// Immutable server configuration, constructed once in `main`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the listener on.
    pub bind_host: String,
    /// TCP port to listen on.
    pub port: u16,
    /// Directory the files are served from.
    pub root: PathBuf,
    /// Path of the combined key+certificate PEM bundle.
    pub bundle_path: PathBuf,
}

impl ServerConfig {
    /// Builds a configuration for serving `root`, with the bundle stored at
    /// `bundle_path` or, when `None`, at `<root>/server.pem`.
    pub fn new(
        bind_host: String,
        port: u16,
        root: PathBuf,
        bundle_path: Option<PathBuf>,
    ) -> Self {
        let bundle_path = bundle_path.unwrap_or_else(|| root.join(BUNDLE_FILE_NAME));
        Self {
            bind_host,
            port,
            root,
            bundle_path,
        }
    }

    /// The `host:port` string the listener binds to.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind_host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundle_defaults_to_root_relative_path() {
        let config = ServerConfig::new(
            DEFAULT_BIND_HOST.to_string(),
            DEFAULT_PORT,
            PathBuf::from("/srv/app"),
            None,
        );
        assert_eq!(config.bundle_path, PathBuf::from("/srv/app/server.pem"));
        assert_eq!(config.bind_addr(), "0.0.0.0:8443");
    }

    #[test]
    fn explicit_bundle_path_wins() {
        let config = ServerConfig::new(
            "127.0.0.1".to_string(),
            9000,
            PathBuf::from("/srv/app"),
            Some(PathBuf::from("/etc/camserve/dev.pem")),
        );
        assert_eq!(config.bundle_path, PathBuf::from("/etc/camserve/dev.pem"));
        assert_eq!(config.bind_addr(), "127.0.0.1:9000");
    }
}
