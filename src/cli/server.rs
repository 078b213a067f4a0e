//! Server mode CLI logic
//!
//! Contains the core logic for running the HTTP server mode.

use crate::{
    Settings,
    config::{ConfigLoader, settings::LoggingSettings},
    server::app,
    utils::version,
};
use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Arguments for server mode
#[derive(Debug, Default)]
pub struct ServerArgs {
    pub port: Option<u16>,
    pub host: Option<String>,
    pub config: Option<PathBuf>,
    pub verbose: bool,
}

/// Run server mode with the given arguments
pub async fn run_server_mode(args: ServerArgs) -> Result<()> {
    let settings = resolve_settings(&args)?;

    init_logging(&settings.logging);

    tracing::info!("Starting vidproxy v{}", version::get_version());
    tracing::debug!("Effective configuration: {:?}", settings);

    let addr = parse_and_bind_address(&settings.server.host, settings.server.port).await?;
    let app = app::create_app(settings).context("failed to build resolver")?;

    tracing::info!("vidproxy v{} listening on {}", version::get_version(), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Merge file, environment and CLI configuration
pub fn resolve_settings(args: &ServerArgs) -> Result<Settings> {
    let mut settings = ConfigLoader::new()
        .load_default(args.config.as_deref())
        .context("failed to load configuration")?;

    if let Some(host) = &args.host {
        settings.server.host = host.clone();
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    if args.verbose {
        settings.logging.verbose = true;
    }

    Ok(settings)
}

/// Install the global tracing subscriber; `RUST_LOG` takes precedence
pub fn init_logging(logging: &LoggingSettings) {
    let level = if logging.verbose {
        "debug"
    } else {
        logging.level.as_str()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Parse host string and attempt to bind to the address
///
/// - Literal IPs are used as-is
/// - `::` falls back to `0.0.0.0` when IPv6 is unavailable
/// - Anything else is resolved as a host name
pub async fn parse_and_bind_address(host: &str, port: u16) -> Result<SocketAddr> {
    if host == "::" {
        let addr = SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), port);
        return match tokio::net::TcpListener::bind(addr).await {
            Ok(_) => {
                tracing::debug!("IPv6 available, using {}", addr);
                Ok(addr)
            }
            Err(e) => {
                tracing::warn!(
                    "Could not listen on [::]:{} (Caused by {}), falling back to 0.0.0.0",
                    port,
                    e
                );
                Ok(SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), port))
            }
        };
    }

    if let Ok(ip) = host.parse::<IpAddr>() {
        let addr = SocketAddr::new(ip, port);
        tracing::debug!("Parsed address: {}", addr);
        return Ok(addr);
    }

    if host.is_empty() {
        anyhow::bail!("Invalid host address: empty host");
    }

    let mut resolved = tokio::net::lookup_host((host, port))
        .await
        .with_context(|| format!("Invalid host address: {}", host))?;
    resolved
        .next()
        .with_context(|| format!("Invalid host address: {} resolved to nothing", host))
}
