//! HTTP server binary for direct link resolution
//!
//! Starts an HTTP server that resolves video page URLs into direct media
//! URLs and redirects callers to them.
//!
//! # Usage
//!
//! ```bash
//! vidproxy --port 8000 --host 0.0.0.0
//! ```
//!
//! # API Endpoints
//!
//! - `GET /proxy?url=<page>`: Redirect to the page's direct media URL
//! - `GET /ping`: Health check endpoint
//! - `POST /invalidate_caches`: Clear the resolution cache

use clap::Parser;
use std::path::PathBuf;
use vidproxy::cli::{ServerArgs, run_server_mode};

/// Resolve video pages into direct media links
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Path to a TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    run_server_mode(ServerArgs {
        port: cli.port,
        host: cli.host,
        config: cli.config,
        verbose: cli.verbose,
    })
    .await
}
