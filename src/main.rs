/// remote-trigger: local webhook relay
///
/// Main entry point. Parses command-line flags, loads the trigger file and
/// starts the HTTP server.

use clap::Parser;
use remote_trigger::{
    config::{Args, Config},
    server::start_server,
};

/// Application entry point
///
/// The server provides:
/// - One endpoint per configured trigger at /{url}
/// - 404 for every other path
///
/// Exits non-zero if the trigger file cannot be read or parsed.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from(Args::parse());

    start_server(config).await
}
