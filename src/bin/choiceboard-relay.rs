//! ChoiceBoard Relay Binary
//!
//! This binary starts the relay that forwards the board's function calls
//! to the generator runtime and commits saved symbols to GitHub.
//!
//! # Usage
//!
//! ```bash
//! # Start with default settings (127.0.0.1:3030)
//! CODEWORDS_API_TOKEN=... GITHUB_TOKEN=... choiceboard-relay
//!
//! # Listen on all interfaces
//! choiceboard-relay --host 0.0.0.0 --port 8080
//! ```

use std::net::SocketAddr;

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use choiceboard::relay::{self, RelayConfig};

/// ChoiceBoard Relay - pass-through functions for the choice board
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "3030")]
    port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Credentials and upstreams come from the environment
    let config = RelayConfig::from_env();
    info!(
        owner = %config.github_owner,
        repo = %config.github_repo,
        branch = %config.github_branch,
        "Symbol repository"
    );

    // Build socket address
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;

    // Start the server
    relay::run_server(config, addr).await
}
