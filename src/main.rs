//! `dm-api` - Data Manager API command line client
//!
//! A developer tool for exercising the DM API from a shell.
//!
//! # Usage
//!
//! ```bash
//! export SQUONK_API_URL=https://example.com/data-manager-api
//! export KEYCLOAK_TOKEN=$(dm-api token -k https://example.com/auth -r squonk -i data-manager-api)
//! dm-api ping
//! dm-api files --project-id project-00000000-0000-0000-0000-000000000000 --path /work
//! ```
//!
//! Responses are printed to stdout as JSON. Failures are reported on stderr
//! and the tool exits with status 1.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dm_api::cli::{self, Cli};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let settings = cli::resolve_settings(&cli)?;

    // Logging goes to stderr, leaving stdout for results
    let default_filter = if settings.logging.verbose {
        "debug"
    } else {
        settings.logging.level.as_str()
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli::run(&cli, settings).await {
        Ok(output) => {
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
