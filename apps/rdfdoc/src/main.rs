//! # rdfdoc
//!
//! Serves the resources of an RDF store as documents.
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                 apps/rdfdoc (THE BINARY)              │
//! │                                                       │
//! │  ┌─────────────┐   ┌─────────────┐   ┌─────────────┐  │
//! │  │    CLI      │   │  HTTP API   │   │  Templates  │  │
//! │  │   (clap)    │   │   (axum)    │   │ (handlebars)│  │
//! │  └──────┬──────┘   └──────┬──────┘   └──────┬──────┘  │
//! │         └─────────────────┼─────────────────┘         │
//! │                           ▼                           │
//! │                   ┌───────────────┐                   │
//! │                   │  rdfdoc-core  │                   │
//! │                   │  (THE LOGIC)  │                   │
//! │                   └───────────────┘                   │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! rdfdoc serve --host 0.0.0.0 --port 8080
//! rdfdoc --config rdfdoc.toml status --json
//! rdfdoc describe https://example.org/alice --format application/ld+json
//! rdfdoc templates
//! ```

use clap::Parser;
use rdfdoc::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // RDFDOC_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("RDFDOC_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rdfdoc=info,rdfdoc_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}
