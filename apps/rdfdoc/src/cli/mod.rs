//! # rdfdoc CLI Module
//!
//! ## Available Commands
//!
//! - `serve` - Load the store and start the HTTP server
//! - `status` - Show store and partition statistics
//! - `describe` - Print the document of one resource
//! - `templates` - List the template table

mod commands;

use crate::config::ServerConfig;
use clap::{Parser, Subcommand};
use rdfdoc_core::RdfDocError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// rdfdoc - serve RDF resources as documents
///
/// Loads a directory of RDF statement files and answers every resource URI
/// with its bounded description in the representation the client asks for.
#[derive(Parser, Debug)]
#[command(name = "rdfdoc")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress startup output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Show store status
    Status {
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },

    /// Print the document of a resource
    Describe {
        /// Resource URI
        uri: String,

        /// Media type to print
        #[arg(short, long, default_value = "text/turtle")]
        format: String,
    },

    /// List available templates
    Templates,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), RdfDocError> {
    let config = ServerConfig::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Serve { host, port }) => cmd_serve(config, &host, port, cli.quiet).await,
        Some(Commands::Status { json }) => cmd_status(&config, json),
        Some(Commands::Describe { uri, format }) => {
            let output = describe(&config, &uri, &format)?;
            println!("{}", String::from_utf8_lossy(&output));
            Ok(())
        }
        Some(Commands::Templates) => cmd_templates(&config),
        None => cmd_status(&config, false),
    }
}
