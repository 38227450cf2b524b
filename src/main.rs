//! deskplan - import helpdesk objects into configuration state
//!
//! Reads one object from the helpdesk API, converts it to its
//! configuration model, and prints the resulting state as JSON.
//!
//! # Configuration
//!
//! Set the following environment variables (or use a `.env` file):
//!
//! - `HELPDESK_URL`: Base URL of the helpdesk account
//! - `HELPDESK_EMAIL`: Agent email the API token belongs to
//! - `HELPDESK_API_TOKEN`: API token
//!
//! # Usage
//!
//! ```bash
//! deskplan import trigger 360001
//! deskplan kinds
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use deskplan::client::HelpdeskClient;
use deskplan::config::Config;
use deskplan::resources::{self, ResourceKind};

/// Helpdesk configuration import tool.
#[derive(Parser)]
#[command(name = "deskplan", version, about = "Import helpdesk objects into configuration state")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read an object and print its configuration state
    Import {
        /// Object kind, e.g. trigger or ticket_field
        kind: ResourceKind,
        /// Object id as shown by the helpdesk
        id: String,
    },

    /// List the object kinds that can be imported
    Kinds,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // stdout carries the state JSON
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("deskplan=info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Kinds => {
            for kind in ResourceKind::ALL {
                println!("{kind}");
            }
            Ok(())
        }
        Commands::Import { kind, id } => import(kind, &id).await,
    }
}

async fn import(kind: ResourceKind, id: &str) -> Result<()> {
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::debug!("Configuration loaded, base_url: {}", config.base_url);

    let client = HelpdeskClient::new(&config).context("Failed to create helpdesk client")?;

    tracing::info!(kind = %kind, id = id, "Importing");
    let response = resources::import_kind(&client, kind, id).await;
    for diagnostic in &response.diagnostics {
        eprintln!("{diagnostic}");
    }
    if response.diagnostics.has_error() {
        bail!("import of {kind} {id} failed");
    }

    if let Some(state) = response.state {
        let json = serde_json::to_string_pretty(state.as_json())
            .context("Failed to render state")?;
        println!("{json}");
    }
    Ok(())
}
