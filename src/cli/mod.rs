pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::client::ApiClient;
use crate::config;

#[derive(Parser)]
#[command(name = "backoffice")]
#[command(about = "Back-office CLI - normalized access to the platform REST API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, conflicts_with = "json", help = "Output in human-readable text format (default)")]
    pub text: bool,

    #[arg(long, global = true, help = "Output the result envelope as JSON")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Send a raw request and print the normalized envelope")]
    Request(commands::request::RequestArgs),

    #[command(about = "CRUD operations on platform resources")]
    Resource {
        #[arg(help = "Resource name (users, clients, invoices, job-sheets, ...)")]
        name: String,
        #[command(subcommand)]
        cmd: commands::resource::ResourceCommands,
    },

    #[command(about = "Inspect the configured session")]
    Session {
        #[command(subcommand)]
        cmd: commands::session::SessionCommands,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        match (cli.text, cli.json) {
            (false, true) => OutputFormat::Json,
            _ => OutputFormat::Text,
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let client = ApiClient::from_config(config::config())?;

    match cli.command {
        Commands::Request(args) => commands::request::handle(&client, args, output_format).await,
        Commands::Resource { name, cmd } => {
            commands::resource::handle(&client, &name, cmd, output_format).await
        }
        Commands::Session { cmd } => commands::session::handle(&client, cmd, output_format).await,
    }
}
