pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "allocator")]
#[command(about = "Command-line client for the workforce allocation API")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Select and check the API server")]
    Server {
        #[command(subcommand)]
        cmd: commands::server::ServerCommands,
    },

    #[command(about = "Sign in, sign up and manage the stored token")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "Employees, job roles and skills (admin)")]
    Admin {
        #[command(subcommand)]
        cmd: commands::admin::AdminCommands,
    },

    #[command(about = "Employees, trainings and internal projects (manager)")]
    Manager {
        #[command(subcommand)]
        cmd: commands::manager::ManagerCommands,
    },

    #[command(about = "Bench employees and allocations (allocator)")]
    Allocator {
        #[command(subcommand)]
        cmd: commands::allocator::AllocatorCommands,
    },

    #[command(about = "Date range and job role reports (manager)")]
    Reports {
        #[command(subcommand)]
        cmd: commands::reports::ReportCommands,
    },

    #[command(about = "Authenticating reverse proxy")]
    Proxy {
        #[command(subcommand)]
        cmd: commands::proxy::ProxyCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    let result = match cli.command {
        Commands::Server { cmd } => commands::server::handle(cmd, output_format.clone()).await,
        Commands::Auth { cmd } => commands::auth::handle(cmd, output_format.clone()).await,
        Commands::Admin { cmd } => commands::admin::handle(cmd, output_format.clone()).await,
        Commands::Manager { cmd } => commands::manager::handle(cmd, output_format.clone()).await,
        Commands::Allocator { cmd } => commands::allocator::handle(cmd, output_format.clone()).await,
        Commands::Reports { cmd } => commands::reports::handle(cmd, output_format.clone()).await,
        Commands::Proxy { cmd } => commands::proxy::handle(cmd, output_format.clone()).await,
    };

    // Surface API failures in the chosen format; the binary still exits non-zero.
    if let Err(e) = &result {
        let code = e
            .downcast_ref::<crate::client::ClientError>()
            .and_then(|ce| match ce {
                crate::client::ClientError::Api { code, .. } => code.clone(),
                _ => None,
            });
        if matches!(output_format, OutputFormat::Json) {
            utils::output_error(&output_format, &e.to_string(), code.as_deref())?;
        }
    }

    result
}
