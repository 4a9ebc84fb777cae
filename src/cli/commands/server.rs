use clap::Subcommand;
use serde_json::json;

use crate::cli::config::{load_server_config, ping_server, save_server_config};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ServerCommands {
    #[command(about = "Point the CLI at an API server")]
    Use {
        #[arg(help = "Server URL, e.g. http://localhost:3000")]
        url: String,
    },

    #[command(about = "Show the configured server")]
    Current,

    #[command(about = "Health check the configured server")]
    Ping,
}

pub async fn handle(cmd: ServerCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ServerCommands::Use { url } => {
            url::Url::parse(&url).map_err(|e| anyhow::anyhow!("Invalid server URL '{}': {}", url, e))?;
            let mut config = load_server_config()?;
            config.url = url.trim_end_matches('/').to_string();
            save_server_config(&config)?;
            output_success(
                &output_format,
                &format!("Using server {}", config.url),
                Some(json!({ "url": config.url })),
            )
        }
        ServerCommands::Current => {
            let config = load_server_config()?;
            output_success(&output_format, &config.url, Some(serde_json::to_value(&config)?))
        }
        ServerCommands::Ping => {
            let mut config = load_server_config()?;
            let status = ping_server(&config.url).await;
            config.update_ping(status.clone());
            save_server_config(&config)?;
            output_success(
                &output_format,
                &format!("{} is {:?}", config.url, status),
                Some(serde_json::to_value(&config)?),
            )
        }
    }
}
