use clap::Subcommand;

use crate::cli::OutputFormat;
use crate::config::AppConfig;

#[derive(Subcommand)]
pub enum ProxyCommands {
    #[command(about = "Run the authenticating proxy in front of the API")]
    Serve {
        #[arg(long, help = "Listen port (defaults to PROXY_PORT / config)")]
        port: Option<u16>,
        #[arg(long, help = "Upstream API URL (defaults to PROXY_UPSTREAM_URL / config)")]
        upstream: Option<String>,
    },
}

pub async fn handle(cmd: ProxyCommands, _output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ProxyCommands::Serve { port, upstream } => {
            let mut config = AppConfig::from_env();
            if let Some(port) = port {
                config.proxy.port = port;
            }
            if let Some(upstream) = upstream {
                config.proxy.upstream_url = upstream;
            }
            if config.security.jwt_secret.is_empty() {
                anyhow::bail!("JWT_SECRET must be set to verify tokens");
            }
            crate::proxy::serve(&config).await
        }
    }
}
