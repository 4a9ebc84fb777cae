use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::{ApiClient, FileTokenStore, TokenStore};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:3000";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServerStatus {
    Up,
    Down,
    Unknown,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub url: String,
    pub last_ping: Option<DateTime<Utc>>,
    pub status: ServerStatus,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_SERVER_URL.to_string(),
            last_ping: None,
            status: ServerStatus::Unknown,
        }
    }
}

impl ServerConfig {
    pub fn update_ping(&mut self, status: ServerStatus) {
        self.last_ping = Some(Utc::now());
        self.status = status;
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("ALLOCATOR_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("allocator").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_server_config() -> anyhow::Result<ServerConfig> {
    let server_file = get_config_dir()?.join("server.json");

    if !server_file.exists() {
        return Ok(ServerConfig::default());
    }

    let content = fs::read_to_string(server_file)?;
    let config: ServerConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_server_config(config: &ServerConfig) -> anyhow::Result<()> {
    let server_file = get_config_dir()?.join("server.json");

    let content = serde_json::to_string_pretty(config)?;
    fs::write(server_file, content)?;
    Ok(())
}

pub fn token_store() -> anyhow::Result<Arc<dyn TokenStore>> {
    Ok(Arc::new(FileTokenStore::new(&get_config_dir()?)))
}

/// Client for the configured server, carrying the stored token.
pub fn api_client() -> anyhow::Result<ApiClient> {
    let server = load_server_config()?;
    Ok(ApiClient::new(&server.url, token_store()?)?)
}

pub async fn ping_server(url: &str) -> ServerStatus {
    let client = reqwest::Client::new();
    let url = format!("{}/health", url.trim_end_matches('/'));

    match client.get(&url).timeout(std::time::Duration::from_secs(5)).send().await {
        Ok(response) if response.status().is_success() => ServerStatus::Up,
        _ => ServerStatus::Down,
    }
}
